//! Frontend application entry point.

use std::sync::Arc;

use backend::api_utils::rest_utils::ApiClient;
use frontend::{
    api::search_api::SearchApi,
    app::App,
    controller::filter_search_controller::{ControllerConfig, spawn_search_controller},
    data_definitions::url_history::MemoryHistory,
    routes::SearchRoute,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let initial_route = match std::env::args().nth(1) {
        Some(url) => url.parse::<SearchRoute>()?,
        None => SearchRoute::default(),
    };
    let client = ApiClient::from_env()?;
    tracing::info!(base_url = %client.config().base_url, country = client.country(), route = %initial_route, "starting offer search");

    let api: Arc<dyn SearchApi> = Arc::new(client);
    let history = MemoryHistory::new(initial_route);
    let handle = spawn_search_controller(api.clone(), history.clone(), ControllerConfig::default());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    App::new(handle, api, history).run(stdin).await
}
