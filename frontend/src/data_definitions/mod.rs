pub mod debounce;
pub mod search_view_state;
pub mod url_history;
pub mod url_param;
