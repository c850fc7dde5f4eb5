//! Frontend library entry point.

pub mod api;
pub mod app;
pub mod components;
pub mod controller;
pub mod data_definitions;
pub mod pages;
pub mod routes;
