#![allow(warnings)]
//! LabDash Frontend Entry Point

mod api;
mod app;
mod avatar;
mod components;
mod config;
mod context;
mod error;
mod filters;
mod import;
mod markdown;
mod models;
mod scan;
mod store;
mod validation;

use app::App;
use config::AppConfig;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    if let Err(err) = rolling_logger::init(config.log_level, config.log_capacity) {
        web_sys::console::warn_1(&format!("[APP] logger already installed: {}", err).into());
    }
    log::info!("[APP] starting, api base {:?}", config.api_base_url);

    mount_to_body(move || view! { <App config=config.clone() /> });
}
