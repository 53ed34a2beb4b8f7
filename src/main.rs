//! Garden Tracker Frontend Entry Point

mod app;
mod components;
mod config;
mod context;
mod feedback;
mod fetch;
mod logger;
mod runtime;
mod store;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Debug);
    mount_to_body(App);
}
