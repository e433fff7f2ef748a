//! Deadlines Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod datetime;
mod format;
mod models;
mod poller;
mod state;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
    mount_to_body(App);
}
