// Dioxus `rsx!` macro expands to unwraps internally; allow to avoid false positives.
#![allow(clippy::disallowed_methods)]

use dioxus::prelude::*;

use session_core::ChannelConfig;
use ui::SessionPage;

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    let config = use_hook(channel_config);

    rsx! {
        SessionPage { config, title: "Ping server" }
    }
}

/// Channel config for the page being shown.
///
/// A `SESSION_SERVER_URL` set at build time replaces the page origin.
fn channel_config() -> ChannelConfig {
    let (origin, pathname) = page_location();
    let server_url = option_env!("SESSION_SERVER_URL")
        .map(str::to_string)
        .unwrap_or(origin);
    let config = ChannelConfig::for_page(&server_url, &pathname);
    tracing::info!(
        "Session server: {} (path {})",
        config.server_url,
        config.socket_path
    );
    config
}

#[cfg(target_arch = "wasm32")]
fn page_location() -> (String, String) {
    let location = web_sys::window().map(|window| window.location());
    let origin = location
        .as_ref()
        .and_then(|l| l.origin().ok())
        .unwrap_or_default();
    let pathname = location
        .as_ref()
        .and_then(|l| l.pathname().ok())
        .unwrap_or_default();
    (origin, pathname)
}

#[cfg(not(target_arch = "wasm32"))]
fn page_location() -> (String, String) {
    (ChannelConfig::default().server_url, String::new())
}
