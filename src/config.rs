//! Client Configuration Loader
//!
//! Reads an optional `<script id="garden-config" type="application/json">`
//! block from the page; anything missing or invalid falls back to defaults.

use garden_state::ClientConfig;

const CONFIG_ELEMENT_ID: &str = "garden-config";

pub fn load_client_config() -> ClientConfig {
    let text = web_sys::window()
        .and_then(|win| win.document())
        .and_then(|doc| doc.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|el| el.text_content());

    match text {
        Some(json) => ClientConfig::from_json(&json).unwrap_or_else(|e| {
            log::warn!("{}; using defaults", e);
            ClientConfig::default()
        }),
        None => ClientConfig::default(),
    }
}
