//! Browser bridge for shoal.
//!
//! All logic lives in `shoal-core`; this crate only touches the DOM, issues
//! fetches and drives timers. Every export is safe to call more than once.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use shoal_core::SiteConfig;

mod dom;
mod fish;
mod images;
mod leaderboard;
mod net;
mod storage;

pub use storage::BrowserStore;

fn install_logging() {
    console_error_panic_hook::set_once();
    // A second call finds the logger already set; nothing to do.
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("shoal: initialized");
    }
}

#[wasm_bindgen]
pub fn shoal_init() {
    install_logging();
}

/// Render the podium and list. `config_json` overrides any subset of the
/// default `SiteConfig`.
#[wasm_bindgen]
pub fn leaderboard_start(config_json: Option<String>) {
    install_logging();
    let config = SiteConfig::from_override(config_json.as_deref());
    spawn_local(leaderboard::run(config));
}

/// Start the fish background, or resume it after `fish_stop`.
#[wasm_bindgen]
pub fn fish_start(config_json: Option<String>) {
    install_logging();
    let config = SiteConfig::from_override(config_json.as_deref());
    if let Err(err) = fish::start(config) {
        log::error!("fish: start failed: {err:?}");
        web_sys::console::error_1(&err);
    }
}

#[wasm_bindgen]
pub fn fish_stop() {
    fish::stop();
}

#[wasm_bindgen]
pub fn fish_count() -> u32 {
    fish::count()
}
