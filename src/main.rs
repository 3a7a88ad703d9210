use dioxus::prelude::*;
use stocktrader::app::{self, App};
use tracing::{info, warn};

fn main() {
    let config = app::config();

    // Initialize logging
    dioxus_logger::init(config.log_level()).expect("failed to init logger");

    if let Some(reason) = app::config_error() {
        warn!(%reason, "shipped config rejected, using defaults");
    }

    info!(
        backend = %config.api.base_url,
        buy_layout = ?config.display.buy_layout,
        sell_layout = ?config.display.sell_layout,
        "stocktrader v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    launch(App);
}
