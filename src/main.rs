use std::process;

use appliance_panel::{Panel, PanelConfig};

fn main() {
    let config = PanelConfig::default();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    if let Err(err) = Panel::new(config).show() {
        tracing::error!(error = %err, "panel exited with an error");
        process::exit(1);
    }
}
