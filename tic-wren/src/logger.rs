use env_logger::Builder;

use crate::config::LoggerConfig;

/// Installs the `env_logger` backend. `RUST_LOG` still overrides the
/// configured filters. Installing twice is harmless: the second call is
/// reported and ignored.
pub fn init(config: Option<&LoggerConfig>) {
    let config = config.cloned().unwrap_or_default();
    let mut builder = Builder::new();
    builder
        .filter_level(config.level_filter)
        .filter_module("tic_wren", config.app_level_filter)
        .parse_default_env();

    if let Err(e) = builder.try_init() {
        log::debug!("logger already installed: {e}");
    }
}
