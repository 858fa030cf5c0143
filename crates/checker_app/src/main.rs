mod platform;

use std::path::PathBuf;

use checker_logging::checker_warn;
use platform::config::{load_config, AppConfig, DEFAULT_CONFIG_FILENAME};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILENAME));

    let (config, config_error) = match load_config(&config_path) {
        Ok(config) => (config, None),
        Err(err) => (AppConfig::default(), Some(err)),
    };

    checker_logging::initialize(config.log.into(), config.log_level());
    if let Some(err) = config_error {
        eprintln!("Warning: {err}; using default configuration");
        checker_warn!("Falling back to default configuration: {}", err);
    }

    platform::run_app(config)
}
