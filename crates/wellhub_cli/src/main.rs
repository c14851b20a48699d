//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `wellhub_core` wiring: config, logging and the default store.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `wellhub [config.toml]`

use log::info;
use std::path::Path;
use std::process::ExitCode;
use wellhub_core::{StoreEngine, WellhubConfig};

fn main() -> ExitCode {
    match run(std::env::args().nth(1).as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("wellhub: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: Option<&str>) -> Result<(), String> {
    let config = match config_path {
        Some(path) => WellhubConfig::load_with_env(Path::new(path)).map_err(|err| err.to_string())?,
        None => {
            let mut config = WellhubConfig::default();
            config.apply_overrides(|key| std::env::var(key).ok());
            config
        }
    };

    let logging_on = wellhub_core::init_from_config(&config.logging)?;
    info!("event=cli_start module=cli status=ok logging={logging_on}");

    let engine = StoreEngine::from_config(&config.storage);
    let store = engine.open_default().map_err(|err| err.to_string())?;
    let collections = store.collection_names().map_err(|err| err.to_string())?;

    println!("wellhub_core ping={}", wellhub_core::ping());
    println!("wellhub_core version={}", wellhub_core::core_version());
    println!("store={} collections={}", store.name(), collections.len());
    Ok(())
}
