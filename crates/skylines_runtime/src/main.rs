//! Skylines document tool
//!
//! Entry point for `skylines-doc`. Installs the built-in type registry, then
//! either prints a sample document of every built-in type or decodes the
//! JSON documents given on the command line and prints them re-encoded.
//!
//! Run with: cargo run -p skylines_runtime
//!       or: cargo run --bin skylines-doc -- doc.json

mod boot_config;
mod documents;

use std::path::PathBuf;

use boot_config::BootConfig;
use skylines_core::{Decoder, Encoder};
use thiserror::Error;

/// Errors surfaced by the tool
#[derive(Debug, Error)]
pub enum RunError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {name}: {value}")]
    Setting { name: &'static str, value: String },

    #[error("{failed} of {total} documents failed")]
    Documents { failed: usize, total: usize },

    #[error(transparent)]
    Core(#[from] skylines_core::Error),
}

fn main() {
    // Configuration is read first so it can pick the log level
    let config = match BootConfig::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    init_logging(config.log_filter());
    config.print_summary();

    if let Err(e) = run(&config) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(default_filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
}

fn run(config: &BootConfig) -> Result<(), RunError> {
    let registry = skylines_model::bootstrap()?;
    log::info!("Registered {} types", registry.len());

    let encoder = Encoder::new(registry);
    let decoder = Decoder::new(registry);

    if config.documents.is_empty() {
        let samples = documents::sample_document(&encoder)?;
        println!("{}", documents::render(&samples, &config.output)?);
        return Ok(());
    }

    let mut failed = 0usize;
    for path in &config.documents {
        match documents::process_file(path, &encoder, &decoder, config) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(RunError::Documents {
            failed,
            total: config.documents.len(),
        });
    }
    Ok(())
}
