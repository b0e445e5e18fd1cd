//! Boot Configuration
//!
//! Determines how `skylines-doc` renders and decodes documents.
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Command line: positional document paths
//! 2. Environment variables: `SKYLINES_FORMAT=json`, `SKYLINES_DEBUG=1`
//! 3. Config file: `$SKYLINES_CONFIG`, else `skylines.toml`
//! 4. Built-in defaults
//!
//! # Example Config File
//!
//! ```toml
//! debug = false
//!
//! [output]
//! format = "xml"      # xml, json
//! indent = 2          # omit for single-line xml
//! declaration = true
//!
//! [decode]
//! candidates = ["NetOptions", "NaturalResourceCellBase"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skylines_core::XmlOptions;
use skylines_model::{CubicBezier, NaturalResourceCell, NetOptions, Vector3};

use crate::RunError;

/// Explicit config file location
pub const CONFIG_ENV: &str = "SKYLINES_CONFIG";
/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "skylines.toml";
pub const FORMAT_ENV: &str = "SKYLINES_FORMAT";
pub const DEBUG_ENV: &str = "SKYLINES_DEBUG";

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// The game's import format
    #[default]
    Xml,
    /// Tree persisted as JSON, readable by `skylines-doc`
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml => write!(f, "xml"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Spaces per nesting level in xml output
    pub indent: Option<usize>,
    /// Emit the xml declaration
    pub declaration: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let xml = XmlOptions::default();
        Self {
            format: OutputFormat::Xml,
            indent: xml.indent,
            declaration: xml.declaration,
        }
    }
}

impl OutputConfig {
    pub fn xml_options(&self) -> XmlOptions {
        XmlOptions {
            indent: self.indent,
            declaration: self.declaration,
        }
    }
}

/// Decode configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Type tags tried in order when a document root carries no tag
    pub candidates: Vec<String>,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            candidates: [
                NetOptions::TYPE_TAG,
                NaturalResourceCell::TYPE_TAG,
                CubicBezier::TYPE_TAG,
                Vector3::TYPE_TAG,
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootConfig {
    pub output: OutputConfig,
    pub decode: DecodeConfig,
    /// Enable debug logging
    pub debug: bool,
    /// Documents to decode; empty prints the built-in samples
    #[serde(skip)]
    pub documents: Vec<PathBuf>,
    /// Config file the settings came from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl BootConfig {
    /// Load boot configuration from all sources
    ///
    /// Runs before logging is initialized, so it reports nothing itself;
    /// see [`BootConfig::print_summary`].
    pub fn load() -> Result<Self, RunError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.apply_args(std::env::args().skip(1));
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, RunError> {
        let content = std::fs::read_to_string(path).map_err(|source| RunError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|source| RunError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Override with environment variables
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), RunError> {
        if let Some(format) = lookup(FORMAT_ENV) {
            self.output.format = format.parse().map_err(|_| RunError::Setting {
                name: FORMAT_ENV,
                value: format.clone(),
            })?;
        }

        if let Some(debug) = lookup(DEBUG_ENV) {
            self.debug = matches!(debug.trim().to_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Collect document paths from positional arguments
    pub fn apply_args(&mut self, args: impl IntoIterator<Item = String>) {
        for arg in args {
            // Skip flags starting with --
            if arg.starts_with("--") {
                continue;
            }
            self.documents.push(PathBuf::from(arg));
        }
    }

    /// Default log filter for env_logger
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("Boot Configuration:");
        match &self.config_path {
            Some(path) => log::info!("  Config: {}", path.display()),
            None => log::info!("  Config: built-in defaults"),
        }
        log::info!("  Output: {} (indent: {:?})", self.output.format, self.output.indent);
        log::info!("  Sniff candidates: [{}]", self.decode.candidates.join(", "));
        log::info!("  Documents: {}", self.documents.len());
    }
}
