use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

/// Runtime settings, layered from built-in defaults, an optional TOML file and
/// `SARF_*` environment variables (later layers win).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Directive for the log filter when `RUST_LOG` is not set.
    pub log_filter: String,
    /// Roots to register at startup, one per line.
    #[serde(default)]
    pub roots_file: Option<PathBuf>,
    /// Templates to register at startup, one `name|rule` per line.
    #[serde(default)]
    pub schemes_file: Option<PathBuf>,
    /// How many roots `list roots` returns when no limit is given.
    pub page_size: usize,
}

impl Settings {
    /// Reads `path` when given (it must exist), otherwise `sarf.toml` in the
    /// working directory if there is one.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("log_filter", "info")?
            .set_default("page_size", 50)?;
        let builder = match path {
            Some(p) => builder.add_source(File::from(p).required(true)),
            None => builder.add_source(File::with_name("sarf").required(false)),
        };
        let settings = builder
            .add_source(Environment::with_prefix("SARF").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            roots_file: None,
            schemes_file: None,
            page_size: 50,
        }
    }
}
