use std::sync::PoisonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SarfError {
    #[error("Invalid root '{root}': {reason}")]
    InvalidRoot { root: String, reason: String },
    #[error("Invalid template '{name}': {reason}")]
    InvalidTemplate { name: String, reason: String },
    #[error("Config error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize> },
    #[error("Execution error: {0}")]
    Execution(String),
    #[error("Lock poisoned: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, SarfError>;

impl SarfError {
    pub(crate) fn invalid_root(root: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRoot { root: root.to_string(), reason: reason.into() }
    }
    pub(crate) fn invalid_template(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidTemplate { name: name.to_string(), reason: reason.into() }
    }
}

// Helper conversions
impl From<config::ConfigError> for SarfError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}

impl From<serde_json::Error> for SarfError {
    fn from(e: serde_json::Error) -> Self { Self::Execution(e.to_string()) }
}

impl<T> From<PoisonError<T>> for SarfError {
    fn from(e: PoisonError<T>) -> Self { Self::Lock(e.to_string()) }
}
