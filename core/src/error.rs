//! Error types for dataset loading, configuration and local side effects

use std::path::PathBuf;
use thiserror::Error;

/// Errors while fetching or parsing the creator dataset.
///
/// A load failure is terminal for the session: the front end shows a
/// persistent error state and does not retry.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch dataset from {url}: {message}")]
    Http { url: String, message: String },

    #[error("dataset is not a valid JSON array of creators")]
    Parse(#[from] serde_json::Error),

    #[error("dataset contains no named creators")]
    Empty,
}

/// Errors during configuration persistence
#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to load configuration")]
    Load(#[from] confy::ConfyError),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to save configuration")]
    Save(#[source] confy::ConfyError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Clipboard write failure. Recovered locally with a manual-copy prompt.
#[derive(Debug, Error)]
#[error("clipboard unavailable: {0}")]
pub struct ClipboardError(pub String);

/// Errors editing a pack selection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackError {
    #[error("a pack holds at most {max} creators")]
    Full { max: usize },
}
