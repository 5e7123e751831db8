//! Native dataset sources (local file or http)

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use super::{Dataset, LoaderConfig};
use crate::error::LoadError;

/// Where the creators JSON comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let location = location.trim();
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Url(location.to_string())
        } else {
            DataSource::File(PathBuf::from(location))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fetch and parse the dataset. There is no retry; the caller shows the error.
pub async fn load(source: &DataSource, config: &LoaderConfig) -> Result<Dataset, LoadError> {
    debug!(%source, "Loading dataset");
    let body = match source {
        DataSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| LoadError::Io {
                    path: path.clone(),
                    source,
                })?
        }
        DataSource::Url(url) => fetch(url).await?,
    };
    Dataset::from_json_str(&body, config)
}

async fn fetch(url: &str) -> Result<String, LoadError> {
    let http_error = |e: reqwest::Error| LoadError::Http {
        url: url.to_string(),
        message: e.to_string(),
    };

    reqwest::get(url)
        .await
        .map_err(http_error)?
        .error_for_status()
        .map_err(http_error)?
        .text()
        .await
        .map_err(http_error)
}
