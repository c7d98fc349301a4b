use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    /// A page element was missing with no fallback, or the page exposed a value we could not use.
    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub fn navigation(msg: impl Into<String>) -> Self {
        Error::Navigation(msg.into())
    }

    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Network {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn fs(path: impl AsRef<Path>, source: io::Error) -> Self {
        Error::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
