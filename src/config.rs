use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::ProductCatalog;
use crate::cli::{Args, Browser};
use crate::error::{Error, Result};

pub const DEFAULT_SAVE_LOCATION: &str = "Atlassian";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";
pub const DEFAULT_SETTLE_SECS: u64 = 5;

/// Everything one run needs. Built once in `main` and passed down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the archive; one subdirectory per product.
    pub save_location: PathBuf,
    pub webdriver_url: String,
    pub browser: Browser,
    pub headless: bool,
    /// Pause after each navigation before the page is queried.
    pub settle_secs: u64,
    pub products: ProductCatalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_location: PathBuf::from(DEFAULT_SAVE_LOCATION),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser: Browser::default(),
            headless: false,
            settle_secs: DEFAULT_SETTLE_SECS,
            products: ProductCatalog::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::fs(path, e))?;
        toml::from_str(&content).map_err(|e| Error::config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(e.to_string()))
    }

    /// File (if given) first, then command-line overrides on top.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(save_location) = &args.save_location {
            config.save_location = save_location.clone();
        }
        if let Some(url) = &args.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(browser) = args.browser {
            config.browser = browser;
        }
        if let Some(secs) = args.settle_secs {
            config.settle_secs = secs;
        }
        if args.headless {
            config.headless = true;
        }
        if !args.products.is_empty() {
            config.products = config.products.restrict(&args.products)?;
        }

        url::Url::parse(&config.webdriver_url)
            .map_err(|e| Error::config(format!("invalid webdriver url: {e}")))?;
        Ok(config)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }
}
