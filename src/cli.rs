use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Edge,
    Chrome,
    Firefox,
}

impl Browser {
    /// `browserName` capability understood by the matching driver.
    pub fn capability_name(self) -> &'static str {
        match self {
            Browser::Edge => "MicrosoftEdge",
            Browser::Chrome => "chrome",
            Browser::Firefox => "firefox",
        }
    }
}

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Mirror Atlassian server installers into a local archive", long_about = None)]
pub struct Args {
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Root directory for downloaded products
    #[arg(short = 's', long = "save-location")]
    pub save_location: Option<PathBuf>,

    /// Address of a running WebDriver server (msedgedriver, chromedriver, geckodriver)
    #[arg(short = 'w', long = "webdriver-url")]
    pub webdriver_url: Option<String>,

    /// Browser to request from the WebDriver server
    #[arg(short = 'b', long, value_enum)]
    pub browser: Option<Browser>,

    /// Seconds to wait after each page load before querying it
    #[arg(long = "settle-secs")]
    pub settle_secs: Option<u64>,

    /// Ask the browser to run without a window
    #[arg(long)]
    pub headless: bool,

    /// Only sync these products (repeatable)
    #[arg(short = 'p', long = "product")]
    pub products: Vec<String>,

    /// Print the product catalog and exit
    #[arg(short = 'l', long = "list-products")]
    pub list_products: bool,

    /// Log navigator commands and transfer details
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
