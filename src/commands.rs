use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::downloader::{Downloader, Fetch};
use crate::error::{Error, Result};
use crate::navigator::Session;
use crate::pages::AtlassianPages;
use crate::sync::{sync_catalog, SyncReport};
use crate::utils::absolutize;
use crate::webdriver::WebDriverSession;

/// One full sync run against the configured WebDriver server.
pub async fn run(config: &Config) -> Result<Vec<SyncReport>> {
    let save_location = prepare_save_location(config).await?;
    let session = WebDriverSession::start(&config.webdriver_url, config.browser, config.headless).await?;
    run_with(config, &save_location, session, &Downloader::new()).await
}

/// Syncs the catalog through `session`, then closes it whatever the outcome.
///
/// A failed close is logged and never replaces the sync result.
pub async fn run_with<S, F>(
    config: &Config,
    save_location: &Path,
    session: S,
    fetcher: &F,
) -> Result<Vec<SyncReport>>
where
    S: Session,
    F: Fetch + Sync,
{
    let mut pages = AtlassianPages::new(session, config.settle_delay());
    let result = sync_catalog(save_location, &config.products, &mut pages, fetcher).await;

    if let Err(e) = pages.into_inner().close().await {
        warn!("failed to close browser session: {}", e);
    }

    let reports = result?;
    let downloaded: usize = reports.iter().map(|r| r.downloaded).sum();
    info!(products = reports.len(), downloaded, "sync finished");
    Ok(reports)
}

async fn prepare_save_location(config: &Config) -> Result<PathBuf> {
    let save_location = absolutize(config.save_location.clone());
    info!("Save Location set to: '{}'", save_location.display());
    tokio::fs::create_dir_all(&save_location)
        .await
        .map_err(|e| Error::fs(&save_location, e))?;
    Ok(save_location)
}

pub fn list_products(config: &Config) {
    println!("{:<35} {}", "Product", "Download page");
    println!("{:-<35} {:-<20}", "", "");
    for product in config.products.iter() {
        println!("{:<35} {}", product.name, product.url);
    }
}
