//! Catalog sync: fetch only the releases that have no directory yet.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::catalog::{Product, ProductCatalog};
use crate::downloader::Fetch;
use crate::error::Result;
use crate::utils::ensure_dir;
use crate::version::VersionEntry;

/// Produces the releases currently offered for a product.
#[async_trait]
pub trait VersionSource {
    async fn versions(&mut self, product: &Product) -> Result<Vec<VersionEntry>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub product: String,
    pub seen: usize,
    pub downloaded: usize,
    pub skipped: usize,
}

/// Downloads every entry whose `{description} ({yyyy}-{mm})` directory is missing.
///
/// The directory is created before the fetch starts, so an interrupted
/// download is not retried on the next run.
pub async fn sync_entries<F: Fetch + Sync>(
    product_dir: &Path,
    entries: &[VersionEntry],
    fetcher: &F,
) -> Result<SyncReport> {
    let mut report = SyncReport {
        seen: entries.len(),
        ..SyncReport::default()
    };

    for entry in entries {
        let version_dir = product_dir.join(entry.directory_name());
        if !ensure_dir(&version_dir).await? {
            report.skipped += 1;
            continue;
        }
        info!("'{}' created", version_dir.display());
        fetcher.fetch(&entry.url, &version_dir).await?;
        report.downloaded += 1;
    }
    Ok(report)
}

pub async fn sync_product<S, F>(
    save_location: &Path,
    product: &Product,
    source: &mut S,
    fetcher: &F,
) -> Result<SyncReport>
where
    S: VersionSource + Send,
    F: Fetch + Sync,
{
    info!("{}", "-".repeat(103));
    let product_dir = product_dir(save_location, product);
    info!("Saving to: '{}'", product_dir.display());
    if ensure_dir(&product_dir).await? {
        info!("'{}' created", product_dir.display());
    }

    let entries = source.versions(product).await?;
    let mut report = sync_entries(&product_dir, &entries, fetcher).await?;
    report.product = product.name.clone();
    info!(
        product = %product.name,
        seen = report.seen,
        downloaded = report.downloaded,
        skipped = report.skipped,
        "product synced"
    );
    Ok(report)
}

/// Syncs every product in catalog order, stopping at the first error.
pub async fn sync_catalog<S, F>(
    save_location: &Path,
    catalog: &ProductCatalog,
    source: &mut S,
    fetcher: &F,
) -> Result<Vec<SyncReport>>
where
    S: VersionSource + Send,
    F: Fetch + Sync,
{
    let mut reports = Vec::with_capacity(catalog.len());
    for product in catalog.iter() {
        reports.push(sync_product(save_location, product, source, fetcher).await?);
    }
    Ok(reports)
}

pub fn product_dir(save_location: &Path, product: &Product) -> PathBuf {
    save_location.join(&product.name)
}
