use async_trait::async_trait;
use futures::TryStreamExt;
use indicatif::HumanBytes;
use reqwest::Client;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::progress::{ConsoleReporter, ProgressReporter};
use crate::units::humanize;
use crate::utils::get_filename_from_url;

pub const CHUNK_SIZE: usize = 8192;
const BAR_WIDTH: usize = 50;

/// Counters for one transfer. Lives from the first request until the file is closed.
#[derive(Debug, Clone)]
pub struct TransferState {
    received: u64,
    total: Option<u64>,
    started: Instant,
}

impl TransferState {
    pub fn new(total: Option<u64>) -> Self {
        Self {
            received: 0,
            total,
            started: Instant::now(),
        }
    }

    pub fn record(&mut self, len: usize) {
        self.received += len as u64;
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Average throughput in whole bytes per second. Zero until time has passed.
    pub fn speed(&self, elapsed: Duration) -> f64 {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.received as f64 / secs).floor()
        } else {
            0.0
        }
    }

    /// Progress line for the given elapsed time, or None when the total is unknown.
    pub fn render(&self, elapsed: Duration) -> Option<String> {
        let total = self.total? as f64;
        let received = self.received as f64;
        let done = if total > 0.0 {
            100.0 * received / total
        } else {
            100.0
        };

        let filled = ((done / 2.0) as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "*".repeat(filled), "_".repeat(BAR_WIDTH - filled));

        let (got, got_unit) = humanize(received);
        let (size, size_unit) = humanize(total);
        let (speed, speed_unit) = humanize(self.speed(elapsed));

        Some(format!(
            "{:6.2} % [{}] {:7.2}{}  /  {:4.2}{}  {:7.2}{}",
            done,
            bar,
            got,
            got_unit.label(),
            size,
            size_unit.label(),
            speed,
            speed_unit.speed_label(),
        ))
    }
}

/// Anything that can place the file behind `url` inside `dir`.
#[async_trait]
pub trait Fetch {
    async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf>;
}

pub struct Downloader {
    client: Client,
}

impl Downloader {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent(concat!("atlas-dl/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Streams `url` into `dir`, reporting to `reporter` after every chunk.
    ///
    /// Without a content-length the body is written in one piece and the
    /// reporter is never touched. A failed transfer leaves the partial file.
    pub async fn download_file<R: ProgressReporter + Send>(
        &self,
        url: &str,
        dir: &Path,
        reporter: &mut R,
    ) -> Result<PathBuf> {
        let filename = get_filename_from_url(url)?;
        let filepath = dir.join(&filename);

        let mut file = File::create(&filepath)
            .await
            .map_err(|e| Error::fs(&filepath, e))?;
        info!("Downloading: {}...", filename);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::network(url, e))?;

        let Some(total) = response.content_length() else {
            debug!(url, "no content-length, writing body in one piece");
            let body = response.bytes().await.map_err(|e| Error::network(url, e))?;
            file.write_all(&body)
                .await
                .map_err(|e| Error::fs(&filepath, e))?;
            file.flush().await.map_err(|e| Error::fs(&filepath, e))?;
            info!("Saved {} ({})", filename, HumanBytes(body.len() as u64));
            return Ok(filepath);
        };

        let mut state = TransferState::new(Some(total));
        let stream = Box::pin(
            response
                .bytes_stream()
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e)),
        );
        let mut body = StreamReader::new(stream);
        let mut buffer = vec![0u8; CHUNK_SIZE];

        loop {
            let n = body.read(&mut buffer).await.map_err(|e| Error::network(url, e))?;
            if n == 0 {
                break;
            }
            file.write_all(&buffer[..n])
                .await
                .map_err(|e| Error::fs(&filepath, e))?;
            state.record(n);
            if let Some(line) = state.render(state.elapsed()) {
                reporter.update(&line);
            }
        }

        reporter.finish();
        file.flush().await.map_err(|e| Error::fs(&filepath, e))?;
        info!("Saved {} ({})", filename, HumanBytes(state.received()));
        Ok(filepath)
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Fetch for Downloader {
    async fn fetch(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        let mut reporter = ConsoleReporter::new();
        self.download_file(url, dir, &mut reporter).await
    }
}
