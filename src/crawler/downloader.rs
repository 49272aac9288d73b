//! Media downloader
//!
//! Each accepted media file becomes one background task in a [`JoinSet`].
//! Dispatch never waits on the network; the crawl driver collects every
//! task's outcome with [`Downloader::drain`] once the frontier is empty.

use crate::url::rewrite_file_scheme;
use crate::{Result, SpiderError};
use reqwest::{Client, Request};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Immediate result of handing a media file to the downloader
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// A background transfer was started
    Started,
    /// A non-empty file with that name is already in the output directory
    SkippedExisting,
    /// A transfer to that filename was already started during this crawl
    AlreadyQueued,
    /// The transfer could not be started
    FailedToStart(String),
}

/// Final result of one background transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed {
        url: String,
        path: PathBuf,
        bytes: u64,
    },
    Failed {
        url: String,
        error: String,
    },
}

/// Downloads media files into the output directory
pub struct Downloader {
    client: Client,
    output_dir: PathBuf,
    timeout: Duration,
    permits: Arc<Semaphore>,
    tasks: JoinSet<DownloadOutcome>,
    started: HashSet<String>,
}

impl Downloader {
    /// Creates a downloader
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared with page fetching
    /// * `output_dir` - Directory files are written into (must exist)
    /// * `timeout` - Total time allowed for one transfer
    /// * `max_concurrent` - Transfers allowed to run at once
    pub fn new(client: Client, output_dir: PathBuf, timeout: Duration, max_concurrent: usize) -> Self {
        Self {
            client,
            output_dir,
            timeout,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
            tasks: JoinSet::new(),
            started: HashSet::new(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Number of transfers not yet collected by [`Downloader::drain`]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Starts downloading `url` to `output_dir/filename`
    ///
    /// Skips the transfer when a non-empty file of that name already exists.
    /// If the transfer cannot be started and the URL uses the `file:` scheme,
    /// it is retried once as `https:`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn dispatch(&mut self, url: &Url, filename: &str) -> Dispatch {
        let path = self.output_dir.join(filename);

        if is_present(&path) {
            return Dispatch::SkippedExisting;
        }

        if self.started.contains(filename) {
            return Dispatch::AlreadyQueued;
        }

        if let Err(e) = self.start(url.clone(), path.clone()) {
            if url.scheme() != "file" {
                return Dispatch::FailedToStart(e.to_string());
            }

            let retry = match Url::parse(&rewrite_file_scheme(url.as_str())) {
                Ok(retry) => retry,
                Err(e) => return Dispatch::FailedToStart(e.to_string()),
            };

            tracing::debug!("Retrying {} as {}", url, retry);
            if let Err(e) = self.start(retry, path) {
                return Dispatch::FailedToStart(e.to_string());
            }
        }

        self.started.insert(filename.to_string());
        Dispatch::Started
    }

    /// Waits for every started transfer and returns their outcomes
    pub async fn drain(&mut self) -> Vec<DownloadOutcome> {
        let mut outcomes = Vec::with_capacity(self.tasks.len());

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Download task did not finish: {}", e);
                    outcomes.push(DownloadOutcome::Failed {
                        url: String::from("<unknown>"),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcomes
    }

    /// Builds the request and spawns the transfer
    ///
    /// Fails without spawning anything when the scheme is not HTTP(S) or the
    /// request cannot be built.
    fn start(&mut self, url: Url, path: PathBuf) -> Result<()> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SpiderError::DownloadStart {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        let request = self.client.get(url.clone()).timeout(self.timeout).build()?;
        let client = self.client.clone();
        let permits = Arc::clone(&self.permits);

        self.tasks.spawn(async move {
            // The semaphore is never closed, so acquiring only waits
            let _permit = permits.acquire_owned().await.ok();
            transfer(&client, request, url, path).await
        });

        Ok(())
    }
}

/// Returns true if a non-empty file exists at `path`
fn is_present(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() > 0)
        .unwrap_or(false)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}

async fn transfer(client: &Client, request: Request, url: Url, path: PathBuf) -> DownloadOutcome {
    let partial = partial_path(&path);

    match write_response(client, request, &partial, &path).await {
        Ok(bytes) => {
            tracing::info!("Downloaded {} ({} bytes)", path.display(), bytes);
            DownloadOutcome::Completed {
                url: url.to_string(),
                path,
                bytes,
            }
        }
        Err(e) => {
            tracing::warn!("Download of {} failed: {}", url, e);
            let _ = tokio::fs::remove_file(&partial).await;
            DownloadOutcome::Failed {
                url: url.to_string(),
                error: e.to_string(),
            }
        }
    }
}

/// Streams the response body into `partial`, then moves it into place
///
/// The body is written chunk by chunk, so large media never sits in memory.
async fn write_response(
    client: &Client,
    request: Request,
    partial: &Path,
    path: &Path,
) -> Result<u64> {
    let url = request.url().to_string();
    let http_error = |source| SpiderError::Http {
        url: url.clone(),
        source,
    };

    let mut response = client
        .execute(request)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(http_error)?;

    let mut file = File::create(partial).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = response.chunk().await.map_err(http_error)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    drop(file);

    tokio::fs::rename(partial, path).await?;

    Ok(written)
}
