//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Seeding the frontier from the configuration
//! - Dequeuing nodes in breadth-first order
//! - Fetching pages and enqueuing the links they yield
//! - Handing media files to the downloader
//! - Waiting for outstanding downloads before reporting

use crate::config::Config;
use crate::crawler::{
    build_http_client, fetch_page, parse_html, BfsFrontier, Dispatch, Downloader, FetchResult,
    Frontier, PageProcessor,
};
use crate::output::CrawlStatistics;
use crate::state::{DropReason, Node, NodeOutcome, SkipReason};
use crate::url::{file_name, ExtensionSet, LinkFilter, LinkKind};
use crate::{ConfigError, Result};
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
///
/// The crawl loop is sequential: one node is processed at a time, and only
/// media transfers run in the background.
pub struct Coordinator<F: Frontier = BfsFrontier> {
    frontier: F,
    processor: PageProcessor,
    client: Client,
    downloader: Downloader,
    max_depth: u32,
    stats: CrawlStatistics,
}

impl Coordinator<BfsFrontier> {
    /// Creates a coordinator backed by a [`BfsFrontier`]
    ///
    /// # Arguments
    ///
    /// * `config` - The validated crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Frontier seeded and output directory ready
    /// * `Err(SpiderError)` - A seed or filter is unusable, the output directory
    ///   cannot be created, or the HTTP client cannot be built
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_frontier(config, BfsFrontier::new())
    }
}

impl<F: Frontier> Coordinator<F> {
    /// Creates a coordinator over a caller-provided frontier
    pub fn with_frontier(config: &Config, mut frontier: F) -> Result<Self> {
        let filter = LinkFilter::from_config(&config.filter)?;
        let extensions = ExtensionSet::new(&config.extensions);
        let max_depth = config.crawler.max_depth;

        let output_dir = PathBuf::from(&config.output.directory);
        std::fs::create_dir_all(&output_dir)?;

        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.crawler.page_timeout_secs),
        )?;

        let downloader = Downloader::new(
            client.clone(),
            output_dir,
            Duration::from_secs(config.crawler.download_timeout_secs),
            config.crawler.max_concurrent_downloads as usize,
        );

        for seed in &config.seeds {
            let mut uri = Url::parse(seed)
                .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))?;
            uri.set_fragment(None);

            if !frontier.enqueue_if_unseen(Node::seed(uri)) {
                tracing::debug!("Ignoring duplicate seed {}", seed);
            }
        }

        Ok(Self {
            frontier,
            processor: PageProcessor::new(filter, extensions, max_depth),
            client,
            downloader,
            max_depth,
            stats: CrawlStatistics::new(),
        })
    }

    /// Runs the crawl until the frontier is empty and every download finished
    ///
    /// Individual page or download failures never stop the crawl; they are
    /// counted in the returned statistics.
    pub async fn run(mut self) -> CrawlStatistics {
        tracing::info!(
            "Starting crawl: {} seeds queued, max depth {}, output to {}",
            self.frontier.len(),
            self.max_depth,
            self.downloader.output_dir().display()
        );

        let mut processed: u64 = 0;

        while let Some(node) = self.frontier.try_dequeue() {
            let outcome = match node.kind() {
                LinkKind::Media => self.process_media(&node),
                LinkKind::Page => self.process_page(&node).await,
            };

            if outcome.is_failure() {
                tracing::warn!("{}: {:?}", node.uri(), outcome);
            }
            self.stats.record(&node, &outcome);

            processed += 1;
            if processed % 50 == 0 {
                tracing::info!(
                    "Progress: {} nodes processed, {} in frontier, {} downloads dispatched",
                    processed,
                    self.frontier.len(),
                    self.stats.downloads_started
                );
            }
        }

        tracing::info!(
            "Frontier is empty, waiting for {} downloads",
            self.downloader.in_flight()
        );

        for outcome in self.downloader.drain().await {
            self.stats.record_download(&outcome);
        }

        self.stats.finish();
        tracing::info!(
            "Crawl completed: {} pages fetched, {} files downloaded, {} failures",
            self.stats.pages_fetched,
            self.stats.downloads_completed,
            self.stats.total_failures()
        );

        self.stats
    }

    /// Hands a media node to the downloader
    fn process_media(&mut self, node: &Node) -> NodeOutcome {
        let Some(filename) = file_name(node.uri()) else {
            return NodeOutcome::Dropped(DropReason::NoFilename);
        };

        if !self.processor.extensions().tracks(&filename) {
            return NodeOutcome::Dropped(DropReason::UntrackedExtension);
        }

        match self.downloader.dispatch(node.uri(), &filename) {
            Dispatch::Started => NodeOutcome::DownloadStarted,
            Dispatch::SkippedExisting => {
                tracing::debug!("{} already on disk", filename);
                NodeOutcome::DownloadSkipped(SkipReason::AlreadyOnDisk)
            }
            Dispatch::AlreadyQueued => NodeOutcome::DownloadSkipped(SkipReason::AlreadyQueued),
            Dispatch::FailedToStart(reason) => NodeOutcome::DownloadNotStarted { reason },
        }
    }

    /// Fetches a page and enqueues its accepted links
    async fn process_page(&mut self, node: &Node) -> NodeOutcome {
        // Authoritative depth gate; the page processor only prunes early
        if node.depth() > self.max_depth {
            return NodeOutcome::Dropped(DropReason::BeyondMaxDepth);
        }

        tracing::debug!("Fetching {}", node.uri());

        let (final_url, body) = match fetch_page(&self.client, node.uri()).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("{} is {}, not following", node.uri(), content_type);
                return NodeOutcome::NotHtml { content_type };
            }
            failed => {
                return NodeOutcome::FetchFailed {
                    reason: failed.failure_reason().unwrap_or_default(),
                }
            }
        };

        if final_url != *node.uri() && self.frontier.mark_seen(final_url.as_str()) {
            tracing::debug!("{} redirected to {}", node.uri(), final_url);
        }

        let document = parse_html(&body);
        let extracted = self.processor.extract_links(
            &document,
            &final_url,
            node.depth() + 1,
            &mut self.frontier,
        );

        let children = extracted.nodes.len();
        for child in extracted.nodes {
            tracing::info!("{}", child);
            self.frontier.enqueue(child);
        }

        NodeOutcome::Expanded {
            children,
            unresolved: extracted.unresolved,
        }
    }
}

/// Runs a crawl with the default breadth-first frontier
pub async fn run_crawl(config: &Config) -> Result<CrawlStatistics> {
    let coordinator = Coordinator::new(config)?;
    Ok(coordinator.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use tempfile::TempDir;

    fn config(dir: &TempDir, seeds: &str) -> Config {
        let output = dir.path().join("media");
        parse_config(&format!(
            r#"
seeds = [{}]
extensions = ["jpg"]

[output]
directory = "{}"

[filter]
include = ".*"
"#,
            seeds,
            output.display()
        ))
        .unwrap()
    }

    #[test]
    fn test_new_creates_output_directory_and_seeds() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, r#""https://example.com/", "https://example.com/#top""#);

        let coordinator = Coordinator::new(&config).unwrap();

        assert!(dir.path().join("media").is_dir());
        // The second seed differs only by fragment
        assert_eq!(coordinator.frontier.len(), 1);
        assert!(coordinator.frontier.is_seen("https://example.com/"));
    }

    #[tokio::test]
    async fn test_media_without_tracked_extension_is_dropped() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, r#""https://example.com/""#);
        let mut coordinator = Coordinator::new(&config).unwrap();

        let node = Node::new(
            Url::parse("https://example.com/files/").unwrap(),
            2,
            LinkKind::Media,
        );
        assert_eq!(
            coordinator.process_media(&node),
            NodeOutcome::Dropped(DropReason::NoFilename)
        );

        let node = Node::new(
            Url::parse("https://example.com/a.png").unwrap(),
            2,
            LinkKind::Media,
        );
        assert_eq!(
            coordinator.process_media(&node),
            NodeOutcome::Dropped(DropReason::UntrackedExtension)
        );
    }

    #[tokio::test]
    async fn test_page_beyond_max_depth_is_not_fetched() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir, r#""https://example.com/""#);
        let mut coordinator = Coordinator::new(&config).unwrap();

        // Nothing listens at this address; a fetch would fail instead
        let node = Node::new(
            Url::parse("http://127.0.0.1:9/deep").unwrap(),
            config.crawler.max_depth + 1,
            LinkKind::Page,
        );
        assert_eq!(
            coordinator.process_page(&node).await,
            NodeOutcome::Dropped(DropReason::BeyondMaxDepth)
        );
    }
}
