//! Crawl statistics
//!
//! The coordinator records every node outcome and every finished download
//! here; the binary prints the result once the crawl returns.

use crate::crawler::DownloadOutcome;
use crate::state::{DropReason, Node, NodeOutcome, SkipReason};
use chrono::{DateTime, Utc};

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Pages fetched and parsed as HTML
    pub pages_fetched: u64,

    /// Pages that could not be loaded
    pub pages_failed: u64,

    /// Pages that loaded but were not HTML
    pub pages_not_html: u64,

    /// Pages dequeued beyond the max depth and never fetched
    pub pages_beyond_depth: u64,

    /// Child nodes enqueued from fetched pages
    pub links_accepted: u64,

    /// Links that could not be resolved to a URL
    pub links_unresolved: u64,

    /// Media nodes dropped without a filename or tracked extension
    pub media_dropped: u64,

    pub downloads_started: u64,
    pub downloads_skipped_existing: u64,
    pub downloads_already_queued: u64,
    pub downloads_not_started: u64,
    pub downloads_completed: u64,
    pub downloads_failed: u64,

    /// Total bytes written by completed downloads
    pub bytes_downloaded: u64,

    /// One line per failed page or download
    pub failures: Vec<String>,
}

impl CrawlStatistics {
    /// Creates empty statistics starting now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_fetched: 0,
            pages_failed: 0,
            pages_not_html: 0,
            pages_beyond_depth: 0,
            links_accepted: 0,
            links_unresolved: 0,
            media_dropped: 0,
            downloads_started: 0,
            downloads_skipped_existing: 0,
            downloads_already_queued: 0,
            downloads_not_started: 0,
            downloads_completed: 0,
            downloads_failed: 0,
            bytes_downloaded: 0,
            failures: Vec::new(),
        }
    }

    /// Records the outcome of one dequeued node
    pub fn record(&mut self, node: &Node, outcome: &NodeOutcome) {
        match outcome {
            NodeOutcome::Expanded {
                children,
                unresolved,
            } => {
                self.pages_fetched += 1;
                self.links_accepted += *children as u64;
                self.links_unresolved += *unresolved as u64;
            }
            NodeOutcome::NotHtml { .. } => self.pages_not_html += 1,
            NodeOutcome::FetchFailed { reason } => {
                self.pages_failed += 1;
                self.failures.push(format!("{}: {}", node.uri(), reason));
            }
            NodeOutcome::DownloadStarted => self.downloads_started += 1,
            NodeOutcome::DownloadSkipped(SkipReason::AlreadyOnDisk) => {
                self.downloads_skipped_existing += 1
            }
            NodeOutcome::DownloadSkipped(SkipReason::AlreadyQueued) => {
                self.downloads_already_queued += 1
            }
            NodeOutcome::DownloadNotStarted { reason } => {
                self.downloads_not_started += 1;
                self.failures.push(format!("{}: {}", node.uri(), reason));
            }
            NodeOutcome::Dropped(DropReason::BeyondMaxDepth) => self.pages_beyond_depth += 1,
            NodeOutcome::Dropped(DropReason::NoFilename | DropReason::UntrackedExtension) => {
                self.media_dropped += 1
            }
        }
    }

    /// Records the final result of a background transfer
    pub fn record_download(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Completed { bytes, .. } => {
                self.downloads_completed += 1;
                self.bytes_downloaded += bytes;
            }
            DownloadOutcome::Failed { url, error } => {
                self.downloads_failed += 1;
                self.failures.push(format!("{}: {}", url, error));
            }
        }
    }

    /// Marks the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of a finished crawl
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    pub fn total_failures(&self) -> u64 {
        self.pages_failed + self.downloads_not_started + self.downloads_failed
    }
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(seconds) = stats.duration_seconds() {
        println!("Duration: {}s", seconds);
    }
    println!();

    println!("Pages:");
    println!("  Fetched: {}", stats.pages_fetched);
    println!("  Failed: {}", stats.pages_failed);
    println!("  Not HTML: {}", stats.pages_not_html);
    println!("  Beyond max depth: {}", stats.pages_beyond_depth);
    println!();

    println!("Links:");
    println!("  Accepted: {}", stats.links_accepted);
    println!("  Unresolved: {}", stats.links_unresolved);
    println!();

    println!("Downloads:");
    println!("  Started: {}", stats.downloads_started);
    println!("  Completed: {}", stats.downloads_completed);
    println!("  Failed: {}", stats.downloads_failed);
    println!("  Not started: {}", stats.downloads_not_started);
    println!("  Skipped (already on disk): {}", stats.downloads_skipped_existing);
    println!("  Skipped (already dispatched): {}", stats.downloads_already_queued);
    println!("  Media dropped: {}", stats.media_dropped);
    println!("  Bytes written: {}", stats.bytes_downloaded);
    println!();

    if !stats.failures.is_empty() {
        println!("Failures ({}):", stats.failures.len());
        for failure in &stats.failures {
            println!("  - {}", failure);
        }
        println!();
    }
}
