//! Crawler module for page fetching and media downloading
//!
//! This module contains the core crawling logic, including:
//! - The frontier queue and seen set
//! - HTTP page fetching
//! - HTML parsing and link extraction
//! - Background media downloads
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod fetcher;
mod frontier;
mod parser;

pub use coordinator::{run_crawl, Coordinator};
pub use downloader::{Dispatch, DownloadOutcome, Downloader};
pub use fetcher::{build_http_client, fetch_page, user_agent_string, FetchResult};
pub use frontier::{BfsFrontier, Frontier};
pub use parser::{parse_html, ExtractedLinks, PageProcessor};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::Result;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the output directory
/// 2. Build the HTTP client
/// 3. Seed the frontier
/// 4. Fetch pages level by level and follow their links
/// 5. Download media files and wait for the last of them
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStatistics)` - Crawl ran to completion
/// * `Err(SpiderError)` - Crawl could not be started
pub async fn crawl(config: &Config) -> Result<CrawlStatistics> {
    run_crawl(config).await
}
