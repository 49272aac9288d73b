//! Output module for crawl summaries
//!
//! Media files themselves are written by the downloader; this module only
//! accumulates and prints what happened during a run.

pub mod stats;

pub use stats::{print_statistics, CrawlStatistics};
