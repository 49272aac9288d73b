//! Outcome definitions for nodes taken off the frontier
//!
//! Every dequeued node ends in exactly one of these outcomes. The coordinator
//! hands them to the crawl statistics instead of swallowing failures.
use std::fmt;

/// What happened to a single dequeued node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    // ===== Page Outcomes =====
    /// Page was fetched and its accepted links were enqueued
    Expanded {
        /// Child nodes enqueued
        children: usize,
        /// Links that could not be resolved to a URL
        unresolved: usize,
    },

    /// Page was fetched but is not HTML, so it contributes no links
    NotHtml { content_type: String },

    /// Page could not be loaded (network error, HTTP error status)
    FetchFailed { reason: String },

    // ===== Media Outcomes =====
    /// A background transfer was started
    DownloadStarted,

    /// No transfer was needed
    DownloadSkipped(SkipReason),

    /// The transfer could not be started, even after the scheme rewrite
    DownloadNotStarted { reason: String },

    // ===== Either Kind =====
    /// Node was discarded without any network access
    Dropped(DropReason),
}

/// Why a media node needed no transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// A non-empty file with that name is already in the output directory
    AlreadyOnDisk,

    /// A transfer to the same filename was already started during this crawl
    AlreadyQueued,
}

/// Why a node was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DropReason {
    /// Page depth is beyond the configured maximum
    BeyondMaxDepth,

    /// Media URL has no filename (directory-style path)
    NoFilename,

    /// Media filename does not carry a tracked extension
    UntrackedExtension,
}

impl NodeOutcome {
    /// Returns true if this outcome represents a failure worth reporting
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::FetchFailed { .. } | Self::DownloadNotStarted { .. }
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOnDisk => write!(f, "already on disk"),
            Self::AlreadyQueued => write!(f, "already dispatched"),
        }
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BeyondMaxDepth => write!(f, "beyond max depth"),
            Self::NoFilename => write!(f, "no filename"),
            Self::UntrackedExtension => write!(f, "untracked extension"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_outcomes() {
        assert!(NodeOutcome::FetchFailed {
            reason: "HTTP 500".to_string()
        }
        .is_failure());
        assert!(NodeOutcome::DownloadNotStarted {
            reason: "bad scheme".to_string()
        }
        .is_failure());

        assert!(!NodeOutcome::DownloadStarted.is_failure());
        assert!(!NodeOutcome::Dropped(DropReason::BeyondMaxDepth).is_failure());
        assert!(!NodeOutcome::DownloadSkipped(SkipReason::AlreadyOnDisk).is_failure());
        assert!(!NodeOutcome::Expanded {
            children: 0,
            unresolved: 3
        }
        .is_failure());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(DropReason::BeyondMaxDepth.to_string(), "beyond max depth");
        assert_eq!(SkipReason::AlreadyOnDisk.to_string(), "already on disk");
    }
}
