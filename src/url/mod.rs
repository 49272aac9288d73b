//! URL handling module for Media-Spider
//!
//! This module provides link resolution, include/exclude filtering, and the
//! page-or-media classification of discovered links.

mod extension;
mod filter;
mod resolve;

// Re-export main functions
pub use extension::{file_extension, file_name, ExtensionSet};
pub use filter::{LinkFilter, LinkPopulation};
pub use resolve::{resolve_base, resolve_link};
pub(crate) use resolve::rewrite_file_scheme;

use std::fmt;
use url::Url;

/// Link classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// A page - fetched and searched for more links
    Page,
    /// A media file with a tracked extension - downloaded
    Media,
}

impl LinkKind {
    /// Returns true if the link should be fetched as a page
    pub fn is_page(&self) -> bool {
        matches!(self, Self::Page)
    }

    /// Returns true if the link is a download target
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Media)
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "Page"),
            Self::Media => write!(f, "Media"),
        }
    }
}

/// Classifies a link by the extension of its final path segment
///
/// A link is Media when its filename has an extension in `extensions`.
/// Directory-style URLs, filenames without a dot, and untracked extensions
/// are Pages.
///
/// # Examples
///
/// ```
/// use media_spider::url::{classify_link, ExtensionSet, LinkKind};
/// use url::Url;
///
/// let extensions = ExtensionSet::new(["pdf"]);
/// let url = Url::parse("https://x.com/a/b/report.PDF?x=1").unwrap();
/// assert_eq!(classify_link(&url, &extensions), LinkKind::Media);
///
/// let url = Url::parse("https://x.com/a/b/").unwrap();
/// assert_eq!(classify_link(&url, &extensions), LinkKind::Page);
/// ```
pub fn classify_link(url: &Url, extensions: &ExtensionSet) -> LinkKind {
    match file_name(url) {
        Some(name) if extensions.tracks(&name) => LinkKind::Media,
        _ => LinkKind::Page,
    }
}
