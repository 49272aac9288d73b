use crate::url::LinkKind;
use std::fmt;
use url::Url;

/// Depth assigned to configuration seeds
pub const SEED_DEPTH: u32 = 1;

/// A unit of crawl work: a URL, the depth it was discovered at, and its kind
///
/// Nodes are immutable once created. Seeds are depth 1; children of a page at
/// depth `d` are depth `d + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    uri: Url,
    depth: u32,
    kind: LinkKind,
}

impl Node {
    /// Creates a node discovered at `depth`
    pub fn new(uri: Url, depth: u32, kind: LinkKind) -> Self {
        debug_assert!(depth >= SEED_DEPTH, "node depth starts at {}", SEED_DEPTH);
        Self { uri, depth, kind }
    }

    /// Creates a seed node; seeds are always treated as pages
    pub fn seed(uri: Url) -> Self {
        Self::new(uri, SEED_DEPTH, LinkKind::Page)
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn kind(&self) -> LinkKind {
        self.kind
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.depth, self.kind, self.uri)
    }
}
