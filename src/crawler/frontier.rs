//! Frontier queue and seen set
//!
//! The crawl driver only talks to the frontier through the [`Frontier`] trait,
//! so the single-threaded [`BfsFrontier`] can be replaced by a lock-protected
//! implementation without touching crawl logic.

use crate::state::Node;
use std::collections::{HashSet, VecDeque};

/// Capability interface over the pending-work queue and the seen set
pub trait Frontier {
    /// Removes and returns the node at the head of the queue
    fn try_dequeue(&mut self) -> Option<Node>;

    /// Appends a node whose URI has already been registered as seen
    fn enqueue(&mut self, node: Node);

    /// Registers a normalized URI as seen
    ///
    /// Returns true if the URI was not seen before.
    fn mark_seen(&mut self, uri: &str) -> bool;

    /// Returns true if the URI has been registered
    fn is_seen(&self, uri: &str) -> bool;

    /// Number of nodes waiting in the queue
    fn len(&self) -> usize;

    /// Returns whether the queue is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registers the node's URI and enqueues it, unless the URI was already seen
    fn enqueue_if_unseen(&mut self, node: Node) -> bool {
        if self.mark_seen(node.uri().as_str()) {
            self.enqueue(node);
            true
        } else {
            false
        }
    }
}

/// FIFO frontier for a level-order crawl
///
/// Nodes come out in the order they went in. Since children are always one
/// level deeper than the page that produced them, dequeued depths never
/// decrease.
#[derive(Debug, Default)]
pub struct BfsFrontier {
    /// Pending nodes, head is dequeued first
    queue: VecDeque<Node>,

    /// Every URI ever accepted for enqueue
    seen: HashSet<String>,
}

impl BfsFrontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct URIs registered so far
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

impl Frontier for BfsFrontier {
    fn try_dequeue(&mut self) -> Option<Node> {
        self.queue.pop_front()
    }

    fn enqueue(&mut self, node: Node) {
        debug_assert!(
            self.queue.back().map_or(true, |last| last.depth() <= node.depth()),
            "frontier depth must not decrease"
        );
        self.queue.push_back(node);
    }

    fn mark_seen(&mut self, uri: &str) -> bool {
        if self.seen.contains(uri) {
            return false;
        }
        self.seen.insert(uri.to_string())
    }

    fn is_seen(&self, uri: &str) -> bool {
        self.seen.contains(uri)
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
