//! State module for tracking crawl progress
//!
//! This module provides the unit of crawl work and the outcomes it can end in.
//!
//! # Components
//!
//! - `Node`: A URL, the depth it was discovered at, and whether it is a page or media
//! - `NodeOutcome`: What happened to a node once it was taken off the frontier

mod node;
mod outcome;

// Re-export main types
pub use node::{Node, SEED_DEPTH};
pub use outcome::{DropReason, NodeOutcome, SkipReason};
