//! HTML link extraction
//!
//! This module turns a fetched page into the next generation of crawl nodes:
//! - Navigational links from `<a href>`, `<iframe src>` and `<frame src>`
//! - Embedded resources from `<img src>`, `<video src>` and `<source src>`
//! - The `<base href>` that relative links resolve against

use crate::crawler::Frontier;
use crate::state::Node;
use crate::url::{
    classify_link, resolve_base, resolve_link, ExtensionSet, LinkFilter, LinkKind, LinkPopulation,
};
use scraper::{ElementRef, Html, Selector};
use url::Url;

const NAVIGATIONAL_SELECTOR: &str = "a[href], iframe[src], frame[src]";
const EMBEDDED_SELECTOR: &str = "img[src], video[src], source[src]";
const BASE_SELECTOR: &str = "base[href]";

/// Links accepted from one page
#[derive(Debug, Clone, Default)]
pub struct ExtractedLinks {
    /// Accepted child nodes in enqueue order
    pub nodes: Vec<Node>,

    /// Links whose text could not be resolved to a URL
    pub unresolved: usize,
}

/// Parses an HTML document
pub fn parse_html(html: &str) -> Html {
    Html::parse_document(html)
}

/// Applies resolution, classification and filtering to every link on a page
#[derive(Debug, Clone)]
pub struct PageProcessor {
    filter: LinkFilter,
    extensions: ExtensionSet,
    max_depth: u32,
}

impl PageProcessor {
    /// Creates a processor
    ///
    /// # Arguments
    ///
    /// * `filter` - The include/exclude policy
    /// * `extensions` - Tracked media extensions
    /// * `max_depth` - Navigational pages deeper than this are not kept
    pub fn new(filter: LinkFilter, extensions: ExtensionSet, max_depth: u32) -> Self {
        Self {
            filter,
            extensions,
            max_depth,
        }
    }

    pub fn extensions(&self) -> &ExtensionSet {
        &self.extensions
    }

    /// Extracts the child nodes of a page
    ///
    /// Navigational links come first, then embedded resources, each in
    /// document order. Every accepted URI is registered as seen on `frontier`
    /// at the moment it is accepted, so a URI appearing twice (on this page
    /// or any earlier one) yields at most one node.
    ///
    /// Pruning rules:
    /// - A navigational Page whose `child_depth` exceeds the max depth is skipped
    /// - An embedded resource without a tracked extension yields no node, but
    ///   its URI is still registered as seen once the filter accepts it
    /// - Links pruned by depth or rejected by the filter are not registered
    ///
    /// # Arguments
    ///
    /// * `document` - The parsed page
    /// * `page` - The URL the page was loaded from
    /// * `child_depth` - Depth assigned to the returned nodes
    /// * `frontier` - Owner of the seen set
    pub fn extract_links<F>(
        &self,
        document: &Html,
        page: &Url,
        child_depth: u32,
        frontier: &mut F,
    ) -> ExtractedLinks
    where
        F: Frontier + ?Sized,
    {
        let base = extract_base(document, page);
        let mut extracted = ExtractedLinks::default();

        for population in [LinkPopulation::Navigational, LinkPopulation::Embedded] {
            for raw in raw_links(document, population) {
                self.consider(
                    population,
                    raw,
                    page,
                    base.as_ref(),
                    child_depth,
                    frontier,
                    &mut extracted,
                );
            }
        }

        extracted
    }

    #[allow(clippy::too_many_arguments)]
    fn consider<F>(
        &self,
        population: LinkPopulation,
        raw: &str,
        page: &Url,
        base: Option<&Url>,
        child_depth: u32,
        frontier: &mut F,
        extracted: &mut ExtractedLinks,
    ) where
        F: Frontier + ?Sized,
    {
        let raw = raw.trim();

        // Template placeholders only look wrong before resolution
        if population == LinkPopulation::Embedded && self.filter.rejects_prefix(population, raw) {
            tracing::trace!("Skipping embedded link {:?}", raw);
            return;
        }

        let uri = match resolve_link(page, base, raw) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::debug!("Dropping link on {}: {}", page, e);
                extracted.unresolved += 1;
                return;
            }
        };

        let kind = classify_link(&uri, &self.extensions);
        if population == LinkPopulation::Navigational
            && kind == LinkKind::Page
            && child_depth > self.max_depth
        {
            tracing::trace!("Not following {} beyond depth {}", uri, self.max_depth);
            return;
        }

        if !self.filter.accept(population, uri.as_str(), frontier) {
            return;
        }

        // Still registered as seen, so a later anchor to the same URI is not followed
        if population == LinkPopulation::Embedded && kind == LinkKind::Page {
            tracing::trace!("Embedded resource {} has no tracked extension", uri);
            return;
        }

        extracted.nodes.push(Node::new(uri, child_depth, kind));
    }
}

/// Finds the page's `<base href>`, resolved against the page URL
fn extract_base(document: &Html, page: &Url) -> Option<Url> {
    let selector = Selector::parse(BASE_SELECTOR).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| resolve_base(page, href))
}

/// Collects raw link attribute values of one population in document order
fn raw_links(document: &Html, population: LinkPopulation) -> Vec<&str> {
    let selector = match population {
        LinkPopulation::Navigational => NAVIGATIONAL_SELECTOR,
        LinkPopulation::Embedded => EMBEDDED_SELECTOR,
    };

    let Ok(selector) = Selector::parse(selector) else {
        return Vec::new();
    };

    document.select(&selector).filter_map(link_attr).collect()
}

fn link_attr(element: ElementRef<'_>) -> Option<&str> {
    let attr = match element.value().name() {
        "a" => "href",
        _ => "src",
    };
    element.value().attr(attr)
}
