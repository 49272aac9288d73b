use crate::config::FilterConfig;
use crate::crawler::Frontier;
use crate::ConfigError;
use regex::Regex;

/// The two groups of links a page contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkPopulation {
    /// `<a href>`, `<iframe src>`, `<frame src>`
    Navigational,
    /// `<img src>`, `<video src>`, `<source src>`
    Embedded,
}

/// Prefixes that can never name a navigable page
const NAVIGATIONAL_REJECTS: &[&str] = &["mailto:", "file:", "javascript"];

/// Prefixes that can never name a downloadable resource
const EMBEDDED_REJECTS: &[&str] = &["{", "data:"];

/// Immutable link filter policy
///
/// Built once from the `[filter]` configuration section. The include pattern
/// is mandatory; the exclude pattern is optional and wins over include.
#[derive(Debug, Clone)]
pub struct LinkFilter {
    include: Regex,
    exclude: Option<Regex>,
}

impl LinkFilter {
    /// Compiles the include and optional exclude patterns
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self, ConfigError> {
        let include = Regex::new(include)
            .map_err(|e| ConfigError::InvalidPattern(format!("include '{}': {}", include, e)))?;

        let exclude = exclude
            .filter(|p| !p.is_empty())
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| ConfigError::InvalidPattern(format!("exclude '{}': {}", p, e)))
            })
            .transpose()?;

        Ok(Self { include, exclude })
    }

    /// Builds the filter from the configuration section
    pub fn from_config(config: &FilterConfig) -> Result<Self, ConfigError> {
        Self::new(&config.include, config.exclude.as_deref())
    }

    /// Returns true if the text starts with a prefix this population never follows
    ///
    /// Applied to both the raw attribute text and the resolved URI, so
    /// placeholders like `{{src}}` are caught before resolution turns them
    /// into an ordinary page-relative URL.
    pub fn rejects_prefix(&self, population: LinkPopulation, text: &str) -> bool {
        let prefixes = match population {
            LinkPopulation::Navigational => NAVIGATIONAL_REJECTS,
            LinkPopulation::Embedded => EMBEDDED_REJECTS,
        };

        prefixes.iter().any(|prefix| {
            text.get(..prefix.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
        })
    }

    /// Returns true if the URI passes the include pattern and not the exclude pattern
    pub fn permits(&self, uri: &str) -> bool {
        if !self.include.is_match(uri) {
            return false;
        }

        match &self.exclude {
            Some(exclude) => !exclude.is_match(uri),
            None => true,
        }
    }

    /// Applies every policy rule except deduplication
    pub fn admits(&self, population: LinkPopulation, uri: &str) -> bool {
        if self.rejects_prefix(population, uri) {
            return false;
        }

        if population == LinkPopulation::Navigational && uri.contains('#') {
            return false;
        }

        self.permits(uri)
    }

    /// Applies the policy and registers the URI as seen in one step
    ///
    /// Returns true only the first time an admitted URI is offered; after
    /// that the frontier reports it as seen and it is rejected.
    pub fn accept<F>(&self, population: LinkPopulation, uri: &str, seen: &mut F) -> bool
    where
        F: Frontier + ?Sized,
    {
        self.admits(population, uri) && seen.mark_seen(uri)
    }
}
