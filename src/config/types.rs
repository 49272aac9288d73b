use serde::{Deserialize, Deserializer};

/// Depth used when `max-depth` is absent or cannot be read as a number
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Main configuration structure for Media-Spider
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Pages the crawl starts from (depth 1)
    pub seeds: Vec<String>,

    /// Tracked media extensions, case-insensitive, leading dot optional
    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub crawler: CrawlerConfig,

    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,

    #[serde(default)]
    pub output: OutputConfig,

    pub filter: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth of pages that are fetched; seeds are depth 1
    #[serde(
        rename = "max-depth",
        default = "default_max_depth",
        deserialize_with = "deserialize_max_depth"
    )]
    pub max_depth: u32,

    /// Timeout for a single page load (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,

    /// Timeout for a single media download (seconds)
    #[serde(rename = "download-timeout-secs", default = "default_download_timeout")]
    pub download_timeout_secs: u64,

    /// Maximum number of media transfers running at once
    #[serde(
        rename = "max-concurrent-downloads",
        default = "default_max_concurrent_downloads"
    )]
    pub max_concurrent_downloads: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            page_timeout_secs: default_page_timeout(),
            download_timeout_secs: default_download_timeout(),
            max_concurrent_downloads: default_max_concurrent_downloads(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory downloaded media is written into
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Include/exclude regular expressions applied to every discovered URI
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    /// A URI must match this pattern to be considered at all
    pub include: String,

    /// A URI matching this pattern is rejected even if it matches `include`
    #[serde(default)]
    pub exclude: Option<String>,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_page_timeout() -> u64 {
    30
}

fn default_download_timeout() -> u64 {
    300
}

fn default_max_concurrent_downloads() -> u32 {
    16
}

fn default_crawler_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_output_directory() -> String {
    "output".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDepth {
    Number(i64),
    Text(String),
    Other(toml::Value),
}

/// Reads `max-depth` leniently: an integer or a numeric string is used as-is,
/// anything else falls back to [`DEFAULT_MAX_DEPTH`].
fn deserialize_max_depth<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match RawDepth::deserialize(deserializer)? {
        RawDepth::Number(n) => u32::try_from(n).ok(),
        RawDepth::Text(s) => s.trim().parse::<u32>().ok(),
        RawDepth::Other(_) => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        tracing::warn!(
            "max-depth is not a non-negative integer, using default {}",
            DEFAULT_MAX_DEPTH
        );
        DEFAULT_MAX_DEPTH
    }))
}
