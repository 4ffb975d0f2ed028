use serde::Deserialize;
use std::collections::BTreeMap;

/// Main configuration structure for Provider-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    pub site: SiteConfig,
    #[serde(default)]
    pub departments: DepartmentsConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// How the crawl enumerates search keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlMode {
    /// Discover (or list) departments and crawl each one concurrently
    Departments,
    /// Crawl a single keyword and write a flat array
    Flat,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    #[serde(default = "default_mode")]
    pub mode: CrawlMode,

    /// Size of the admission gate shared by every fetch
    #[serde(rename = "max-concurrent-requests", default = "default_max_concurrent")]
    pub max_concurrent_requests: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Offset step between consecutive result pages
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on the `start` offset per keyword
    #[serde(rename = "max-results", default)]
    pub max_results: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            max_concurrent_requests: default_max_concurrent(),
            request_timeout_secs: default_timeout(),
            page_size: default_page_size(),
            max_results: None,
        }
    }
}

/// Target directory site
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Scheme and host of the directory, used to resolve relative links
    #[serde(rename = "base-url")]
    pub base_url: String,

    #[serde(rename = "search-path", default = "default_search_path")]
    pub search_path: String,

    /// Value of the `type` query parameter
    #[serde(rename = "search-type", default = "default_search_type")]
    pub search_type: String,

    /// Value of the `lookup` query parameter
    #[serde(default)]
    pub lookup: String,

    /// Search keyword used in flat mode
    #[serde(default = "default_keyword")]
    pub keyword: String,

    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

/// Department discovery configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DepartmentsConfig {
    /// Path of the page whose navigation lists the categories
    #[serde(rename = "nav-path", default = "default_nav_path")]
    pub nav_path: String,

    /// CSS selector matching category links in the navigation
    #[serde(rename = "nav-selector", default = "default_nav_selector")]
    pub nav_selector: String,

    /// Navigation labels that are not categories, matched case-insensitively
    /// against the whole link text
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Explicit keywords; when non-empty discovery is skipped
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Extra label -> search keyword mappings, layered over the built-in table
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl Default for DepartmentsConfig {
    fn default() -> Self {
        Self {
            nav_path: default_nav_path(),
            nav_selector: default_nav_selector(),
            exclude: default_exclude(),
            keywords: Vec::new(),
            aliases: BTreeMap::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the intermediate JSON file
    #[serde(rename = "json-path", default = "default_json_path")]
    pub json_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: default_json_path(),
        }
    }
}

/// When the loader commits inserted rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// One transaction around the whole load
    PerRun,
    /// Commit after every insert
    PerRecord,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    #[serde(default = "default_database_path")]
    pub path: String,

    #[serde(default = "default_commit")]
    pub commit: CommitPolicy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            commit: default_commit(),
        }
    }
}

fn default_mode() -> CrawlMode {
    CrawlMode::Departments
}

fn default_max_concurrent() -> u32 {
    10
}

fn default_timeout() -> u64 {
    10
}

fn default_page_size() -> u32 {
    18
}

fn default_search_path() -> String {
    "/care/search".to_string()
}

fn default_search_type() -> String {
    "specialty".to_string()
}

fn default_keyword() -> String {
    "Physical Therapist".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36".to_string()
}

fn default_nav_path() -> String {
    "/care/".to_string()
}

fn default_nav_selector() -> String {
    "nav a".to_string()
}

fn default_exclude() -> Vec<String> {
    vec!["browse".to_string(), "back".to_string()]
}

fn default_json_path() -> String {
    "providers_data.json".to_string()
}

fn default_database_path() -> String {
    "providers.db".to_string()
}

fn default_commit() -> CommitPolicy {
    CommitPolicy::PerRun
}
