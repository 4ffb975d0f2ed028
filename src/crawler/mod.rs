//! Crawler module for provider directory harvesting
//!
//! This module contains the crawling logic, including:
//! - HTTP fetching behind a shared admission gate
//! - Listing, detail and navigation page extraction
//! - Pagination and batch orchestration

mod coordinator;
mod departments;
mod detail;
mod fetcher;
mod html;
mod listing;

pub use coordinator::{run_crawl, Coordinator, CrawlCounts, PageCursor, StopReason};
pub use departments::DepartmentEnumerator;
pub use detail::DetailExtractor;
pub use fetcher::{build_http_client, fetch_url, FetchResult, Fetcher};
pub use listing::{partition_outcomes, ListingExtractor};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and admission gate
/// 2. Enumerate the keywords to search
/// 3. Page through results and fetch details for every listing
/// 4. Write the intermediate JSON file
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the configuration file
pub async fn crawl(config: Config, config_hash: String) -> Result<CrawlReport, HarvestError> {
    run_crawl(config, config_hash).await
}
