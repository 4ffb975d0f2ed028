//! Crawl run report

use crate::config::CrawlMode;
use chrono::{DateTime, Utc};

/// Summary of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Hash of the configuration file that drove the run
    pub config_hash: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub mode: CrawlMode,
    /// Keywords crawled (departments, or 1 in flat mode)
    pub keywords: usize,
    /// Records written to the intermediate file
    pub records: usize,
    /// Successful fetches of any kind
    pub pages_fetched: u64,
    /// Successful detail-page fetches
    pub detail_pages_fetched: u64,
    /// Fetches that timed out, failed to connect, or returned non-2xx
    pub fetch_failures: u64,
    /// Provider cards skipped during listing extraction
    pub cards_skipped: u64,
    pub output_path: String,
}

impl CrawlReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Prints the report to stdout
pub fn print_report(report: &CrawlReport) {
    println!("=== Crawl Report ===\n");

    println!("Run:");
    println!("  Config hash: {}", report.config_hash);
    println!("  Mode: {:?}", report.mode);
    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!();

    println!("Results:");
    println!("  Keywords crawled: {}", report.keywords);
    println!("  Providers scraped: {}", report.records);
    println!("  Pages fetched: {}", report.pages_fetched);
    println!("  Detail pages fetched: {}", report.detail_pages_fetched);
    println!("  Failed fetches: {}", report.fetch_failures);
    println!("  Skipped cards: {}", report.cards_skipped);
    println!();

    println!("Saved to '{}'", report.output_path);
}
