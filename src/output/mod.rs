//! Output module for crawl results and reports
//!
//! This module handles:
//! - Writing the intermediate JSON file consumed by the loader
//! - Summarising a crawl run
//! - Reporting statistics over the providers table

mod json;
mod report;
pub mod stats;

pub use json::{harvest_to_string, write_harvest};
pub use report::{print_report, CrawlReport};
pub use stats::{load_statistics, print_statistics, TableStatistics};
