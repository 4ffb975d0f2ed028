//! Statistics over the providers table
//!
//! This module provides functionality for extracting and displaying
//! statistics about what has been loaded.

use crate::storage::ProviderStore;
use crate::HarvestError;

/// How many companies `load_statistics` ranks
const TOP_COMPANIES: usize = 10;

/// Providers table statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatistics {
    /// Total rows in the table
    pub total_providers: u64,

    /// Rows whose phone list is the sentinel
    pub without_phone: u64,

    /// Distinct company names (sentinel excluded)
    pub distinct_companies: u64,

    /// Most frequent company names with their row counts
    pub top_companies: Vec<(String, u64)>,
}

/// Loads statistics from storage
pub fn load_statistics(storage: &dyn ProviderStore) -> Result<TableStatistics, HarvestError> {
    Ok(TableStatistics {
        total_providers: storage.count_providers()?,
        without_phone: storage.count_without_phone()?,
        distinct_companies: storage.count_distinct_companies()?,
        top_companies: storage.top_companies(TOP_COMPANIES)?,
    })
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &TableStatistics) {
    println!("=== Provider Statistics ===\n");

    println!("Overview:");
    println!("  Total providers: {}", stats.total_providers);
    println!("  Distinct companies: {}", stats.distinct_companies);

    let percentage = if stats.total_providers > 0 {
        (stats.without_phone as f64 / stats.total_providers as f64) * 100.0
    } else {
        0.0
    };
    println!(
        "  Without phone number: {} ({:.1}%)",
        stats.without_phone, percentage
    );
    println!();

    if !stats.top_companies.is_empty() {
        println!("Top Companies:");
        for (company, count) in &stats.top_companies {
            println!("  {}: {}", company, count);
        }
    }
}
