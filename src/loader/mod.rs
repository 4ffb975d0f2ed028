//! Loader for the intermediate harvest file
//!
//! Reads the JSON written by a crawl, coerces each entry into a table row and
//! appends it to the providers table:
//! - Department maps are flattened into a single list first
//! - Non-object entries are logged and skipped without stopping the load
//! - A storage error aborts the remaining inserts and is returned
//!
//! Under [`CommitPolicy::PerRun`] the whole load is one batch, so a storage
//! error leaves the table as it was. Under [`CommitPolicy::PerRecord`] every
//! insert before the failure stays committed.

mod coerce;

pub use coerce::{coerce_entry, encode_addresses, encode_phones, flatten_entries};

use crate::config::{CommitPolicy, Config};
use crate::storage::{open_storage, ProviderStore};
use crate::HarvestError;
use serde_json::Value;
use std::path::Path;

/// Outcome of one load run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Entries found in the file after flattening
    pub entries: usize,
    /// Rows inserted (and committed)
    pub inserted: usize,
    /// Entries skipped because they were not objects
    pub skipped: usize,
}

/// Reads and flattens the entries of an intermediate file
pub fn read_entries(path: &Path) -> Result<Vec<Value>, HarvestError> {
    let content = std::fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    flatten_entries(document)
}

/// Inserts entries into `store` under the given commit policy
pub fn load_entries(
    store: &mut dyn ProviderStore,
    entries: &[Value],
    policy: CommitPolicy,
) -> Result<LoadSummary, HarvestError> {
    let mut summary = LoadSummary {
        entries: entries.len(),
        ..LoadSummary::default()
    };

    if policy == CommitPolicy::PerRun {
        store.begin_batch()?;
    }

    for (index, entry) in entries.iter().enumerate() {
        let Some(row) = coerce_entry(entry) else {
            tracing::warn!(
                entry = index,
                kind = coerce::type_name(entry),
                "Skipping invalid provider entry: {}",
                entry
            );
            summary.skipped += 1;
            continue;
        };

        if let Err(e) = store.insert_provider(&row) {
            tracing::error!(entry = index, "Insert failed, aborting load: {}", e);
            abandon_batch(store, policy);
            return Err(e.into());
        }
        summary.inserted += 1;
    }

    if policy == CommitPolicy::PerRun {
        if let Err(e) = store.commit_batch() {
            tracing::error!("Commit failed: {}", e);
            abandon_batch(store, policy);
            return Err(e.into());
        }
    }

    Ok(summary)
}

fn abandon_batch(store: &mut dyn ProviderStore, policy: CommitPolicy) {
    if policy == CommitPolicy::PerRun {
        if let Err(e) = store.rollback_batch() {
            tracing::warn!("Rollback failed: {}", e);
        }
    }
}

/// Loads an intermediate file into `store`
pub fn load_file(
    path: &Path,
    store: &mut dyn ProviderStore,
    policy: CommitPolicy,
) -> Result<LoadSummary, HarvestError> {
    let entries = read_entries(path)?;
    tracing::info!(entries = entries.len(), path = %path.display(), "Read harvest file");
    load_entries(store, &entries, policy)
}

/// Opens the configured database and loads `input` (or the configured
/// intermediate file) into it
///
/// The connection is closed when this returns, on success or failure.
pub fn run_load(config: &Config, input: Option<&Path>) -> Result<LoadSummary, HarvestError> {
    let input = input.unwrap_or_else(|| Path::new(&config.output.json_path));
    let db_path = Path::new(&config.database.path);

    let mut storage = open_storage(db_path)?;
    tracing::info!(database = %db_path.display(), "Connected to database");

    let result = load_file(input, &mut storage, config.database.commit);

    drop(storage);
    tracing::info!("Database connection closed");

    let summary = result?;
    tracing::info!(
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Records inserted"
    );
    Ok(summary)
}
