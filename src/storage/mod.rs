//! Storage module for the providers table
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and table bootstrap
//! - Parameterised, append-only inserts
//! - Batch (transaction) control for the loader's commit policies
//! - Read queries for table statistics

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{ProviderStore, StorageError, StorageResult};

use crate::HarvestError;
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(HarvestError)` - Failed to open the database
pub fn open_storage(path: &Path) -> Result<SqliteStorage, HarvestError> {
    SqliteStorage::new(path)
}

/// One row of the `providers` table
///
/// The list columns hold JSON-encoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRow {
    pub provider_name: String,
    pub company_name: String,
    pub num_locations: i64,
    pub location_addresses: String,
    pub phone_number: String,
    pub website_link: String,
}
