//! Storage traits and error types
//!
//! This module defines the trait interface for the provider table backend and
//! associated error types.

use crate::storage::ProviderRow;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("No open batch to {0}")]
    NoOpenBatch(&'static str),

    #[error("A batch is already open")]
    BatchAlreadyOpen,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for provider table backends
///
/// Inserts are append-only: there is no update, upsert or dedup key.
pub trait ProviderStore {
    // ===== Writes =====

    /// Appends one row
    fn insert_provider(&mut self, row: &ProviderRow) -> StorageResult<()>;

    /// Opens a batch; inserts are not durable until [`commit_batch`](Self::commit_batch)
    fn begin_batch(&mut self) -> StorageResult<()>;

    /// Commits the open batch
    fn commit_batch(&mut self) -> StorageResult<()>;

    /// Discards every insert since [`begin_batch`](Self::begin_batch)
    fn rollback_batch(&mut self) -> StorageResult<()>;

    // ===== Reads =====

    /// Total rows in the table
    fn count_providers(&self) -> StorageResult<u64>;

    /// Rows whose phone column is the encoded sentinel list
    fn count_without_phone(&self) -> StorageResult<u64>;

    /// Distinct company names, sentinel excluded
    fn count_distinct_companies(&self) -> StorageResult<u64>;

    /// Company names by row count, most frequent first
    fn top_companies(&self, limit: usize) -> StorageResult<Vec<(String, u64)>>;

    /// Every row in insertion order
    fn list_providers(&self) -> StorageResult<Vec<ProviderRow>>;
}
