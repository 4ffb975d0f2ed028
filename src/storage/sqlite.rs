//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ProviderStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ProviderStore, StorageError, StorageResult};
use crate::storage::ProviderRow;
use crate::HarvestError;
use rusqlite::{params, Connection};
use std::path::Path;

/// Encoded sentinel phone list, as written by the loader
const NO_PHONE: &str = r#"["N/A"]"#;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
    in_batch: bool,
}

impl SqliteStorage {
    /// Opens (or creates) the database at `path` and ensures the table exists
    pub fn new(path: &Path) -> Result<Self, HarvestError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn,
            in_batch: false,
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, HarvestError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn,
            in_batch: false,
        })
    }
}

impl ProviderStore for SqliteStorage {
    // ===== Writes =====

    fn insert_provider(&mut self, row: &ProviderRow) -> StorageResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO providers (provider_name, company_name, num_locations, location_addresses, phone_number, website_link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        stmt.execute(params![
            row.provider_name,
            row.company_name,
            row.num_locations,
            row.location_addresses,
            row.phone_number,
            row.website_link,
        ])?;
        Ok(())
    }

    fn begin_batch(&mut self) -> StorageResult<()> {
        if self.in_batch {
            return Err(StorageError::BatchAlreadyOpen);
        }
        self.conn.execute_batch("BEGIN")?;
        self.in_batch = true;
        Ok(())
    }

    fn commit_batch(&mut self) -> StorageResult<()> {
        if !self.in_batch {
            return Err(StorageError::NoOpenBatch("commit"));
        }
        self.conn.execute_batch("COMMIT")?;
        self.in_batch = false;
        Ok(())
    }

    fn rollback_batch(&mut self) -> StorageResult<()> {
        if !self.in_batch {
            return Err(StorageError::NoOpenBatch("roll back"));
        }
        self.in_batch = false;
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    // ===== Reads =====

    fn count_providers(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM providers", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_without_phone(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM providers WHERE phone_number = ?1",
            params![NO_PHONE],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn count_distinct_companies(&self) -> StorageResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT company_name) FROM providers WHERE company_name != 'N/A'",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn top_companies(&self, limit: usize) -> StorageResult<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT company_name, COUNT(*) AS n FROM providers
             WHERE company_name != 'N/A'
             GROUP BY company_name
             ORDER BY n DESC, company_name ASC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    fn list_providers(&self) -> StorageResult<Vec<ProviderRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT provider_name, company_name, num_locations, location_addresses, phone_number, website_link
             FROM providers ORDER BY id",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok(ProviderRow {
                    provider_name: row.get(0)?,
                    company_name: row.get(1)?,
                    num_locations: row.get(2)?,
                    location_addresses: row.get(3)?,
                    phone_number: row.get(4)?,
                    website_link: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}
