//! Database schema definition
//!
//! Only the `providers` table is created, and only when it is missing.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS providers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    provider_name TEXT NOT NULL,
    company_name TEXT NOT NULL,
    num_locations INTEGER NOT NULL DEFAULT 0,
    location_addresses TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    website_link TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_providers_company ON providers(company_name);
"#;

/// Creates the providers table if it does not exist
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
