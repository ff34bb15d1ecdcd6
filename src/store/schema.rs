//! SQLite schema for the result index

use rusqlite::Connection;

use crate::error::Result;

/// One append-only table of completed runs. There is deliberately no
/// uniqueness constraint on the signature columns: every run appends a row
/// and reads pick the newest match.
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS results (
    created TEXT NOT NULL,
    agent TEXT NOT NULL,
    model TEXT NOT NULL,
    task TEXT NOT NULL,
    kwargs TEXT NOT NULL,
    prompt TEXT NOT NULL,
    explanation TEXT NOT NULL,
    code TEXT NOT NULL,
    value TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_results_signature
    ON results(agent, model, task, kwargs);
"#;

/// Create the schema if it does not exist yet. Idempotent.
pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
