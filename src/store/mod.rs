//! Durable result store
//!
//! `ResultStore` caches completed runs so an equivalent request never
//! re-invokes the billable remote agent. It owns one on-disk directory
//! holding a SQLite index (`results.db`) and a `blobs/` subdirectory of
//! payload files named by random UUID plus a type-derived extension.
//!
//! The index is an append-only log: a signature may match many rows and
//! reads always resolve the most recently created one. `delete` removes
//! index rows only; the corresponding blob files are left behind (known
//! limitation, the index never points at them again).

mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{CacheError, Result};
use crate::payload::Payload;
use crate::run::{RunInput, RunOutput};

/// Index file name inside the store root
pub const DB_NAME: &str = "results.db";
/// Blob subdirectory name inside the store root
pub const BLOBS_DIR: &str = "blobs";

/// A durable cache of (run signature → run output) pairs
#[derive(Debug)]
pub struct ResultStore {
    root: PathBuf,
    blob_dir: PathBuf,
    conn: Connection,
}

impl ResultStore {
    /// Open the store rooted at `root`, creating the directory layout and
    /// schema on first use. Idempotent.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .map_err(|e| CacheError::io_operation("create store root", root.display(), e))?;

        let blob_dir = root.join(BLOBS_DIR);
        fs::create_dir_all(&blob_dir)
            .map_err(|e| CacheError::io_operation("create blob dir", blob_dir.display(), e))?;

        let db_path = root.join(DB_NAME);
        let conn = Connection::open(&db_path)
            .map_err(|e| CacheError::io_operation("open index", db_path.display(), e))?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(|e| CacheError::db_operation("enable WAL mode", e))?;
        schema::create_schema(&conn)?;

        tracing::debug!(root = %root.display(), "opened result store");

        Ok(ResultStore {
            root,
            blob_dir,
            conn,
        })
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True iff at least one record matches the signature
    pub fn exists(&self, input: &RunInput) -> Result<bool> {
        let found: bool = self
            .conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM results
                 WHERE agent = ?1 AND model = ?2 AND task = ?3 AND kwargs = ?4)",
                params![input.agent, input.model, input.task, input.kwargs_key()?],
                |row| row.get(0),
            )
            .map_err(|e| CacheError::db_operation("query result existence", e))?;
        Ok(found)
    }

    /// Read the most recently written output for the signature.
    ///
    /// Returns `Ok(None)` when nothing was ever written for it. A record
    /// whose blob file is missing is a hard error, not a miss: it means the
    /// cache was corrupted externally.
    pub fn read(&self, input: &RunInput) -> Result<Option<RunOutput>> {
        // rowid breaks ties when two runs land in the same timestamp
        let row = self
            .conn
            .query_row(
                "SELECT prompt, explanation, code, value FROM results
                 WHERE agent = ?1 AND model = ?2 AND task = ?3 AND kwargs = ?4
                 ORDER BY created DESC, rowid DESC LIMIT 1",
                params![input.agent, input.model, input.task, input.kwargs_key()?],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            );

        let (prompt, explanation, code, value_ref) = match row {
            Ok(fields) => fields,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(CacheError::db_operation("query result", e)),
        };

        let value = self.read_blob(&value_ref)?;
        Ok(Some(RunOutput {
            value,
            prompt,
            explanation,
            code,
        }))
    }

    /// Persist a completed run.
    ///
    /// The blob is written first under a fresh unique name, then the index
    /// row is appended with a store-assigned creation time. A failure between
    /// the two steps leaves at worst an orphaned blob, never an index row
    /// without its blob.
    pub fn write(&self, input: &RunInput, output: &RunOutput) -> Result<()> {
        let value_ref = self.write_blob(&output.value)?;
        let created = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        self.conn
            .execute(
                "INSERT INTO results
                 (created, agent, model, task, kwargs, prompt, explanation, code, value)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    created,
                    input.agent,
                    input.model,
                    input.task,
                    input.kwargs_key()?,
                    output.prompt,
                    output.explanation,
                    output.code,
                    value_ref,
                ],
            )
            .map_err(|e| CacheError::db_operation("insert result record", e))?;

        tracing::debug!(
            agent = %input.agent,
            model = %input.model,
            value = %value_ref,
            "cached run result"
        );
        Ok(())
    }

    /// Delete all records matching the signature. No error if none matched.
    ///
    /// Blob files are not reclaimed; orphaned blobs are acceptable garbage.
    pub fn delete(&self, input: &RunInput) -> Result<()> {
        let removed = self
            .conn
            .execute(
                "DELETE FROM results
                 WHERE agent = ?1 AND model = ?2 AND task = ?3 AND kwargs = ?4",
                params![input.agent, input.model, input.task, input.kwargs_key()?],
            )
            .map_err(|e| CacheError::db_operation("delete result records", e))?;
        tracing::debug!(agent = %input.agent, model = %input.model, removed, "deleted records");
        Ok(())
    }

    fn write_blob(&self, payload: &Payload) -> Result<String> {
        let bytes = payload.encode()?;
        let name = format!("{}.{}", Uuid::new_v4(), payload.extension());
        let path = self.blob_dir.join(&name);

        fs::write(&path, bytes)
            .map_err(|e| CacheError::io_operation("write blob", path.display(), e))?;

        if let Payload::Value(_) = payload {
            tracing::warn!(blob = %name, "saved non-image payload as generic blob");
        }
        Ok(name)
    }

    fn read_blob(&self, value_ref: &str) -> Result<Payload> {
        let path = self.blob_dir.join(value_ref);
        let extension = Path::new(value_ref)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CacheError::MissingBlob { path });
            }
            Err(e) => return Err(CacheError::io_operation("read blob", path.display(), e)),
        };

        Payload::decode(extension, bytes)
    }
}
