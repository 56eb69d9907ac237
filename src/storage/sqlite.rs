//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the RecordStore trait.

use crate::state::StopReason;
use crate::storage::merge::merge_records;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::{NewsRecord, RunRecord, RunStatus, SaveReport};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RECORD_COLUMNS: &str = "title, link, image, description, time, gregorian_date, \
                              scraped_date, page, subject, full_text, keywords";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<NewsRecord> {
    Ok(NewsRecord {
        title: row.get(0)?,
        link: row.get(1)?,
        image: row.get(2)?,
        description: row.get(3)?,
        time: row.get(4)?,
        gregorian_date: row.get(5)?,
        scraped_date: row.get(6)?,
        page: row.get(7)?,
        subject: row.get(8)?,
        full_text: row.get(9)?,
        keywords: row.get(10)?,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<(RunRecord, String, Option<String>)> {
    let status: String = row.get(5)?;
    let stop: Option<String> = row.get(6)?;
    Ok((
        RunRecord {
            id: row.get(0)?,
            site: row.get(1)?,
            started_at: row.get(2)?,
            finished_at: row.get(3)?,
            config_hash: row.get(4)?,
            status: RunStatus::Running,
            stop_reason: None,
            records_saved: row.get::<_, i64>(7)? as u64,
        },
        status,
        stop,
    ))
}

impl RecordStore for SqliteStorage {
    // ===== Records =====

    fn save_batch(&mut self, batch: Vec<NewsRecord>) -> StorageResult<SaveReport> {
        let received = batch.len();
        let existing = self.load_records()?;
        let before = existing.len();
        let merged = merge_records(existing, batch);

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM records", [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO records (position, {}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                RECORD_COLUMNS
            ))?;
            for (position, r) in merged.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    r.title,
                    r.link,
                    r.image,
                    r.description,
                    r.time,
                    r.gregorian_date,
                    r.scraped_date,
                    r.page,
                    r.subject,
                    r.full_text,
                    r.keywords,
                ])?;
            }
        }
        tx.commit()?;

        let total = merged.len();
        Ok(SaveReport {
            received,
            replaced: before + received - total,
            total,
        })
    }

    fn load_records(&self) -> StorageResult<Vec<NewsRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM records ORDER BY position",
            RECORD_COLUMNS
        ))?;

        let records = stmt
            .query_map([], record_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_records(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn max_page(&self) -> StorageResult<Option<i64>> {
        let max: Option<i64> = self
            .conn
            .query_row("SELECT MAX(page) FROM records", [], |row| row.get(0))?;
        Ok(max)
    }

    fn load_links(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT link FROM records WHERE link IS NOT NULL AND link != ''")?;

        let links = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(links)
    }

    // ===== Run Management =====

    fn create_run(&mut self, site: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (site, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![site, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn finish_run(
        &mut self,
        run_id: i64,
        status: RunStatus,
        stop_reason: Option<StopReason>,
        records_saved: u64,
    ) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, stop_reason = ?2, records_saved = ?3, finished_at = ?4
             WHERE id = ?5",
            params![
                status.to_db_string(),
                stop_reason.map(|r| r.to_db_string()),
                records_saved as i64,
                now,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, site, started_at, finished_at, config_hash, status, stop_reason, records_saved
                 FROM runs ORDER BY id DESC LIMIT 1",
                [],
                run_from_row,
            )
            .optional()?;

        let Some((mut run, status, stop)) = row else {
            return Ok(None);
        };

        run.status = RunStatus::from_db_string(&status)
            .ok_or_else(|| StorageError::CorruptRow(format!("unknown run status '{}'", status)))?;
        run.stop_reason = match stop {
            Some(s) => Some(StopReason::from_db_string(&s).ok_or_else(|| {
                StorageError::CorruptRow(format!("unknown stop reason '{}'", s))
            })?),
            None => None,
        };

        Ok(Some(run))
    }
}
