//! SQLite implementation of the record store.
//!
//! # Invariants
//! - Write paths validate payloads before SQL mutations.
//! - `select_all` lists rows in insertion (`id ASC`) order.

use crate::model::record::{NewRecord, Record, RecordId};
use crate::store::record_store::{RecordStore, StoreError, StoreResult};
use rusqlite::{params, Connection, Row};

const RECORD_SELECT_SQL: &str = "SELECT id, title, hours FROM study_records";

/// SQLite-backed record store owning its connection.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Wraps a connection returned by `db::open_db*` (migrations applied).
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl RecordStore for SqliteRecordStore {
    fn select_all(&self) -> StoreResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn insert(&self, record: &NewRecord) -> StoreResult<Record> {
        record.validate()?;

        self.conn.execute(
            "INSERT INTO study_records (title, hours) VALUES (?1, ?2);",
            params![record.title.as_str(), record.hours],
        )?;

        Ok(record.clone().into_record(self.conn.last_insert_rowid()))
    }

    fn delete_by_id(&self, id: RecordId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM study_records WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

fn parse_record_row(row: &Row<'_>) -> StoreResult<Record> {
    let record = Record {
        id: row.get("id")?,
        title: row.get("title")?,
        hours: row.get("hours")?,
    };
    record.validate().map_err(|err| {
        StoreError::InvalidData(format!("study_records row {}: {err}", record.id))
    })?;
    Ok(record)
}
