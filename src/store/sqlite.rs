//! SQLite-backed row table. One connection per call, closed when it goes out of scope.
//! Used by: handlers::items, state.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use serde::{Serialize, Serializer};

use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

/// A row of the `docker` table. Serialized as `[id, item_id, data]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: i64,
    pub item_id: i64,
    pub data: String,
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (self.id, self.item_id, &self.data).serialize(serializer)
    }
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS docker (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id INTEGER NOT NULL,
                data TEXT NOT NULL
            )",
        )?;
        Ok(())
    }

    pub fn fetch_all(&self) -> Result<Vec<Row>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, item_id, data FROM docker")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Row {
                    id: row.get(0)?,
                    item_id: row.get(1)?,
                    data: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn insert(&self, item_id: i64, data: &str) -> Result<()> {
        self.write("INSERT INTO docker (item_id, data) VALUES (?1, ?2)", (item_id, data))
    }

    /// Missing ids are not an error; the statement just touches no rows.
    pub fn update(&self, id: i64, data: &str) -> Result<()> {
        self.write("UPDATE docker SET data = ?1 WHERE id = ?2", (data, id))
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.write("DELETE FROM docker WHERE id = ?1", (id,))
    }

    fn write<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(sql, params)?;
        tx.commit()?;
        tracing::debug!(changed, "statement committed");
        Ok(())
    }
}
