//! SQLite snapshot provider.
//!
//! Several repositories can share one database file; each one is stored as
//! a JSON payload row under its own key in `snapshots`.

use crate::db::open_db;
use crate::storage::{DataProvider, StorageResult};
use log::info;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::PathBuf;

pub const SOURCE: &str = "sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteProvider {
    path: PathBuf,
    key: String,
}

impl SqliteProvider {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

impl<T> DataProvider<T> for SqliteProvider
where
    T: Serialize + DeserializeOwned,
{
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn location(&self) -> String {
        format!("{}#{}", self.path.display(), self.key)
    }

    fn read(&self) -> StorageResult<Option<T>> {
        let conn = open_db(&self.path)?;
        let payload: Option<String> = conn
            .query_row(
                "SELECT payload FROM snapshots WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        info!(
            "event=snapshot_read module=storage status=ok source={SOURCE} key={} found={}",
            self.key,
            payload.is_some()
        );
        match payload {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn write(&self, value: &T) -> StorageResult<()> {
        let payload = serde_json::to_string(value)?;
        let conn = open_db(&self.path)?;
        conn.execute(
            "INSERT INTO snapshots (key, payload, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), payload.as_str()],
        )?;

        info!(
            "event=snapshot_write module=storage status=ok source={SOURCE} key={} bytes={}",
            self.key,
            payload.len()
        );
        Ok(())
    }
}
