//! JSON file snapshot provider.

use crate::storage::{DataProvider, StorageError, StorageResult};
use log::{error, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE: &str = "file:json";

/// Stores one value as pretty-printed JSON in a single file.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFileProvider {
    path: PathBuf,
}

impl JsonFileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StorageError {
        error!(
            "event=snapshot_io module=storage status=error source={SOURCE} path={} error={source}",
            path.display()
        );
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl<T> DataProvider<T> for JsonFileProvider
where
    T: Serialize + DeserializeOwned,
{
    fn source(&self) -> &'static str {
        SOURCE
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn read(&self) -> StorageResult<Option<T>> {
        if !self.path.exists() {
            info!(
                "event=snapshot_read module=storage status=ok source={SOURCE} found=false path={}",
                self.path.display()
            );
            return Ok(None);
        }

        let text = fs::read_to_string(&self.path).map_err(|err| self.io_error(&self.path, err))?;
        let value = serde_json::from_str(&text)?;
        info!(
            "event=snapshot_read module=storage status=ok source={SOURCE} found=true bytes={} path={}",
            text.len(),
            self.path.display()
        );
        Ok(Some(value))
    }

    fn write(&self, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string_pretty(value)?;
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(parent, err))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, text.as_bytes()).map_err(|err| self.io_error(&temp, err))?;
        if let Err(err) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(&self.path, err));
        }

        info!(
            "event=snapshot_write module=storage status=ok source={SOURCE} bytes={} path={}",
            text.len(),
            self.path.display()
        );
        Ok(())
    }
}
