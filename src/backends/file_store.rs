// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::errors::StoreError;
use crate::record::Record;
use crate::traits::RelationalStore;

/// Result store for local runs: appends each row as one JSON line.
///
/// The insert statement only names the target; rows are written as-is with
/// the column names as keys.
pub struct JsonLinesStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonLinesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RelationalStore for JsonLinesStore {
    async fn store(&self, _statement: &str, rows: &[Record]) -> Result<u64, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut buffer = Vec::new();
        for row in rows {
            serde_json::to_writer(&mut buffer, row)?;
            buffer.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        Ok(rows.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_one_line_per_row() {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(dir.path().join("out").join("result.jsonl"));

        let n = store
            .store("INSERT", &[record! { "uuid" => "u1" }, record! { "uuid" => "u2" }])
            .await
            .unwrap();
        assert_eq!(n, 2);
        store.store("INSERT", &[record! { "uuid" => "u3" }]).await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec![r#"{"uuid":"u1"}"#, r#"{"uuid":"u2"}"#, r#"{"uuid":"u3"}"#]);
    }

    #[tokio::test]
    async fn test_empty_rows_touch_nothing() {
        let dir = TempDir::new().unwrap();
        let store = JsonLinesStore::new(dir.path().join("result.jsonl"));
        assert_eq!(store.store("INSERT", &[]).await.unwrap(), 0);
        assert!(!store.path().exists());
    }
}
