use crate::error::{AppError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

pub const EVENTS_FILE: &str = "events.jsonl";
pub const PDF_FILE: &str = "log.pdf";

/// Log directory manager: owns `static/logs/` and the files written into it
#[derive(Clone)]
pub struct LogStorage {
    log_root: PathBuf,
}

impl LogStorage {
    pub fn new(log_root: impl AsRef<Path>) -> Self {
        Self {
            log_root: log_root.as_ref().to_path_buf(),
        }
    }

    pub fn log_root(&self) -> &Path {
        &self.log_root
    }

    pub fn events_path(&self) -> PathBuf {
        self.log_root.join(EVENTS_FILE)
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.log_root.join(PDF_FILE)
    }

    /// Ensure the log directory exists. Idempotent; fails if the path exists
    /// but is not a directory or cannot be created.
    pub async fn init(&self) -> Result<()> {
        if !self.log_root.is_dir() {
            fs::create_dir_all(&self.log_root).await.map_err(|e| {
                AppError::ServerError(format!(
                    "Failed to create log directory {}: {}",
                    self.log_root.display(),
                    e
                ))
            })?;
            tracing::info!("📁 Created log directory: {}", self.log_root.display());
        }
        Ok(())
    }

    /// Append one record as a single JSON line to `events.jsonl`
    pub async fn append_event<T: Serialize>(&self, record: &T) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.events_path())
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!("📝 Appended event to {}", EVENTS_FILE);
        Ok(())
    }

    /// Replace `log.pdf` with freshly rendered bytes
    pub async fn write_pdf(&self, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.pdf_path();
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::ServerError(format!("Failed to write PDF log: {}", e)))?;

        tracing::debug!("💾 Wrote {} ({} bytes)", PDF_FILE, bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_nested_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("static").join("logs");
        let storage = LogStorage::new(&root);

        storage.init().await.unwrap();
        assert!(root.is_dir());

        // Second call is a no-op
        storage.init().await.unwrap();
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn test_init_fails_when_path_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("logs");
        std::fs::write(&root, b"not a directory").unwrap();

        let storage = LogStorage::new(&root);
        assert!(storage.init().await.is_err());
    }

    #[tokio::test]
    async fn test_append_event_writes_one_line_per_record() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogStorage::new(temp_dir.path());
        storage.init().await.unwrap();

        storage
            .append_event(&json!({"summary": "first"}))
            .await
            .unwrap();
        storage
            .append_event(&json!({"summary": "second\nline"}))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(storage.events_path()).unwrap();
        let lines: Vec<Value> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["summary"], "first");
        assert_eq!(lines[1]["summary"], "second\nline");
    }

    #[tokio::test]
    async fn test_write_pdf_overwrites_previous_render() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LogStorage::new(temp_dir.path());

        storage.write_pdf(b"%PDF-old").await.unwrap();
        let path = storage.write_pdf(b"%PDF-new").await.unwrap();

        assert_eq!(path, temp_dir.path().join(PDF_FILE));
        assert_eq!(std::fs::read(path).unwrap(), b"%PDF-new");
    }
}
