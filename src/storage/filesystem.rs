//! Durable receipt storage under the uploads directory.

use chrono::{SecondsFormat, Utc};
use std::io;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Subdirectory of the uploads root holding receipt PDFs. Matches the
/// public mount, so a stored file is reachable at
/// `/uploads/orders/{filename}`.
pub const ORDERS_SUBDIR: &str = "orders";

/// How often a same-millisecond filename collision is retried before the
/// write is reported as failed.
const COLLISION_RETRIES: u32 = 5;

#[derive(Debug, Clone)]
pub struct StoredReceipt {
    pub filename: String,
    pub path: PathBuf,
}

/// Filesystem-backed receipt store. The directory is created idempotently
/// on first use; concurrent writers never collide because every file name
/// embeds a timestamp and the open is `create_new`.
pub struct ReceiptStore {
    uploads_dir: PathBuf,
}

impl ReceiptStore {
    pub fn new(uploads_dir: PathBuf) -> Self {
        Self { uploads_dir }
    }

    pub fn orders_dir(&self) -> PathBuf {
        self.uploads_dir.join(ORDERS_SUBDIR)
    }

    /// Writes `bytes` as `{base_name}-{timestamp}.pdf` and returns only
    /// after the data is flushed, fsynced and the handle closed — a caller
    /// holding a [`StoredReceipt`] can hand out its URL immediately.
    pub async fn persist(&self, base_name: &str, bytes: &[u8]) -> io::Result<StoredReceipt> {
        let dir = self.orders_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let mut attempts = 0;
        let (mut handle, filename, path) = loop {
            let filename = format!("{}-{}.pdf", base_name, timestamp_token());
            let path = dir.join(&filename);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => break (file, filename, path),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    attempts += 1;
                    if attempts > COLLISION_RETRIES {
                        return Err(err);
                    }
                    // Same-millisecond collision: wait for the clock.
                    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
                }
                Err(err) => return Err(err),
            }
        };

        handle.write_all(bytes).await?;
        handle.flush().await?;
        handle.sync_all().await?;
        drop(handle);

        Ok(StoredReceipt { filename, path })
    }
}

/// ISO-8601 UTC stamp with `:` and `.` replaced so it is filename-safe,
/// e.g. `2026-08-08T12-34-56-789Z`.
fn timestamp_token() -> String {
    Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn persist_creates_directory_and_full_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path().to_path_buf());

        let payload = vec![7_u8; 4096];
        let stored = store.persist("pedido-opera_torta_cliente", &payload).await.unwrap();

        assert!(stored.filename.starts_with("pedido-opera_torta_cliente-"));
        assert!(stored.filename.ends_with(".pdf"));
        // The returned path is immediately fully readable.
        let on_disk = std::fs::read(&stored.path).unwrap();
        assert_eq!(on_disk.len(), payload.len());
    }

    #[tokio::test]
    async fn successive_writes_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = ReceiptStore::new(dir.path().to_path_buf());

        let a = store.persist("base", b"one").await.unwrap();
        let b = store.persist("base", b"two").await.unwrap();
        assert_ne!(a.filename, b.filename);
    }

    #[tokio::test]
    async fn concurrent_writes_both_land_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(ReceiptStore::new(dir.path().to_path_buf()));

        let (a, b) = tokio::join!(
            store.persist("base", b"left"),
            store.persist("base", b"right"),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.filename, b.filename);
        assert!(a.path.exists());
        assert!(b.path.exists());
    }

    #[test]
    fn timestamp_token_is_filename_safe() {
        let token = timestamp_token();
        assert!(!token.contains(':'));
        assert!(!token.contains('.'));
        assert!(token.ends_with('Z'));
    }
}
