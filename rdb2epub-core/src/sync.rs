//! Watermark persistence between runs
//!
//! The watermark lives in a marker file next to the generated packages. It is
//! read once before listing bookmarks and replaced once after the batch, so no
//! other part of the pipeline touches it.

use crate::error::Result;
use crate::storage::StorageProvider;
use crate::types::SyncState;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Default marker file name
pub const DEFAULT_MARKER: &str = "lastSync";

/// Reads and commits the sync watermark
pub struct SyncTracker {
    storage: Arc<dyn StorageProvider>,
    marker: String,
}

impl SyncTracker {
    /// Create a tracker using the default marker name
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Use a different marker file name
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Marker file name
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Read the watermark left by the previous run.
    ///
    /// A missing marker means a full sync. The marker body holds an RFC 3339
    /// timestamp; an empty or unreadable body falls back to the marker's
    /// modification time.
    pub async fn read_watermark(&self) -> Result<SyncState> {
        if !self.storage.exists(&self.marker).await? {
            tracing::debug!(marker = %self.marker, "no sync marker, full sync");
            return Ok(SyncState::full());
        }

        let body = self.storage.read(&self.marker).await?;
        let text = String::from_utf8_lossy(&body);
        if let Ok(watermark) = DateTime::parse_from_rfc3339(text.trim()) {
            return Ok(SyncState::at(watermark.with_timezone(&Utc)));
        }

        tracing::debug!(marker = %self.marker, "marker has no timestamp, using modification time");
        let modified = self.storage.modified(&self.marker).await?;
        Ok(SyncState { watermark: modified })
    }

    /// Replace the marker with the given state.
    ///
    /// A state without watermark leaves the marker untouched.
    pub async fn commit(&self, state: &SyncState) -> Result<()> {
        let Some(watermark) = state.watermark else {
            return Ok(());
        };

        self.storage
            .write(&self.marker, watermark.to_rfc3339().into_bytes())
            .await?;
        tracing::info!(watermark = %watermark, "sync watermark updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_missing_marker_means_full_sync() {
        let tracker = SyncTracker::new(Arc::new(MemoryStorage::new()));
        assert_eq!(tracker.read_watermark().await.unwrap(), SyncState::full());
    }

    #[tokio::test]
    async fn test_commit_then_read() {
        let tracker = SyncTracker::new(Arc::new(MemoryStorage::new()));
        let at = Utc.with_ymd_and_hms(2013, 5, 1, 22, 30, 0).unwrap();

        tracker.commit(&SyncState::at(at)).await.unwrap();

        assert_eq!(tracker.read_watermark().await.unwrap(), SyncState::at(at));
    }

    #[tokio::test]
    async fn test_empty_marker_uses_modification_time() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(DEFAULT_MARKER, Vec::new()).await.unwrap();
        let tracker = SyncTracker::new(storage.clone());

        let state = tracker.read_watermark().await.unwrap();

        assert_eq!(
            state.watermark,
            storage.modified(DEFAULT_MARKER).await.unwrap()
        );
        assert!(state.watermark.is_some());
    }

    #[tokio::test]
    async fn test_custom_marker_name() {
        let storage = Arc::new(MemoryStorage::new());
        let tracker = SyncTracker::new(storage.clone()).with_marker(".rdb2epub-sync");
        assert_eq!(tracker.marker(), ".rdb2epub-sync");
        let at = Utc.with_ymd_and_hms(2020, 2, 2, 2, 2, 2).unwrap();

        tracker.commit(&SyncState::at(at)).await.unwrap();

        assert!(storage.exists(".rdb2epub-sync").await.unwrap());
        assert!(!storage.exists(DEFAULT_MARKER).await.unwrap());
    }

    #[tokio::test]
    async fn test_commit_without_watermark_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let tracker = SyncTracker::new(storage.clone());

        tracker.commit(&SyncState::full()).await.unwrap();

        assert!(!storage.exists(DEFAULT_MARKER).await.unwrap());
    }
}
