use chrono::Utc;

use crate::models::{QueueStatus, StatisticsSummary, VideoRecord};
use crate::storage::{Scan, UploadDirectory};

/// Derives the dashboard views from the upload directory
///
/// Every call rescans the directory. Scan failures never leave this service:
/// they are logged and replaced by an empty list or zeroed statistics.
pub struct InventoryService;

impl InventoryService {
    /// Scan the directory into records, keeping the degraded marker
    pub async fn scan_videos(uploads: &UploadDirectory, url_prefix: &str) -> Scan<Vec<VideoRecord>> {
        let scanned_at = Utc::now().timestamp_millis() as f64 / 1000.0;
        Scan::from(uploads.scan().await).map(|entries| {
            entries
                .into_iter()
                .map(|entry| VideoRecord::from_entry(entry, url_prefix, scanned_at))
                .collect()
        })
    }

    /// Count the directory into a summary, keeping the degraded marker
    pub async fn scan_statistics(uploads: &UploadDirectory) -> Scan<StatisticsSummary> {
        Scan::from(uploads.count().await).map(|count| StatisticsSummary::from_count(count as u64))
    }

    /// Records for every qualifying file; empty if the directory is unreadable
    pub async fn list_videos(uploads: &UploadDirectory, url_prefix: &str) -> Vec<VideoRecord> {
        Self::scan_videos(uploads, url_prefix).await.into_payload()
    }

    /// Summary counters; all zero if the directory is unreadable
    pub async fn compute_statistics(uploads: &UploadDirectory) -> StatisticsSummary {
        Self::scan_statistics(uploads).await.into_payload()
    }

    pub fn queue_status(capacity: u32) -> QueueStatus {
        QueueStatus::new(0, capacity)
    }
}
