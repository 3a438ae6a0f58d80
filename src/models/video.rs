use serde::{Deserialize, Serialize};

use crate::storage::VideoEntry;

/// Placeholder producer id; uploads carry no producer information.
pub const UNKNOWN_PRODUCER: i64 = 1;

/// One uploaded video as reported by `GET /api/videos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub filename: String,
    pub file_path: String,
    pub file_size: u64,
    pub producer_id: i64,
    /// Unix seconds of the scan that produced this record, not the upload time.
    pub upload_timestamp: f64,
    pub is_duplicate: bool,
}

impl VideoRecord {
    pub fn from_entry(entry: VideoEntry, url_prefix: &str, scanned_at: f64) -> Self {
        Self {
            file_path: format!("{}/{}", url_prefix, entry.filename),
            filename: entry.filename,
            file_size: entry.size,
            producer_id: UNKNOWN_PRODUCER,
            upload_timestamp: scanned_at,
            is_duplicate: false,
        }
    }
}
