use serde::{Deserialize, Serialize};

/// Aggregate counters reported by `GET /api/statistics`
///
/// Only the number of files on disk is known, so received and processed are
/// the same value and drops/duplicates are always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    pub total_received: u64,
    pub total_processed: u64,
    pub total_dropped: u64,
    pub total_duplicates: u64,
    /// Either 0 or 100.
    pub success_rate: u32,
}

impl StatisticsSummary {
    pub fn from_count(count: u64) -> Self {
        Self {
            total_received: count,
            total_processed: count,
            total_dropped: 0,
            total_duplicates: 0,
            success_rate: if count > 0 { 100 } else { 0 },
        }
    }
}

/// Ingestion queue status reported by `GET /api/queue`
///
/// There is no queue behind the upload directory; the values describe an
/// always-empty queue of the configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub current_size: u32,
    pub max_size: u32,
    pub is_full: bool,
    pub available_slots: u32,
}

impl QueueStatus {
    pub fn new(current_size: u32, max_size: u32) -> Self {
        Self {
            current_size,
            max_size,
            is_full: current_size >= max_size,
            available_slots: max_size.saturating_sub(current_size),
        }
    }
}
