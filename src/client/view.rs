use std::fmt::Write as _;

use crate::models::{StatisticsSummary, VideoRecord};

/// Last successfully fetched dashboard state
///
/// Each region is replaced wholesale on a successful fetch and left as is
/// when its fetch fails.
#[derive(Debug, Default, Clone)]
pub struct DashboardView {
    statistics: Option<StatisticsSummary>,
    videos: Option<Vec<VideoRecord>>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_statistics(&mut self, statistics: StatisticsSummary) {
        self.statistics = Some(statistics);
    }

    pub fn apply_videos(&mut self, videos: Vec<VideoRecord>) {
        self.videos = Some(videos);
    }

    pub fn statistics(&self) -> Option<&StatisticsSummary> {
        self.statistics.as_ref()
    }

    pub fn videos(&self) -> Option<&[VideoRecord]> {
        self.videos.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        match &self.statistics {
            Some(stats) => {
                let _ = writeln!(
                    out,
                    "Processed: {}  Success rate: {:.2}%",
                    stats.total_processed,
                    f64::from(stats.success_rate)
                );
            }
            None => out.push_str("Processed: -  Success rate: -\n"),
        }

        out.push_str("Videos:\n");
        match &self.videos {
            Some(videos) if videos.is_empty() => out.push_str("  (none)\n"),
            Some(videos) => {
                for video in videos {
                    let _ = writeln!(
                        out,
                        "  {}  {} bytes  {}",
                        video.filename, video.file_size, video.file_path
                    );
                }
            }
            None => out.push_str("  (waiting for data)\n"),
        }

        out
    }
}
