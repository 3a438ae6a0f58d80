pub mod poller;
pub mod view;

pub use poller::*;
pub use view::*;

use serde::de::DeserializeOwned;

use crate::models::{StatisticsSummary, VideoRecord};

/// Polling client error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// HTTP client for the two dashboard endpoints
#[derive(Clone)]
pub struct DashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl DashboardClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    /// GET /api/statistics
    pub async fn fetch_statistics(&self) -> Result<StatisticsSummary> {
        self.get_json("/api/statistics").await
    }

    /// GET /api/videos
    pub async fn fetch_videos(&self) -> Result<Vec<VideoRecord>> {
        self.get_json("/api/videos").await
    }
}
