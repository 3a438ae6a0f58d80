pub mod local;

pub use local::*;

use std::path::PathBuf;

/// Failure to read the upload directory
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {path:?}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a scan: either the value derived from the directory or a
/// degraded marker carrying the reason it could not be read.
#[derive(Debug)]
pub enum Scan<T> {
    Fresh(T),
    Degraded(ScanError),
}

impl<T> Scan<T> {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Scan::Degraded(_))
    }

    pub fn map<U, F>(self, f: F) -> Scan<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Scan::Fresh(value) => Scan::Fresh(f(value)),
            Scan::Degraded(err) => Scan::Degraded(err),
        }
    }
}

impl<T: Default> Scan<T> {
    /// The derived value, or the empty/zeroed value for a degraded scan
    pub fn into_payload(self) -> T {
        match self {
            Scan::Fresh(value) => value,
            Scan::Degraded(err) => {
                tracing::warn!("Inventory scan degraded: {}", err);
                T::default()
            }
        }
    }
}

impl<T> From<std::result::Result<T, ScanError>> for Scan<T> {
    fn from(result: std::result::Result<T, ScanError>) -> Self {
        match result {
            Ok(value) => Scan::Fresh(value),
            Err(err) => Scan::Degraded(err),
        }
    }
}
