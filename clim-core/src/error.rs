//! Error taxonomy for the chart pipeline.
//!
//! Aggregation and projection are pure and never produce these. Everything
//! that touches I/O (loaders, storage, routing) reports through
//! [`ClimateError`] up to the draw orchestration, which decides what the
//! user sees.

use crate::dataset::DatasetType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClimateError {
    /// The loader could not deliver the raw series.
    #[error("data unavailable for {dataset}: {reason}")]
    DataUnavailable { dataset: DatasetType, reason: String },

    /// The runtime offers no usable persistence.
    #[error("persistent storage is not supported: {0}")]
    StorageUnsupported(String),

    /// The persisted schema changed underneath a running session.
    #[error("storage schema v{found} is deprecated (expected v{expected}), reload required")]
    StorageDeprecated { found: u32, expected: u32 },

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A route that resolves to no dataset page.
    #[error("no page for route {0}")]
    InvalidRoute(String),
}

impl ClimateError {
    pub fn storage(err: impl std::fmt::Display) -> Self {
        ClimateError::Storage(err.to_string())
    }

    pub fn data_unavailable(dataset: DatasetType, err: impl std::fmt::Display) -> Self {
        ClimateError::DataUnavailable {
            dataset,
            reason: err.to_string(),
        }
    }

    /// Fatal errors require a full reload of the page or process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ClimateError::StorageDeprecated { .. } | ClimateError::StorageUnsupported(_)
        )
    }
}
