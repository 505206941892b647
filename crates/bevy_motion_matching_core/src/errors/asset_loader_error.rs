use thiserror::Error;

use super::MatchingError;

/// Possible errors produced while loading a frame database asset
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AssetLoaderError {
    #[error("Could not read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse RON: {0}")]
    RonSpannedError(#[from] ron::error::SpannedError),
    #[error("Frame database is invalid: {0}")]
    InvalidDatabase(#[from] MatchingError),
}
