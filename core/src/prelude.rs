use serde::{Deserialize, Serialize};

/// Channel numbers are categorical small positive integers.
pub type Channel = u32;

/// Outcome of the provider's best-channel computation, as handed to the evaluator.
pub type BestChannel = Result<Channel, RecommendationError>;

/// Radio or driver failure while scanning a room.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("scan failed: {message}")]
pub struct ScanError {
    pub message: String,
}

impl ScanError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The provider could not make a reliable channel recommendation.
///
/// `Display` yields the provider's message verbatim so it can be shown to the
/// user without decoration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RecommendationError {
    pub message: String,
}

impl RecommendationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while editing the house hierarchy.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown floor: {0}")]
    UnknownFloor(String),
    #[error("unknown room: {0}")]
    UnknownRoom(String),
}

pub type ModelResult<T> = Result<T, ModelError>;
