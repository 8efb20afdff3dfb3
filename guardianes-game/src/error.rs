//! Error types for validation, the progress service, and the session.
use thiserror::Error;

use crate::score::LevelNumber;

/// Input rejected before any remote call is made.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("player name must not be empty")]
    EmptyName,
    #[error("player name exceeds {max} characters")]
    NameTooLong { max: usize },
    #[error("player name contains unsupported characters: {name:?}")]
    InvalidNameChars { name: String },
    #[error("level {value} is outside 1..=5")]
    LevelOutOfRange { value: i64 },
    #[error("score {value} is outside 0..=100")]
    ScoreOutOfRange { value: i64 },
    #[error("level {level} is locked (current level {current})")]
    LevelLocked { level: LevelNumber, current: u8 },
}

/// Failure reported by (or on the way to) the progress service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{resource} not found")]
    NotFound { resource: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ApiError {
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Errors surfaced to the UI by [`crate::session::GameSession`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("no player loaded for this session")]
    NoPlayer,
    #[error("no level is currently active")]
    NoActiveLevel,
    #[error("action targets level {action} but level {active} is active")]
    WrongLevel {
        action: LevelNumber,
        active: LevelNumber,
    },
    #[error("name slot failure: {0}")]
    Storage(String),
}

/// Errors raised when tuning or quiz assets fail validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}
