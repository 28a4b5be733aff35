//! Error types for availability operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid slot config: {0}")]
    InvalidConfig(String),

    #[error("Local time {0} cannot be resolved in {1}")]
    UnresolvableLocalTime(String, String),
}

/// Failure reported by the collaborator that fetched one external calendar.
///
/// Never fatal to an availability request: the engine treats the affected
/// feed as empty and raises the degraded flag on the result instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("External calendar fetch failed for {provider}: {reason}")]
pub struct FetchError {
    pub provider: String,
    pub reason: String,
}

pub type Result<T> = std::result::Result<T, EngineError>;
