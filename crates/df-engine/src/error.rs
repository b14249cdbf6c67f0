//! Error types for the outcome engine

use thiserror::Error;

/// Engine errors.
///
/// Configuration variants are fatal and surfaced by `GameConfig::validate`
/// before any spin runs; they are never retried. `CriterionUnreachable` is a
/// per-attempt outcome of the rejection loop and does not abort a batch.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Weighted table '{0}' is empty or has zero total weight")]
    EmptyTable(String),

    #[error("Unknown reel set: {0}")]
    UnknownReelSet(String),

    #[error("Malformed reel set '{name}': {reason}")]
    MalformedReelSet { name: String, reason: String },

    #[error("Unknown symbol tag '{0}' in reel strip")]
    UnknownSymbol(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Criterion '{criterion}' not satisfied after {attempts} attempts")]
    CriterionUnreachable { criterion: String, attempts: u32 },

    #[error("Spin attempt cancelled")]
    Cancelled,
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
