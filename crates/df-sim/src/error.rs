//! Simulator error taxonomy

use df_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("no criteria supplied")]
    EmptyCriteria,

    #[error("criterion quotas sum to {0}, expected a positive total")]
    BadQuotas(f64),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("book serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
