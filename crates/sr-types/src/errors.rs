use thiserror::Error;

/// Main error type for the Sweeprig system
#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Invalid sweep space: {0}")]
    InvalidSpace(String),

    #[error("Invalid shard: chunk {chunk_id} of {num_chunks} (chunk_id must be < num_chunks, num_chunks must be > 0)")]
    InvalidShard { chunk_id: usize, num_chunks: usize },

    #[error("Worker pool error: {0}")]
    Pool(String),

    #[error("Task error: {0}")]
    Task(String),

    #[error("Launch backend error: {0}")]
    Launch(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Sweeprig operations
pub type SweepResult<T> = Result<T, SweepError>;

/// Macro for creating invalid-space errors
#[macro_export]
macro_rules! space_error {
    ($($arg:tt)*) => {
        $crate::SweepError::InvalidSpace(format!($($arg)*))
    };
}

/// Macro for creating task errors
#[macro_export]
macro_rules! task_error {
    ($($arg:tt)*) => {
        $crate::SweepError::Task(format!($($arg)*))
    };
}
