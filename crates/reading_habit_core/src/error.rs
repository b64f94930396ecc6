//! crates/reading_habit_core/src/error.rs
//!
//! Error type shared by the local stores.

use crate::ports::PortError;

/// Failure of a store operation. In-memory state stays valid when this is
/// returned; only durability of the last mutation is lost.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage port rejected a read or write.
    #[error("Storage error: {0}")]
    Port(#[from] PortError),

    /// The in-memory record couldn't be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A convenience type alias for `Result<T, StoreError>`.
pub type StoreResult<T> = Result<T, StoreError>;
