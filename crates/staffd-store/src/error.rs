use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Failures raised by a [`crate::DataStore`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store was closed during shutdown.
    #[error("data store is closed")]
    Closed,
    /// Internal state was left inconsistent by a panicking writer.
    #[error("data store lock poisoned")]
    Poisoned,
}
