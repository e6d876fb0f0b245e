/// Errors that can occur in the storage layer.
///
/// Callers in the session layer treat every variant the same way during
/// silent startup (as "nothing stored"), but explicit user actions pass
/// them up so the UI can show a failure notice.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading a key failed.
    #[error("failed to read key {key}: {reason}")]
    Read { key: String, reason: String },

    /// Writing or removing a key failed.
    #[error("failed to write key {key}: {reason}")]
    Write { key: String, reason: String },

    /// The backing store can't be reached at all (closed, not mounted,
    /// quota exhausted).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
