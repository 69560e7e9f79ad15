// cartsync/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Failure reported by a [`RemoteTable`](crate::RemoteTable) implementation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
  #[error("transport failure: {0}")]
  Transport(String),

  #[error("not authorized: {0}")]
  Unauthorized(String),

  #[error("request rejected by table '{table}': {message}")]
  Rejected { table: String, message: String },

  #[error("could not decode row from table '{table}': {message}")]
  Decode { table: String, message: String },
}

/// Failure reported by a [`LocalStore`](crate::LocalStore). These never reach
/// the caller of an item store operation; they are logged and swallowed.
#[derive(Debug, Error)]
pub enum LocalStoreError {
  #[error("storage quota exceeded writing key '{key}' ({attempted} bytes, limit {limit})")]
  QuotaExceeded { key: String, attempted: usize, limit: usize },

  #[error("local storage I/O error for key '{key}': {source}")]
  Io {
    key: String,
    #[source]
    source: std::io::Error,
  },

  #[error("local storage unavailable: {0}")]
  Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("Remote table operation '{operation}' failed: {source}")]
  Remote {
    operation: &'static str,
    #[source]
    source: RemoteError,
  },

  #[error("Session resolver failed: {0}")]
  Session(String),

  #[error("Invalid argument: {0}")]
  InvalidArgument(String),

  #[error("Internal cartsync error: {0}")]
  Internal(String),
}

impl SyncError {
  pub(crate) fn remote(operation: &'static str, source: RemoteError) -> Self {
    SyncError::Remote { operation, source }
  }

  /// True for failures of the remote table (transport, authorization, rejected rows).
  pub fn is_remote(&self) -> bool {
    matches!(self, SyncError::Remote { .. })
  }
}

impl From<AnyhowError> for SyncError {
  fn from(err: AnyhowError) -> Self {
    // Collaborators that already produced a SyncError keep their message.
    match err.downcast::<SyncError>() {
      Ok(sync_err) => sync_err,
      Err(other) => SyncError::Internal(format!("{:#}", other)),
    }
  }
}

pub type SyncResult<T, E = SyncError> = std::result::Result<T, E>;
