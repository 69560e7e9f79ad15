// storefront_app/src/errors.rs

use cartsync::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Store Error: {source}")]
  Store {
    #[from] // Allows conversion from cartsync::SyncError
    source: SyncError,
  },

  #[error("I/O Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Internal Error: {0}")]
  Internal(String),
}

// Handlers that use anyhow internally can still `?` into AppError.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    let err = match err.downcast::<SyncError>() {
      Ok(source) => return AppError::Store { source },
      Err(err) => err,
    };
    match err.downcast::<sqlx::Error>() {
      Ok(db_err) => AppError::Sqlx(db_err),
      Err(err) => AppError::Internal(format!("{:#}", err)),
    }
  }
}

impl AppError {
  /// Whether the shell should keep running after reporting this error.
  pub fn is_recoverable(&self) -> bool {
    !matches!(self, AppError::Config(_) | AppError::Io(_))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
