//! Error type for `kindred-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] kindred_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown request status: {0:?}")]
  UnknownStatus(String),

  /// Attempted to update a request that was not found.
  #[error("connection request not found: {0}")]
  RequestNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
