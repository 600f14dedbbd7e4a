//! Error types for `kindred-core`.
//!
//! "No relationship found" and "no candidates found" are *not* errors — those
//! are expressed as `Option`/empty collections by the algorithms. The
//! variants here are genuine contract violations.

use thiserror::Error;
use uuid::Uuid;

use crate::request::RequestStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("connection request not found: {0}")]
  RequestNotFound(Uuid),

  #[error("connection request {0} is already {1}")]
  RequestClosed(Uuid, RequestStatus),

  #[error("an active connection request already exists between {0} and {1}")]
  DuplicateRequest(Uuid, Uuid),

  #[error("cannot open a connection request from a person to themselves")]
  SelfRequest,

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
