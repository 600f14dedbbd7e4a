//! Error type for `kindred-engine`.
//!
//! Domain outcomes (duplicate request, terminal-state transition) surface as
//! [`kindred_core::Error`]; backend failures are boxed so the engine stays
//! generic over store implementations. "No path" and "no candidates" are
//! never errors — they are `None`/empty results.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Domain(#[from] kindred_core::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
