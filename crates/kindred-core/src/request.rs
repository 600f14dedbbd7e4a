//! Connection requests — the small state machine recording proposed
//! connections discovered by the matcher.
//!
//! `pending → accepted | declined | cancelled`; all three outcomes are
//! terminal. A subject and candidate may have at most one active (pending or
//! accepted) request between them at a time, in either direction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle state of a connection request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
  Pending,
  Accepted,
  Declined,
  Cancelled,
}

impl RequestStatus {
  /// `true` for every state except `Pending`. No transition is permitted
  /// out of a terminal state.
  pub fn is_terminal(self) -> bool {
    !matches!(self, Self::Pending)
  }

  /// `true` for states that block a new request between the same pair
  /// (pending and accepted).
  pub fn is_active(self) -> bool {
    matches!(self, Self::Pending | Self::Accepted)
  }
}

impl std::fmt::Display for RequestStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Pending => "pending",
      Self::Accepted => "accepted",
      Self::Declined => "declined",
      Self::Cancelled => "cancelled",
    };
    f.write_str(s)
  }
}

/// A resolution applied to a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestDecision {
  Accept,
  Decline,
  Cancel,
}

impl RequestDecision {
  /// The terminal status this decision transitions a pending request into.
  pub fn resulting_status(self) -> RequestStatus {
    match self {
      Self::Accept => RequestStatus::Accepted,
      Self::Decline => RequestStatus::Declined,
      Self::Cancel => RequestStatus::Cancelled,
    }
  }
}

// ─── Request ─────────────────────────────────────────────────────────────────

/// A proposed connection between two people.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRequest {
  pub request_id:         Uuid,
  pub from_id:            Uuid,
  pub to_id:              Uuid,
  /// The shared ancestor the matcher surfaced this pair through, if the
  /// request originated from a match.
  pub shared_ancestor_id: Option<Uuid>,
  pub status:             RequestStatus,
  pub created_at:         DateTime<Utc>,
  /// Stamped by every transition out of `Pending`.
  pub responded_at:       Option<DateTime<Utc>>,
}

/// Input to [`crate::store::ConnectionRequestStore::create_request`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewConnectionRequest {
  pub from_id:            Uuid,
  pub to_id:              Uuid,
  pub shared_ancestor_id: Option<Uuid>,
}
