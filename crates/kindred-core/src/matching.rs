//! Match candidates and matching preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A potential relative surfaced by the shared-ancestor matcher: subject and
/// candidate both descend from `shared_ancestor_id` but are not yet
/// connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
  pub subject_id:         Uuid,
  pub candidate_id:       Uuid,
  pub shared_ancestor_id: Uuid,
  pub subject_depth:      u32,
  pub candidate_depth:    u32,
  /// `subject_depth + candidate_depth`; lower is closer kin.
  pub closeness:          u32,
}

impl MatchCandidate {
  pub fn new(
    subject_id: Uuid,
    candidate_id: Uuid,
    shared_ancestor_id: Uuid,
    subject_depth: u32,
    candidate_depth: u32,
  ) -> Self {
    Self {
      subject_id,
      candidate_id,
      shared_ancestor_id,
      subject_depth,
      candidate_depth,
      closeness: subject_depth + candidate_depth,
    }
  }
}

/// A person's relative-matching preference. Absence of a record means the
/// person has not opted in and must be excluded from matching (default-deny).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchPreference {
  pub person_id:       Uuid,
  pub matching_opt_in: bool,
  pub updated_at:      DateTime<Utc>,
}
