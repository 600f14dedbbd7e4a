//! Ancestor records — derived data linking a person to each ancestor.
//!
//! The source of truth is always the fact list; these records are a cache
//! and must be fully re-derivable from facts at any time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One hop-counted link from a descendant up to an ancestor.
///
/// `depth` is the number of parent-edge hops (≥ 1); `path` holds the
/// intermediate person ids in order, excluding both endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AncestorRecord {
  pub descendant_id: Uuid,
  pub ancestor_id:   Uuid,
  pub depth:         u32,
  pub path:          Vec<Uuid>,
}

/// A persisted cache row: an [`AncestorRecord`] plus the time it was
/// computed. Upserted idempotently keyed by `(descendant_id, ancestor_id)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedAncestor {
  #[serde(flatten)]
  pub record:      AncestorRecord,
  pub computed_at: DateTime<Utc>,
}

/// A population-cache row matching one of a subject's ancestors: some other
/// person who descends from `ancestor_id` at `depth` hops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedAncestorRow {
  pub person_id:   Uuid,
  pub ancestor_id: Uuid,
  pub depth:       u32,
}
