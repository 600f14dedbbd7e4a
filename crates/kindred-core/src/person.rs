//! Person — the node type of the family graph.
//!
//! A person holds identity plus display attributes only. No algorithm
//! branches on a display attribute; kinship is computed purely from
//! relationship facts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A person known to the engine.
///
/// People referenced only as the object of a fact (a relative who never
/// onboarded) are stored as placeholders so traversal never fails on a
/// half-known branch of the family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
  pub person_id:   Uuid,
  pub first_name:  Option<String>,
  pub last_name:   Option<String>,
  pub gender:      Option<String>,
  /// Opaque reference to an avatar resource; never dereferenced here.
  pub avatar:      Option<String>,
  /// `true` when the person was created from a fact reference and has no
  /// profile of their own yet.
  pub placeholder: bool,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::ProfileStore::add_person`].
/// `person_id` and `created_at` are always set by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPerson {
  pub first_name: Option<String>,
  pub last_name:  Option<String>,
  pub gender:     Option<String>,
  pub avatar:     Option<String>,
}
