//! Store trait seams — one trait per external collaborator.
//!
//! The engine consumes a profile store, a relationship-fact store, an
//! ancestor cache, a privacy-preference store, and a connection-request
//! store. A backend (e.g. `kindred-store-sqlite`) typically implements all
//! five on one type; higher layers depend only on these abstractions.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use uuid::Uuid;

use chrono::{DateTime, Utc};

use crate::{
  ancestry::{AncestorRecord, CachedAncestor, SharedAncestorRow},
  fact::{NewRelationshipFact, ParentPair, RelationshipFact},
  matching::MatchPreference,
  person::{NewPerson, Person},
  request::{ConnectionRequest, RequestStatus},
};

// ─── Profiles ────────────────────────────────────────────────────────────────

/// Abstraction over the person-profile store.
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Create and persist a new person with the given display attributes.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by id. Returns `None` if not found.
  fn get_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// List every known person, placeholders included.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Guarantee a row exists for `id`, creating a placeholder if needed.
  ///
  /// Used for people referenced only as a fact object, so traversal never
  /// fails on a partially-onboarded relative. Returns the existing person
  /// unchanged when one is already present.
  fn ensure_person(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Every known person id.
  fn person_ids(
    &self,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}

// ─── Relationship facts ──────────────────────────────────────────────────────

/// Abstraction over the relationship-fact store.
///
/// Facts are append-only; each is a single directed claim whose inverse is
/// materialised by the graph builder at read time, never stored.
pub trait RelationshipFactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Record a new fact. `fact_id` and `recorded_at` are set by the store.
  fn record_fact(
    &self,
    input: NewRelationshipFact,
  ) -> impl Future<Output = Result<RelationshipFact, Self::Error>> + Send + '_;

  /// All facts naming `person` as subject or object.
  fn facts_for(
    &self,
    person: Uuid,
  ) -> impl Future<Output = Result<Vec<RelationshipFact>, Self::Error>> + Send + '_;

  /// The entire fact list, for whole-population graph builds.
  fn all_facts(
    &self,
  ) -> impl Future<Output = Result<Vec<RelationshipFact>, Self::Error>> + Send + '_;

  /// Every `(child, parent)` hop derivable from parent/child-typed facts,
  /// both orientations normalised. This is the ancestor enumerator's input.
  fn parent_pairs(
    &self,
  ) -> impl Future<Output = Result<Vec<ParentPair>, Self::Error>> + Send + '_;

  /// Ids of every person connected to `person` by any fact, in either
  /// direction.
  fn connected_ids(
    &self,
    person: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}

// ─── Ancestor cache ──────────────────────────────────────────────────────────

/// Abstraction over the derived ancestor cache.
///
/// Rows are upserted idempotently keyed by `(person_id, ancestor_id)` and
/// must always be fully re-derivable from the fact store.
pub trait AncestorCacheStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Replace every cache row for `person` with `records`
  /// (delete-then-insert, not incremental patching). Returns the number of
  /// rows written.
  fn replace_ancestors(
    &self,
    person: Uuid,
    records: Vec<AncestorRecord>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Cached ancestor rows for `person` at depth ≤ `max_depth`, shallowest
  /// first. An empty result is a cache miss as far as callers can tell.
  fn ancestors_of(
    &self,
    person: Uuid,
    max_depth: u32,
  ) -> impl Future<Output = Result<Vec<CachedAncestor>, Self::Error>> + Send + '_;

  /// Population-wide cross-reference: every row whose ancestor is in
  /// `ancestor_ids` at depth ≤ `max_depth`, excluding rows for `exclude`
  /// (the subject themselves).
  fn find_shared(
    &self,
    ancestor_ids: Vec<Uuid>,
    max_depth: u32,
    exclude: Uuid,
  ) -> impl Future<Output = Result<Vec<SharedAncestorRow>, Self::Error>> + Send + '_;
}

// ─── Matching preferences ────────────────────────────────────────────────────

/// Abstraction over the per-person privacy preference store.
///
/// Absence of a record means *opted out*: matching is default-deny.
pub trait PreferenceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Set (upsert) the matching opt-in flag for `person`.
  fn set_matching_opt_in(
    &self,
    person: Uuid,
    opt_in: bool,
  ) -> impl Future<Output = Result<MatchPreference, Self::Error>> + Send + '_;

  /// The opt-in flag for `person`; `false` when no record exists.
  fn matching_opt_in(
    &self,
    person: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The subset of `ids` with an explicit opt-in record.
  fn opted_in_subset(
    &self,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;
}

// ─── Connection requests ─────────────────────────────────────────────────────

/// Abstraction over the connection-request store.
///
/// The store persists requests mechanically; the state machine (pair
/// uniqueness, terminal-state rejection) is enforced by the workflow in
/// `kindred-engine`.
pub trait ConnectionRequestStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a fully-built request.
  fn insert_request(
    &self,
    request: ConnectionRequest,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Retrieve a request by id. Returns `None` if not found.
  fn get_request(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<ConnectionRequest>, Self::Error>> + Send + '_;

  /// Overwrite the status and response timestamp of an existing request.
  fn update_request_status(
    &self,
    id: Uuid,
    status: RequestStatus,
    responded_at: DateTime<Utc>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Every request naming `person` on either side, newest first.
  fn list_requests_for(
    &self,
    person: Uuid,
  ) -> impl Future<Output = Result<Vec<ConnectionRequest>, Self::Error>> + Send + '_;

  /// The active (pending or accepted) request between `a` and `b` in either
  /// direction, if one exists.
  fn active_between(
    &self,
    a: Uuid,
    b: Uuid,
  ) -> impl Future<Output = Result<Option<ConnectionRequest>, Self::Error>> + Send + '_;

  /// Number of pending requests addressed to `person`.
  fn count_pending(
    &self,
    person: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}
