//! JSON REST API for Kindred.
//!
//! Exposes an axum [`Router`] backed by any store implementing the
//! [`kindred_core::store`] traits, via a [`kindred_engine::Engine`]. Auth,
//! TLS, and transport concerns are the caller's responsibility — person
//! identifiers arrive already authenticated and validated.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kindred_api::api_router(engine))
//! ```

pub mod ancestry;
pub mod error;
pub mod facts;
pub mod matches;
pub mod people;
pub mod preferences;
pub mod relationship;
pub mod requests;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post, put},
};
use kindred_core::store::{
  AncestorCacheStore, ConnectionRequestStore, PreferenceStore, ProfileStore,
  RelationshipFactStore,
};
use kindred_engine::Engine;
use serde::Deserialize;

pub use error::ApiError;

// ─── Backing store ────────────────────────────────────────────────────────────

/// Union of every store trait the API surface needs. Implemented
/// automatically for any type satisfying the bounds (e.g.
/// `kindred_store_sqlite::SqliteStore`).
pub trait BackingStore:
  ProfileStore
  + RelationshipFactStore
  + AncestorCacheStore
  + PreferenceStore
  + ConnectionRequestStore
  + Clone
  + Send
  + Sync
  + 'static
{
}

impl<T> BackingStore for T where
  T: ProfileStore
    + RelationshipFactStore
    + AncestorCacheStore
    + PreferenceStore
    + ConnectionRequestStore
    + Clone
    + Send
    + Sync
    + 'static
{
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// BFS hop bound for relationship path queries.
  #[serde(default = "default_path_depth")]
  pub path_depth: u32,
  /// Parent-hop bound for ancestor enumeration and matching.
  #[serde(default = "default_ancestor_depth")]
  pub ancestor_depth: u32,
}

fn default_path_depth() -> u32 {
  kindred_graph::DEFAULT_MAX_PATH_DEPTH
}

fn default_ancestor_depth() -> u32 {
  kindred_graph::DEFAULT_MAX_ANCESTOR_DEPTH
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `engine`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S: BackingStore>(engine: Arc<Engine<S>>) -> Router<()> {
  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route("/people/{id}", get(people::get_one::<S>))
    .route("/people/{id}/preferences", put(preferences::set::<S>))
    // Relationship facts
    .route("/facts", get(facts::list::<S>).post(facts::create::<S>))
    // Pairwise relationship reports
    .route("/relationship", get(relationship::handler::<S>))
    // Ancestor cache
    .route("/people/{id}/ancestors", get(ancestry::list::<S>))
    .route("/people/{id}/ancestors/refresh", post(ancestry::refresh::<S>))
    // Shared-ancestor matching
    .route("/people/{id}/matches", get(matches::handler::<S>))
    // Connection requests
    .route(
      "/requests",
      get(requests::list::<S>).post(requests::create::<S>),
    )
    .route("/requests/{id}/respond", post(requests::respond::<S>))
    .route("/requests/pending/count", get(requests::pending_count::<S>))
    .with_state(engine)
}
