//! Handlers for `/people/:id/ancestors` endpoints — the two-tier cache.
//!
//! `GET` is the fast tier (cache rows, compute-and-populate on miss, may be
//! momentarily stale); `POST …/refresh` is the deterministic tier
//! (recompute, replace, await).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use kindred_core::ancestry::CachedAncestor;
use kindred_engine::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct Params {
  /// Parent-hop bound; defaults to the server-configured ancestor depth.
  pub max_depth: Option<u32>,
}

/// `GET /people/:id/ancestors[?max_depth=<n>]`
pub async fn list<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<Params>,
) -> Result<Json<Vec<CachedAncestor>>, ApiError> {
  let rows = engine.cached_ancestors(id, params.max_depth).await?;
  Ok(Json(rows))
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
  pub count: usize,
}

/// `POST /people/:id/ancestors/refresh[?max_depth=<n>]`
pub async fn refresh<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<Params>,
) -> Result<Json<RefreshResponse>, ApiError> {
  let count = engine.refresh_ancestors(id, params.max_depth).await?;
  Ok(Json(RefreshResponse { count }))
}
