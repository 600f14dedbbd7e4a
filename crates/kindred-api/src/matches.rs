//! Handler for `GET /people/:id/matches` — shared-ancestor relative
//! discovery.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use kindred_core::matching::MatchCandidate;
use kindred_engine::{Engine, MatchQuery};
use serde::Deserialize;
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct Params {
  pub max_depth: Option<u32>,
  pub limit:     Option<usize>,
}

/// `GET /people/:id/matches[?max_depth=<n>][&limit=<n>]`
///
/// An empty list is a valid outcome — no candidates, not a failure.
pub async fn handler<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
  Query(params): Query<Params>,
) -> Result<Json<Vec<MatchCandidate>>, ApiError> {
  let defaults = MatchQuery::default();
  let query = MatchQuery {
    max_depth: params.max_depth.unwrap_or(defaults.max_depth),
    limit:     params.limit.unwrap_or(defaults.limit),
  };

  let candidates = engine.find_potential_relatives(id, query).await?;
  Ok(Json(candidates))
}
