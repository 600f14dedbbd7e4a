//! Handler for `GET /relationship` — the pairwise kinship query.
//!
//! "No relationship known" is a valid 200 response with `related: false`,
//! never a 404: callers must be able to distinguish an empty outcome from a
//! failed lookup.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use kindred_engine::{Engine, RelationshipReport};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct Params {
  pub from:      Uuid,
  pub to:        Uuid,
  /// BFS hop bound; defaults to the server-configured path depth.
  pub max_depth: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RelationshipResponse {
  pub related: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub report:  Option<RelationshipReport>,
}

/// `GET /relationship?from=<id>&to=<id>[&max_depth=<n>]`
pub async fn handler<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<Params>,
) -> Result<Json<RelationshipResponse>, ApiError> {
  let report = engine
    .relationship_between(params.from, params.to, params.max_depth)
    .await?;

  Ok(Json(RelationshipResponse { related: report.is_some(), report }))
}
