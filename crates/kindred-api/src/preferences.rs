//! Handler for `PUT /people/:id/preferences`.
//!
//! Matching is default-deny: until this endpoint records an explicit
//! opt-in, the person is excluded from everyone else's match results.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use kindred_core::matching::MatchPreference;
use kindred_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct Body {
  pub matching_opt_in: bool,
}

/// `PUT /people/:id/preferences` — body: `{"matching_opt_in": true}`
pub async fn set<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<Body>,
) -> Result<Json<MatchPreference>, ApiError> {
  let preference = engine
    .store()
    .set_matching_opt_in(id, body.matching_opt_in)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(preference))
}
