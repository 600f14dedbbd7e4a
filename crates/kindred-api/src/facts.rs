//! Handlers for `/facts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/facts` | `?person_id` required; facts naming the person on either side |
//! | `POST` | `/facts` | Body: [`NewRelationshipFact`]; returns 201 + stored fact |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::fact::{NewRelationshipFact, RelationshipFact};
use kindred_engine::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Required: the person whose facts to return.
  pub person_id: Uuid,
}

/// `GET /facts?person_id=<id>`
pub async fn list<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<RelationshipFact>>, ApiError> {
  let facts = engine
    .store()
    .facts_for(params.person_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(facts))
}

/// `POST /facts` — body: `{"subject_id": …, "object_id": …, "relation": "parent"}`.
///
/// The stored fact is the single directed claim; its inverse is a graph-time
/// construct, never a second row.
pub async fn create<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Json(body): Json<NewRelationshipFact>,
) -> Result<impl IntoResponse, ApiError> {
  let fact = engine
    .store()
    .record_fact(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(fact)))
}
