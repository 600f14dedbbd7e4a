//! Handlers for `/requests` endpoints — the connection-request workflow.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/requests` | Body: [`NewConnectionRequest`]; 409 if an active request exists |
//! | `POST` | `/requests/:id/respond` | Body: `{"decision": "accept"\|"decline"\|"cancel"}` |
//! | `GET`  | `/requests` | `?person_id` required; either side, newest first |
//! | `GET`  | `/requests/pending/count` | `?person_id` required |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::request::{
  ConnectionRequest, NewConnectionRequest, RequestDecision,
};
use kindred_engine::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct PersonParams {
  pub person_id: Uuid,
}

/// `POST /requests` — returns 201 + the pending request.
pub async fn create<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Json(body): Json<NewConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let request = engine.create_request(body).await?;
  Ok((StatusCode::CREATED, Json(request)))
}

#[derive(Debug, Deserialize)]
pub struct RespondBody {
  pub decision: RequestDecision,
}

/// `POST /requests/:id/respond`
pub async fn respond<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<RespondBody>,
) -> Result<Json<ConnectionRequest>, ApiError> {
  let request = engine.respond_to_request(id, body.decision).await?;
  Ok(Json(request))
}

/// `GET /requests?person_id=<id>`
pub async fn list<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<PersonParams>,
) -> Result<Json<Vec<ConnectionRequest>>, ApiError> {
  let requests = engine.list_requests(params.person_id).await?;
  Ok(Json(requests))
}

#[derive(Debug, Serialize)]
pub struct PendingCountResponse {
  pub count: usize,
}

/// `GET /requests/pending/count?person_id=<id>`
pub async fn pending_count<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Query(params): Query<PersonParams>,
) -> Result<Json<PendingCountResponse>, ApiError> {
  let count = engine.count_pending(params.person_id).await?;
  Ok(Json(PendingCountResponse { count }))
}
