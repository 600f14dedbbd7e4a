//! Handlers for `/people` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/people` | All known people, placeholders included |
//! | `POST` | `/people` | Body: [`kindred_core::person::NewPerson`] |
//! | `GET`  | `/people/:id` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use kindred_core::person::{NewPerson, Person};
use kindred_engine::Engine;
use uuid::Uuid;

use crate::{BackingStore, error::ApiError};

/// `GET /people`
pub async fn list<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
) -> Result<Json<Vec<Person>>, ApiError> {
  let people = engine.store().list_people().await.map_err(ApiError::store)?;
  Ok(Json(people))
}

/// `POST /people` — returns 201 + the stored person.
pub async fn create<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError> {
  let person = engine
    .store()
    .add_person(body)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /people/:id`
pub async fn get_one<S: BackingStore>(
  State(engine): State<Arc<Engine<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
  let person = engine
    .store()
    .get_person(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}
