//! Handlers for `/words` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/words` | `?word=&language=&partOfSpeech=&thematicGroup=`; becomes the active filter |
//! | `GET`    | `/words/current` | cached working set, reloaded if stale |
//! | `POST`   | `/words` | body: [`WordFields`] |
//! | `DELETE` | `/words` | archive everything |
//! | `POST`   | `/words/delete` | body: `{"ids":[1,2]}` |
//! | `POST`   | `/words/sort` | body: `[{"field":"word","direction":"asc"}]`; unknown field is 400 |
//! | `GET`    | `/words/{id}` | 404 if not found |
//! | `PUT`    | `/words/{id}` | body: [`WordFields`]; a missing id affects 0 rows |
//! | `DELETE` | `/words/{id}` | archive one |

use std::collections::BTreeSet;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use wordhoard_core::{
  query::{SortDirection, SortSpec, WordFilter},
  store::WordStore,
  word::{WordFields, WordId, WordRecord},
};

use crate::{SharedSession, error::ApiError};

/// Response body for mutations that report a row count.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowCount {
  pub rows_affected: usize,
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /words[?word=..][&language=..][&partOfSpeech=..][&thematicGroup=..]`
pub async fn list<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Query(filter): Query<WordFilter>,
) -> Result<Json<Vec<WordRecord>>, ApiError> {
  let mut session = session.lock().await;
  let words = session.fetch(filter).await.map_err(ApiError::from_store)?;
  Ok(Json(words.to_vec()))
}

/// `GET /words/current`
pub async fn current<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Result<Json<Vec<WordRecord>>, ApiError> {
  let mut session = session.lock().await;
  let words = session.working_set().await.map_err(ApiError::from_store)?;
  Ok(Json(words.to_vec()))
}

/// `GET /words/{id}`
pub async fn get_one<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Path(id): Path<WordId>,
) -> Result<Json<WordRecord>, ApiError> {
  let mut session = session.lock().await;
  let word = session.select(id).await.map_err(ApiError::from_store)?;
  Ok(Json(word.clone()))
}

/// One entry of a `/words/sort` body. `field` is a column name.
#[derive(Debug, Deserialize)]
pub struct SortKeyBody {
  pub field:     String,
  #[serde(default)]
  pub direction: SortDirection,
}

/// `POST /words/sort`
pub async fn sort<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Json(keys): Json<Vec<SortKeyBody>>,
) -> Result<Json<Vec<WordRecord>>, ApiError> {
  let spec = SortSpec::parse(keys.iter().map(|k| (k.field.as_str(), k.direction)))
    .map_err(ApiError::from_store)?;
  let mut session = session.lock().await;
  session.sort(spec);
  Ok(Json(session.words().to_vec()))
}

// ─── Writes ───────────────────────────────────────────────────────────────────

/// `POST /words`
pub async fn create<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Json(fields): Json<WordFields>,
) -> Result<impl IntoResponse, ApiError> {
  let mut session = session.lock().await;
  let word = session.create(fields).await.map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(word)))
}

/// `PUT /words/{id}`
pub async fn update<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Path(id): Path<WordId>,
  Json(fields): Json<WordFields>,
) -> Result<Json<RowCount>, ApiError> {
  let mut session = session.lock().await;
  let rows_affected = session.update(id, fields).await.map_err(ApiError::from_store)?;
  Ok(Json(RowCount { rows_affected }))
}

/// `DELETE /words/{id}`
pub async fn delete_one<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Path(id): Path<WordId>,
) -> Result<Json<RowCount>, ApiError> {
  let mut session = session.lock().await;
  let rows_affected = session.delete_one(id).await.map_err(ApiError::from_store)?;
  Ok(Json(RowCount { rows_affected }))
}

#[derive(Debug, Deserialize)]
pub struct DeleteManyBody {
  pub ids: BTreeSet<WordId>,
}

/// `POST /words/delete`, body: `{"ids":[1,2,3]}`
pub async fn delete_many<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Json(body): Json<DeleteManyBody>,
) -> Result<Json<RowCount>, ApiError> {
  let mut session = session.lock().await;
  let rows_affected = session
    .delete_many(body.ids)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(RowCount { rows_affected }))
}

/// `DELETE /words`
pub async fn delete_all<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Result<Json<RowCount>, ApiError> {
  let mut session = session.lock().await;
  let rows_affected = session.delete_all().await.map_err(ApiError::from_store)?;
  Ok(Json(RowCount { rows_affected }))
}
