//! Read-only views over both tables: the archive, statistics and CSV export.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/archive` | every archived word |
//! | `GET`  | `/stats/summary` | [`Summary`] for today (UTC) |
//! | `GET`  | `/stats/daily` | `?days=N` ending today, default 7, at most [`MAX_DAILY_DAYS`] |
//! | `GET`  | `/export.csv` | the full live table |

use axum::{
  Json,
  extract::{Query, State},
  http::header,
  response::IntoResponse,
};
use chrono::{Days, Utc};
use serde::Deserialize;
use wordhoard_core::{
  export::to_csv,
  query::WordFilter,
  stats::{self, DailyCount, Summary},
  store::WordStore,
  word::ArchivedWordRecord,
};

use crate::{SharedSession, error::ApiError};

/// `GET /archive`
pub async fn archive<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Result<Json<Vec<ArchivedWordRecord>>, ApiError> {
  let session = session.lock().await;
  let archived = session
    .store()
    .fetch_archive()
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(archived))
}

/// `GET /stats/summary`
pub async fn summary<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Result<Json<Summary>, ApiError> {
  let session = session.lock().await;
  let today = Utc::now().date_naive();
  let summary = stats::summary(session.store(), today)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(summary))
}

/// Longest window `/stats/daily` serves, about ten years.
pub const MAX_DAILY_DAYS: u64 = 3660;

#[derive(Debug, Deserialize)]
pub struct DailyParams {
  pub days: Option<u64>,
}

/// `GET /stats/daily[?days=N]`
pub async fn daily<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
  Query(params): Query<DailyParams>,
) -> Result<Json<Vec<DailyCount>>, ApiError> {
  let days = params.days.unwrap_or(7);
  if !(1..=MAX_DAILY_DAYS).contains(&days) {
    return Err(ApiError::BadRequest(format!(
      "days must be between 1 and {MAX_DAILY_DAYS}, got {days}"
    )));
  }
  let last = Utc::now().date_naive();
  let first = last
    .checked_sub_days(Days::new(days - 1))
    .ok_or_else(|| ApiError::BadRequest(format!("{days} days reaches too far back")))?;

  let session = session.lock().await;
  let counts = session
    .store()
    .daily_counts(first, last)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(counts))
}

/// `GET /export.csv`
pub async fn export_csv<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Result<impl IntoResponse, ApiError> {
  let session = session.lock().await;
  let words = session
    .store()
    .fetch_all(WordFilter::default())
    .await
    .map_err(ApiError::from_store)?;
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
      (header::CONTENT_DISPOSITION, "attachment; filename=\"words.csv\""),
    ],
    to_csv(&words),
  ))
}
