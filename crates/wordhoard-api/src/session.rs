//! Handlers for `/session` endpoints: the caller-driven flags.

use axum::{Json, extract::State};
use wordhoard_core::{session::SessionFlags, store::WordStore};

use crate::SharedSession;

/// `GET /session`
pub async fn flags<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Json<SessionFlags> {
  Json(session.lock().await.flags())
}

/// `POST /session/loading`
pub async fn trigger_loading<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Json<SessionFlags> {
  let mut session = session.lock().await;
  session.trigger_loading();
  Json(session.flags())
}

/// `DELETE /session/loading`
pub async fn reset_loading<S: WordStore + 'static>(
  State(session): State<SharedSession<S>>,
) -> Json<SessionFlags> {
  let mut session = session.lock().await;
  session.reset_loading();
  Json(session.flags())
}
