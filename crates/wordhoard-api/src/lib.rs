//! JSON REST API for Wordhoard.
//!
//! Exposes an axum [`Router`] over a single [`WordSession`] shared behind a
//! mutex, backed by any [`wordhoard_core::store::WordStore`]. Auth, TLS, and
//! transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let session = Arc::new(Mutex::new(WordSession::new(store)));
//! .nest("/api", wordhoard_api::api_router(session))
//! ```

pub mod error;
pub mod reports;
pub mod session;
pub mod words;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use tokio::sync::Mutex;
use wordhoard_core::{session::WordSession, store::WordStore};

pub use error::ApiError;

/// The session every handler works through.
pub type SharedSession<S> = Arc<Mutex<WordSession<S>>>;

/// Build a fully-materialised API router for `session`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(session: SharedSession<S>) -> Router<()>
where
  S: WordStore + 'static,
{
  Router::new()
    // Words
    .route(
      "/words",
      get(words::list::<S>)
        .post(words::create::<S>)
        .delete(words::delete_all::<S>),
    )
    .route("/words/current", get(words::current::<S>))
    .route("/words/delete", post(words::delete_many::<S>))
    .route("/words/sort", post(words::sort::<S>))
    .route(
      "/words/{id}",
      get(words::get_one::<S>)
        .put(words::update::<S>)
        .delete(words::delete_one::<S>),
    )
    // Session flags
    .route("/session", get(session::flags::<S>))
    .route(
      "/session/loading",
      post(session::trigger_loading::<S>).delete(session::reset_loading::<S>),
    )
    // Archive, statistics, export
    .route("/archive", get(reports::archive::<S>))
    .route("/stats/summary", get(reports::summary::<S>))
    .route("/stats/daily", get(reports::daily::<S>))
    .route("/export.csv", get(reports::export_csv::<S>))
    .with_state(session)
}

// ─── Integration tests ────────────────────────────────────────────────────────
