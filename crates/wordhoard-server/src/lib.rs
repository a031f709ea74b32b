//! Server assembly for the `wordhoard` binary: configuration, the top-level
//! router, and the offline export commands.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use serde::Deserialize;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;
use wordhoard_core::{
  export::to_csv,
  query::WordFilter,
  session::WordSession,
  store::WordStore,
};
use wordhoard_store_sqlite::SqliteStore;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `wordhoard.toml` and
/// `WORDHOARD_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:       "127.0.0.1".to_string(),
      port:       5233,
      store_path: PathBuf::from("words.db"),
    }
  }
}

impl ServerConfig {
  /// Layer the file at `path` (if it exists) under the environment.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("WORDHOARD"))
      .build()
      .context("failed to read config file")?;

    settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// Open the configured store, expanding a leading `~/`.
  pub async fn open_store(&self) -> anyhow::Result<SqliteStore> {
    let store_path = expand_tilde(&self.store_path);
    SqliteStore::open(&store_path)
      .await
      .with_context(|| format!("failed to open store at {store_path:?}"))
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// The full HTTP application: the JSON API under `/api`, with request tracing.
pub fn app<S: WordStore + 'static>(store: S) -> Router {
  let session = Arc::new(Mutex::new(WordSession::new(store)));
  Router::new()
    .nest("/api", wordhoard_api::api_router(session))
    .layer(TraceLayer::new_for_http())
}

// ─── Export ───────────────────────────────────────────────────────────────────

/// Write the whole live table to `out` as CSV. Returns the number of rows.
pub async fn export_csv<S: WordStore>(store: &S, out: &Path) -> anyhow::Result<usize> {
  let words = store
    .fetch_all(WordFilter::default())
    .await
    .context("failed to read words")?;
  tokio::fs::write(out, to_csv(&words))
    .await
    .with_context(|| format!("failed to write {out:?}"))?;
  info!(rows = words.len(), out = %out.display(), "exported csv");
  Ok(words.len())
}

/// Write a standalone copy of the database file to `out`.
pub async fn export_db(store: &SqliteStore, out: &Path) -> anyhow::Result<()> {
  if out.exists() {
    anyhow::bail!("{out:?} already exists");
  }
  store
    .backup_to(out)
    .await
    .with_context(|| format!("failed to copy database to {out:?}"))?;
  info!(out = %out.display(), "exported database");
  Ok(())
}
