//! [`WordSession`]: the in-memory working set in front of a [`WordStore`].
//!
//! The session is a snapshot: it is only guaranteed consistent with the store
//! immediately after a successful fetch. Mutations go straight to the store
//! and mark the snapshot stale; nothing is kept live-synchronised.
//!
//! A session has a single logical owner. Share it behind a mutex if several
//! tasks need it; it adds no locking of its own.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
  query::{SortSpec, WordFilter, sort_words},
  store::WordStore,
  word::{WordFields, WordId, WordRecord},
};

/// Serialisable view of the session's flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionFlags {
  pub should_refetch: bool,
  pub is_loading:     bool,
  pub is_sorted:      bool,
  pub is_error:       bool,
  pub word_count:     usize,
  pub selected_id:    Option<WordId>,
}

/// Working set, selection and UI-relevant flags for one consumer context.
pub struct WordSession<S: WordStore> {
  store:          S,
  words:          Vec<WordRecord>,
  filter:         WordFilter,
  sort:           SortSpec,
  selected:       Option<WordRecord>,
  should_refetch: bool,
  is_loading:     bool,
  is_sorted:      bool,
  is_error:       bool,
}

impl<S: WordStore> WordSession<S> {
  /// A fresh session starts stale and loading, with nothing cached.
  pub fn new(store: S) -> Self {
    Self {
      store,
      words: Vec::new(),
      filter: WordFilter::default(),
      sort: SortSpec::new(),
      selected: None,
      should_refetch: true,
      is_loading: true,
      is_sorted: false,
      is_error: false,
    }
  }

  pub fn store(&self) -> &S { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Replace the active filter and reload the working set through it.
  pub async fn fetch(&mut self, filter: WordFilter) -> Result<&[WordRecord], S::Error> {
    self.filter = filter;
    self.refresh().await
  }

  /// Reload the working set through the active filter.
  ///
  /// On success the new rows replace the cache (re-sorted if a sort is
  /// active) and the error flag clears. On failure the previous rows are kept
  /// and the error flag is set. Either way the session is no longer stale or
  /// loading.
  pub async fn refresh(&mut self) -> Result<&[WordRecord], S::Error> {
    let result = self.store.fetch_all(self.filter.clone()).await;
    self.should_refetch = false;
    self.is_loading = false;

    match result {
      Ok(mut words) => {
        if self.is_sorted {
          sort_words(&mut words, &self.sort);
        }
        debug!(count = words.len(), sorted = self.is_sorted, "working set refreshed");
        self.words = words;
        self.is_error = false;
        Ok(&self.words)
      }
      Err(e) => {
        warn!(error = %e, "refresh failed; keeping previous working set");
        self.is_error = true;
        Err(e)
      }
    }
  }

  /// The working set, reloaded first if the session is stale.
  pub async fn working_set(&mut self) -> Result<&[WordRecord], S::Error> {
    if self.should_refetch {
      self.refresh().await?;
    }
    Ok(&self.words)
  }

  /// Load one record into the selection slot.
  ///
  /// A failure, including `NotFound`, sets the error flag and leaves the
  /// previous selection in place.
  pub async fn select(&mut self, id: WordId) -> Result<&WordRecord, S::Error> {
    match self.store.fetch_one(id).await {
      Ok(record) => {
        self.is_error = false;
        Ok(&*self.selected.insert(record))
      }
      Err(e) => {
        warn!(id, error = %e, "could not load word");
        self.is_error = true;
        Err(e)
      }
    }
  }

  /// Sort the cached working set in place.
  ///
  /// An inactive spec does not reorder anything: it clears the sorted flag and
  /// marks the session stale so the next read restores store order.
  pub fn sort(&mut self, spec: SortSpec) {
    if spec.is_active() {
      sort_words(&mut self.words, &spec);
      self.is_sorted = true;
    } else {
      self.is_sorted = false;
      self.should_refetch = true;
    }
    self.sort = spec;
  }

  // ── Writes ────────────────────────────────────────────────────────────

  pub async fn create(&mut self, fields: WordFields) -> Result<WordRecord, S::Error> {
    let record = self.store.create(fields).await?;
    info!(id = record.id, "word created");
    self.should_refetch = true;
    Ok(record)
  }

  /// Returns the store's affected-row count; `0` for a missing id.
  pub async fn update(&mut self, id: WordId, fields: WordFields) -> Result<usize, S::Error> {
    let affected = self.store.update(id, fields.clone()).await?;
    info!(id, affected, "word updated");
    if affected > 0
      && let Some(selected) = self.selected.as_mut().filter(|s| s.id == id)
    {
      selected.fields = fields;
    }
    self.should_refetch = true;
    Ok(affected)
  }

  pub async fn delete_one(&mut self, id: WordId) -> Result<usize, S::Error> {
    let archived = self.store.delete_one(id).await?;
    info!(id, archived, "word archived");
    self.forget(|w| w == id);
    Ok(archived)
  }

  pub async fn delete_many(&mut self, ids: BTreeSet<WordId>) -> Result<usize, S::Error> {
    let archived = self.store.delete_many(ids.clone()).await?;
    info!(requested = ids.len(), archived, "words archived");
    self.forget(|w| ids.contains(&w));
    Ok(archived)
  }

  pub async fn delete_all(&mut self) -> Result<usize, S::Error> {
    let archived = self.store.delete_all().await?;
    info!(archived, "all words archived");
    self.forget(|_| true);
    Ok(archived)
  }

  /// Drop deleted records from the cache and selection, and mark stale.
  fn forget(&mut self, gone: impl Fn(WordId) -> bool) {
    self.words.retain(|w| !gone(w.id));
    if self.selected.as_ref().is_some_and(|s| gone(s.id)) {
      self.selected = None;
    }
    self.should_refetch = true;
  }

  // ── Flags ─────────────────────────────────────────────────────────────

  pub fn trigger_refetch(&mut self) { self.should_refetch = true; }

  pub fn trigger_loading(&mut self) { self.is_loading = true; }

  pub fn reset_loading(&mut self) { self.is_loading = false; }

  pub fn words(&self) -> &[WordRecord] { &self.words }

  pub fn filter(&self) -> &WordFilter { &self.filter }

  pub fn sort_spec(&self) -> &SortSpec { &self.sort }

  pub fn selected(&self) -> Option<&WordRecord> { self.selected.as_ref() }

  pub fn should_refetch(&self) -> bool { self.should_refetch }

  pub fn is_loading(&self) -> bool { self.is_loading }

  pub fn is_sorted(&self) -> bool { self.is_sorted }

  pub fn is_error(&self) -> bool { self.is_error }

  pub fn flags(&self) -> SessionFlags {
    SessionFlags {
      should_refetch: self.should_refetch,
      is_loading:     self.is_loading,
      is_sorted:      self.is_sorted,
      is_error:       self.is_error,
      word_count:     self.words.len(),
      selected_id:    self.selected.as_ref().map(|s| s.id),
    }
  }
}
