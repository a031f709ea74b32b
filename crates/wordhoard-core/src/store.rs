//! The `WordStore` trait: the record repository contract.
//!
//! The trait is implemented by storage backends (e.g. `wordhoard-store-sqlite`).
//! Higher layers ([`WordSession`](crate::session::WordSession),
//! `wordhoard-api`) depend on this abstraction, not on any concrete backend.

use std::{collections::BTreeSet, future::Future};

use chrono::NaiveDate;

use crate::{
  Classify,
  query::WordFilter,
  stats::{DailyCount, DateRange, Totals},
  word::{ArchivedWordRecord, WordFields, WordId, WordRecord},
};

/// Abstraction over a word catalog backend.
///
/// Every method is one atomic unit against the store. Deletes never destroy
/// data: each delete path copies the affected rows into the archive, stamped
/// with the deletion time, and removes them from the live table in the same
/// transaction. A failed call leaves the live table exactly as it was.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WordStore: Send + Sync {
  type Error: std::error::Error + Classify + From<crate::Error> + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a new record. The store assigns `id` and `date_added`; no field
  /// is required to be non-empty.
  fn create(
    &self,
    fields: WordFields,
  ) -> impl Future<Output = Result<WordRecord, Self::Error>> + Send + '_;

  /// Replace every mutable field of the live record `id`.
  ///
  /// Returns the number of rows affected. A missing `id` affects zero rows
  /// and is still a success; callers must not rely on this to validate
  /// existence.
  fn update(
    &self,
    id: WordId,
    fields: WordFields,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Archive and remove the record `id`. Returns the number of rows
  /// archived, `0` when `id` is not live.
  fn delete_one(
    &self,
    id: WordId,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Archive and remove every live record whose id is in `ids`.
  ///
  /// An empty set is rejected with a validation error before the store is
  /// touched.
  fn delete_many(
    &self,
    ids: BTreeSet<WordId>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Archive and remove every live record.
  fn delete_all(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All live records matching `filter`, in id order. No match is an empty
  /// vector, not an error.
  fn fetch_all(
    &self,
    filter: WordFilter,
  ) -> impl Future<Output = Result<Vec<WordRecord>, Self::Error>> + Send + '_;

  /// The live record `id`, or a `NotFound` error.
  fn fetch_one(
    &self,
    id: WordId,
  ) -> impl Future<Output = Result<WordRecord, Self::Error>> + Send + '_;

  /// Every archived record, oldest archival first.
  fn fetch_archive(
    &self,
  ) -> impl Future<Output = Result<Vec<ArchivedWordRecord>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Count records, live and archived alike, whose `date_added` falls in
  /// `range`.
  fn count_added(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Per-day counts of records added between `first` and `last` inclusive,
  /// live and archived alike. Days with no additions are present with a
  /// count of zero.
  fn daily_counts(
    &self,
    first: NaiveDate,
    last: NaiveDate,
  ) -> impl Future<Output = Result<Vec<DailyCount>, Self::Error>> + Send + '_;

  /// Row counts of the live and archive tables.
  fn totals(&self) -> impl Future<Output = Result<Totals, Self::Error>> + Send + '_;
}
