//! Error types for `wordhoard-core`.

use thiserror::Error;

use crate::word::WordId;

/// The category of a failure, independent of which backend produced it.
///
/// Read-side consumers branch on this rather than on a concrete error type:
/// a `NotFound` renders differently from a broken disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  /// Underlying storage failed while reading.
  StoreRead,
  /// Underlying storage failed while writing, including constraint failures.
  StoreWrite,
  /// A record queried by id does not exist.
  NotFound,
  /// The request was rejected before any store access was attempted.
  Validation,
}

/// Implemented by every backend error type so callers can recover the
/// [`ErrorKind`] without downcasting.
pub trait Classify {
  fn kind(&self) -> ErrorKind;
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("word not found: {0}")]
  NotFound(WordId),

  #[error("no word ids given")]
  EmptyIdSet,

  #[error("unknown sort field: {0:?}")]
  UnknownSortField(String),

  #[error("date range start must precede its end")]
  InvalidDateRange,
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::NotFound(_) => ErrorKind::NotFound,
      Error::EmptyIdSet | Error::UnknownSortField(_) | Error::InvalidDateRange => {
        ErrorKind::Validation
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
