//! Error type for `wordhoard-store-sqlite`.

use thiserror::Error;
use wordhoard_core::{Classify, ErrorKind, word::WordId};

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] wordhoard_core::Error),

  #[error("could not open database: {0}")]
  Open(#[source] tokio_rusqlite::Error),

  #[error("database read failed: {0}")]
  Read(#[source] tokio_rusqlite::Error),

  #[error("database write failed: {0}")]
  Write(#[source] tokio_rusqlite::Error),

  #[error("word not found: {0}")]
  NotFound(WordId),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

impl Classify for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Open(_) | Error::Read(_) | Error::DateParse(_) => ErrorKind::StoreRead,
      Error::Write(_) => ErrorKind::StoreWrite,
      Error::NotFound(_) => ErrorKind::NotFound,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
