//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps written by the schema defaults use SQLite's
//! `YYYY-MM-DD HH:MM:SS` UTC form. Databases edited by other tools may hold
//! RFC 3339 strings instead; both decode.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use wordhoard_core::word::{ArchivedWordRecord, WordFields, WordId, WordRecord};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const SQLITE_DATETIME: &str = "%Y-%m-%d %H:%M:%S";
const SQLITE_DATE: &str = "%Y-%m-%d";

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.format(SQLITE_DATETIME).to_string() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
    return Ok(naive.and_utc());
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn encode_date(d: NaiveDate) -> String { d.format(SQLITE_DATE).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, SQLITE_DATE).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Wrap `needle` for `LIKE ? ESCAPE '\'` so that `%` and `_` match literally.
pub fn contains_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `words` or `words_archive` row.
///
/// Text columns are nullable in the schema; `NULL` decodes to `""`.
pub struct RawWord {
  pub id:             WordId,
  pub word:           Option<String>,
  pub pronunciation:  Option<String>,
  pub language:       Option<String>,
  pub plural:         Option<String>,
  pub part_of_speech: Option<String>,
  pub thematic_group: Option<String>,
  pub meaning:        Option<String>,
  pub etymology:      Option<String>,
  pub date_added:     Option<String>,
}

impl RawWord {
  /// Read the shared columns, which must come first and in
  /// [`WORD_COLUMNS`](crate::schema::WORD_COLUMNS) order.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawWord {
      id:             row.get(0)?,
      word:           row.get(1)?,
      pronunciation:  row.get(2)?,
      language:       row.get(3)?,
      plural:         row.get(4)?,
      part_of_speech: row.get(5)?,
      thematic_group: row.get(6)?,
      meaning:        row.get(7)?,
      etymology:      row.get(8)?,
      date_added:     row.get(9)?,
    })
  }

  pub fn into_record(self) -> Result<WordRecord> {
    let date_added = self
      .date_added
      .as_deref()
      .ok_or_else(|| Error::DateParse(format!("word {} has no dateAdded", self.id)))
      .and_then(decode_dt)?;

    Ok(WordRecord {
      id: self.id,
      fields: WordFields {
        word:           self.word.unwrap_or_default(),
        pronunciation:  self.pronunciation.unwrap_or_default(),
        language:       self.language.unwrap_or_default(),
        plural:         self.plural.unwrap_or_default(),
        part_of_speech: self.part_of_speech.unwrap_or_default(),
        thematic_group: self.thematic_group.unwrap_or_default(),
        meaning:        self.meaning.unwrap_or_default(),
        etymology:      self.etymology.unwrap_or_default(),
      },
      date_added,
    })
  }
}

/// A `words_archive` row: the shared columns plus `dateArchived`.
pub struct RawArchivedWord {
  pub word:          RawWord,
  pub date_archived: Option<String>,
}

impl RawArchivedWord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawArchivedWord { word: RawWord::from_row(row)?, date_archived: row.get(10)? })
  }

  pub fn into_archived(self) -> Result<ArchivedWordRecord> {
    let id = self.word.id;
    let date_archived = self
      .date_archived
      .as_deref()
      .ok_or_else(|| Error::DateParse(format!("archived word {id} has no dateArchived")))
      .and_then(decode_dt)?;
    Ok(ArchivedWordRecord { record: self.word.into_record()?, date_archived })
  }
}
