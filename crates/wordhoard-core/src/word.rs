//! Word records: the canonical entity of the catalog.
//!
//! A record is either live (in `words`) or archived (in `words_archive`),
//! never both. Archived records keep their original id and `date_added`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Store-assigned identity of a live record.
pub type WordId = i64;

/// The caller-editable attributes of a word.
///
/// Every attribute is plain text. An absent value is the empty string; SQL
/// `NULL` decodes to `""` as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WordFields {
  /// The headword. May be empty, but is the primary display key.
  pub word:           String,
  pub pronunciation:  String,
  pub language:       String,
  pub plural:         String,
  pub part_of_speech: String,
  pub thematic_group: String,
  pub meaning:        String,
  pub etymology:      String,
}

impl WordFields {
  /// Shorthand for a record that only has a headword.
  pub fn headword(word: impl Into<String>) -> Self {
    Self { word: word.into(), ..Self::default() }
  }
}

/// A live record: its fields plus the identity and creation time the store
/// assigned. Neither `id` nor `date_added` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
  pub id:         WordId,
  #[serde(flatten)]
  pub fields:     WordFields,
  pub date_added: DateTime<Utc>,
}

/// A soft-deleted record, stamped with the moment it left the live table.
///
/// Archived records are append-only: nothing in this workspace mutates or
/// removes them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchivedWordRecord {
  #[serde(flatten)]
  pub record:        WordRecord,
  pub date_archived: DateTime<Utc>,
}
