//! CSV rendering of the live table.
//!
//! Every field is double-quoted and rows end in CRLF. The header row carries
//! the store's column names so a round trip through a spreadsheet lines up
//! with the schema.

use crate::word::WordRecord;

/// Column order of the export, identical to the `words` table.
pub const COLUMNS: [&str; 10] = [
  "id",
  "word",
  "pronunciation",
  "language",
  "plural",
  "partOfSpeech",
  "thematicGroup",
  "meaning",
  "etymology",
  "dateAdded",
];

/// Timestamp layout used for `dateAdded` (SQLite's `CURRENT_TIMESTAMP` form).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn push_row<'a>(out: &mut String, cells: impl IntoIterator<Item = &'a str>) {
  for (i, cell) in cells.into_iter().enumerate() {
    if i > 0 {
      out.push(',');
    }
    out.push('"');
    out.push_str(&cell.replace('"', "\"\""));
    out.push('"');
  }
  out.push_str("\r\n");
}

/// Render `records` as CSV, header first. An empty slice yields just the
/// header.
pub fn to_csv(records: &[WordRecord]) -> String {
  let mut out = String::new();
  push_row(&mut out, COLUMNS);

  for r in records {
    let id = r.id.to_string();
    let date = r.date_added.format(DATE_FORMAT).to_string();
    let f = &r.fields;
    push_row(&mut out, [
      id.as_str(),
      f.word.as_str(),
      f.pronunciation.as_str(),
      f.language.as_str(),
      f.plural.as_str(),
      f.part_of_speech.as_str(),
      f.thematic_group.as_str(),
      f.meaning.as_str(),
      f.etymology.as_str(),
      date.as_str(),
    ]);
  }
  out
}
