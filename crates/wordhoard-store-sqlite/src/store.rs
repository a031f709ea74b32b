//! [`SqliteStore`]: the SQLite implementation of [`WordStore`].

use std::{collections::BTreeSet, path::Path, rc::Rc};

use chrono::NaiveDate;
use rusqlite::{OptionalExtension as _, types::Value};
use tracing::debug;

use wordhoard_core::{
  query::WordFilter,
  stats::{DailyCount, DateRange, Totals, zero_fill},
  store::WordStore,
  word::{ArchivedWordRecord, WordFields, WordId, WordRecord},
};

use crate::{
  encode::{RawArchivedWord, RawWord, contains_pattern, decode_date, encode_date, encode_dt},
  schema::{SCHEMA, WORD_COLUMNS},
  Error, Result,
};

// ─── Delete scope ────────────────────────────────────────────────────────────

/// Which live rows a delete applies to.
enum Scope {
  One(WordId),
  Many(Vec<WordId>),
  All,
}

impl Scope {
  fn where_clause(&self) -> &'static str {
    match self {
      Scope::One(_) => "WHERE id = ?1",
      Scope::Many(_) => "WHERE id IN rarray(?1)",
      Scope::All => "",
    }
  }
}

/// Copy the rows selected by `scope` into the archive, then remove them from
/// the live table, in one transaction.
///
/// Returning early drops `tx`, which rolls back: a failure in either
/// statement leaves both tables as they were.
fn archive_and_delete(conn: &mut rusqlite::Connection, scope: Scope) -> rusqlite::Result<usize> {
  let clause = scope.where_clause();
  let archive_sql = format!(
    "INSERT INTO words_archive ({WORD_COLUMNS}) SELECT {WORD_COLUMNS} FROM words {clause}"
  );
  let delete_sql = format!("DELETE FROM words {clause}");

  let tx = conn.transaction()?;
  let (archived, deleted) = match scope {
    Scope::One(id) => (tx.execute(&archive_sql, [id])?, tx.execute(&delete_sql, [id])?),
    Scope::Many(ids) => {
      let ids: Rc<Vec<Value>> = Rc::new(ids.into_iter().map(Value::from).collect());
      (
        tx.execute(&archive_sql, [ids.clone()])?,
        tx.execute(&delete_sql, [ids])?,
      )
    }
    Scope::All => (tx.execute(&archive_sql, [])?, tx.execute(&delete_sql, [])?),
  };

  if archived != deleted {
    return Err(rusqlite::Error::StatementChangedRows(deleted));
  }
  tx.commit()?;
  Ok(deleted)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A word catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await.map_err(Error::Open)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(Error::Open)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        rusqlite::vtab::array::load_module(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(Error::Open)
  }

  /// Write a consistent, compacted copy of the whole database to `path`.
  ///
  /// The target must not exist yet.
  pub async fn backup_to(&self, path: impl AsRef<Path>) -> Result<()> {
    let target = path.as_ref().to_string_lossy().into_owned();
    debug!(%target, "copying database");
    self
      .conn
      .call(move |conn| {
        conn.execute("VACUUM INTO ?1", [target])?;
        Ok(())
      })
      .await
      .map_err(Error::Read)
  }

  #[cfg(test)]
  pub(crate) fn connection(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn archive(&self, scope: Scope) -> Result<usize> {
    self
      .conn
      .call(move |conn| Ok(archive_and_delete(conn, scope)?))
      .await
      .map_err(Error::Write)
  }

  async fn count(&self, sql: &'static str) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, [], |row| row.get(0))?))
      .await
      .map_err(Error::Read)?;
    Ok(n as u64)
  }
}

// ─── WordStore impl ──────────────────────────────────────────────────────────

impl WordStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create(&self, fields: WordFields) -> Result<WordRecord> {
    let WordFields {
      word,
      pronunciation,
      language,
      plural,
      part_of_speech,
      thematic_group,
      meaning,
      etymology,
    } = fields;

    let raw: RawWord = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &format!(
            "INSERT INTO words (
               word, pronunciation, language, plural,
               partOfSpeech, thematicGroup, meaning, etymology
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             RETURNING {WORD_COLUMNS}"
          ),
          rusqlite::params![
            word,
            pronunciation,
            language,
            plural,
            part_of_speech,
            thematic_group,
            meaning,
            etymology,
          ],
          RawWord::from_row,
        )?)
      })
      .await
      .map_err(Error::Write)?;

    debug!(id = raw.id, "inserted word");
    raw.into_record()
  }

  async fn update(&self, id: WordId, fields: WordFields) -> Result<usize> {
    let WordFields {
      word,
      pronunciation,
      language,
      plural,
      part_of_speech,
      thematic_group,
      meaning,
      etymology,
    } = fields;

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE words
           SET word = ?1, pronunciation = ?2, language = ?3, plural = ?4,
               partOfSpeech = ?5, thematicGroup = ?6, meaning = ?7, etymology = ?8
           WHERE id = ?9",
          rusqlite::params![
            word,
            pronunciation,
            language,
            plural,
            part_of_speech,
            thematic_group,
            meaning,
            etymology,
            id,
          ],
        )?)
      })
      .await
      .map_err(Error::Write)?;

    debug!(id, affected, "updated word");
    Ok(affected)
  }

  async fn delete_one(&self, id: WordId) -> Result<usize> { self.archive(Scope::One(id)).await }

  async fn delete_many(&self, ids: BTreeSet<WordId>) -> Result<usize> {
    if ids.is_empty() {
      return Err(wordhoard_core::Error::EmptyIdSet.into());
    }
    self.archive(Scope::Many(ids.into_iter().collect())).await
  }

  async fn delete_all(&self) -> Result<usize> { self.archive(Scope::All).await }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn fetch_all(&self, filter: WordFilter) -> Result<Vec<WordRecord>> {
    // Build WHERE clause dynamically; values bind positionally.
    let mut conds: Vec<&'static str> = vec![];
    let mut values: Vec<String> = vec![];
    if let Some(word) = filter.word() {
      conds.push("word LIKE ? ESCAPE '\\'");
      values.push(contains_pattern(word));
    }
    if let Some(language) = filter.language() {
      conds.push("language = ?");
      values.push(language.to_owned());
    }
    if let Some(pos) = filter.part_of_speech() {
      conds.push("partOfSpeech = ?");
      values.push(pos.to_owned());
    }
    if let Some(group) = filter.thematic_group() {
      conds.push("thematicGroup = ?");
      values.push(group.to_owned());
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };
    let sql = format!("SELECT {WORD_COLUMNS} FROM words {where_clause} ORDER BY id");

    let raws: Vec<RawWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(values), RawWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    debug!(count = raws.len(), "fetched words");
    raws.into_iter().map(RawWord::into_record).collect()
  }

  async fn fetch_one(&self, id: WordId) -> Result<WordRecord> {
    let raw: Option<RawWord> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1"),
            [id],
            RawWord::from_row,
          )
          .optional()?)
      })
      .await
      .map_err(Error::Read)?;

    raw.ok_or(Error::NotFound(id))?.into_record()
  }

  async fn fetch_archive(&self) -> Result<Vec<ArchivedWordRecord>> {
    let raws: Vec<RawArchivedWord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {WORD_COLUMNS}, dateArchived FROM words_archive ORDER BY dateArchived, id"
        ))?;
        let rows = stmt
          .query_map([], RawArchivedWord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    raws.into_iter().map(RawArchivedWord::into_archived).collect()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn count_added(&self, range: DateRange) -> Result<u64> {
    let start = encode_dt(range.start);
    let end = encode_dt(range.end);

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*)
           FROM (
             SELECT dateAdded FROM words
             UNION ALL
             SELECT dateAdded FROM words_archive
           )
           WHERE datetime(dateAdded) >= ?1 AND datetime(dateAdded) < ?2",
          [start, end],
          |row| row.get(0),
        )?)
      })
      .await
      .map_err(Error::Read)?;

    Ok(n as u64)
  }

  async fn daily_counts(&self, first: NaiveDate, last: NaiveDate) -> Result<Vec<DailyCount>> {
    if first > last {
      return Err(wordhoard_core::Error::InvalidDateRange.into());
    }
    let from = encode_date(first);
    let to = encode_date(last);

    let rows: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT date(dateAdded) AS day, COUNT(*)
           FROM (
             SELECT dateAdded FROM words
             UNION ALL
             SELECT dateAdded FROM words_archive
           )
           WHERE date(dateAdded) BETWEEN ?1 AND ?2
           GROUP BY day",
        )?;
        let rows = stmt
          .query_map([from, to], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Read)?;

    let rows = rows
      .into_iter()
      .map(|(day, n)| Ok((decode_date(&day)?, n as u64)))
      .collect::<Result<Vec<_>>>()?;
    Ok(zero_fill(first, last, &rows))
  }

  async fn totals(&self) -> Result<Totals> {
    Ok(Totals {
      live:     self.count("SELECT COUNT(*) FROM words").await?,
      archived: self.count("SELECT COUNT(*) FROM words_archive").await?,
    })
  }
}
