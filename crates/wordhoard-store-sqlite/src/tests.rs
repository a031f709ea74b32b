//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use wordhoard_core::{
  Classify, ErrorKind,
  query::WordFilter,
  stats::{DateRange, Totals},
  store::WordStore,
  word::WordFields,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn fields(word: &str, language: &str, part_of_speech: &str) -> WordFields {
  WordFields {
    word: word.into(),
    language: language.into(),
    part_of_speech: part_of_speech.into(),
    ..WordFields::default()
  }
}

async fn exec(s: &SqliteStore, sql: &'static str) {
  s.connection()
    .call(move |conn| {
      conn.execute_batch(sql)?;
      Ok(())
    })
    .await
    .unwrap();
}

/// Make every DELETE on the live table fail, after the archive copy has run.
async fn inject_delete_failure(s: &SqliteStore) {
  exec(
    s,
    "CREATE TEMP TRIGGER fail_live_delete BEFORE DELETE ON words
     BEGIN SELECT RAISE(ABORT, 'injected failure'); END;",
  )
  .await;
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(y, m, d).unwrap() }

// ─── Create / fetch ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_fetch_one_round_trips() {
  let s = store().await;
  let input = WordFields {
    word:           "Schadenfreude".into(),
    pronunciation:  "ˈʃaːdn̩ˌfʁɔʏ̯də".into(),
    language:       "German".into(),
    plural:         String::new(),
    part_of_speech: "noun".into(),
    thematic_group: "emotions".into(),
    meaning:        "joy at another's misfortune".into(),
    etymology:      "Schaden + Freude".into(),
  };

  let created = s.create(input.clone()).await.unwrap();
  assert!(created.id > 0);

  let fetched = s.fetch_one(created.id).await.unwrap();
  assert_eq!(fetched.fields, input);
  assert_eq!(fetched.id, created.id);
  assert_eq!(fetched.date_added, created.date_added);
}

#[tokio::test]
async fn empty_fields_are_legal() {
  let s = store().await;
  let created = s.create(WordFields::default()).await.unwrap();
  assert_eq!(s.fetch_one(created.id).await.unwrap().fields, WordFields::default());
}

#[tokio::test]
async fn null_columns_decode_as_empty_strings() {
  let s = store().await;
  exec(&s, "INSERT INTO words (word) VALUES ('bare')").await;
  let all = s.fetch_all(WordFilter::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].fields.word, "bare");
  assert_eq!(all[0].fields.meaning, "");
}

#[tokio::test]
async fn fetch_one_missing_is_not_found() {
  let s = store().await;
  let err = s.fetch_one(42).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(42)));
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn ids_are_not_reused_after_archival() {
  let s = store().await;
  s.create(fields("a", "", "")).await.unwrap();
  let b = s.create(fields("b", "", "")).await.unwrap();
  s.delete_one(b.id).await.unwrap();
  let c = s.create(fields("c", "", "")).await.unwrap();
  assert!(c.id > b.id);
}

// ─── Filter ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn filter_combines_criteria_with_and() {
  let s = store().await;
  let maison = s.create(fields("maison", "French", "noun")).await.unwrap();
  s.create(fields("manger", "French", "verb")).await.unwrap();
  s.create(fields("Haus", "German", "noun")).await.unwrap();

  let filter = WordFilter {
    language: Some("French".into()),
    part_of_speech: Some("noun".into()),
    ..WordFilter::default()
  };
  let found = s.fetch_all(filter).await.unwrap();
  assert_eq!(found, vec![maison]);
}

#[tokio::test]
async fn empty_filter_returns_everything_in_id_order() {
  let s = store().await;
  for w in ["c", "a", "b"] {
    s.create(fields(w, "", "")).await.unwrap();
  }
  let all = s.fetch_all(WordFilter::default()).await.unwrap();
  let words: Vec<_> = all.iter().map(|r| r.fields.word.as_str()).collect();
  assert_eq!(words, vec!["c", "a", "b"]);
}

#[tokio::test]
async fn word_filter_is_contains_and_matches_in_memory_semantics() {
  let s = store().await;
  for w in ["Maison", "maisonette", "mason", "100% sure", "100 percent"] {
    s.create(fields(w, "", "")).await.unwrap();
  }

  for needle in ["AISON", "%", "0 p", "zzz"] {
    let filter = WordFilter { word: Some(needle.into()), ..WordFilter::default() };
    let from_store = s.fetch_all(filter.clone()).await.unwrap();
    let all = s.fetch_all(WordFilter::default()).await.unwrap();
    let in_memory: Vec<_> = all.into_iter().filter(|r| filter.matches(r)).collect();
    assert_eq!(from_store, in_memory, "needle {needle:?}");
  }

  let percent = WordFilter { word: Some("%".into()), ..WordFilter::default() };
  assert_eq!(s.fetch_all(percent).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_criteria_are_ignored() {
  let s = store().await;
  s.create(fields("a", "French", "")).await.unwrap();
  let filter = WordFilter { language: Some(String::new()), ..WordFilter::default() };
  assert_eq!(s.fetch_all(filter).await.unwrap().len(), 1);
}

#[tokio::test]
async fn no_match_is_an_empty_vec() {
  let s = store().await;
  s.create(fields("a", "French", "")).await.unwrap();
  let filter = WordFilter { language: Some("Klingon".into()), ..WordFilter::default() };
  assert!(s.fetch_all(filter).await.unwrap().is_empty());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_replaces_mutable_fields_only() {
  let s = store().await;
  let before = s.create(fields("colour", "English", "noun")).await.unwrap();

  let replacement = fields("color", "English (US)", "noun");
  assert_eq!(s.update(before.id, replacement.clone()).await.unwrap(), 1);

  let after = s.fetch_one(before.id).await.unwrap();
  assert_eq!(after.fields, replacement);
  assert_eq!(after.date_added, before.date_added);
}

#[tokio::test]
async fn update_missing_id_is_a_silent_no_op() {
  let s = store().await;
  s.create(fields("a", "", "")).await.unwrap();
  assert_eq!(s.update(9999, fields("z", "", "")).await.unwrap(), 0);
  let all = s.fetch_all(WordFilter::default()).await.unwrap();
  assert_eq!(all[0].fields.word, "a");
}

// ─── Delete / archive ────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_one_moves_the_row_to_the_archive() {
  let s = store().await;
  let w = s.create(fields("ephemeral", "English", "adjective")).await.unwrap();

  assert_eq!(s.delete_one(w.id).await.unwrap(), 1);
  assert!(matches!(s.fetch_one(w.id).await, Err(Error::NotFound(_))));

  let archive = s.fetch_archive().await.unwrap();
  assert_eq!(archive.len(), 1);
  assert_eq!(archive[0].record, w);
  assert!(archive[0].date_archived >= w.date_added);
}

#[tokio::test]
async fn deleting_twice_archives_once() {
  let s = store().await;
  let w = s.create(fields("twice", "", "")).await.unwrap();
  assert_eq!(s.delete_one(w.id).await.unwrap(), 1);
  assert_eq!(s.delete_one(w.id).await.unwrap(), 0);

  assert_eq!(s.totals().await.unwrap(), Totals { live: 0, archived: 1 });
}

#[tokio::test]
async fn delete_one_missing_id_is_a_no_op() {
  let s = store().await;
  assert_eq!(s.delete_one(77).await.unwrap(), 0);
  assert!(s.fetch_archive().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_many_archives_the_listed_ids() {
  let s = store().await;
  let a = s.create(fields("a", "", "")).await.unwrap();
  let b = s.create(fields("b", "", "")).await.unwrap();
  let c = s.create(fields("c", "", "")).await.unwrap();

  // Ids that are not live are ignored.
  let archived = s.delete_many(BTreeSet::from([a.id, c.id, 500])).await.unwrap();
  assert_eq!(archived, 2);

  let live = s.fetch_all(WordFilter::default()).await.unwrap();
  assert_eq!(live, vec![b]);
  let archived_ids: BTreeSet<_> = s
    .fetch_archive()
    .await
    .unwrap()
    .into_iter()
    .map(|a| a.record.id)
    .collect();
  assert_eq!(archived_ids, BTreeSet::from([a.id, c.id]));
}

#[tokio::test]
async fn delete_many_rejects_empty_set_without_touching_the_store() {
  let s = store().await;
  // Close the connection: any store access would now fail with a driver error.
  s.connection().clone().close().await.unwrap();

  let err = s.delete_many(BTreeSet::new()).await.unwrap_err();
  assert!(matches!(err, Error::Core(wordhoard_core::Error::EmptyIdSet)));
  assert_eq!(err.kind(), ErrorKind::Validation);

  let err = s.delete_many(BTreeSet::from([1])).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::StoreWrite);
}

#[tokio::test]
async fn delete_all_empties_the_live_table() {
  let s = store().await;
  for w in ["a", "b", "c"] {
    s.create(fields(w, "", "")).await.unwrap();
  }
  assert_eq!(s.delete_all().await.unwrap(), 3);
  assert!(s.fetch_all(WordFilter::default()).await.unwrap().is_empty());
  assert_eq!(s.totals().await.unwrap(), Totals { live: 0, archived: 3 });
}

#[tokio::test]
async fn delete_all_on_empty_table_succeeds() {
  let s = store().await;
  assert_eq!(s.delete_all().await.unwrap(), 0);
}

// ─── Atomicity ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn failed_live_delete_rolls_back_the_archive_copy() {
  let s = store().await;
  let a = s.create(fields("a", "", "")).await.unwrap();
  let b = s.create(fields("b", "", "")).await.unwrap();
  inject_delete_failure(&s).await;

  let err = s.delete_one(a.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::StoreWrite);
  let err = s.delete_many(BTreeSet::from([a.id, b.id])).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::StoreWrite);
  let err = s.delete_all().await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::StoreWrite);

  assert_eq!(s.fetch_all(WordFilter::default()).await.unwrap(), vec![a, b]);
  assert!(s.fetch_archive().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_archive_copy_leaves_the_live_row() {
  let s = store().await;
  let a = s.create(fields("a", "", "")).await.unwrap();
  // An archive row already holding this id makes the copy step fail.
  exec(
    &s,
    "INSERT INTO words_archive (id, word, dateAdded) VALUES (1, 'older', '2020-01-01 00:00:00')",
  )
  .await;

  let err = s.delete_one(a.id).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::StoreWrite);

  assert_eq!(s.fetch_one(a.id).await.unwrap(), a);
  let archive = s.fetch_archive().await.unwrap();
  assert_eq!(archive.len(), 1);
  assert_eq!(archive[0].record.fields.word, "older");
}

// ─── Statistics ──────────────────────────────────────────────────────────────

async fn dated_store() -> SqliteStore {
  let s = store().await;
  exec(
    &s,
    "INSERT INTO words (word, dateAdded) VALUES
       ('a', '2024-03-01 10:00:00'),
       ('b', '2024-03-01 23:59:59'),
       ('c', '2024-03-03 00:00:00');
     INSERT INTO words_archive (id, word, dateAdded, dateArchived) VALUES
       (100, 'z', '2024-03-02T09:00:00Z', '2024-03-05 00:00:00');",
  )
  .await;
  s
}

#[tokio::test]
async fn count_added_spans_live_and_archive() {
  let s = dated_store().await;
  let range = DateRange::days(date(2024, 3, 1), date(2024, 3, 2)).unwrap();
  assert_eq!(s.count_added(range).await.unwrap(), 3);

  let range = DateRange::days(date(2024, 3, 3), date(2024, 3, 3)).unwrap();
  assert_eq!(s.count_added(range).await.unwrap(), 1);
}

#[tokio::test]
async fn daily_counts_are_zero_filled() {
  let s = dated_store().await;
  let days = s.daily_counts(date(2024, 2, 29), date(2024, 3, 4)).await.unwrap();
  let counts: Vec<u64> = days.iter().map(|d| d.count).collect();
  assert_eq!(counts, vec![0, 2, 1, 1, 0]);
  assert_eq!(days[0].date, date(2024, 2, 29));
}

#[tokio::test]
async fn daily_counts_reject_reversed_range() {
  let s = store().await;
  let err = s.daily_counts(date(2024, 3, 2), date(2024, 3, 1)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

// ─── Files ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_persists_across_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("words.db");

  let id = {
    let s = SqliteStore::open(&path).await.unwrap();
    let w = s.create(fields("durable", "", "")).await.unwrap();
    s.delete_one(s.create(fields("gone", "", "")).await.unwrap().id)
      .await
      .unwrap();
    w.id
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.fetch_one(id).await.unwrap().fields.word, "durable");
  assert_eq!(s.totals().await.unwrap(), Totals { live: 1, archived: 1 });
}

#[tokio::test]
async fn backup_copies_both_tables() {
  let dir = tempfile::tempdir().unwrap();
  let copy = dir.path().join("copy.db");

  let s = store().await;
  s.create(fields("kept", "", "")).await.unwrap();
  let gone = s.create(fields("archived", "", "")).await.unwrap();
  s.delete_one(gone.id).await.unwrap();
  s.backup_to(&copy).await.unwrap();

  let restored = SqliteStore::open(&copy).await.unwrap();
  assert_eq!(restored.totals().await.unwrap(), Totals { live: 1, archived: 1 });
}
