//! SQL schema for the wordhoard SQLite store.
//!
//! Executed once at connection startup. The column names are part of the
//! on-disk contract shared with exported database files, so they keep their
//! camelCase spelling.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS words (
    id            INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    word          TEXT,
    pronunciation TEXT,
    language      TEXT,
    plural        TEXT,
    partOfSpeech  TEXT,
    thematicGroup TEXT,
    meaning       TEXT,
    etymology     TEXT,
    dateAdded     DATETIME DEFAULT CURRENT_TIMESTAMP
);

-- Soft-deleted words. Append-only: rows keep the id they had while live,
-- and no UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS words_archive (
    id            INTEGER NOT NULL,
    word          TEXT,
    pronunciation TEXT,
    language      TEXT,
    plural        TEXT,
    partOfSpeech  TEXT,
    thematicGroup TEXT,
    meaning       TEXT,
    etymology     TEXT,
    dateAdded     DATETIME,
    dateArchived  DATETIME DEFAULT CURRENT_TIMESTAMP,
    PRIMARY KEY (id)
);

PRAGMA user_version = 1;
";

/// Columns shared by both tables, in schema order.
pub const WORD_COLUMNS: &str = "id, word, pronunciation, language, plural, partOfSpeech, \
                                thematicGroup, meaning, etymology, dateAdded";
