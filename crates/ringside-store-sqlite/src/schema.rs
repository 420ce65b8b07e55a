//! SQL schema for the Ringside SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision for later migrations.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per promotion that has a saved history.
CREATE TABLE IF NOT EXISTS histories (
    promotion   TEXT PRIMARY KEY,
    saved_at    TEXT NOT NULL     -- RFC 3339 UTC
);

-- The match result log, in insertion order.
CREATE TABLE IF NOT EXISTS match_results (
    promotion       TEXT    NOT NULL REFERENCES histories(promotion) ON DELETE CASCADE,
    seq             INTEGER NOT NULL,
    show_name       TEXT    NOT NULL,
    date            TEXT    NOT NULL,
    match_name      TEXT    NOT NULL,
    participant1    TEXT    NOT NULL,
    participant2    TEXT    NOT NULL,
    winner          TEXT    NOT NULL DEFAULT '',
    is_title_match  INTEGER NOT NULL DEFAULT 0,
    title_involved  TEXT    NOT NULL DEFAULT '',
    PRIMARY KEY (promotion, seq)
);

-- Derived lineages, written alongside the log for readers outside the
-- engine. Never read back: lineages are replayed from match_results.
CREATE TABLE IF NOT EXISTS title_reigns (
    promotion   TEXT    NOT NULL REFERENCES histories(promotion) ON DELETE CASCADE,
    title_name  TEXT    NOT NULL,
    seq         INTEGER NOT NULL,
    champion    TEXT    NOT NULL,
    date_won    TEXT    NOT NULL,
    date_lost   TEXT    NOT NULL DEFAULT '',
    event_name  TEXT    NOT NULL,
    PRIMARY KEY (promotion, title_name, seq)
);

-- Show records as saved by the promotion's editor.
CREATE TABLE IF NOT EXISTS shows (
    show_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    promotion     TEXT    NOT NULL,
    name          TEXT    NOT NULL,
    date          TEXT    NOT NULL DEFAULT '',
    attendance    INTEGER,
    matches_json  TEXT    NOT NULL DEFAULT '[]'
);

CREATE INDEX IF NOT EXISTS shows_promotion_idx ON shows(promotion);

PRAGMA user_version = 1;
";
