//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Match results and reigns are stored one row per value with plain text
//! columns. A show's matches are stored as a compact JSON array.

use chrono::{DateTime, Utc};
use ringside_core::show::{Match, MatchResult, Show};

use crate::Result;

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

// ─── Matches ─────────────────────────────────────────────────────────────────

pub fn encode_matches(matches: &[Match]) -> Result<String> {
  Ok(serde_json::to_string(matches)?)
}

pub fn decode_matches(s: &str) -> Result<Vec<Match>> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns of a `match_results` row, minus the key.
pub struct RawMatchResult {
  pub show_name:      String,
  pub date:           String,
  pub match_name:     String,
  pub participant1:   String,
  pub participant2:   String,
  pub winner:         String,
  pub is_title_match: bool,
  pub title_involved: String,
}

impl RawMatchResult {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      show_name:      row.get(0)?,
      date:           row.get(1)?,
      match_name:     row.get(2)?,
      participant1:   row.get(3)?,
      participant2:   row.get(4)?,
      winner:         row.get(5)?,
      is_title_match: row.get(6)?,
      title_involved: row.get(7)?,
    })
  }

  pub fn into_result(self, promotion: &str) -> MatchResult {
    MatchResult {
      promotion:      promotion.to_owned(),
      show_name:      self.show_name,
      date:           self.date,
      match_name:     self.match_name,
      participant1:   self.participant1,
      participant2:   self.participant2,
      winner:         self.winner,
      is_title_match: self.is_title_match,
      title_involved: self.title_involved,
    }
  }
}

/// Raw columns of a `shows` row.
pub struct RawShow {
  pub name:         String,
  pub date:         String,
  pub attendance:   Option<i64>,
  pub matches_json: String,
}

impl RawShow {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      name:         row.get(0)?,
      date:         row.get(1)?,
      attendance:   row.get(2)?,
      matches_json: row.get(3)?,
    })
  }

  pub fn into_show(self) -> Result<Show> {
    Ok(Show {
      name:       self.name,
      date:       self.date,
      attendance: self.attendance,
      matches:    decode_matches(&self.matches_json)?,
    })
  }
}
