//! Show and match-result records.
//!
//! A [`Show`] is what the editing surface submits; a [`MatchResult`] is the
//! snapshot the log keeps of one of its matches. Results are never edited in
//! place: a show edit replaces every result belonging to that show.

use serde::{Deserialize, Serialize};

use crate::date;

// ─── Winner classification ───────────────────────────────────────────────────

/// Winner strings that mean "nobody won".
const NO_DECISION: &[&str] = &["draw", "no contest"];

/// `true` when `winner` is blank or names a non-decision.
pub fn is_no_decision(winner: &str) -> bool {
  let w = winner.trim();
  w.is_empty() || NO_DECISION.iter().any(|nd| w.eq_ignore_ascii_case(nd))
}

/// Case-insensitive, whitespace-trimmed identity for wrestler and title names.
pub fn name_key(name: &str) -> String { name.trim().to_lowercase() }

/// Case-insensitive name equality, ignoring surrounding whitespace.
pub fn same_name(a: &str, b: &str) -> bool { name_key(a) == name_key(b) }

// ─── Input records ───────────────────────────────────────────────────────────

/// One match on a show card, as entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
  pub name:           String,
  pub participant1:   String,
  pub participant2:   String,
  /// Blank, `"Draw"` and `"No Contest"` all mean no decisive winner.
  #[serde(default)]
  pub winner:         String,
  #[serde(default)]
  pub is_title_match: bool,
  #[serde(default)]
  pub title_involved: String,
}

/// A show and its card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
  pub name:       String,
  /// Free-form date string; canonical `yyyy-MM-dd` preferred.
  #[serde(default)]
  pub date:       String,
  #[serde(default)]
  pub attendance: Option<i64>,
  #[serde(default)]
  pub matches:    Vec<Match>,
}

impl Show {
  pub fn identity(&self) -> ShowIdentity {
    ShowIdentity {
      name: self.name.clone(),
      date: self.date.clone(),
    }
  }
}

/// The (name, date) pair a show is matched by.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowIdentity {
  pub name: String,
  #[serde(default)]
  pub date: String,
}

impl ShowIdentity {
  pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      date: date.into(),
    }
  }

  /// Whether a result recorded under (`show_name`, `show_date`) belongs to
  /// this identity.
  ///
  /// Names compare case-insensitively. When either date is blank the match
  /// falls back to the name alone, which can merge unrelated same-named shows
  /// from different years.
  pub fn matches(&self, show_name: &str, show_date: &str) -> bool {
    if !same_name(&self.name, show_name) {
      return false;
    }
    if self.date.trim().is_empty() || show_date.trim().is_empty() {
      return true;
    }
    date::same_date(&self.date, show_date)
  }
}

// ─── MatchResult ─────────────────────────────────────────────────────────────

/// One logged match outcome. Show name and date are copied from the show at
/// append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
  pub promotion:      String,
  pub show_name:      String,
  pub date:           String,
  pub match_name:     String,
  pub participant1:   String,
  pub participant2:   String,
  #[serde(default)]
  pub winner:         String,
  #[serde(default)]
  pub is_title_match: bool,
  #[serde(default)]
  pub title_involved: String,
}

impl MatchResult {
  /// Snapshot one match of `show` for `promotion`.
  pub fn from_match(promotion: &str, show: &Show, m: &Match) -> Self {
    Self {
      promotion:      promotion.trim().to_owned(),
      show_name:      show.name.trim().to_owned(),
      date:           date::normalize(&show.date),
      match_name:     m.name.trim().to_owned(),
      participant1:   m.participant1.trim().to_owned(),
      participant2:   m.participant2.trim().to_owned(),
      winner:         m.winner.trim().to_owned(),
      is_title_match: m.is_title_match,
      title_involved: m.title_involved.trim().to_owned(),
    }
  }

  pub fn parsed_date(&self) -> Option<chrono::NaiveDate> { date::parse(&self.date) }

  /// Non-blank primary participants.
  pub fn participants(&self) -> impl Iterator<Item = &str> {
    [self.participant1.as_str(), self.participant2.as_str()]
      .into_iter()
      .map(str::trim)
      .filter(|p| !p.is_empty())
  }

  pub fn is_decisive(&self) -> bool { !is_no_decision(&self.winner) }

  /// A title match that can change or defend a championship.
  pub fn counts_for_lineage(&self) -> bool {
    self.is_title_match
      && !self.title_involved.trim().is_empty()
      && !self.winner.trim().is_empty()
  }

  /// Deterministic chronological ordering: parsed date (unparseable first),
  /// then show name, then match name.
  pub fn chronological_cmp(&self, other: &Self) -> std::cmp::Ordering {
    date::sort_key(&self.date)
      .cmp(&date::sort_key(&other.date))
      .then_with(|| self.show_name.cmp(&other.show_name))
      .then_with(|| self.match_name.cmp(&other.match_name))
  }
}
