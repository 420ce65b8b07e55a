//! The match result log: the authoritative record everything else is
//! derived from.
//!
//! The log is append/remove only. Results are grouped by the show that
//! produced them and a show edit always goes through
//! [`MatchResultLog::replace_for_show`], so an edited show never leaves stale
//! duplicates behind.

use serde::{Deserialize, Serialize};

use crate::show::{MatchResult, Show, ShowIdentity};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Why a mutation was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
  MissingPromotion,
  MissingShow,
}

/// The result of a log mutation. Missing input is a skip, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
  Applied { removed: usize, appended: usize },
  Skipped { reason: SkipReason },
}

impl MutationOutcome {
  pub fn is_applied(&self) -> bool { matches!(self, Self::Applied { .. }) }
}

// ─── Log ─────────────────────────────────────────────────────────────────────

/// One promotion's match results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResultLog {
  promotion: String,
  results:   Vec<MatchResult>,
}

impl MatchResultLog {
  pub fn new(promotion: impl Into<String>) -> Self {
    Self {
      promotion: promotion.into(),
      results:   Vec::new(),
    }
  }

  /// Rehydrate a log from persisted results.
  pub fn from_results(promotion: impl Into<String>, results: Vec<MatchResult>) -> Self {
    Self {
      promotion: promotion.into(),
      results,
    }
  }

  pub fn promotion(&self) -> &str { &self.promotion }

  pub fn len(&self) -> usize { self.results.len() }

  pub fn is_empty(&self) -> bool { self.results.is_empty() }

  /// Read-only view in insertion order.
  pub fn results(&self) -> &[MatchResult] { &self.results }

  fn check_show(&self, show: &Show) -> Option<SkipReason> {
    if self.promotion.trim().is_empty() {
      Some(SkipReason::MissingPromotion)
    } else if show.name.trim().is_empty() {
      Some(SkipReason::MissingShow)
    } else {
      None
    }
  }

  /// Snapshot every match of `show` into the log.
  pub fn append(&mut self, show: &Show) -> MutationOutcome {
    if let Some(reason) = self.check_show(show) {
      return MutationOutcome::Skipped { reason };
    }
    let appended = self.push_show(show);
    MutationOutcome::Applied { removed: 0, appended }
  }

  fn push_show(&mut self, show: &Show) -> usize {
    let promotion = self.promotion.clone();
    self.results.extend(
      show
        .matches
        .iter()
        .map(|m| MatchResult::from_match(&promotion, show, m)),
    );
    show.matches.len()
  }

  /// Remove every result recorded under `show`'s identity or under
  /// `previous`, the identity the show had before an unsaved rename.
  pub fn remove_for_show(
    &mut self,
    show: &Show,
    previous: Option<&ShowIdentity>,
  ) -> MutationOutcome {
    if let Some(reason) = self.check_show(show) {
      return MutationOutcome::Skipped { reason };
    }
    let removed = self.remove_identity(&show.identity(), previous);
    MutationOutcome::Applied { removed, appended: 0 }
  }

  /// Remove every result recorded under `identity`. Used for deletes, where
  /// only the identity of the removed show is known.
  pub fn remove_identity(
    &mut self,
    identity: &ShowIdentity,
    previous: Option<&ShowIdentity>,
  ) -> usize {
    if identity.name.trim().is_empty() && previous.is_none() {
      return 0;
    }
    let before = self.results.len();
    self.results.retain(|r| {
      let current = !identity.name.trim().is_empty()
        && identity.matches(&r.show_name, &r.date);
      let renamed = previous.is_some_and(|p| p.matches(&r.show_name, &r.date));
      !(current || renamed)
    });
    before - self.results.len()
  }

  /// Remove then append: the only path show edits take.
  pub fn replace_for_show(
    &mut self,
    show: &Show,
    previous: Option<&ShowIdentity>,
  ) -> MutationOutcome {
    if let Some(reason) = self.check_show(show) {
      return MutationOutcome::Skipped { reason };
    }
    let removed = self.remove_identity(&show.identity(), previous);
    let appended = self.push_show(show);
    MutationOutcome::Applied { removed, appended }
  }

  /// Detached copy of every result, sorted chronologically with unparseable
  /// dates first.
  pub fn all(&self) -> Vec<MatchResult> {
    let mut out = self.results.clone();
    out.sort_by(MatchResult::chronological_cmp);
    out
  }

  pub fn into_results(self) -> Vec<MatchResult> { self.results }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::show::Match;

  fn bout(name: &str, a: &str, b: &str, winner: &str) -> Match {
    Match {
      name:           name.into(),
      participant1:   a.into(),
      participant2:   b.into(),
      winner:         winner.into(),
      is_title_match: false,
      title_involved: String::new(),
    }
  }

  fn show(name: &str, date: &str, matches: Vec<Match>) -> Show {
    Show {
      name: name.into(),
      date: date.into(),
      attendance: None,
      matches,
    }
  }

  #[test]
  fn append_snapshots_each_match() {
    let mut log = MatchResultLog::new("Apex");
    let s = show("Night One", "2022-01-01", vec![
      bout("Opener", "A", "B", "A"),
      bout("Main", "C", "D", "D"),
    ]);
    let outcome = log.append(&s);
    assert_eq!(outcome, MutationOutcome::Applied { removed: 0, appended: 2 });
    assert_eq!(log.len(), 2);
    assert!(log.results().iter().all(|r| r.promotion == "Apex"));
  }

  #[test]
  fn missing_input_is_skipped() {
    let mut blank_promo = MatchResultLog::new("  ");
    let s = show("Night One", "2022-01-01", vec![bout("M", "A", "B", "A")]);
    assert_eq!(blank_promo.append(&s), MutationOutcome::Skipped {
      reason: SkipReason::MissingPromotion,
    });

    let mut log = MatchResultLog::new("Apex");
    let nameless = show("", "2022-01-01", vec![bout("M", "A", "B", "A")]);
    assert_eq!(log.replace_for_show(&nameless, None), MutationOutcome::Skipped {
      reason: SkipReason::MissingShow,
    });
    assert!(log.is_empty());
  }

  #[test]
  fn replace_with_rename_leaves_only_new_matches() {
    let mut log = MatchResultLog::new("Apex");
    let original = show("Night One", "2022-01-01", vec![
      bout("Opener", "A", "B", "A"),
      bout("Main", "C", "D", "D"),
    ]);
    log.append(&original);
    log.append(&show("Other Show", "2022-01-08", vec![bout("X", "E", "F", "E")]));

    let renamed = show("Night One Revisited", "2022-01-02", vec![bout(
      "Main", "C", "D", "C",
    )]);
    let outcome = log.replace_for_show(&renamed, Some(&original.identity()));
    assert_eq!(outcome, MutationOutcome::Applied { removed: 2, appended: 1 });

    let names: Vec<_> = log.all().into_iter().map(|r| r.show_name).collect();
    assert_eq!(names, ["Night One Revisited", "Other Show"]);
  }

  #[test]
  fn replace_twice_is_stable() {
    let mut log = MatchResultLog::new("Apex");
    let s = show("Night One", "2022-01-01", vec![bout("Main", "A", "B", "A")]);
    log.replace_for_show(&s, None);
    log.replace_for_show(&s, None);
    assert_eq!(log.len(), 1);
  }

  #[test]
  fn remove_matches_legacy_date_and_case() {
    let mut log = MatchResultLog::new("Apex");
    log.append(&show("Night One", "01/01/2022", vec![bout("M", "A", "B", "A")]));
    let removed = log.remove_identity(&ShowIdentity::new("NIGHT ONE", "2022-01-01"), None);
    assert_eq!(removed, 1);
  }

  #[test]
  fn blank_date_removes_same_named_shows_across_years() {
    let mut log = MatchResultLog::new("Apex");
    log.append(&show("Anniversary", "2020-05-01", vec![bout("M", "A", "B", "A")]));
    log.append(&show("Anniversary", "2021-05-01", vec![bout("M", "A", "B", "B")]));
    let removed = log.remove_identity(&ShowIdentity::new("Anniversary", ""), None);
    assert_eq!(removed, 2);
  }

  #[test]
  fn all_sorts_chronologically_with_undated_first() {
    let mut log = MatchResultLog::new("Apex");
    log.append(&show("B Show", "2022-02-01", vec![bout("Main", "A", "B", "A")]));
    log.append(&show("A Show", "2022-02-01", vec![bout("Main", "A", "B", "A")]));
    log.append(&show("Undated", "someday", vec![bout("Main", "A", "B", "A")]));
    log.append(&show("Early", "1/15/2022", vec![
      bout("Z", "A", "B", "A"),
      bout("A", "A", "B", "A"),
    ]));

    let order: Vec<_> = log
      .all()
      .into_iter()
      .map(|r| format!("{}:{}", r.show_name, r.match_name))
      .collect();
    assert_eq!(order, [
      "Undated:Main",
      "Early:A",
      "Early:Z",
      "A Show:Main",
      "B Show:Main"
    ]);
  }

  #[test]
  fn all_returns_detached_copies() {
    let mut log = MatchResultLog::new("Apex");
    log.append(&show("Night One", "2022-01-01", vec![bout("M", "A", "B", "A")]));
    let mut copy = log.all();
    copy[0].winner = "B".into();
    copy.clear();
    assert_eq!(log.results()[0].winner, "A");
  }
}
