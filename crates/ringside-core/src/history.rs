//! The per-promotion history record: the match result log plus the lineages
//! derived from it.
//!
//! This is the unit of persistence. Its serde shape (camelCase, a flat list of
//! results and a list of lineages) is the on-disk format.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  lineage::{TitleLineage, build_lineages},
  log::{MatchResultLog, MutationOutcome},
  show::{MatchResult, Show, ShowIdentity},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionHistory {
  promotion:     String,
  #[serde(default)]
  match_results: Vec<MatchResult>,
  #[serde(default)]
  lineages:      Vec<TitleLineage>,
}

impl PromotionHistory {
  pub fn new(promotion: impl Into<String>) -> Self {
    Self {
      promotion:     promotion.into(),
      match_results: Vec::new(),
      lineages:      Vec::new(),
    }
  }

  /// Reassemble a history read back from storage. Lineages are rebuilt from
  /// the results rather than trusted.
  pub fn from_parts(promotion: impl Into<String>, match_results: Vec<MatchResult>) -> Self {
    let mut history = Self {
      promotion: promotion.into(),
      match_results,
      lineages: Vec::new(),
    };
    history.rebuild_lineages();
    history
  }

  /// Build a history from scratch out of a promotion's existing shows.
  pub fn from_shows(promotion: impl Into<String>, shows: &[Show]) -> Self {
    let mut history = Self::new(promotion);
    let mut log = history.take_log();
    for show in shows {
      log.append(show);
    }
    history.match_results = log.into_results();
    history.rebuild_lineages();
    history
  }

  /// Parse the persisted JSON shape. Lineages are rebuilt from the results.
  pub fn from_json(raw: &str) -> Result<Self> {
    let parsed: Self = serde_json::from_str(raw)?;
    if parsed.promotion.trim().is_empty() {
      return Err(Error::BlankPromotion);
    }
    Ok(Self::from_parts(parsed.promotion, parsed.match_results))
  }

  pub fn to_json_pretty(&self) -> Result<String> { Ok(serde_json::to_string_pretty(self)?) }

  pub fn promotion(&self) -> &str { &self.promotion }

  /// Results in insertion order.
  pub fn match_results(&self) -> &[MatchResult] { &self.match_results }

  pub fn lineages(&self) -> &[TitleLineage] { &self.lineages }

  /// Detached, chronologically sorted copy of the log.
  pub fn sorted_results(&self) -> Vec<MatchResult> {
    MatchResultLog::from_results(self.promotion.clone(), self.match_results.clone()).all()
  }

  /// Discard every lineage and replay the log.
  pub fn rebuild_lineages(&mut self) {
    self.lineages = build_lineages(&self.match_results);
  }

  fn take_log(&mut self) -> MatchResultLog {
    MatchResultLog::from_results(self.promotion.clone(), std::mem::take(&mut self.match_results))
  }

  /// Run `f` against the log, then rebuild lineages if anything changed.
  fn mutate(&mut self, f: impl FnOnce(&mut MatchResultLog) -> MutationOutcome) -> MutationOutcome {
    let mut log = self.take_log();
    let outcome = f(&mut log);
    self.match_results = log.into_results();
    if outcome.is_applied() {
      self.rebuild_lineages();
    }
    outcome
  }

  pub fn add_show(&mut self, show: &Show) -> MutationOutcome {
    self.mutate(|log| log.replace_for_show(show, None))
  }

  pub fn edit_show(&mut self, show: &Show, previous: Option<&ShowIdentity>) -> MutationOutcome {
    self.mutate(|log| log.replace_for_show(show, previous))
  }

  pub fn delete_show(&mut self, identity: &ShowIdentity) -> MutationOutcome {
    let blank = Show {
      name: identity.name.clone(),
      date: identity.date.clone(),
      ..Show::default()
    };
    self.mutate(|log| log.remove_for_show(&blank, None))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::show::Match;

  fn title_show(name: &str, date: &str, winner: &str) -> Show {
    Show {
      name:       name.into(),
      date:       date.into(),
      attendance: Some(1000),
      matches:    vec![Match {
        name:           "Main Event".into(),
        participant1:   "Ace".into(),
        participant2:   "Blaze".into(),
        winner:         winner.into(),
        is_title_match: true,
        title_involved: "World".into(),
      }],
    }
  }

  #[test]
  fn mutations_rebuild_lineages() {
    let mut history = PromotionHistory::new("Apex");
    history.add_show(&title_show("Night 1", "2022-01-01", "Ace"));
    history.add_show(&title_show("Night 2", "2022-02-01", "Blaze"));
    assert_eq!(history.lineages()[0].reigns.len(), 2);

    history.delete_show(&ShowIdentity::new("Night 2", "2022-02-01"));
    assert_eq!(history.match_results().len(), 1);
    assert_eq!(history.lineages()[0].reigns.len(), 1);
    assert!(history.lineages()[0].reigns[0].date_lost.is_empty());
  }

  #[test]
  fn adding_the_same_show_twice_does_not_duplicate() {
    let mut history = PromotionHistory::new("Apex");
    let show = title_show("Night 1", "2022-01-01", "Ace");
    history.add_show(&show);
    history.add_show(&show);
    assert_eq!(history.match_results().len(), 1);
  }

  #[test]
  fn edit_with_previous_identity_moves_results() {
    let mut history = PromotionHistory::new("Apex");
    history.add_show(&title_show("Night 1", "2022-01-01", "Ace"));

    let moved = title_show("Night One", "2022-01-02", "Blaze");
    let outcome = history.edit_show(&moved, Some(&ShowIdentity::new("Night 1", "2022-01-01")));
    assert_eq!(outcome, MutationOutcome::Applied { removed: 1, appended: 1 });

    let results = history.sorted_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].show_name, "Night One");
    assert_eq!(history.lineages()[0].reigns[0].champion, "Blaze");
  }

  #[test]
  fn from_shows_matches_incremental_build() {
    let shows = vec![
      title_show("Night 1", "2022-01-01", "Ace"),
      title_show("Night 2", "2022-02-01", "Blaze"),
    ];
    let rebuilt = PromotionHistory::from_shows("Apex", &shows);

    let mut incremental = PromotionHistory::new("Apex");
    for show in &shows {
      incremental.add_show(show);
    }
    assert_eq!(rebuilt, incremental);
  }

  #[test]
  fn persisted_shape_is_camel_case() {
    let history = PromotionHistory::from_shows("Apex", &[title_show("Night 1", "2022-01-01", "Ace")]);
    let json = serde_json::to_value(&history).unwrap();
    assert_eq!(json["matchResults"][0]["showName"], "Night 1");
    assert_eq!(json["matchResults"][0]["isTitleMatch"], true);
    assert_eq!(json["lineages"][0]["titleName"], "World");
    assert_eq!(json["lineages"][0]["reigns"][0]["dateWon"], "2022-01-01");
    assert_eq!(json["lineages"][0]["reigns"][0]["dateLost"], "");

    let back = PromotionHistory::from_json(&json.to_string()).unwrap();
    assert_eq!(back, history);
  }

  #[test]
  fn from_json_rebuilds_stale_lineages() {
    let raw = r#"{
      "promotion": "Apex",
      "matchResults": [{
        "promotion": "Apex", "showName": "Night 1", "date": "2022-01-01",
        "matchName": "Main", "participant1": "Ace", "participant2": "Blaze",
        "winner": "Blaze", "isTitleMatch": true, "titleInvolved": "World"
      }],
      "lineages": [{ "titleName": "World", "reigns": [{
        "champion": "Somebody Else", "dateWon": "1999-01-01", "dateLost": "",
        "eventName": "Edited By Hand"
      }]}]
    }"#;
    let history = PromotionHistory::from_json(raw).unwrap();
    assert_eq!(history.lineages()[0].reigns[0].champion, "Blaze");
  }

  #[test]
  fn from_json_rejects_blank_promotion() {
    let err = PromotionHistory::from_json(r#"{"promotion": " "}"#).unwrap_err();
    assert!(matches!(err, Error::BlankPromotion));
  }
}
