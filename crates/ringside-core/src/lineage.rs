//! Title lineages, rebuilt by replaying the match result log.
//!
//! Reigns are never edited by hand. Every log mutation discards all lineages
//! and replays the title matches in chronological order, so lineage state can
//! never drift from the log.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
  date,
  show::{MatchResult, name_key, same_name},
};

/// One champion's uninterrupted hold on a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleReign {
  pub champion:   String,
  /// Canonical `yyyy-MM-dd`.
  pub date_won:   String,
  /// Canonical `yyyy-MM-dd`; empty while the reign is current.
  #[serde(default)]
  pub date_lost:  String,
  pub event_name: String,
}

impl TitleReign {
  pub fn is_current(&self) -> bool { self.date_lost.trim().is_empty() }
}

/// The ordered champions of one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleLineage {
  pub title_name: String,
  #[serde(default)]
  pub reigns:     Vec<TitleReign>,
}

impl TitleLineage {
  pub fn new(title_name: impl Into<String>) -> Self {
    Self {
      title_name: title_name.into(),
      reigns:     Vec::new(),
    }
  }

  pub fn current_reign(&self) -> Option<&TitleReign> {
    self.reigns.last().filter(|r| r.is_current())
  }

  /// Apply one title match won by `result.winner`.
  fn record(&mut self, result: &MatchResult, on: &str) {
    let opens = match self.reigns.last_mut() {
      None => true,
      Some(reign) if same_name(&reign.champion, &result.winner) => false,
      Some(reign) => {
        if reign.is_current() {
          reign.date_lost = on.to_owned();
        }
        true
      }
    };

    if opens {
      self.reigns.push(TitleReign {
        champion:   result.winner.trim().to_owned(),
        date_won:   on.to_owned(),
        date_lost:  String::new(),
        event_name: result.show_name.clone(),
      });
    }
  }

  /// Reigns are in non-decreasing `date_won` order and only the last reign
  /// may be open.
  pub fn is_well_formed(&self) -> bool {
    let ordered = self
      .reigns
      .windows(2)
      .all(|w| date::sort_key(&w[0].date_won) <= date::sort_key(&w[1].date_won));
    let open_ok = self
      .reigns
      .iter()
      .rev()
      .skip(1)
      .all(|r| !r.is_current());
    ordered && open_ok
  }
}

/// Rebuild every lineage from scratch.
///
/// Only title matches with a title, a winner and a parseable date take part.
/// The output is ordered by title name, case-insensitively.
pub fn build_lineages(results: &[MatchResult]) -> Vec<TitleLineage> {
  let mut title_matches: Vec<(chrono::NaiveDate, &MatchResult)> = results
    .iter()
    .filter(|r| r.counts_for_lineage())
    .filter_map(|r| r.parsed_date().map(|d| (d, r)))
    .collect();

  title_matches.sort_by(|(da, a), (db, b)| {
    da.cmp(db)
      .then_with(|| a.show_name.cmp(&b.show_name))
      .then_with(|| a.match_name.cmp(&b.match_name))
  });

  let mut index: HashMap<String, usize> = HashMap::new();
  let mut lineages: Vec<TitleLineage> = Vec::new();

  for (on, result) in title_matches {
    let slot = *index
      .entry(name_key(&result.title_involved))
      .or_insert_with(|| {
        lineages.push(TitleLineage::new(result.title_involved.trim()));
        lineages.len() - 1
      });
    lineages[slot].record(result, &date::format(on));
  }

  lineages.sort_by(|a, b| {
    name_key(&a.title_name)
      .cmp(&name_key(&b.title_name))
      .then_with(|| a.title_name.cmp(&b.title_name))
  });
  lineages
}

/// Find a lineage by title name, case-insensitively.
pub fn find<'a>(lineages: &'a [TitleLineage], title: &str) -> Option<&'a TitleLineage> {
  lineages.iter().find(|l| same_name(&l.title_name, title))
}
