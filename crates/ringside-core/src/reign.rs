//! Reign summaries: duration and defense accounting per reign.
//!
//! Summaries are derived on every query and never persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  date,
  lineage::TitleLineage,
  show::{MatchResult, same_name},
};

/// Duration and defenses of one reign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleReignSummary {
  pub title_name:         String,
  pub champion:           String,
  pub date_won:           String,
  /// Empty while the reign is current.
  pub date_lost:          String,
  /// Inclusive day count, never less than one.
  pub days_held:          i64,
  pub defenses:           usize,
  /// `MM/dd/yyyy`, or empty when there were no defenses.
  pub first_defense_date: String,
  pub last_defense_date:  String,
}

impl TitleReignSummary {
  pub fn is_current(&self) -> bool { self.date_lost.trim().is_empty() }
}

/// The latest parsed date in the log, the implicit "today" for open reigns.
pub fn as_of_date(results: &[MatchResult]) -> Option<NaiveDate> {
  results.iter().filter_map(MatchResult::parsed_date).max()
}

/// Summarise every reign of `lineage`.
///
/// Open reigns run until the log's as-of date, or `today` when the log has no
/// dated result. Reigns whose win date does not parse are skipped.
pub fn summarize(
  lineage: &TitleLineage,
  results: &[MatchResult],
  today: NaiveDate,
) -> Vec<TitleReignSummary> {
  let as_of = as_of_date(results).unwrap_or(today);

  let title_matches: Vec<(NaiveDate, &MatchResult)> = results
    .iter()
    .filter(|r| r.is_title_match && same_name(&r.title_involved, &lineage.title_name))
    .filter_map(|r| r.parsed_date().map(|d| (d, r)))
    .collect();

  lineage
    .reigns
    .iter()
    .filter_map(|reign| {
      let start = date::parse(&reign.date_won)?;
      let end = date::parse(&reign.date_lost).unwrap_or(as_of);
      let days_held = ((end - start).num_days() + 1).max(1);

      let mut defended: Vec<NaiveDate> = title_matches
        .iter()
        .filter(|(on, r)| {
          same_name(&r.winner, &reign.champion) && *on >= start && *on <= end
        })
        .map(|(on, _)| *on)
        .collect();
      defended.sort();

      Some(TitleReignSummary {
        title_name: lineage.title_name.clone(),
        champion: reign.champion.clone(),
        date_won: reign.date_won.clone(),
        date_lost: reign.date_lost.clone(),
        days_held,
        defenses: defended.len(),
        first_defense_date: defended.first().map(|d| date::format_us(*d)).unwrap_or_default(),
        last_defense_date: defended.last().map(|d| date::format_us(*d)).unwrap_or_default(),
      })
    })
    .collect()
}

/// Summaries for every lineage, in lineage order.
pub fn summarize_all(
  lineages: &[TitleLineage],
  results: &[MatchResult],
  today: NaiveDate,
) -> Vec<TitleReignSummary> {
  lineages
    .iter()
    .flat_map(|l| summarize(l, results, today))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::lineage::{TitleReign, build_lineages};

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn result(date: &str, title: &str, winner: &str, is_title: bool) -> MatchResult {
    MatchResult {
      promotion:      "Apex".into(),
      show_name:      format!("Show {date}"),
      date:           date.into(),
      match_name:     "Main".into(),
      participant1:   "Ace".into(),
      participant2:   "Blaze".into(),
      winner:         winner.into(),
      is_title_match: is_title,
      title_involved: title.into(),
    }
  }

  fn reign(champion: &str, won: &str, lost: &str) -> TitleReign {
    TitleReign {
      champion:   champion.into(),
      date_won:   won.into(),
      date_lost:  lost.into(),
      event_name: "Show".into(),
    }
  }

  #[test]
  fn same_day_reign_lasts_one_day() {
    let lineage = TitleLineage {
      title_name: "World".into(),
      reigns:     vec![reign("Ace", "2020-01-01", "2020-01-01")],
    };
    let summaries = summarize(&lineage, &[], ymd(2024, 1, 1));
    assert_eq!(summaries[0].days_held, 1);
  }

  #[test]
  fn closed_reign_counts_days_inclusively() {
    let lineage = TitleLineage {
      title_name: "World".into(),
      reigns:     vec![reign("Ace", "2020-01-01", "2020-01-31")],
    };
    let summaries = summarize(&lineage, &[], ymd(2024, 1, 1));
    assert_eq!(summaries[0].days_held, 31);
  }

  #[test]
  fn open_reign_runs_to_latest_logged_date() {
    let log = vec![
      result("2021-01-01", "World", "Ace", true),
      result("2021-01-10", "Tag", "Duo", true),
      result("2021-01-20", "", "Blaze", false),
    ];
    let lineages = build_lineages(&log);
    let world = crate::lineage::find(&lineages, "world").unwrap();
    let summaries = summarize(world, &log, ymd(2030, 1, 1));
    assert_eq!(summaries[0].days_held, 20);
    assert!(summaries[0].is_current());
  }

  #[test]
  fn empty_log_falls_back_to_today() {
    let lineage = TitleLineage {
      title_name: "World".into(),
      reigns:     vec![reign("Ace", "2020-01-01", "")],
    };
    let summaries = summarize(&lineage, &[], ymd(2020, 1, 10));
    assert_eq!(summaries[0].days_held, 10);
  }

  #[test]
  fn defenses_count_wins_inside_the_reign() {
    let log = vec![
      result("2021-01-01", "World", "Ace", true),
      result("2021-02-01", "World", "Ace", true),
      result("2021-03-01", "world", "ACE", true),
      result("2021-04-01", "World", "Blaze", true),
      result("2021-05-01", "World", "Ace", false),
      result("2021-06-01", "World", "Ace", true),
    ];
    let lineages = build_lineages(&log);
    let summaries = summarize(&lineages[0], &log, ymd(2030, 1, 1));

    let first = &summaries[0];
    assert_eq!(first.champion, "Ace");
    assert_eq!(first.date_lost, "2021-04-01");
    assert_eq!(first.defenses, 3);
    assert_eq!(first.first_defense_date, "01/01/2021");
    assert_eq!(first.last_defense_date, "03/01/2021");

    let blaze = &summaries[1];
    assert_eq!(blaze.defenses, 1);
    assert_eq!(blaze.first_defense_date, blaze.last_defense_date);

    let second_ace = &summaries[2];
    assert_eq!(second_ace.defenses, 1);
    assert_eq!(second_ace.days_held, 1);
  }

  #[test]
  fn no_defenses_leaves_dates_blank() {
    let lineage = TitleLineage {
      title_name: "World".into(),
      reigns:     vec![reign("Ace", "2020-01-01", "2020-02-01")],
    };
    let summaries = summarize(&lineage, &[], ymd(2024, 1, 1));
    assert_eq!(summaries[0].defenses, 0);
    assert!(summaries[0].first_defense_date.is_empty());
    assert!(summaries[0].last_defense_date.is_empty());
  }

  #[test]
  fn unparseable_win_date_is_skipped() {
    let lineage = TitleLineage {
      title_name: "World".into(),
      reigns:     vec![reign("Ace", "long ago", "2020-01-01"), reign("Blaze", "2020-01-01", "")],
    };
    let summaries = summarize(&lineage, &[], ymd(2020, 1, 5));
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].champion, "Blaze");
  }
}
