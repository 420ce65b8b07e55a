//! Milestone detection.
//!
//! Four independent passes scan the log (and, for attendance, the shows) in
//! date order and emit the milestones that fall inside one target year. Every
//! pass is a pure function of its input; running it twice gives the same
//! answer.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  date,
  lineage::TitleLineage,
  show::{MatchResult, Show, name_key},
};

/// Career match counts that are worth a milestone.
pub const MATCH_COUNT_THRESHOLDS: &[u32] = &[50, 100, 150, 200];

/// Shortest win streak that can set a record.
pub const MIN_RECORD_STREAK: u32 = 3;

// ─── Types ───────────────────────────────────────────────────────────────────

/// What a milestone records. Variant order is the display order for
/// milestones on the same day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MilestoneKind {
  WrestlerMatchCount { wrestler: String, count: u32 },
  WrestlerFirstTitleWin { wrestler: String, title: String },
  WrestlerWinStreakRecord { wrestler: String, streak: u32 },
  AttendanceRecord { show: String, attendance: i64 },
}

impl MilestoneKind {
  fn rank(&self) -> u8 {
    match self {
      Self::WrestlerMatchCount { .. } => 0,
      Self::WrestlerFirstTitleWin { .. } => 1,
      Self::WrestlerWinStreakRecord { .. } => 2,
      Self::AttendanceRecord { .. } => 3,
    }
  }

  /// Stable machine name, e.g. `"attendance_record"`.
  pub fn label(&self) -> &'static str { self.into() }
}

/// A dated, noteworthy event derived from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
  pub date:        NaiveDate,
  #[serde(flatten)]
  pub kind:        MilestoneKind,
  pub description: String,
}

impl Milestone {
  fn new(date: NaiveDate, kind: MilestoneKind) -> Self {
    let description = describe(&kind);
    Self {
      date,
      kind,
      description,
    }
  }
}

fn describe(kind: &MilestoneKind) -> String {
  match kind {
    MilestoneKind::WrestlerMatchCount { wrestler, count } => {
      format!("{wrestler} competed in career match #{count}")
    }
    MilestoneKind::WrestlerFirstTitleWin { wrestler, title } => {
      format!("{wrestler} won their first championship, the {title}")
    }
    MilestoneKind::WrestlerWinStreakRecord { wrestler, streak } => {
      format!("{wrestler} set a personal-best win streak of {streak}")
    }
    MilestoneKind::AttendanceRecord { show, attendance } => {
      format!("{show} set a new attendance record of {attendance}")
    }
  }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Dated results in chronological order; undated results are dropped.
fn dated(results: &[MatchResult]) -> Vec<(NaiveDate, &MatchResult)> {
  let mut out: Vec<_> = results
    .iter()
    .filter_map(|r| r.parsed_date().map(|d| (d, r)))
    .collect();
  out.sort_by(|(da, a), (db, b)| {
    da.cmp(db)
      .then_with(|| a.show_name.cmp(&b.show_name))
      .then_with(|| a.match_name.cmp(&b.match_name))
  });
  out
}

/// Remembers the first spelling seen for each case-insensitive name.
#[derive(Default)]
struct DisplayNames(HashMap<String, String>);

impl DisplayNames {
  fn key(&mut self, name: &str) -> String {
    let key = name_key(name);
    self
      .0
      .entry(key.clone())
      .or_insert_with(|| name.trim().to_owned());
    key
  }

  fn get(&self, key: &str) -> String { self.0.get(key).cloned().unwrap_or_default() }
}

// ─── Passes ──────────────────────────────────────────────────────────────────

/// Career match-count thresholds reached during `year`.
pub fn match_count_milestones(results: &[MatchResult], year: i32) -> Vec<Milestone> {
  let mut names = DisplayNames::default();
  let mut counts: HashMap<String, u32> = HashMap::new();
  let mut out = Vec::new();

  for (on, result) in dated(results) {
    let mut seen = Vec::with_capacity(2);
    for participant in result.participants() {
      let key = names.key(participant);
      if seen.contains(&key) {
        continue;
      }
      seen.push(key.clone());
      let count = counts.entry(key.clone()).or_default();
      *count += 1;
      if on.year() == year && MATCH_COUNT_THRESHOLDS.contains(count) {
        out.push(Milestone::new(on, MilestoneKind::WrestlerMatchCount {
          wrestler: names.get(&key),
          count:    *count,
        }));
      }
    }
  }
  out
}

/// Wrestlers whose earliest title win, across every lineage, falls in `year`.
pub fn first_title_win_milestones(lineages: &[TitleLineage], year: i32) -> Vec<Milestone> {
  let mut earliest: HashMap<String, (NaiveDate, String, String)> = HashMap::new();

  for lineage in lineages {
    for reign in &lineage.reigns {
      let Some(won) = date::parse(&reign.date_won) else {
        continue;
      };
      let candidate = (won, reign.champion.trim().to_owned(), lineage.title_name.clone());
      earliest
        .entry(name_key(&reign.champion))
        .and_modify(|best| {
          if (won, name_key(&candidate.2)) < (best.0, name_key(&best.2)) {
            *best = candidate.clone();
          }
        })
        .or_insert(candidate);
    }
  }

  earliest
    .into_values()
    .filter(|(won, ..)| won.year() == year)
    .map(|(won, wrestler, title)| {
      Milestone::new(won, MilestoneKind::WrestlerFirstTitleWin { wrestler, title })
    })
    .collect()
}

/// New personal-best win streaks of at least [`MIN_RECORD_STREAK`] set during
/// `year`.
pub fn win_streak_milestones(results: &[MatchResult], year: i32) -> Vec<Milestone> {
  let mut names = DisplayNames::default();
  let mut current: HashMap<String, u32> = HashMap::new();
  let mut best: HashMap<String, u32> = HashMap::new();
  let mut out = Vec::new();

  for (on, result) in dated(results) {
    let participants: Vec<String> = result.participants().map(|p| names.key(p)).collect();

    if !result.is_decisive() {
      for p in &participants {
        current.insert(p.clone(), 0);
      }
      continue;
    }

    let winner = names.key(&result.winner);
    for p in participants.iter().filter(|p| **p != winner) {
      current.insert(p.clone(), 0);
    }

    let streak = current.entry(winner.clone()).or_default();
    *streak += 1;
    let streak = *streak;

    let previous_best = best.get(&winner).copied().unwrap_or(0);
    if streak > previous_best {
      best.insert(winner.clone(), streak);
      if streak >= MIN_RECORD_STREAK && on.year() == year {
        out.push(Milestone::new(on, MilestoneKind::WrestlerWinStreakRecord {
          wrestler: names.get(&winner),
          streak,
        }));
      }
    }
  }
  out
}

/// Shows during `year` that beat the best attendance seen so far.
pub fn attendance_milestones(shows: &[Show], year: i32) -> Vec<Milestone> {
  let mut ordered: Vec<(NaiveDate, &Show)> = shows
    .iter()
    .filter_map(|s| date::parse(&s.date).map(|d| (d, s)))
    .collect();
  ordered.sort_by(|(da, a), (db, b)| da.cmp(db).then_with(|| a.name.cmp(&b.name)));

  let mut record = 0_i64;
  let mut out = Vec::new();
  for (on, show) in ordered {
    let Some(attendance) = show.attendance.filter(|a| *a > 0) else {
      continue;
    };
    if attendance > record {
      record = attendance;
      if on.year() == year {
        out.push(Milestone::new(on, MilestoneKind::AttendanceRecord {
          show: show.name.trim().to_owned(),
          attendance,
        }));
      }
    }
  }
  out
}

/// Run every pass and order the combined output by date, kind, then
/// description.
pub fn detect(
  results: &[MatchResult],
  lineages: &[TitleLineage],
  shows: &[Show],
  year: i32,
) -> Vec<Milestone> {
  let mut all = match_count_milestones(results, year);
  all.extend(first_title_win_milestones(lineages, year));
  all.extend(win_streak_milestones(results, year));
  all.extend(attendance_milestones(shows, year));

  all.sort_by(|a, b| {
    a.date
      .cmp(&b.date)
      .then_with(|| a.kind.rank().cmp(&b.kind.rank()))
      .then_with(|| a.description.to_lowercase().cmp(&b.description.to_lowercase()))
  });
  all
}
