//! Win/loss/draw records per wrestler.

use serde::{Deserialize, Serialize};

use crate::show::{MatchResult, same_name};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrestlerRecord {
  pub wrestler: String,
  pub matches:  usize,
  pub wins:     usize,
  pub losses:   usize,
  pub draws:    usize,
}

/// Tally `wrestler`'s results as a primary participant. Undated results count
/// too: a record is not date-ordered.
pub fn wrestler_record(results: &[MatchResult], wrestler: &str) -> WrestlerRecord {
  let mut record = WrestlerRecord {
    wrestler: wrestler.trim().to_owned(),
    ..WrestlerRecord::default()
  };

  for r in results {
    if !r.participants().any(|p| same_name(p, wrestler)) {
      continue;
    }
    record.matches += 1;
    if !r.is_decisive() {
      record.draws += 1;
    } else if same_name(&r.winner, wrestler) {
      record.wins += 1;
    } else {
      record.losses += 1;
    }
  }
  record
}

#[cfg(test)]
mod tests {
  use super::*;

  fn bout(a: &str, b: &str, winner: &str) -> MatchResult {
    MatchResult {
      promotion:      "Apex".into(),
      show_name:      "Show".into(),
      date:           String::new(),
      match_name:     format!("{a} vs {b}"),
      participant1:   a.into(),
      participant2:   b.into(),
      winner:         winner.into(),
      is_title_match: false,
      title_involved: String::new(),
    }
  }

  #[test]
  fn tallies_wins_losses_and_draws() {
    let log = vec![
      bout("Ace", "Blaze", "Ace"),
      bout("Blaze", "ace", "Blaze"),
      bout("Ace", "Cole", "No Contest"),
      bout("Cole", "Dax", "Cole"),
      bout("Ace", "Dax", "ACE"),
    ];
    let record = wrestler_record(&log, "Ace");
    assert_eq!(record, WrestlerRecord {
      wrestler: "Ace".into(),
      matches:  4,
      wins:     2,
      losses:   1,
      draws:    1,
    });
  }

  #[test]
  fn unknown_wrestler_has_empty_record() {
    let record = wrestler_record(&[bout("Ace", "Blaze", "Ace")], "Nobody");
    assert_eq!(record.matches, 0);
  }
}
