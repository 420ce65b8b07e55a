//! Plain-text rendering for the report subcommands.

use std::fmt::Write as _;

use ringside_core::{
  lineage::TitleLineage,
  milestone::Milestone,
  record::WrestlerRecord,
  reign::TitleReignSummary,
  show::MatchResult,
};

fn or_dash(s: &str) -> &str { if s.trim().is_empty() { "-" } else { s } }

pub fn results(results: &[MatchResult]) -> String {
  let mut out = String::new();
  for r in results {
    let title = if r.is_title_match {
      format!(" [{}]", r.title_involved)
    } else {
      String::new()
    };
    let _ = writeln!(
      out,
      "{:<10}  {}  {}: {} vs {} -> {}{title}",
      or_dash(&r.date),
      r.show_name,
      r.match_name,
      r.participant1,
      r.participant2,
      or_dash(&r.winner),
    );
  }
  out
}

pub fn lineages(lineages: &[TitleLineage]) -> String {
  let mut out = String::new();
  for lineage in lineages {
    let _ = writeln!(out, "{}", lineage.title_name);
    for (n, reign) in lineage.reigns.iter().enumerate() {
      let lost = if reign.is_current() { "present" } else { reign.date_lost.as_str() };
      let _ = writeln!(
        out,
        "  {:>2}. {}  {} to {}  ({})",
        n + 1,
        reign.champion,
        reign.date_won,
        lost,
        reign.event_name,
      );
    }
  }
  out
}

pub fn reigns(summaries: &[TitleReignSummary]) -> String {
  let mut out = String::new();
  for s in summaries {
    let lost = if s.is_current() { "present" } else { s.date_lost.as_str() };
    let _ = writeln!(
      out,
      "{}: {}  {} to {}  {} days, {} defenses ({} to {})",
      s.title_name,
      s.champion,
      s.date_won,
      lost,
      s.days_held,
      s.defenses,
      or_dash(&s.first_defense_date),
      or_dash(&s.last_defense_date),
    );
  }
  out
}

pub fn milestones(milestones: &[Milestone]) -> String {
  let mut out = String::new();
  for m in milestones {
    let _ = writeln!(out, "{}  {:<26} {}", m.date, m.kind.label(), m.description);
  }
  out
}

pub fn record(record: &WrestlerRecord) -> String {
  format!(
    "{}: {} matches, {}-{}-{} (W-L-D)\n",
    record.wrestler, record.matches, record.wins, record.losses, record.draws
  )
}
