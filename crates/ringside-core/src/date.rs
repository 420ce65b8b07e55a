//! Date normalisation, the ordering key for every date-sensitive pass.
//!
//! Show dates arrive as free-form strings: canonical ISO for anything written
//! by this crate, legacy US numeric forms for older records, and whatever a
//! user typed for the rest. Everything is reduced to a [`NaiveDate`] here.
//! A `None` from [`parse`] means "exclude this record from date-ordered
//! computations", never "fail".

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// The canonical serialisation; the only form ever written back.
pub const CANONICAL_FORMAT: &str = "%Y-%m-%d";

/// Display form used by reign summaries.
pub const US_FORMAT: &str = "%m/%d/%Y";

/// Legacy numeric formats, tried in order after the canonical one.
const LEGACY_FORMATS: &[&str] =
  &["%m/%d/%Y", "%-m/%-d/%Y", "%-m/%d/%Y", "%m/%-d/%Y"];

/// Best-effort formats tried once the canonical and legacy forms fail.
const FALLBACK_FORMATS: &[&str] = &[
  "%Y/%m/%d",
  "%Y.%m.%d",
  "%Y%m%d",
  "%d/%m/%Y",
  "%d.%m.%Y",
  "%B %d, %Y",
  "%B %d %Y",
  "%d %B %Y",
  "%d %B, %Y",
  "%A, %B %d, %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
  "%Y-%m-%dT%H:%M:%S",
  "%Y-%m-%dT%H:%M:%S%.f",
  "%Y-%m-%d %H:%M:%S",
  "%Y-%m-%d %H:%M",
  "%m/%d/%Y %H:%M:%S",
  "%m/%d/%Y %H:%M",
];

/// Parse a raw date string. Returns `None` for blank or unparseable input.
pub fn parse(raw: &str) -> Option<NaiveDate> {
  let value = raw.trim();
  if value.is_empty() {
    return None;
  }

  if let Ok(d) = NaiveDate::parse_from_str(value, CANONICAL_FORMAT) {
    return Some(d);
  }

  LEGACY_FORMATS
    .iter()
    .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    .or_else(|| best_effort(value))
}

fn best_effort(value: &str) -> Option<NaiveDate> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
    return Some(dt.date_naive());
  }
  if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
    return Some(dt.date_naive());
  }

  FALLBACK_DATETIME_FORMATS
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    .map(|dt| dt.date())
    .or_else(|| {
      FALLBACK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
    })
}

/// Serialise a date in the canonical `yyyy-MM-dd` form.
pub fn format(date: NaiveDate) -> String {
  date.format(CANONICAL_FORMAT).to_string()
}

/// Serialise a date in the `MM/dd/yyyy` display form.
pub fn format_us(date: NaiveDate) -> String {
  date.format(US_FORMAT).to_string()
}

/// Sort key for a raw date; unparseable dates sort as the earliest possible
/// date.
pub fn sort_key(raw: &str) -> NaiveDate {
  parse(raw).unwrap_or(NaiveDate::MIN)
}

/// Rewrite a raw date in canonical form when it parses, otherwise keep the
/// trimmed original so the raw log never loses what the user entered.
pub fn normalize(raw: &str) -> String {
  match parse(raw) {
    Some(d) => format(d),
    None => raw.trim().to_owned(),
  }
}

/// Compare two raw dates: by calendar value when both parse, otherwise by
/// trimmed text.
pub fn same_date(a: &str, b: &str) -> bool {
  match (parse(a), parse(b)) {
    (Some(x), Some(y)) => x == y,
    _ => a.trim() == b.trim(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn parses_canonical_iso() {
    assert_eq!(parse("2021-03-07"), Some(ymd(2021, 3, 7)));
    assert_eq!(parse("  2021-03-07 "), Some(ymd(2021, 3, 7)));
  }

  #[test]
  fn parses_legacy_numeric_forms() {
    assert_eq!(parse("03/07/2021"), Some(ymd(2021, 3, 7)));
    assert_eq!(parse("3/7/2021"), Some(ymd(2021, 3, 7)));
    assert_eq!(parse("3/17/2021"), Some(ymd(2021, 3, 17)));
    assert_eq!(parse("12/7/2021"), Some(ymd(2021, 12, 7)));
  }

  #[test]
  fn legacy_forms_are_month_first() {
    // Ambiguous day/month resolves the US way.
    assert_eq!(parse("04/05/2020"), Some(ymd(2020, 4, 5)));
    // Unambiguous day-first input falls through to the best-effort pass.
    assert_eq!(parse("25/12/2020"), Some(ymd(2020, 12, 25)));
  }

  #[test]
  fn parses_best_effort_forms() {
    assert_eq!(parse("2020/01/05"), Some(ymd(2020, 1, 5)));
    assert_eq!(parse("January 5, 2020"), Some(ymd(2020, 1, 5)));
    assert_eq!(parse("5 Jan 2020"), Some(ymd(2020, 1, 5)));
    assert_eq!(parse("2020-01-05T20:00:00Z"), Some(ymd(2020, 1, 5)));
    assert_eq!(parse("2020-01-05 19:30"), Some(ymd(2020, 1, 5)));
  }

  #[test]
  fn blank_and_garbage_are_not_ok() {
    assert_eq!(parse(""), None);
    assert_eq!(parse("   "), None);
    assert_eq!(parse("next tuesday"), None);
    assert_eq!(parse("2020-13-45"), None);
  }

  #[test]
  fn formats_canonical_and_us() {
    let d = ymd(2019, 8, 4);
    assert_eq!(format(d), "2019-08-04");
    assert_eq!(format_us(d), "08/04/2019");
  }

  #[test]
  fn unparseable_sorts_first() {
    assert_eq!(sort_key("unknown"), NaiveDate::MIN);
    assert!(sort_key("unknown") < sort_key("1900-01-01"));
  }

  #[test]
  fn normalize_keeps_unparseable_text() {
    assert_eq!(normalize("1/2/2020"), "2020-01-02");
    assert_eq!(normalize(" TBD "), "TBD");
  }

  #[test]
  fn same_date_compares_parsed_values() {
    assert!(same_date("2020-01-02", "01/02/2020"));
    assert!(!same_date("2020-01-02", "2020-01-03"));
    assert!(same_date("TBD", " TBD"));
  }
}
