//! Week identifiers and ISO-week calendar math.
//!
//! A week id is the textual key `W-{week}-{year}` under which one week of
//! schedule data is stored remotely. All calendar math is ISO-8601
//! (weeks start on Monday, weekday numbers are Monday=1 … Sunday=7).

use std::{fmt, str::FromStr};

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::{Error, Result};

// ─── WeekId ──────────────────────────────────────────────────────────────────

/// A validated `W-{week}-{year}` identifier, resolved to its ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekId {
  year:   i32,
  week:   u32,
  monday: NaiveDate,
}

impl WeekId {
  pub const MAX_YEAR: i32 = 2038;
  pub const MIN_YEAR: i32 = 1970;

  /// Build a week id from an ISO week-based year and week number.
  ///
  /// Fails with [`Error::InvalidWeekId`] when the year is outside
  /// `[1970, 2038]`, the week is outside `[1, 53]`, or the ISO week does
  /// not exist in that year (week 53 of a 52-week year).
  pub fn new(year: i32, week: u32) -> Result<Self> {
    if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
      return Err(Error::InvalidWeekId(format!(
        "year {year} outside [{}, {}]",
        Self::MIN_YEAR,
        Self::MAX_YEAR
      )));
    }
    if !(1..=53).contains(&week) {
      return Err(Error::InvalidWeekId(format!("week {week} outside [1, 53]")));
    }
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
      .ok_or_else(|| {
        Error::InvalidWeekId(format!("week {week} does not exist in {year}"))
      })?;
    Ok(Self { year, week, monday })
  }

  /// Parse a `W-{week}-{year}` string.
  pub fn parse(s: &str) -> Result<Self> {
    let mut parts = s.splitn(3, '-');
    let (tag, week, year) = (parts.next(), parts.next(), parts.next());
    let (Some("W"), Some(week), Some(year)) = (tag, week, year) else {
      return Err(Error::InvalidWeekId(s.to_string()));
    };
    let week: u32 = week
      .parse()
      .map_err(|_| Error::InvalidWeekId(s.to_string()))?;
    let year: i32 = year
      .parse()
      .map_err(|_| Error::InvalidWeekId(s.to_string()))?;
    Self::new(year, week)
  }

  /// The week id of the ISO week containing `date`.
  pub fn of(date: NaiveDate) -> Self {
    let iso = date.iso_week();
    let monday =
      date - Duration::days(date.weekday().num_days_from_monday() as i64);
    Self {
      year: iso.year(),
      week: iso.week(),
      monday,
    }
  }

  pub fn year(&self) -> i32 { self.year }

  pub fn week(&self) -> u32 { self.week }

  /// The Monday this week starts on.
  pub fn monday(&self) -> NaiveDate { self.monday }

  /// The calendar days belonging to this ISO week.
  ///
  /// Filtered by ISO week number and week-based year rather than taking a
  /// fixed 7-day stride, so year-boundary weeks only contain their own
  /// days.
  pub fn days(&self) -> Vec<NaiveDate> {
    (0..7)
      .map(|i| self.monday + Duration::days(i))
      .filter(|d| {
        let iso = d.iso_week();
        iso.week() == self.week && iso.year() == self.year
      })
      .collect()
  }

  /// Monday 00:00:00.000 through Sunday 23:59:59.999.
  pub fn range(&self) -> (NaiveDateTime, NaiveDateTime) {
    let start = self.monday.and_time(NaiveTime::MIN);
    let end = start + Duration::days(7) - Duration::milliseconds(1);
    (start, end)
  }

  /// The week immediately after this one.
  pub fn next(&self) -> Self { Self::of(self.monday + Duration::days(7)) }

  /// The week immediately before this one.
  pub fn previous(&self) -> Self { Self::of(self.monday - Duration::days(7)) }

  /// Whole-week day delta from this week's Monday to `target`'s Monday.
  /// Negative when `target` is earlier.
  pub fn days_until(&self, target: &WeekId) -> i64 {
    (target.monday - self.monday).num_days()
  }
}

impl fmt::Display for WeekId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "W-{}-{}", self.week, self.year)
  }
}

impl FromStr for WeekId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn w1_2024_is_first_january_week() {
    let week = WeekId::parse("W-1-2024").unwrap();
    assert_eq!(week.monday(), date(2024, 1, 1));
    let (start, end) = week.range();
    assert_eq!(start, date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap());
    assert_eq!(
      end,
      date(2024, 1, 7).and_hms_milli_opt(23, 59, 59, 999).unwrap()
    );
  }

  #[test]
  fn display_round_trips() {
    let week = WeekId::parse("W-27-2025").unwrap();
    assert_eq!(week.to_string(), "W-27-2025");
    assert_eq!(WeekId::parse(&week.to_string()).unwrap(), week);
  }

  #[test]
  fn rejects_out_of_range_years() {
    assert!(WeekId::parse("W-1-1969").is_err());
    assert!(WeekId::parse("W-1-2039").is_err());
    assert!(WeekId::parse("W-1-1970").is_ok());
    assert!(WeekId::parse("W-1-2038").is_ok());
  }

  #[test]
  fn rejects_out_of_range_weeks() {
    assert!(WeekId::parse("W-0-2024").is_err());
    assert!(WeekId::parse("W-54-2024").is_err());
  }

  #[test]
  fn rejects_week_53_in_52_week_year() {
    // 2020 has 53 ISO weeks, 2024 does not.
    assert!(WeekId::parse("W-53-2020").is_ok());
    assert!(WeekId::parse("W-53-2024").is_err());
  }

  #[test]
  fn rejects_malformed_ids() {
    for bad in ["", "W", "W-1", "1-2024", "X-1-2024", "W-one-2024"] {
      assert!(WeekId::parse(bad).is_err(), "accepted {bad:?}");
    }
  }

  #[test]
  fn days_cover_the_iso_week() {
    let week = WeekId::parse("W-1-2024").unwrap();
    let days = week.days();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], date(2024, 1, 1));
    assert_eq!(days[6], date(2024, 1, 7));
    assert!(days.iter().all(|d| d.iso_week().week() == 1));
  }

  #[test]
  fn year_boundary_week_spans_both_calendar_years() {
    // ISO week 1 of 2025 runs 2024-12-30 through 2025-01-05.
    let week = WeekId::parse("W-1-2025").unwrap();
    let days = week.days();
    assert_eq!(days.len(), 7);
    assert_eq!(days[0], date(2024, 12, 30));
    assert_eq!(days[6], date(2025, 1, 5));
  }

  #[test]
  fn of_maps_any_weekday_to_its_week() {
    // 2024-01-07 is the Sunday of week 1.
    let week = WeekId::of(date(2024, 1, 7));
    assert_eq!(week.week(), 1);
    assert_eq!(week.year(), 2024);
    assert_eq!(week.monday(), date(2024, 1, 1));
  }

  #[test]
  fn next_previous_and_day_deltas() {
    let w1 = WeekId::parse("W-1-2024").unwrap();
    let w3 = WeekId::parse("W-3-2024").unwrap();
    assert_eq!(w1.next().week(), 2);
    assert_eq!(w3.previous().week(), 2);
    assert_eq!(w1.days_until(&w3), 14);
    assert_eq!(w3.days_until(&w1), -14);
  }

  #[test]
  fn of_year_boundary_date_uses_iso_year() {
    // 2024-12-30 belongs to ISO week 1 of 2025.
    let week = WeekId::of(date(2024, 12, 30));
    assert_eq!((week.year(), week.week()), (2025, 1));
  }
}
