//! Per-employee wage and overtime computation.
//!
//! Input is one employee's shifts for one week plus the location's
//! overtime policy; output is a per-shift wage breakdown and per-ISO-
//! weekday buckets ready for location-wide aggregation.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rota_core::{
  policy::{OvertimeMode, WagePolicy},
  shift::Shift,
  summary::DayTotals,
};

// ─── Output types ────────────────────────────────────────────────────────────

/// The wage breakdown for one shift.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftWage {
  pub shift_id:       String,
  pub normal_hours:   f64,
  pub overtime_hours: f64,
  pub total_hours:    f64,
  /// The shift's full base wage (`hourly_wage × total_hours`) — overtime
  /// pay is added on top of it, never carved out of it.
  pub normal_wage:    f64,
  pub overtime_wage:  f64,
  pub total_wage:     f64,
}

/// One employee's computed week: per-shift breakdowns plus day buckets.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeWeekWages {
  pub shifts: Vec<ShiftWage>,
  /// Buckets keyed by ISO weekday (Monday=1 … Sunday=7); `people` is 1
  /// in every occupied bucket.
  pub by_day: BTreeMap<u8, DayTotals>,
}

impl EmployeeWeekWages {
  /// Sum of the day buckets. In the returned total, `people` counts the
  /// days this employee worked.
  pub fn total(&self) -> DayTotals {
    let mut total = DayTotals::default();
    for bucket in self.by_day.values() {
      total.absorb(bucket);
    }
    total
  }
}

// ─── Calculator ──────────────────────────────────────────────────────────────

/// A shift's fields pre-resolved for wage math.
struct Timed {
  shift_id: String,
  start:    NaiveDateTime,
  day:      NaiveDate,
  hours:    f64,
  wage:     f64,
}

/// Compute one employee's wage breakdown for the week.
///
/// With no policy every hour is normal. With a policy, the overtime rate
/// of pay is computed once for the whole shift set
/// (`total_wage / total_hours × (multiplier − 1)`), then each shift's
/// hours are split against the accumulated hours of the shifts that
/// precede it — across the whole week in `Weekly` mode, within the same
/// calendar day in `Daily` mode.
///
/// Shifts marked `deleting` are excluded entirely: they earn nothing and
/// neither consume nor trigger overtime for the shifts around them.
pub fn employee_week_wages(
  shifts: &[Shift],
  policy: Option<&WagePolicy>,
) -> EmployeeWeekWages {
  let timed: Vec<Timed> = shifts
    .iter()
    .filter(|s| !s.deleting)
    .map(|s| {
      let hours = s.duration().total_hours();
      let effective = s.effective();
      Timed {
        shift_id: s.id.clone(),
        start:    effective.start.instant(),
        day:      effective.start.date(),
        hours,
        wage:     effective.hourly_wage.unwrap_or(0.0) * hours,
      }
    })
    .collect();

  let total_hours: f64 = timed.iter().map(|t| t.hours).sum();
  let total_wage: f64 = timed.iter().map(|t| t.wage).sum();

  let overtime_rate = match policy {
    Some(p) if total_hours > 0.0 => {
      total_wage / total_hours * (p.multiplier - 1.0)
    }
    _ => 0.0,
  };

  let mut result = EmployeeWeekWages::default();

  for current in &timed {
    let overtime_hours = match policy {
      None => 0.0,
      Some(p) => {
        let accumulated = accumulated_hours(&timed, current, p.mode);
        let total_accumulated = accumulated + current.hours;
        if total_accumulated <= p.hours_limit {
          0.0
        } else {
          current
            .hours
            .min((total_accumulated - p.hours_limit).max(0.0))
        }
      }
    };

    let shift_wage = ShiftWage {
      shift_id:       current.shift_id.clone(),
      normal_hours:   current.hours - overtime_hours,
      overtime_hours,
      total_hours:    current.hours,
      normal_wage:    current.wage,
      overtime_wage:  overtime_hours * overtime_rate,
      total_wage:     current.wage + overtime_hours * overtime_rate,
    };

    let weekday = current.day.weekday().number_from_monday() as u8;
    let bucket = result.by_day.entry(weekday).or_default();
    bucket.normal_hours += shift_wage.normal_hours;
    bucket.overtime_hours += shift_wage.overtime_hours;
    bucket.total_hours += shift_wage.total_hours;
    bucket.normal_wage += shift_wage.normal_wage;
    bucket.overtime_wage += shift_wage.overtime_wage;
    bucket.total_wage += shift_wage.total_wage;
    bucket.total_shifts += 1;
    bucket.people = 1;

    result.shifts.push(shift_wage);
  }

  result
}

/// Hours of the *other* shifts that precede `current` chronologically:
/// every shift starting strictly before it in `Weekly` mode, restricted
/// to the same calendar day in `Daily` mode.
fn accumulated_hours(timed: &[Timed], current: &Timed, mode: OvertimeMode) -> f64 {
  timed
    .iter()
    .filter(|other| other.start < current.start)
    .filter(|other| match mode {
      OvertimeMode::Weekly => true,
      OvertimeMode::Daily => other.day == current.day,
    })
    .map(|other| other.hours)
    .sum()
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};
  use rota_core::shift::{ShiftPatch, ShiftStatus, ShiftTime};

  use super::*;

  fn shift(id: &str, start: &str, end: &str, wage: Option<f64>) -> Shift {
    Shift {
      id:             id.to_string(),
      start:          start.parse().unwrap(),
      end:            end.parse().unwrap(),
      position:       None,
      notes:          None,
      hourly_wage:    wage,
      status:         ShiftStatus::Published,
      pending_update: None,
      deleting:       false,
      updated_at:     Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
  }

  fn weekly(hours_limit: f64) -> WagePolicy {
    WagePolicy {
      mode: OvertimeMode::Weekly,
      hours_limit,
      multiplier: 1.5,
    }
  }

  fn daily(hours_limit: f64) -> WagePolicy {
    WagePolicy {
      mode: OvertimeMode::Daily,
      hours_limit,
      multiplier: 1.5,
    }
  }

  fn by_id<'a>(wages: &'a EmployeeWeekWages, id: &str) -> &'a ShiftWage {
    wages
      .shifts
      .iter()
      .find(|s| s.shift_id == id)
      .unwrap_or_else(|| panic!("no wage record for {id}"))
  }

  #[test]
  fn empty_shift_list_is_empty_summary() {
    let wages = employee_week_wages(&[], Some(&weekly(40.0)));
    assert!(wages.shifts.is_empty());
    assert!(wages.by_day.is_empty());
    assert_eq!(wages.total(), DayTotals::default());
  }

  #[test]
  fn single_shift_no_policy() {
    // 09:00–17:00 at 20/h: 8 normal hours, 160 total.
    let shifts =
      [shift("a", "01-01-2024 09:00", "01-01-2024 17:00", Some(20.0))];
    let wages = employee_week_wages(&shifts, None);

    let a = by_id(&wages, "a");
    assert_eq!(a.normal_hours, 8.0);
    assert_eq!(a.overtime_hours, 0.0);
    assert_eq!(a.total_wage, 160.0);

    let monday = &wages.by_day[&1];
    assert_eq!(monday.total_hours, 8.0);
    assert_eq!(monday.total_wage, 160.0);
    assert_eq!(monday.total_shifts, 1);
    assert_eq!(monday.people, 1);
  }

  #[test]
  fn no_hourly_wage_means_hours_but_no_pay() {
    let shifts = [shift("a", "01-01-2024 09:00", "01-01-2024 17:00", None)];
    let wages = employee_week_wages(&shifts, Some(&weekly(40.0)));
    let a = by_id(&wages, "a");
    assert_eq!(a.total_hours, 8.0);
    assert_eq!(a.total_wage, 0.0);
  }

  #[test]
  fn daily_limit_splits_second_shift() {
    // Same day: 4h + 5h against an 8h daily cap. The first shift stays
    // fully normal; the second splits 4h normal / 1h overtime.
    let shifts = [
      shift("a", "01-01-2024 08:00", "01-01-2024 12:00", Some(10.0)),
      shift("b", "01-01-2024 13:00", "01-01-2024 18:00", Some(10.0)),
    ];
    let wages = employee_week_wages(&shifts, Some(&daily(8.0)));

    let a = by_id(&wages, "a");
    assert_eq!(a.normal_hours, 4.0);
    assert_eq!(a.overtime_hours, 0.0);

    let b = by_id(&wages, "b");
    assert_eq!(b.normal_hours, 4.0);
    assert_eq!(b.overtime_hours, 1.0);

    // Overtime rate: 90 total wage / 9 total hours × 0.5 = 5/h.
    assert_eq!(b.overtime_wage, 5.0);
    // The shift's full base wage plus the overtime premium.
    assert_eq!(b.normal_wage, 50.0);
    assert_eq!(b.total_wage, 55.0);
  }

  #[test]
  fn daily_limit_resets_across_days() {
    let shifts = [
      shift("a", "01-01-2024 08:00", "01-01-2024 17:00", Some(10.0)),
      shift("b", "02-01-2024 08:00", "02-01-2024 17:00", Some(10.0)),
    ];
    let wages = employee_week_wages(&shifts, Some(&daily(9.0)));
    assert_eq!(by_id(&wages, "a").overtime_hours, 0.0);
    assert_eq!(by_id(&wages, "b").overtime_hours, 0.0);
  }

  #[test]
  fn weekly_limit_boundary() {
    // Five 8h shifts hit the 40h cap exactly; a sixth 2h shift is all
    // overtime, and the earlier shifts keep their normal hours.
    let mut shifts: Vec<Shift> = (1..=5)
      .map(|day| {
        shift(
          &format!("d{day}"),
          &format!("0{day}-01-2024 09:00"),
          &format!("0{day}-01-2024 17:00"),
          Some(20.0),
        )
      })
      .collect();
    shifts.push(shift("sat", "06-01-2024 10:00", "06-01-2024 12:00", Some(20.0)));

    let wages = employee_week_wages(&shifts, Some(&weekly(40.0)));

    let sat = by_id(&wages, "sat");
    assert_eq!(sat.overtime_hours, 2.0);
    assert_eq!(sat.normal_hours, 0.0);
    for day in 1..=5 {
      let earlier = by_id(&wages, &format!("d{day}"));
      assert_eq!(earlier.overtime_hours, 0.0);
      assert_eq!(earlier.normal_hours, 8.0);
    }

    // Rate: 840 wage / 42 hours × 0.5 = 10/h → 20 overtime pay.
    assert_eq!(sat.overtime_wage, 20.0);
    assert_eq!(wages.total().overtime_wage, 20.0);
  }

  #[test]
  fn weekly_limit_straddled_by_one_shift() {
    // 36h accumulated, then a 6h shift against a 40h cap: 4h normal,
    // 2h overtime within the same shift.
    let shifts = [
      shift("a", "01-01-2024 00:00", "01-01-2024 18:00", Some(10.0)),
      shift("b", "02-01-2024 00:00", "02-01-2024 18:00", Some(10.0)),
      shift("c", "03-01-2024 09:00", "03-01-2024 15:00", Some(10.0)),
    ];
    let wages = employee_week_wages(&shifts, Some(&weekly(40.0)));
    let c = by_id(&wages, "c");
    assert_eq!(c.normal_hours, 4.0);
    assert_eq!(c.overtime_hours, 2.0);
  }

  #[test]
  fn deleting_shifts_are_excluded_everywhere() {
    let mut ghost = shift("ghost", "01-01-2024 00:00", "01-01-2024 09:00", Some(10.0));
    ghost.deleting = true;
    let shifts = [
      ghost,
      shift("b", "01-01-2024 09:00", "01-01-2024 17:00", Some(10.0)),
    ];
    let wages = employee_week_wages(&shifts, Some(&daily(8.0)));

    // The deleting shift produced no record and triggered no overtime.
    assert!(wages.shifts.iter().all(|s| s.shift_id != "ghost"));
    assert_eq!(by_id(&wages, "b").overtime_hours, 0.0);
    assert_eq!(wages.total().total_hours, 8.0);
    assert_eq!(wages.by_day[&1].total_shifts, 1);
  }

  #[test]
  fn pending_times_drive_the_computation() {
    let mut s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00", Some(10.0));
    s.pending_update = Some(ShiftPatch {
      start: Some("01-01-2024 09:00".parse::<ShiftTime>().unwrap()),
      end: Some("01-01-2024 13:00".parse::<ShiftTime>().unwrap()),
      ..Default::default()
    });
    let wages = employee_week_wages(&[s], None);
    assert_eq!(by_id(&wages, "a").total_hours, 4.0);
  }

  #[test]
  fn zero_duration_shift_contributes_zero() {
    let shifts = [
      shift("z", "01-01-2024 09:00", "01-01-2024 09:00", Some(10.0)),
      shift("b", "01-01-2024 10:00", "01-01-2024 18:00", Some(10.0)),
    ];
    let wages = employee_week_wages(&shifts, Some(&weekly(40.0)));
    let z = by_id(&wages, "z");
    assert_eq!(z.total_hours, 0.0);
    assert_eq!(z.total_wage, 0.0);
    assert_eq!(wages.total().total_hours, 8.0);
  }

  #[test]
  fn day_buckets_sum_to_week_total() {
    let shifts = [
      shift("a", "01-01-2024 09:00", "01-01-2024 17:30", Some(12.0)),
      shift("b", "02-01-2024 22:00", "02-01-2024 02:00", Some(15.0)),
      shift("c", "04-01-2024 07:15", "04-01-2024 15:00", Some(18.5)),
      shift("d", "04-01-2024 16:00", "04-01-2024 23:45", Some(18.5)),
    ];
    let wages = employee_week_wages(&shifts, Some(&weekly(20.0)));

    let bucket_hours: f64 =
      wages.by_day.values().map(|b| b.total_hours).sum();
    let shift_hours: f64 = wages.shifts.iter().map(|s| s.total_hours).sum();
    assert!((bucket_hours - shift_hours).abs() < 1e-9);
    assert!((wages.total().total_hours - shift_hours).abs() < 1e-9);

    let bucket_wage: f64 = wages.by_day.values().map(|b| b.total_wage).sum();
    let shift_wage: f64 = wages.shifts.iter().map(|s| s.total_wage).sum();
    assert!((bucket_wage - shift_wage).abs() < 1e-9);
  }
}
