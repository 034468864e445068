//! Location-wide week aggregation and pending-change counting.

use std::collections::BTreeMap;

use rota_core::{
  shift::{Shift, ShiftStatus},
  summary::{ScheduleDoc, WeekSummary, WeekTotals},
};

use crate::calc::EmployeeWeekWages;

// ─── Week aggregation ────────────────────────────────────────────────────────

/// Roll per-employee wage records up into the whole-week, whole-location
/// summary.
///
/// `total_people` counts one per employee record present — an employee
/// with zero hours still headcounts. The labor percentage divides the
/// week's total wage by the document's projected sales, and is 0 when no
/// sales are projected.
pub fn aggregate_week(
  records: &BTreeMap<String, EmployeeWeekWages>,
  doc: &ScheduleDoc,
) -> WeekSummary {
  let mut summary = WeekSummary::default();

  for wages in records.values() {
    for (weekday, bucket) in &wages.by_day {
      summary.by_day.entry(*weekday).or_default().absorb(bucket);
    }
  }

  let mut total = WeekTotals {
    total_people: records.len() as u32,
    projected_sales: doc.total_projected_sales(),
    ..Default::default()
  };
  for bucket in summary.by_day.values() {
    total.normal_hours += bucket.normal_hours;
    total.overtime_hours += bucket.overtime_hours;
    total.total_hours += bucket.total_hours;
    total.normal_wage += bucket.normal_wage;
    total.overtime_wage += bucket.overtime_wage;
    total.total_wage += bucket.total_wage;
    total.total_shifts += bucket.total_shifts;
  }
  if total.projected_sales > 0.0 {
    total.labor_percentage = total.total_wage / total.projected_sales * 100.0;
  }

  summary.total = total;
  summary
}

// ─── Updates count ───────────────────────────────────────────────────────────

/// How many shifts a publish pass would touch, by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatesCount {
  pub new_or_draft:    u32,
  pub deleted:         u32,
  pub pending_updates: u32,
  pub total:           u32,
}

/// Classify every shift into at most one pending-change bucket.
///
/// Precedence: a `Draft` shift is always `new_or_draft` (a draft's edits
/// merge straight into its base fields, so the bucket also covers a
/// draft that somehow carries a pending update); otherwise `deleting`
/// wins; otherwise a non-empty pending update counts. A clean published
/// shift is not counted at all.
pub fn updates_count<'a, I>(shifts: I) -> UpdatesCount
where
  I: IntoIterator<Item = &'a Shift>,
{
  let mut count = UpdatesCount::default();
  for shift in shifts {
    if shift.status == ShiftStatus::Draft {
      count.new_or_draft += 1;
    } else if shift.deleting {
      count.deleted += 1;
    } else if shift
      .pending_update
      .as_ref()
      .is_some_and(|p| p.field_count() > 0)
    {
      count.pending_updates += 1;
    }
  }
  count.total = count.new_or_draft + count.deleted + count.pending_updates;
  count
}

// ─── Tests ───────────────────────────────────────────────────────────────────
