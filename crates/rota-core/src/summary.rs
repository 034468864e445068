//! Schedule summary documents — the per-(location, week) read model.
//!
//! One [`ScheduleDoc`] exists per location and week, created lazily with
//! zeroed totals when absent. Its `schedule_summary.total` always equals
//! the sum of the `by_day` buckets; the aggregator in `rota-wage` is the
//! only producer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::week::WeekId;

// ─── Day buckets ─────────────────────────────────────────────────────────────

/// Hour and wage totals for one ISO weekday (or one employee-day bucket).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
  pub normal_hours:   f64,
  pub overtime_hours: f64,
  pub total_hours:    f64,
  pub normal_wage:    f64,
  pub overtime_wage:  f64,
  pub total_wage:     f64,
  pub total_shifts:   u32,
  /// One per employee with at least one shift in the bucket.
  pub people:         u32,
}

impl DayTotals {
  /// Fold another bucket into this one.
  pub fn absorb(&mut self, other: &DayTotals) {
    self.normal_hours += other.normal_hours;
    self.overtime_hours += other.overtime_hours;
    self.total_hours += other.total_hours;
    self.normal_wage += other.normal_wage;
    self.overtime_wage += other.overtime_wage;
    self.total_wage += other.total_wage;
    self.total_shifts += other.total_shifts;
    self.people += other.people;
  }
}

// ─── Week totals ─────────────────────────────────────────────────────────────

/// Location-wide totals for the whole week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTotals {
  pub normal_hours:     f64,
  pub overtime_hours:   f64,
  pub total_hours:      f64,
  pub normal_wage:      f64,
  pub overtime_wage:    f64,
  pub total_wage:       f64,
  pub total_shifts:     u32,
  /// One per employee record present, even at zero hours.
  pub total_people:     u32,
  pub projected_sales:  f64,
  /// `total_wage / projected_sales * 100`; 0 when there are no sales.
  pub labor_percentage: f64,
}

/// The week's aggregated schedule: a grand total plus per-ISO-weekday
/// buckets (Monday=1 … Sunday=7).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
  pub total:  WeekTotals,
  pub by_day: BTreeMap<u8, DayTotals>,
}

// ─── Publish metadata ────────────────────────────────────────────────────────

/// Recorded on the summary document when a week is published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishData {
  pub published_at:            DateTime<Utc>,
  pub notification_recipients: Vec<String>,
}

// ─── Schedule document ───────────────────────────────────────────────────────

/// The per-(location, week) summary document stored remotely under
/// `…/{weekId}/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDoc {
  pub year:                   i32,
  pub week_number:            u32,
  #[serde(default)]
  pub schedule_summary:       WeekSummary,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub projected_sales_by_day: Option<BTreeMap<u8, f64>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub publish_data:           Option<PublishData>,
}

impl ScheduleDoc {
  /// The lazily-created zeroed document for a week with no stored summary.
  pub fn empty(week: WeekId) -> Self {
    Self {
      year:                   week.year(),
      week_number:            week.week(),
      schedule_summary:       WeekSummary::default(),
      projected_sales_by_day: None,
      publish_data:           None,
    }
  }

  /// Sum of all projected daily sales, 0 when none are recorded.
  pub fn total_projected_sales(&self) -> f64 {
    self
      .projected_sales_by_day
      .as_ref()
      .map(|by_day| by_day.values().sum())
      .unwrap_or(0.0)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
