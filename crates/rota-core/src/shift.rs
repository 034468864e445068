//! Shift value object — a single scheduled span of work.
//!
//! A shift carries its base primary fields plus an optional
//! `pending_update` overlay staged against a published shift. The
//! "effective" view merges the overlay over the base field-by-field; the
//! overlay never touches `status`, `deleting`, or `updated_at`.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

// ─── Shift time encoding ─────────────────────────────────────────────────────

/// The fixed textual format shift instants are stored in remotely.
///
/// Deliberately timezone-naive: wage math downstream assumes local
/// wall-clock semantics, so this must not become zone-aware arithmetic.
pub const SHIFT_TIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// A shift instant, wire-encoded as `DD-MM-YYYY HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShiftTime(NaiveDateTime);

impl ShiftTime {
  pub fn new(instant: NaiveDateTime) -> Self { Self(instant) }

  pub fn instant(&self) -> NaiveDateTime { self.0 }

  pub fn date(&self) -> NaiveDate { self.0.date() }
}

impl FromStr for ShiftTime {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    NaiveDateTime::parse_from_str(s, SHIFT_TIME_FORMAT)
      .map(Self)
      .map_err(|_| Error::InvalidShiftTime(s.to_string()))
  }
}

impl fmt::Display for ShiftTime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0.format(SHIFT_TIME_FORMAT))
  }
}

impl Serialize for ShiftTime {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for ShiftTime {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(serde::de::Error::custom)
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Life-cycle state of a shift. A shift is created `Draft` and becomes
/// `Published` by a publish pass; edits to a published shift are staged in
/// `pending_update` without leaving `Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
  Draft,
  Published,
}

// ─── Primary fields ──────────────────────────────────────────────────────────

/// The caller-editable fields of a shift, as seen after resolving any
/// pending update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrimaryFields {
  pub start:       ShiftTime,
  pub end:         ShiftTime,
  pub position:    Option<String>,
  pub notes:       Option<String>,
  pub hourly_wage: Option<f64>,
}

/// A partial update against [`PrimaryFields`]. Fields left `None` fall
/// back to the base value when resolving the effective view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub start:       Option<ShiftTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub end:         Option<ShiftTime>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position:    Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hourly_wage: Option<f64>,
}

impl ShiftPatch {
  pub fn is_empty(&self) -> bool { self.field_count() == 0 }

  /// Number of fields this patch would change.
  pub fn field_count(&self) -> usize {
    [
      self.start.is_some(),
      self.end.is_some(),
      self.position.is_some(),
      self.notes.is_some(),
      self.hourly_wage.is_some(),
    ]
    .into_iter()
    .filter(|set| *set)
    .count()
  }

  /// Resolve this patch over `base`, field-by-field — never a whole-object
  /// replace.
  pub fn merge_over(&self, base: &PrimaryFields) -> PrimaryFields {
    PrimaryFields {
      start:       self.start.unwrap_or(base.start),
      end:         self.end.unwrap_or(base.end),
      position:    self.position.clone().or_else(|| base.position.clone()),
      notes:       self.notes.clone().or_else(|| base.notes.clone()),
      hourly_wage: self.hourly_wage.or(base.hourly_wage),
    }
  }

  /// Layer `newer` over this patch, keeping fields `newer` leaves unset.
  pub fn overlay(&self, newer: &ShiftPatch) -> ShiftPatch {
    ShiftPatch {
      start:       newer.start.or(self.start),
      end:         newer.end.or(self.end),
      position:    newer.position.clone().or_else(|| self.position.clone()),
      notes:       newer.notes.clone().or_else(|| self.notes.clone()),
      hourly_wage: newer.hourly_wage.or(self.hourly_wage),
    }
  }
}

// ─── Duration ────────────────────────────────────────────────────────────────

/// A shift's length, split into whole hours and leftover minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDuration {
  pub hours:   i64,
  pub minutes: i64,
}

impl ShiftDuration {
  pub const ZERO: Self = Self {
    hours:   0,
    minutes: 0,
  };

  pub fn from_minutes(total: i64) -> Self {
    Self {
      hours:   total / 60,
      minutes: total % 60,
    }
  }

  pub fn total_minutes(&self) -> i64 { self.hours * 60 + self.minutes }

  pub fn total_hours(&self) -> f64 { self.total_minutes() as f64 / 60.0 }
}

// ─── Shift ───────────────────────────────────────────────────────────────────

/// A single shift record as stored remotely under
/// `…/shifts/{employeeId}/{shiftId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
  pub id:             String,
  pub start:          ShiftTime,
  pub end:            ShiftTime,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position:       Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notes:          Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hourly_wage:    Option<f64>,
  pub status:         ShiftStatus,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pending_update: Option<ShiftPatch>,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub deleting:       bool,
  pub updated_at:     DateTime<Utc>,
}

impl Shift {
  /// The shift's base primary fields, without any pending overlay.
  pub fn base(&self) -> PrimaryFields {
    PrimaryFields {
      start:       self.start,
      end:         self.end,
      position:    self.position.clone(),
      notes:       self.notes.clone(),
      hourly_wage: self.hourly_wage,
    }
  }

  /// The latest view of the shift: pending-update fields where present,
  /// base fields elsewhere.
  pub fn effective(&self) -> PrimaryFields {
    let base = self.base();
    match &self.pending_update {
      Some(patch) => patch.merge_over(&base),
      None => base,
    }
  }

  /// Length of the shift. Zero when marked `deleting`, so a soft-deleted
  /// shift contributes nothing to any aggregate.
  ///
  /// When the pending update carries both a start and an end, the
  /// duration reflects the pending pair; otherwise the effective
  /// start/end pair is used.
  pub fn duration(&self) -> ShiftDuration {
    if self.deleting {
      return ShiftDuration::ZERO;
    }
    let (start, end) = match &self.pending_update {
      Some(ShiftPatch {
        start: Some(start),
        end: Some(end),
        ..
      }) => (*start, *end),
      _ => {
        let effective = self.effective();
        (effective.start, effective.end)
      }
    };
    ShiftDuration::from_minutes(span_minutes(start, end))
  }

  /// The effective `[start, end)` interval with day rollover resolved.
  pub fn effective_interval(&self) -> (NaiveDateTime, NaiveDateTime) {
    let effective = self.effective();
    let start = effective.start.instant();
    (start, start + Duration::minutes(span_minutes(effective.start, effective.end)))
  }

  /// Whether the effective intervals of two shifts intersect.
  ///
  /// Advisory: callers use this to reject double-booking an employee;
  /// the mutation engine itself does not enforce it.
  pub fn overlaps(&self, other: &Shift) -> bool {
    let (a_start, a_end) = self.effective_interval();
    let (b_start, b_end) = other.effective_interval();
    a_start < b_end && b_start < a_end
  }

  /// True when the shift differs from its published form: a non-empty
  /// pending update, a pending soft delete, or never published at all.
  pub fn has_pending_changes(&self) -> bool {
    self.pending_update.as_ref().is_some_and(|p| !p.is_empty())
      || self.deleting
      || self.status == ShiftStatus::Draft
  }
}

/// Minutes between two wall-clock instants, with the day-rollover rule:
/// an end before its start means the shift crosses midnight and the end
/// belongs to the next day.
///
/// Intentionally also absorbs genuinely inverted input instead of
/// rejecting it; downstream wage math relies on this wall-clock reading.
fn span_minutes(start: ShiftTime, end: ShiftTime) -> i64 {
  let start = start.instant();
  let mut end = end.instant();
  if end < start {
    end += Duration::days(1);
  }
  (end - start).num_minutes()
}

// ─── NewShift ────────────────────────────────────────────────────────────────

/// Caller-facing input for creating a shift. The id, `Draft` status, and
/// timestamp are assigned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewShift {
  pub start:       ShiftTime,
  pub end:         ShiftTime,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub position:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub hourly_wage: Option<f64>,
}

impl Shift {
  /// Materialise a `Draft` shift from creation input.
  pub fn from_new(input: NewShift, id: String, now: DateTime<Utc>) -> Self {
    Self {
      id,
      start: input.start,
      end: input.end,
      position: input.position,
      notes: input.notes,
      hourly_wage: input.hourly_wage,
      status: ShiftStatus::Draft,
      pending_update: None,
      deleting: false,
      updated_at: now,
    }
  }
}

// ─── Week-shift maps ─────────────────────────────────────────────────────────

/// One employee's shifts for a week, keyed by shift id.
pub type WeekShiftMap = BTreeMap<String, Shift>;

/// All shifts for a (location, week) pair, keyed by employee id. Owned by
/// the calling application's store; mutated only through the paired-update
/// contract of the mutation engine.
pub type EmployeeWeekShifts = BTreeMap<String, WeekShiftMap>;

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn time(s: &str) -> ShiftTime { s.parse().unwrap() }

  fn shift(id: &str, start: &str, end: &str) -> Shift {
    Shift {
      id:             id.to_string(),
      start:          time(start),
      end:            time(end),
      position:       Some("server".to_string()),
      notes:          None,
      hourly_wage:    Some(20.0),
      status:         ShiftStatus::Published,
      pending_update: None,
      deleting:       false,
      updated_at:     Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
  }

  #[test]
  fn shift_time_round_trips_through_text() {
    let t = time("01-01-2024 09:30");
    assert_eq!(t.to_string(), "01-01-2024 09:30");
    assert_eq!(time(&t.to_string()), t);
  }

  #[test]
  fn shift_time_rejects_malformed_text() {
    for bad in ["2024-01-01 09:00", "01-01-2024", "nonsense", ""] {
      assert!(bad.parse::<ShiftTime>().is_err(), "accepted {bad:?}");
    }
  }

  #[test]
  fn effective_with_no_patch_equals_base() {
    let s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    assert_eq!(s.effective(), s.base());

    let mut with_empty = s.clone();
    with_empty.pending_update = Some(ShiftPatch::default());
    assert_eq!(with_empty.effective(), s.base());
  }

  #[test]
  fn effective_merges_field_by_field() {
    let mut s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    s.pending_update = Some(ShiftPatch {
      end: Some(time("01-01-2024 18:00")),
      hourly_wage: Some(22.5),
      ..Default::default()
    });

    let effective = s.effective();
    assert_eq!(effective.start, time("01-01-2024 09:00"));
    assert_eq!(effective.end, time("01-01-2024 18:00"));
    assert_eq!(effective.hourly_wage, Some(22.5));
    // Untouched fields fall back to base.
    assert_eq!(effective.position.as_deref(), Some("server"));
  }

  #[test]
  fn duration_of_plain_shift() {
    let s = shift("a", "01-01-2024 09:00", "01-01-2024 17:30");
    let d = s.duration();
    assert_eq!((d.hours, d.minutes), (8, 30));
    assert_eq!(d.total_hours(), 8.5);
  }

  #[test]
  fn duration_crossing_midnight_adds_a_day() {
    let s = shift("a", "01-01-2024 22:00", "01-01-2024 02:00");
    assert_eq!(s.duration().total_minutes(), 4 * 60);
  }

  #[test]
  fn duration_uses_pending_pair_only_when_both_present() {
    let mut s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    s.pending_update = Some(ShiftPatch {
      start: Some(time("01-01-2024 10:00")),
      end: Some(time("01-01-2024 16:00")),
      ..Default::default()
    });
    assert_eq!(s.duration().total_hours(), 6.0);

    // Only one endpoint pending: the effective pair applies instead.
    s.pending_update = Some(ShiftPatch {
      end: Some(time("01-01-2024 18:00")),
      ..Default::default()
    });
    assert_eq!(s.duration().total_hours(), 9.0);
  }

  #[test]
  fn deleting_shift_has_zero_duration() {
    let mut s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    s.deleting = true;
    assert_eq!(s.duration(), ShiftDuration::ZERO);
  }

  #[test]
  fn overlap_detection() {
    let a = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    let b = shift("b", "01-01-2024 16:00", "01-01-2024 20:00");
    let c = shift("c", "01-01-2024 17:00", "01-01-2024 20:00");
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
    // [start, end) — touching endpoints do not overlap.
    assert!(!a.overlaps(&c));
  }

  #[test]
  fn overlap_respects_pending_times() {
    let a = shift("a", "01-01-2024 09:00", "01-01-2024 12:00");
    let mut b = shift("b", "01-01-2024 13:00", "01-01-2024 17:00");
    assert!(!a.overlaps(&b));
    b.pending_update = Some(ShiftPatch {
      start: Some(time("01-01-2024 11:00")),
      ..Default::default()
    });
    assert!(a.overlaps(&b));
  }

  #[test]
  fn has_pending_changes_cases() {
    let published = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    assert!(!published.has_pending_changes());

    let mut draft = published.clone();
    draft.status = ShiftStatus::Draft;
    assert!(draft.has_pending_changes());

    let mut deleting = published.clone();
    deleting.deleting = true;
    assert!(deleting.has_pending_changes());

    let mut pending = published.clone();
    pending.pending_update = Some(ShiftPatch {
      notes: Some("cover the bar".to_string()),
      ..Default::default()
    });
    assert!(pending.has_pending_changes());

    // An empty patch is not a pending change.
    let mut empty_patch = published.clone();
    empty_patch.pending_update = Some(ShiftPatch::default());
    assert!(!empty_patch.has_pending_changes());
  }

  #[test]
  fn patch_overlay_layers_newest_on_top() {
    let older = ShiftPatch {
      start: Some(time("01-01-2024 08:00")),
      notes: Some("early open".to_string()),
      ..Default::default()
    };
    let newer = ShiftPatch {
      start: Some(time("01-01-2024 07:00")),
      ..Default::default()
    };
    let merged = older.overlay(&newer);
    assert_eq!(merged.start, Some(time("01-01-2024 07:00")));
    assert_eq!(merged.notes.as_deref(), Some("early open"));
  }

  #[test]
  fn serde_uses_wire_field_names() {
    let s = shift("a", "01-01-2024 09:00", "01-01-2024 17:00");
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["start"], "01-01-2024 09:00");
    assert_eq!(json["hourlyWage"], 20.0);
    assert_eq!(json["status"], "published");
    assert!(json.get("deleting").is_none());

    let back: Shift = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
  }
}
