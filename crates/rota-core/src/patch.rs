//! Remote patch format and path conventions.
//!
//! A mutation's remote half is a flat set of `path → value` writes (or
//! tombstones) that the external sink applies atomically. Paths follow
//! the hierarchical key shape of the remote document store:
//!
//! ```text
//! scheduleData/{organizationId}/{locationId}/{weekId}/shifts/{employeeId}/{shiftId}[/{field}]
//! scheduleData/{organizationId}/{locationId}/{weekId}/summary[/{field}]
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Result, week::WeekId};

// ─── Patch values ────────────────────────────────────────────────────────────

/// One write in a remote patch: a literal value, or a tombstone removing
/// the subtree at the path.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchValue {
  Set(serde_json::Value),
  Delete,
}

// ─── RemotePatch ─────────────────────────────────────────────────────────────

/// A flat, atomic batch of `path → value` writes for the remote sink.
///
/// Scoped to only the fields a mutation changes; the sink guarantees
/// all-or-nothing application of one batch, and the engine never assumes
/// ordering across separate batches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemotePatch {
  writes: BTreeMap<String, PatchValue>,
}

impl RemotePatch {
  pub fn new() -> Self { Self::default() }

  /// Record a literal write at `path`.
  pub fn set(
    &mut self,
    path: impl Into<String>,
    value: impl Serialize,
  ) -> Result<()> {
    self
      .writes
      .insert(path.into(), PatchValue::Set(serde_json::to_value(value)?));
    Ok(())
  }

  /// Record a tombstone at `path`.
  pub fn delete(&mut self, path: impl Into<String>) {
    self.writes.insert(path.into(), PatchValue::Delete);
  }

  /// Fold another patch into this one; later writes win per path.
  pub fn merge(&mut self, other: RemotePatch) {
    self.writes.extend(other.writes);
  }

  pub fn is_empty(&self) -> bool { self.writes.is_empty() }

  pub fn len(&self) -> usize { self.writes.len() }

  pub fn writes(&self) -> &BTreeMap<String, PatchValue> { &self.writes }

  pub fn iter(&self) -> impl Iterator<Item = (&String, &PatchValue)> {
    self.writes.iter()
  }
}

impl IntoIterator for RemotePatch {
  type IntoIter = std::collections::btree_map::IntoIter<String, PatchValue>;
  type Item = (String, PatchValue);

  fn into_iter(self) -> Self::IntoIter { self.writes.into_iter() }
}

// ─── Path builder ────────────────────────────────────────────────────────────

/// The remote location of one week's schedule data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePath {
  pub organization_id: String,
  pub location_id:     String,
  pub week_id:         WeekId,
}

impl SchedulePath {
  pub fn new(
    organization_id: impl Into<String>,
    location_id: impl Into<String>,
    week_id: WeekId,
  ) -> Self {
    Self {
      organization_id: organization_id.into(),
      location_id: location_id.into(),
      week_id,
    }
  }

  fn week_root(&self) -> String {
    format!(
      "scheduleData/{}/{}/{}",
      self.organization_id, self.location_id, self.week_id
    )
  }

  /// `…/{weekId}/shifts`
  pub fn shifts_root(&self) -> String {
    format!("{}/shifts", self.week_root())
  }

  /// `…/shifts/{employeeId}/{shiftId}`
  pub fn shift(&self, employee_id: &str, shift_id: &str) -> String {
    format!("{}/{employee_id}/{shift_id}", self.shifts_root())
  }

  /// `…/shifts/{employeeId}/{shiftId}/{field}`
  pub fn shift_field(
    &self,
    employee_id: &str,
    shift_id: &str,
    field: &str,
  ) -> String {
    format!("{}/{field}", self.shift(employee_id, shift_id))
  }

  /// `…/{weekId}/summary`
  pub fn summary(&self) -> String {
    format!("{}/summary", self.week_root())
  }

  /// `…/{weekId}/summary/{field}`
  pub fn summary_field(&self, field: &str) -> String {
    format!("{}/{field}", self.summary())
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
