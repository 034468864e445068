//! [`ScheduleEditor`] — the caller-facing surface of the mutation engine.
//!
//! An editor owns the optimistic local copy of one (location, week)
//! subtree and a handle to the remote sink. Reads are synchronous over
//! the local snapshot; mutations go through the paired-update driver.
//! The editor does not queue or lock: callers serialize mutations
//! against the same employee/week pair, or accept last-write-wins at the
//! sink's field-level merge.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rota_core::{
  Result,
  patch::SchedulePath,
  policy::{ScheduleSettings, WagePolicy},
  shift::{EmployeeWeekShifts, NewShift, Shift, ShiftPatch},
  sink::RemoteSink,
  summary::{ScheduleDoc, WeekSummary},
  week::WeekId,
};
use rota_wage::{UpdatesCount, EmployeeWeekWages};
use uuid::Uuid;

use crate::{
  clone, paired,
  publish::{self, PublishOutcome},
  sales, shifts,
};

// ─── Week state ──────────────────────────────────────────────────────────────

/// The local snapshot of one week: the employee/shift map plus the
/// summary document. Replaced wholesale on every mutation and on every
/// subscription emission.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekState {
  pub shifts:  EmployeeWeekShifts,
  pub summary: ScheduleDoc,
}

impl WeekState {
  /// The zeroed state for a week nothing has been stored for yet.
  pub fn empty(week: WeekId) -> Self {
    Self {
      shifts:  EmployeeWeekShifts::new(),
      summary: ScheduleDoc::empty(week),
    }
  }

  pub fn shift(&self, employee_id: &str, shift_id: &str) -> Option<&Shift> {
    self.shifts.get(employee_id).and_then(|m| m.get(shift_id))
  }

  /// Every shift in the week, all employees.
  pub fn all_shifts(&self) -> impl Iterator<Item = &Shift> {
    self.shifts.values().flat_map(|m| m.values())
  }

  pub fn has_shifts(&self) -> bool {
    self.shifts.values().any(|m| !m.is_empty())
  }
}

// ─── Subscription events ─────────────────────────────────────────────────────

/// One emission from the remote subscription source. Every emission is a
/// total replacement of the corresponding local view, never a delta.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
  Shifts(EmployeeWeekShifts),
  Summary(ScheduleDoc),
}

// ─── Editor ──────────────────────────────────────────────────────────────────

/// Optimistic editor for one (organization, location, week) subtree.
pub struct ScheduleEditor<S: RemoteSink> {
  sink:     S,
  path:     SchedulePath,
  settings: ScheduleSettings,
  state:    WeekState,
}

impl<S: RemoteSink> ScheduleEditor<S> {
  pub fn new(sink: S, path: SchedulePath, settings: ScheduleSettings) -> Self {
    let state = WeekState::empty(path.week_id);
    Self {
      sink,
      path,
      settings,
      state,
    }
  }

  pub fn path(&self) -> &SchedulePath { &self.path }

  pub fn state(&self) -> &WeekState { &self.state }

  pub fn shifts(&self) -> &EmployeeWeekShifts { &self.state.shifts }

  pub fn summary(&self) -> &ScheduleDoc { &self.state.summary }

  pub fn policy(&self) -> Option<WagePolicy> { self.settings.policy() }

  /// Absorb a subscription emission, replacing the matching view in full.
  pub fn absorb(&mut self, event: SnapshotEvent) {
    match event {
      SnapshotEvent::Shifts(shifts) => self.state.shifts = shifts,
      SnapshotEvent::Summary(summary) => self.state.summary = summary,
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Per-employee wage breakdowns for the current snapshot, each
  /// employee's shifts ordered by effective start.
  pub fn week_wages(&self) -> BTreeMap<String, EmployeeWeekWages> {
    let policy = self.policy();
    self
      .state
      .shifts
      .iter()
      .map(|(employee_id, shift_map)| {
        let mut shifts: Vec<Shift> = shift_map.values().cloned().collect();
        shifts.sort_by_key(|s| s.effective().start);
        (
          employee_id.clone(),
          rota_wage::employee_week_wages(&shifts, policy.as_ref()),
        )
      })
      .collect()
  }

  /// The location-wide week summary computed from the current snapshot.
  pub fn summary_view(&self) -> WeekSummary {
    rota_wage::aggregate_week(&self.week_wages(), &self.state.summary)
  }

  /// Pending-change counts for the current snapshot.
  pub fn updates(&self) -> UpdatesCount {
    rota_wage::updates_count(self.state.all_shifts())
  }

  // ── Mutations ─────────────────────────────────────────────────────────

  /// Create a `Draft` shift with an engine-generated id.
  pub async fn create_shift(
    &mut self,
    employee_id: &str,
    input: NewShift,
    now: DateTime<Utc>,
  ) -> Result<Shift> {
    let id = Uuid::new_v4().to_string();
    self.create_shift_with_id(employee_id, id, input, now).await
  }

  /// Create a `Draft` shift under a caller-supplied id. Fails when the
  /// id is already taken.
  pub async fn create_shift_with_id(
    &mut self,
    employee_id: &str,
    id: String,
    input: NewShift,
    now: DateTime<Utc>,
  ) -> Result<Shift> {
    let shift = Shift::from_new(input, id, now);
    let update =
      shifts::create(&self.path, &self.state, employee_id, shift.clone())?;
    paired::commit(&self.sink, "create_shift", &mut self.state, update).await?;
    Ok(shift)
  }

  /// Create one `Draft` shift per requested ISO weekday, keyed
  /// `{isoWeekday}-{templateId}` so re-running the same template is a
  /// deterministic overwrite.
  pub async fn create_recurring(
    &mut self,
    employee_id: &str,
    template: NewShift,
    template_id: &str,
    weekdays: &[u8],
    now: DateTime<Utc>,
  ) -> Result<Vec<Shift>> {
    let (update, created) = shifts::create_recurring(
      &self.path,
      &self.state,
      employee_id,
      template,
      template_id,
      weekdays,
      now,
    )?;
    paired::commit(&self.sink, "create_recurring", &mut self.state, update)
      .await?;
    Ok(created)
  }

  /// Apply a partial edit. A draft takes the patch straight into its
  /// base fields; a published shift stages it as a pending update.
  pub async fn update_shift(
    &mut self,
    employee_id: &str,
    shift_id: &str,
    patch: ShiftPatch,
    now: DateTime<Utc>,
  ) -> Result<Shift> {
    match shifts::update(
      &self.path,
      &self.state,
      employee_id,
      shift_id,
      &patch,
      now,
    )? {
      Some(update) => {
        paired::commit(&self.sink, "update_shift", &mut self.state, update)
          .await?;
      }
      // Empty patch: nothing to stage, nothing to write.
      None => {}
    }
    self.current_shift(employee_id, shift_id)
  }

  /// Discard a staged pending update. Calling this on a shift with no
  /// pending update is an idempotent no-op.
  pub async fn cancel_update(
    &mut self,
    employee_id: &str,
    shift_id: &str,
    now: DateTime<Utc>,
  ) -> Result<Shift> {
    if let Some(update) =
      shifts::cancel_update(&self.path, &self.state, employee_id, shift_id, now)?
    {
      paired::commit(&self.sink, "cancel_update", &mut self.state, update)
        .await?;
    }
    self.current_shift(employee_id, shift_id)
  }

  /// Delete a shift: a draft is removed outright, a published shift is
  /// soft-deleted (`deleting = true`, reversible via
  /// [`Self::restore_shift`]).
  pub async fn delete_shift(
    &mut self,
    employee_id: &str,
    shift_id: &str,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let update =
      shifts::delete(&self.path, &self.state, employee_id, shift_id, now)?;
    paired::commit(&self.sink, "delete_shift", &mut self.state, update).await
  }

  /// Undo a soft delete.
  pub async fn restore_shift(
    &mut self,
    employee_id: &str,
    shift_id: &str,
    now: DateTime<Utc>,
  ) -> Result<Shift> {
    let update =
      shifts::restore(&self.path, &self.state, employee_id, shift_id, now)?;
    paired::commit(&self.sink, "restore_shift", &mut self.state, update)
      .await?;
    self.current_shift(employee_id, shift_id)
  }

  /// Publish the week: promote drafts and staged updates, drop
  /// soft-deleted shifts, and stamp the summary document. Returns the
  /// explicit no-op signal when no shift needs a patch.
  pub async fn publish_week(
    &mut self,
    recipients: &[String],
    now: DateTime<Utc>,
  ) -> Result<PublishOutcome> {
    match publish::publish(
      &self.path,
      &self.state,
      self.policy().as_ref(),
      recipients,
      now,
    )? {
      Some((update, outcome)) => {
        paired::commit(&self.sink, "publish_week", &mut self.state, update)
          .await?;
        Ok(outcome)
      }
      None => Ok(PublishOutcome::NothingToPublish),
    }
  }

  /// Copy a source week's published shifts into this (empty) week as
  /// drafts, time-shifted by the whole-week delta between the two
  /// Mondays.
  pub async fn clone_week(
    &mut self,
    source_week: WeekId,
    source_shifts: &EmployeeWeekShifts,
    now: DateTime<Utc>,
  ) -> Result<usize> {
    let (update, cloned) = clone::clone_week(
      &self.path,
      &self.state,
      source_week,
      source_shifts,
      now,
    )?;
    paired::commit(&self.sink, "clone_week", &mut self.state, update).await?;
    Ok(cloned)
  }

  /// Record projected sales amounts per ISO weekday on the summary
  /// document.
  pub async fn update_projected_sales(
    &mut self,
    sales: BTreeMap<u8, f64>,
  ) -> Result<()> {
    let update = sales::update_projected_sales(&self.path, &self.state, sales)?;
    paired::commit(&self.sink, "update_projected_sales", &mut self.state, update)
      .await
  }

  fn current_shift(&self, employee_id: &str, shift_id: &str) -> Result<Shift> {
    self
      .state
      .shift(employee_id, shift_id)
      .cloned()
      .ok_or_else(|| rota_core::Error::ShiftNotFound {
        employee_id: employee_id.to_string(),
        shift_id:    shift_id.to_string(),
      })
  }
}
