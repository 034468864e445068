//! Paired updates for the per-shift life-cycle operations.
//!
//! Every function here is pure: it reads the current [`WeekState`] and
//! returns the `{remote patch, next snapshot}` pair (or a validation
//! error, detected before anything is applied). The driver in
//! [`crate::paired`] owns apply and rollback.

use chrono::{DateTime, NaiveTime, Utc};
use rota_core::{
  Error, Result,
  patch::{RemotePatch, SchedulePath},
  shift::{NewShift, Shift, ShiftPatch, ShiftStatus, ShiftTime},
};

use crate::{editor::WeekState, paired::PairedUpdate};

/// Look up a shift, failing with [`Error::ShiftNotFound`] when absent.
pub(crate) fn get_shift<'a>(
  state: &'a WeekState,
  employee_id: &str,
  shift_id: &str,
) -> Result<&'a Shift> {
  state
    .shift(employee_id, shift_id)
    .ok_or_else(|| Error::ShiftNotFound {
      employee_id: employee_id.to_string(),
      shift_id:    shift_id.to_string(),
    })
}

// ─── Create ──────────────────────────────────────────────────────────────────

pub(crate) fn create(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  shift: Shift,
) -> Result<PairedUpdate<WeekState>> {
  if state.shift(employee_id, &shift.id).is_some() {
    return Err(Error::InvalidOperation(format!(
      "shift {} already exists for employee {employee_id}",
      shift.id
    )));
  }

  let mut patch = RemotePatch::new();
  patch.set(path.shift(employee_id, &shift.id), &shift)?;

  let mut next = state.clone();
  next
    .shifts
    .entry(employee_id.to_string())
    .or_default()
    .insert(shift.id.clone(), shift);

  Ok(PairedUpdate { patch, next })
}

// ─── Create recurring ────────────────────────────────────────────────────────

/// One draft per requested ISO weekday whose date falls in the week,
/// deterministically keyed `{isoWeekday}-{templateId}`. Time-of-day comes
/// from the template, the date from the matching weekday column.
pub(crate) fn create_recurring(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  template: NewShift,
  template_id: &str,
  weekdays: &[u8],
  now: DateTime<Utc>,
) -> Result<(PairedUpdate<WeekState>, Vec<Shift>)> {
  if let Some(bad) = weekdays.iter().find(|d| !(1..=7).contains(*d)) {
    return Err(Error::InvalidOperation(format!(
      "iso weekday {bad} outside [1, 7]"
    )));
  }
  if weekdays.is_empty() {
    return Err(Error::InvalidOperation(
      "no weekdays requested for recurring shift".to_string(),
    ));
  }

  let start_time = template.start.instant().time();
  let end_time = template.end.instant().time();

  let mut patch = RemotePatch::new();
  let mut next = state.clone();
  let mut created = Vec::new();

  for day in path.week_id.days() {
    let weekday = chrono::Datelike::weekday(&day).number_from_monday() as u8;
    if !weekdays.contains(&weekday) {
      continue;
    }
    let shift = Shift::from_new(
      NewShift {
        start: at(day, start_time),
        end: at(day, end_time),
        ..template.clone()
      },
      format!("{weekday}-{template_id}"),
      now,
    );
    patch.set(path.shift(employee_id, &shift.id), &shift)?;
    next
      .shifts
      .entry(employee_id.to_string())
      .or_default()
      .insert(shift.id.clone(), shift.clone());
    created.push(shift);
  }

  Ok((PairedUpdate { patch, next }, created))
}

fn at(day: chrono::NaiveDate, time: NaiveTime) -> ShiftTime {
  ShiftTime::new(day.and_time(time))
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// Stage or apply a partial edit. Returns `None` for an empty patch
/// (nothing to change, nothing to write).
pub(crate) fn update(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  shift_id: &str,
  edit: &ShiftPatch,
  now: DateTime<Utc>,
) -> Result<Option<PairedUpdate<WeekState>>> {
  let current = get_shift(state, employee_id, shift_id)?;
  if edit.is_empty() {
    return Ok(None);
  }

  let mut patch = RemotePatch::new();
  let mut updated = current.clone();
  updated.updated_at = now;

  match current.status {
    // A draft has never been published: edits land in the base fields.
    ShiftStatus::Draft => {
      let merged = edit.merge_over(&current.base());
      updated.start = merged.start;
      updated.end = merged.end;
      updated.position = merged.position;
      updated.notes = merged.notes;
      updated.hourly_wage = merged.hourly_wage;

      let field = |name| path.shift_field(employee_id, shift_id, name);
      if let Some(start) = &edit.start {
        patch.set(field("start"), start)?;
      }
      if let Some(end) = &edit.end {
        patch.set(field("end"), end)?;
      }
      if let Some(position) = &edit.position {
        patch.set(field("position"), position)?;
      }
      if let Some(notes) = &edit.notes {
        patch.set(field("notes"), notes)?;
      }
      if let Some(wage) = &edit.hourly_wage {
        patch.set(field("hourlyWage"), wage)?;
      }
    }
    // A published shift stages the edit over any earlier staged fields.
    ShiftStatus::Published => {
      let staged = current
        .pending_update
        .clone()
        .unwrap_or_default()
        .overlay(edit);
      patch.set(
        path.shift_field(employee_id, shift_id, "pendingUpdate"),
        &staged,
      )?;
      updated.pending_update = Some(staged);
    }
  }
  patch.set(
    path.shift_field(employee_id, shift_id, "updatedAt"),
    updated.updated_at,
  )?;

  Ok(Some(replace_shift(state, employee_id, updated, patch)))
}

// ─── Cancel update ───────────────────────────────────────────────────────────

/// Drop a staged pending update. Returns `None` (idempotent no-op) when
/// there is nothing staged.
pub(crate) fn cancel_update(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  shift_id: &str,
  now: DateTime<Utc>,
) -> Result<Option<PairedUpdate<WeekState>>> {
  let current = get_shift(state, employee_id, shift_id)?;
  let has_staged = current
    .pending_update
    .as_ref()
    .is_some_and(|p| !p.is_empty());
  if !has_staged {
    return Ok(None);
  }

  let mut patch = RemotePatch::new();
  patch.delete(path.shift_field(employee_id, shift_id, "pendingUpdate"));
  patch.set(
    path.shift_field(employee_id, shift_id, "updatedAt"),
    now,
  )?;

  let mut updated = current.clone();
  updated.pending_update = None;
  updated.updated_at = now;

  Ok(Some(replace_shift(state, employee_id, updated, patch)))
}

// ─── Delete ──────────────────────────────────────────────────────────────────

pub(crate) fn delete(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  shift_id: &str,
  now: DateTime<Utc>,
) -> Result<PairedUpdate<WeekState>> {
  let current = get_shift(state, employee_id, shift_id)?;

  let mut patch = RemotePatch::new();
  match current.status {
    // Never published: remove outright.
    ShiftStatus::Draft => {
      patch.delete(path.shift(employee_id, shift_id));
      let mut next = state.clone();
      if let Some(shift_map) = next.shifts.get_mut(employee_id) {
        shift_map.remove(shift_id);
        if shift_map.is_empty() {
          next.shifts.remove(employee_id);
        }
      }
      Ok(PairedUpdate { patch, next })
    }
    // Published: soft delete, reversible until the next publish.
    ShiftStatus::Published => {
      patch.set(path.shift_field(employee_id, shift_id, "deleting"), true)?;
      patch.set(
        path.shift_field(employee_id, shift_id, "updatedAt"),
        now,
      )?;
      let mut updated = current.clone();
      updated.deleting = true;
      updated.updated_at = now;
      Ok(replace_shift(state, employee_id, updated, patch))
    }
  }
}

// ─── Restore ─────────────────────────────────────────────────────────────────

pub(crate) fn restore(
  path: &SchedulePath,
  state: &WeekState,
  employee_id: &str,
  shift_id: &str,
  now: DateTime<Utc>,
) -> Result<PairedUpdate<WeekState>> {
  let current = get_shift(state, employee_id, shift_id)?;
  if !current.deleting {
    return Err(Error::InvalidOperation(format!(
      "shift {shift_id} is not marked for deletion"
    )));
  }

  let mut patch = RemotePatch::new();
  patch.delete(path.shift_field(employee_id, shift_id, "deleting"));
  patch.set(
    path.shift_field(employee_id, shift_id, "updatedAt"),
    now,
  )?;

  let mut updated = current.clone();
  updated.deleting = false;
  updated.updated_at = now;

  Ok(replace_shift(state, employee_id, updated, patch))
}

/// Pair a patch with the next snapshot, one shift replaced.
fn replace_shift(
  state: &WeekState,
  employee_id: &str,
  shift: Shift,
  patch: RemotePatch,
) -> PairedUpdate<WeekState> {
  let mut next = state.clone();
  next
    .shifts
    .entry(employee_id.to_string())
    .or_default()
    .insert(shift.id.clone(), shift);
  PairedUpdate { patch, next }
}
