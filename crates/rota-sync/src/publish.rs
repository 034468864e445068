//! The publish pass: promote drafts and staged edits, drop soft-deleted
//! shifts, and stamp the summary document.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rota_core::{
  Result,
  patch::{RemotePatch, SchedulePath},
  policy::WagePolicy,
  shift::{Shift, ShiftStatus},
  summary::PublishData,
};

use crate::{editor::WeekState, paired::PairedUpdate};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a publish call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
  Published {
    /// Shifts promoted or removed by the pass.
    shifts:    usize,
    /// Employees with at least one touched shift.
    employees: usize,
  },
  /// No shift needed a patch. Explicitly signaled so callers don't issue
  /// an empty remote write (and don't treat a quiet week as an error).
  NothingToPublish,
}

// ─── Publish pass ────────────────────────────────────────────────────────────

/// Compute the publish pass over the current snapshot.
///
/// Returns `Ok(None)` when nothing needs publishing; the editor turns
/// that into [`PublishOutcome::NothingToPublish`] without touching the
/// sink.
pub(crate) fn publish(
  path: &SchedulePath,
  state: &WeekState,
  policy: Option<&WagePolicy>,
  recipients: &[String],
  now: DateTime<Utc>,
) -> Result<Option<(PairedUpdate<WeekState>, PublishOutcome)>> {
  let mut patch = RemotePatch::new();
  let mut next = state.clone();
  let mut touched_shifts = 0usize;
  let mut touched_employees = 0usize;

  for (employee_id, shift_map) in &state.shifts {
    let mut employee_touched = false;

    for shift in shift_map.values() {
      if shift.deleting {
        // Soft-deleted: the publish pass makes the removal real.
        patch.delete(path.shift(employee_id, &shift.id));
        if let Some(next_map) = next.shifts.get_mut(employee_id) {
          next_map.remove(&shift.id);
        }
        touched_shifts += 1;
        employee_touched = true;
        continue;
      }

      let staged = shift
        .pending_update
        .as_ref()
        .is_some_and(|p| !p.is_empty());
      if shift.status == ShiftStatus::Draft || staged {
        let published = promote(shift, now);
        patch.set(path.shift(employee_id, &shift.id), &published)?;
        if let Some(next_map) = next.shifts.get_mut(employee_id) {
          next_map.insert(published.id.clone(), published);
        }
        touched_shifts += 1;
        employee_touched = true;
      }
      // Anything else is already published and clean: left unchanged.
    }

    if employee_touched {
      touched_employees += 1;
    }
  }

  if touched_shifts == 0 {
    return Ok(None);
  }

  // Prune employees whose last shift was removed by the pass.
  next.shifts.retain(|_, shift_map| !shift_map.is_empty());

  // Stamp the summary document: publish metadata plus the recomputed
  // week aggregate over the post-publish shifts.
  next.summary.publish_data = Some(PublishData {
    published_at:            now,
    notification_recipients: recipients.to_vec(),
  });
  next.summary.schedule_summary = summarize(&next, policy);

  patch.set(path.summary_field("year"), next.summary.year)?;
  patch.set(path.summary_field("weekNumber"), next.summary.week_number)?;
  patch.set(
    path.summary_field("publishData"),
    next.summary.publish_data.as_ref(),
  )?;
  patch.set(
    path.summary_field("scheduleSummary"),
    &next.summary.schedule_summary,
  )?;

  let outcome = PublishOutcome::Published {
    shifts:    touched_shifts,
    employees: touched_employees,
  };
  Ok(Some((PairedUpdate { patch, next }, outcome)))
}

/// A shift as the publish pass leaves it: pending fields merged into the
/// base, status `Published`, overlay cleared.
fn promote(shift: &Shift, now: DateTime<Utc>) -> Shift {
  let effective = shift.effective();
  Shift {
    id: shift.id.clone(),
    start: effective.start,
    end: effective.end,
    position: effective.position,
    notes: effective.notes,
    hourly_wage: effective.hourly_wage,
    status: ShiftStatus::Published,
    pending_update: None,
    deleting: false,
    updated_at: now,
  }
}

fn summarize(
  state: &WeekState,
  policy: Option<&WagePolicy>,
) -> rota_core::summary::WeekSummary {
  let records: BTreeMap<String, rota_wage::EmployeeWeekWages> = state
    .shifts
    .iter()
    .map(|(employee_id, shift_map)| {
      let mut shifts: Vec<Shift> = shift_map.values().cloned().collect();
      shifts.sort_by_key(|s| s.effective().start);
      (
        employee_id.clone(),
        rota_wage::employee_week_wages(&shifts, policy),
      )
    })
    .collect();
  rota_wage::aggregate_week(&records, &state.summary)
}
