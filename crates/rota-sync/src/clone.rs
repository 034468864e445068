//! Clone a source week's published schedule into an empty target week.

use chrono::{DateTime, Duration, Utc};
use rota_core::{
  Error, Result,
  patch::{RemotePatch, SchedulePath},
  shift::{EmployeeWeekShifts, Shift, ShiftStatus, ShiftTime},
  week::WeekId,
};
use uuid::Uuid;

use crate::{editor::WeekState, paired::PairedUpdate};

/// Copy every eligible shift from `source_shifts` into the target week.
///
/// Eligible means settled: `Published`, not soft-deleted, no pending
/// changes. Each clone gets a fresh id, `Draft` status, and start/end
/// shifted by the whole-week delta between the source and target
/// Mondays. Refuses to run when the target week already holds any shift
/// (no silent merge) or when nothing qualifies.
pub(crate) fn clone_week(
  path: &SchedulePath,
  state: &WeekState,
  source_week: WeekId,
  source_shifts: &EmployeeWeekShifts,
  now: DateTime<Utc>,
) -> Result<(PairedUpdate<WeekState>, usize)> {
  if state.has_shifts() {
    return Err(Error::InvalidOperation(format!(
      "target week {} already has shifts",
      path.week_id
    )));
  }

  let delta = Duration::days(source_week.days_until(&path.week_id));

  let mut patch = RemotePatch::new();
  let mut next = state.clone();
  let mut cloned = 0usize;

  for (employee_id, shift_map) in source_shifts {
    for shift in shift_map.values() {
      if !eligible(shift) {
        continue;
      }
      let copy = Shift {
        id: Uuid::new_v4().to_string(),
        start: ShiftTime::new(shift.start.instant() + delta),
        end: ShiftTime::new(shift.end.instant() + delta),
        position: shift.position.clone(),
        notes: shift.notes.clone(),
        hourly_wage: shift.hourly_wage,
        status: ShiftStatus::Draft,
        pending_update: None,
        deleting: false,
        updated_at: now,
      };
      patch.set(path.shift(employee_id, &copy.id), &copy)?;
      next
        .shifts
        .entry(employee_id.clone())
        .or_default()
        .insert(copy.id.clone(), copy);
      cloned += 1;
    }
  }

  if cloned == 0 {
    return Err(Error::InvalidOperation(format!(
      "week {source_week} has no published shifts to clone"
    )));
  }

  Ok((PairedUpdate { patch, next }, cloned))
}

fn eligible(shift: &Shift) -> bool {
  shift.status == ShiftStatus::Published && !shift.has_pending_changes()
}
