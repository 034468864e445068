//! Projected-sales updates on the summary document.

use std::collections::BTreeMap;

use rota_core::{
  Error, Result,
  patch::{RemotePatch, SchedulePath},
};

use crate::{editor::WeekState, paired::PairedUpdate};

/// Merge per-ISO-weekday projected sales amounts into the summary
/// document. Field-level writes, so other days' amounts survive at the
/// sink; labor percentage is derived at read time, never stored here.
pub(crate) fn update_projected_sales(
  path: &SchedulePath,
  state: &WeekState,
  sales: BTreeMap<u8, f64>,
) -> Result<PairedUpdate<WeekState>> {
  if let Some(bad) = sales.keys().find(|d| !(1..=7).contains(*d)) {
    return Err(Error::InvalidOperation(format!(
      "iso weekday {bad} outside [1, 7]"
    )));
  }
  if sales.is_empty() {
    return Err(Error::InvalidOperation(
      "no projected sales amounts given".to_string(),
    ));
  }

  let mut patch = RemotePatch::new();
  // The summary document is created lazily: always carry its identity
  // fields so a first-ever field write still yields a readable document.
  patch.set(path.summary_field("year"), state.summary.year)?;
  patch.set(path.summary_field("weekNumber"), state.summary.week_number)?;

  let mut next = state.clone();
  let by_day = next
    .summary
    .projected_sales_by_day
    .get_or_insert_with(BTreeMap::new);
  for (day, amount) in sales {
    patch.set(
      path.summary_field(&format!("projectedSalesByDay/{day}")),
      amount,
    )?;
    by_day.insert(day, amount);
  }

  Ok(PairedUpdate { patch, next })
}
