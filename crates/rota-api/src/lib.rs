//! JSON REST API for Rota.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`RemoteSink`] and [`SnapshotSource`]. Auth, TLS, and transport
//! concerns are the caller's responsibility — the engine assumes an
//! already-authorized identity context.
//!
//! Each request materialises a [`ScheduleEditor`] for the addressed week
//! from the snapshot source (every read is a total replacement of the
//! local view), runs the operation, and drops it. Serialising concurrent
//! mutations on the same employee/week pair is the caller's concern;
//! interleaved writers get last-write-wins at the sink's field-level
//! merge.

pub mod error;
pub mod schedule;
pub mod shifts;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use rota_core::{
  patch::SchedulePath,
  policy::ScheduleSettings,
  sink::{RemoteSink, SnapshotSource},
  week::WeekId,
};
use rota_sync::{ScheduleEditor, SnapshotEvent};
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub organization_id: String,
  pub location_id:     String,
  /// Overtime rules applied to wage computation for this location.
  #[serde(default)]
  pub overtime:        ScheduleSettings,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  S,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  Router::new()
    // Week reads and week-level operations
    .route("/schedule/{week_id}", get(schedule::get_week::<S>))
    .route("/schedule/{week_id}/publish", post(schedule::publish::<S>))
    .route("/schedule/{week_id}/clone", post(schedule::clone_from::<S>))
    .route(
      "/schedule/{week_id}/projected-sales",
      put(schedule::projected_sales::<S>),
    )
    // Shift life cycle
    .route(
      "/schedule/{week_id}/shifts/{employee_id}",
      post(shifts::create::<S>),
    )
    .route(
      "/schedule/{week_id}/shifts/{employee_id}/recurring",
      post(shifts::create_recurring::<S>),
    )
    .route(
      "/schedule/{week_id}/shifts/{employee_id}/{shift_id}",
      axum::routing::patch(shifts::update::<S>).delete(shifts::delete::<S>),
    )
    .route(
      "/schedule/{week_id}/shifts/{employee_id}/{shift_id}/cancel-update",
      post(shifts::cancel_update::<S>),
    )
    .route(
      "/schedule/{week_id}/shifts/{employee_id}/{shift_id}/restore",
      post(shifts::restore::<S>),
    )
    .with_state(state)
}

// ─── Editor materialisation ──────────────────────────────────────────────────

/// Parse the week id and build an editor over the current stored
/// snapshot of that week.
pub(crate) async fn editor_for<S>(
  state: &AppState<S>,
  week_id: &str,
) -> Result<ScheduleEditor<S>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let week = WeekId::parse(week_id)?;
  let path = SchedulePath::new(
    &state.config.organization_id,
    &state.config.location_id,
    week,
  );

  let shifts = state
    .store
    .week_shifts(&path)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;
  let summary = state
    .store
    .week_summary(&path)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;

  let mut editor =
    ScheduleEditor::new(state.store.clone(), path, state.config.overtime);
  editor.absorb(SnapshotEvent::Shifts(shifts));
  if let Some(doc) = summary {
    editor.absorb(SnapshotEvent::Summary(doc));
  }
  Ok(editor)
}

// ─── Integration tests ────────────────────────────────────────────────────────
