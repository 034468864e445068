//! Handlers for per-shift endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST`   | `/schedule/:week_id/shifts/:employee_id` | Body: [`rota_core::shift::NewShift`]; 201 + draft |
//! | `POST`   | `/schedule/:week_id/shifts/:employee_id/recurring` | Body: [`RecurringBody`]; 201 + drafts |
//! | `PATCH`  | `/schedule/:week_id/shifts/:employee_id/:shift_id` | Body: [`rota_core::shift::ShiftPatch`] |
//! | `DELETE` | `/schedule/:week_id/shifts/:employee_id/:shift_id` | Draft: removed; published: soft delete |
//! | `POST`   | `…/:shift_id/cancel-update` | Idempotent |
//! | `POST`   | `…/:shift_id/restore` | Undo a soft delete |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use rota_core::{
  shift::{NewShift, Shift, ShiftPatch},
  sink::{RemoteSink, SnapshotSource},
};
use serde::Deserialize;

use crate::{ApiError, AppState, editor_for};

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /schedule/:week_id/shifts/:employee_id` — 201 + the stored
/// draft [`Shift`].
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id)): Path<(String, String)>,
  Json(body): Json<NewShift>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let shift = editor.create_shift(&employee_id, body, Utc::now()).await?;
  Ok((StatusCode::CREATED, Json(shift)))
}

// ─── Create recurring ─────────────────────────────────────────────────────────

/// JSON body accepted by the recurring endpoint: a shift template plus
/// the weekdays it repeats on.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBody {
  #[serde(flatten)]
  pub template:    NewShift,
  pub template_id: String,
  pub weekdays:    Vec<u8>,
}

/// `POST /schedule/:week_id/shifts/:employee_id/recurring` — 201 + one
/// draft per requested weekday.
pub async fn create_recurring<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id)): Path<(String, String)>,
  Json(body): Json<RecurringBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let shifts: Vec<Shift> = editor
    .create_recurring(
      &employee_id,
      body.template,
      &body.template_id,
      &body.weekdays,
      Utc::now(),
    )
    .await?;
  Ok((StatusCode::CREATED, Json(shifts)))
}

// ─── Update / cancel ──────────────────────────────────────────────────────────

/// `PATCH /schedule/:week_id/shifts/:employee_id/:shift_id` — a draft
/// takes the edit directly, a published shift stages it.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id, shift_id)): Path<(String, String, String)>,
  Json(body): Json<ShiftPatch>,
) -> Result<Json<Shift>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let shift = editor
    .update_shift(&employee_id, &shift_id, body, Utc::now())
    .await?;
  Ok(Json(shift))
}

/// `POST /schedule/:week_id/shifts/:employee_id/:shift_id/cancel-update`
pub async fn cancel_update<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id, shift_id)): Path<(String, String, String)>,
) -> Result<Json<Shift>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let shift = editor
    .cancel_update(&employee_id, &shift_id, Utc::now())
    .await?;
  Ok(Json(shift))
}

// ─── Delete / restore ─────────────────────────────────────────────────────────

/// `DELETE /schedule/:week_id/shifts/:employee_id/:shift_id`
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id, shift_id)): Path<(String, String, String)>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  editor
    .delete_shift(&employee_id, &shift_id, Utc::now())
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `POST /schedule/:week_id/shifts/:employee_id/:shift_id/restore`
pub async fn restore<S>(
  State(state): State<AppState<S>>,
  Path((week_id, employee_id, shift_id)): Path<(String, String, String)>,
) -> Result<Json<Shift>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let shift = editor
    .restore_shift(&employee_id, &shift_id, Utc::now())
    .await?;
  Ok(Json(shift))
}
