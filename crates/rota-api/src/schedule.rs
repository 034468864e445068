//! Handlers for week-level endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/schedule/:week_id` | Shifts + computed summary + pending-change counts |
//! | `POST` | `/schedule/:week_id/publish` | Body: `{"recipients": [...]}` |
//! | `POST` | `/schedule/:week_id/clone` | Body: `{"sourceWeek": "W-…"}` |
//! | `PUT`  | `/schedule/:week_id/projected-sales` | Body: ISO weekday → amount |

use std::collections::BTreeMap;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use rota_core::{
  patch::SchedulePath,
  shift::EmployeeWeekShifts,
  sink::{RemoteSink, SnapshotSource},
  summary::WeekSummary,
  week::WeekId,
};
use rota_sync::PublishOutcome;
use rota_wage::{EmployeeWeekWages, UpdatesCount};
use serde::{Deserialize, Serialize};

use crate::{ApiError, AppState, editor_for};

// ─── Read ─────────────────────────────────────────────────────────────────────

/// Everything the schedule UI needs for one week.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekResponse {
  pub week_id: String,
  pub shifts:  EmployeeWeekShifts,
  pub summary: WeekSummary,
  pub updates: UpdatesCount,
  pub wages:   BTreeMap<String, EmployeeWeekWages>,
}

/// `GET /schedule/:week_id`
pub async fn get_week<S>(
  State(state): State<AppState<S>>,
  Path(week_id): Path<String>,
) -> Result<Json<WeekResponse>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let editor = editor_for(&state, &week_id).await?;
  Ok(Json(WeekResponse {
    week_id: editor.path().week_id.to_string(),
    summary: editor.summary_view(),
    updates: editor.updates(),
    wages:   editor.week_wages(),
    shifts:  editor.shifts().clone(),
  }))
}

// ─── Publish ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct PublishBody {
  #[serde(default)]
  pub recipients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
  /// `false` when the week had nothing to publish (explicit no-op).
  pub published: bool,
  pub shifts:    usize,
  pub employees: usize,
}

/// `POST /schedule/:week_id/publish`
pub async fn publish<S>(
  State(state): State<AppState<S>>,
  Path(week_id): Path<String>,
  Json(body): Json<PublishBody>,
) -> Result<Json<PublishResponse>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  let outcome = editor.publish_week(&body.recipients, Utc::now()).await?;
  let response = match outcome {
    PublishOutcome::Published { shifts, employees } => PublishResponse {
      published: true,
      shifts,
      employees,
    },
    PublishOutcome::NothingToPublish => PublishResponse {
      published: false,
      shifts:    0,
      employees: 0,
    },
  };
  Ok(Json(response))
}

// ─── Clone ────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneBody {
  pub source_week: String,
}

#[derive(Debug, Serialize)]
pub struct CloneResponse {
  pub cloned: usize,
}

/// `POST /schedule/:week_id/clone` — copy the source week's published
/// shifts into this (empty) week.
pub async fn clone_from<S>(
  State(state): State<AppState<S>>,
  Path(week_id): Path<String>,
  Json(body): Json<CloneBody>,
) -> Result<Json<CloneResponse>, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let source_week = WeekId::parse(&body.source_week)?;
  let source_path = SchedulePath::new(
    &state.config.organization_id,
    &state.config.location_id,
    source_week,
  );
  let source_shifts = state
    .store
    .week_shifts(&source_path)
    .await
    .map_err(|e| ApiError::Source(Box::new(e)))?;

  let mut editor = editor_for(&state, &week_id).await?;
  let cloned = editor
    .clone_week(source_week, &source_shifts, Utc::now())
    .await?;
  Ok(Json(CloneResponse { cloned }))
}

// ─── Projected sales ──────────────────────────────────────────────────────────

/// `PUT /schedule/:week_id/projected-sales` — body maps ISO weekday to
/// the projected amount.
pub async fn projected_sales<S>(
  State(state): State<AppState<S>>,
  Path(week_id): Path<String>,
  Json(body): Json<BTreeMap<u8, f64>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RemoteSink + SnapshotSource + Clone + Send + Sync + 'static,
{
  let mut editor = editor_for(&state, &week_id).await?;
  editor.update_projected_sales(body).await?;
  Ok(StatusCode::NO_CONTENT)
}
