//! The `RemoteSink` and `SnapshotSource` traits — the external
//! collaborators.
//!
//! Implemented by storage backends (e.g. `rota-store-memory`, or a real
//! document/key-value store client). The mutation engine and the API
//! layer depend on these abstractions, not on any concrete backend.

use std::future::Future;

use crate::{
  patch::{RemotePatch, SchedulePath},
  shift::EmployeeWeekShifts,
  summary::ScheduleDoc,
};

/// Abstraction over the remote partial-update sink.
///
/// One [`RemotePatch`] batch must be applied atomically: either every
/// write (and tombstone) in the batch lands, or none do. No ordering
/// guarantee is assumed across separate batches.
///
/// Methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RemoteSink: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Apply one atomic batch of writes.
  fn apply(
    &self,
    batch: RemotePatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Abstraction over the remote subscription source.
///
/// Every read is a full snapshot of the corresponding view — never a
/// delta — and the engine replaces its local view with it wholesale.
pub trait SnapshotSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All shifts stored for a (location, week) pair. A week with nothing
  /// stored is an empty map, not an error.
  fn week_shifts<'a>(
    &'a self,
    path: &'a SchedulePath,
  ) -> impl Future<Output = Result<EmployeeWeekShifts, Self::Error>> + Send + 'a;

  /// The summary document for a week, if one has been stored.
  fn week_summary<'a>(
    &'a self,
    path: &'a SchedulePath,
  ) -> impl Future<Output = Result<Option<ScheduleDoc>, Self::Error>> + Send + 'a;
}
