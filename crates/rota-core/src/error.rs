//! Error types for `rota-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Malformed or out-of-range week identifier. Fails fast, never retried.
  #[error("invalid week id: {0}")]
  InvalidWeekId(String),

  /// Malformed shift time text (expected `DD-MM-YYYY HH:MM`).
  #[error("invalid shift time: {0}")]
  InvalidShiftTime(String),

  /// Referenced shift id absent from the employee's map at mutation time.
  /// Detected before any local snapshot is applied.
  #[error("shift {shift_id} not found for employee {employee_id}")]
  ShiftNotFound {
    employee_id: String,
    shift_id:    String,
  },

  /// Precondition violated (e.g. cloning into a non-empty week, restoring
  /// a shift that is not marked deleting). No partial effect.
  #[error("invalid operation: {0}")]
  InvalidOperation(String),

  /// The remote sink rejected the patch. By the time this surfaces, the
  /// local snapshot has already been rolled back.
  #[error("remote write failed: {0}")]
  RemoteWriteFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  /// Wrap a sink error as a [`Error::RemoteWriteFailure`].
  pub fn remote<E>(source: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::RemoteWriteFailure(Box::new(source))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
