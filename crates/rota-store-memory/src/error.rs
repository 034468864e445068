//! Error type for `rota-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Raised by [`crate::MemorySink::fail_next`] to exercise rollback
  /// paths in tests.
  #[error("injected sink failure")]
  Injected,

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
