//! [`MemorySink`] — the in-memory implementation of
//! [`rota_core::sink::RemoteSink`].
//!
//! Backs the engine's tests and the reference server. A real deployment
//! substitutes a document/key-value store client; this crate mirrors the
//! sink contract exactly, including atomic batch application and
//! tombstone pruning, and adds failure injection so the rollback
//! contract is testable.

mod error;
mod store;

pub use error::{Error, Result};
pub use store::MemorySink;
