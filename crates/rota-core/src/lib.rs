//! Core types and trait definitions for the Rota scheduling data layer.
//!
//! This crate is deliberately free of HTTP and runtime dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod error;
pub mod patch;
pub mod policy;
pub mod shift;
pub mod sink;
pub mod summary;
pub mod week;

pub use error::{Error, Result};
