//! Optimistic mutation engine for Rota schedules.
//!
//! Every life-cycle operation computes a paired
//! `{remote patch, local snapshot}` update: the snapshot replaces the
//! local week state immediately, the patch goes to the remote sink, and
//! a sink failure rolls the local state back to the pre-mutation
//! snapshot. One generic driver ([`paired::commit`]) owns that contract
//! for every operation.

pub mod clone;
pub mod editor;
pub mod paired;
pub mod publish;
pub mod sales;
pub mod shifts;


pub use editor::{ScheduleEditor, SnapshotEvent, WeekState};
pub use paired::{MutationPhase, PairedUpdate};
pub use publish::PublishOutcome;
