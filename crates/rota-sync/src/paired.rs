//! The paired-update primitive and its apply/rollback driver.
//!
//! Each mutation runs the same state machine:
//! `Idle → LocalApplied → {Committed | RolledBack}`. Validation errors
//! abort in `Idle` (nothing to roll back); only a sink rejection after
//! the local snapshot is applied triggers a rollback.

use rota_core::{Error, Result, patch::RemotePatch, sink::RemoteSink};

// ─── Paired update ───────────────────────────────────────────────────────────

/// The two halves of one mutation: the flat remote patch, and the full
/// replacement snapshot for the affected local subtree.
#[derive(Debug, Clone)]
pub struct PairedUpdate<T> {
  pub patch: RemotePatch,
  pub next:  T,
}

/// Where a mutation call is in its life cycle. Used for tracing only —
/// the driver never suspends between `LocalApplied` and the sink call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationPhase {
  Idle,
  LocalApplied,
  Committed,
  RolledBack,
}

// ─── Driver ──────────────────────────────────────────────────────────────────

/// Apply a paired update: replace `local` wholesale, submit the patch,
/// and restore the pre-mutation snapshot if the sink rejects it.
///
/// The snapshot swap is a whole-value replacement, never a field-by-field
/// mutation, so a reader within the same process can never observe a
/// partially-applied update.
pub async fn commit<S, T>(
  sink: &S,
  op: &'static str,
  local: &mut T,
  update: PairedUpdate<T>,
) -> Result<()>
where
  S: RemoteSink,
{
  let writes = update.patch.len();
  let previous = std::mem::replace(local, update.next);
  tracing::debug!(op, writes, phase = ?MutationPhase::LocalApplied, "local snapshot applied");

  match sink.apply(update.patch).await {
    Ok(()) => {
      tracing::debug!(op, phase = ?MutationPhase::Committed, "remote patch committed");
      Ok(())
    }
    Err(source) => {
      *local = previous;
      tracing::warn!(
        op,
        error = %source,
        phase = ?MutationPhase::RolledBack,
        "remote write failed, local snapshot rolled back"
      );
      Err(Error::remote(source))
    }
  }
}
