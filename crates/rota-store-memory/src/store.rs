//! The in-memory JSON-tree sink.

use std::sync::{Arc, Mutex, PoisonError};

use rota_core::{
  patch::{PatchValue, RemotePatch, SchedulePath},
  shift::EmployeeWeekShifts,
  sink::{RemoteSink, SnapshotSource},
  summary::ScheduleDoc,
};
use serde_json::{Map, Value};

use crate::{Error, Result};

// ─── Sink ────────────────────────────────────────────────────────────────────

/// A remote sink over an in-memory JSON tree.
///
/// Cloning is cheap — the inner tree is reference-counted, so a clone
/// handed to an editor and a clone held by a test observe the same data.
#[derive(Clone, Default)]
pub struct MemorySink {
  inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
  root:      Value,
  fail_next: u32,
  applied:   u64,
}

impl MemorySink {
  pub fn new() -> Self { Self::default() }

  /// Make the next `n` batches fail with [`Error::Injected`].
  pub fn fail_next(&self, n: u32) {
    self.lock().fail_next = n;
  }

  /// Number of batches applied successfully.
  pub fn batches_applied(&self) -> u64 { self.lock().applied }

  /// Clone of the full stored tree.
  pub fn tree(&self) -> Value { self.lock().root.clone() }

  /// Clone of the subtree at a `/`-joined path, if present.
  pub fn document(&self, path: &str) -> Option<Value> {
    let inner = self.lock();
    let mut node = &inner.root;
    for segment in path.split('/') {
      node = node.get(segment)?;
    }
    Some(node.clone())
  }

  /// Decode the stored shifts subtree for a week back into typed maps.
  /// A week with nothing stored is an empty map, not an error.
  pub fn week_shifts(&self, path: &SchedulePath) -> Result<EmployeeWeekShifts> {
    match self.document(&path.shifts_root()) {
      Some(value) => Ok(serde_json::from_value(value)?),
      None => Ok(EmployeeWeekShifts::new()),
    }
  }

  /// Decode the stored summary document for a week, if one exists.
  pub fn week_summary(&self, path: &SchedulePath) -> Result<Option<ScheduleDoc>> {
    self
      .document(&path.summary())
      .map(serde_json::from_value)
      .transpose()
      .map_err(Error::from)
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

// ─── RemoteSink impl ─────────────────────────────────────────────────────────

impl RemoteSink for MemorySink {
  type Error = Error;

  async fn apply(&self, batch: RemotePatch) -> Result<()> {
    let mut inner = self.lock();
    if inner.fail_next > 0 {
      inner.fail_next -= 1;
      return Err(Error::Injected);
    }

    // Stage on a copy, swap on success: a batch is all-or-nothing.
    let mut staged = inner.root.clone();
    for (path, write) in batch {
      match write {
        PatchValue::Set(value) => set_path(&mut staged, &path, value),
        PatchValue::Delete => delete_path(&mut staged, &path),
      }
    }
    inner.root = staged;
    inner.applied += 1;
    Ok(())
  }
}

impl SnapshotSource for MemorySink {
  type Error = Error;

  async fn week_shifts(&self, path: &SchedulePath) -> Result<EmployeeWeekShifts> {
    MemorySink::week_shifts(self, path)
  }

  async fn week_summary(
    &self,
    path: &SchedulePath,
  ) -> Result<Option<ScheduleDoc>> {
    MemorySink::week_summary(self, path)
  }
}

// ─── Tree walking ────────────────────────────────────────────────────────────

/// Write `value` at the `/`-joined path, deep-creating intermediate
/// objects. A non-object intermediate is replaced, matching the
/// last-write-wins merge of the remote document store.
fn set_path(root: &mut Value, path: &str, value: Value) {
  let mut node = root;
  let mut segments = path.split('/').peekable();
  while let Some(segment) = segments.next() {
    if !node.is_object() {
      *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else { return };
    if segments.peek().is_none() {
      map.insert(segment.to_string(), value);
      return;
    }
    node = map
      .entry(segment.to_string())
      .or_insert_with(|| Value::Object(Map::new()));
  }
}

/// Remove the subtree at the path, pruning intermediate objects that
/// become empty (the store keeps no empty nodes).
fn delete_path(root: &mut Value, path: &str) {
  let segments: Vec<&str> = path.split('/').collect();
  remove_segments(root, &segments);
}

fn remove_segments(node: &mut Value, segments: &[&str]) {
  let Some(map) = node.as_object_mut() else {
    return;
  };
  let [head, rest @ ..] = segments else {
    return;
  };
  if rest.is_empty() {
    map.remove(*head);
  } else if let Some(child) = map.get_mut(*head) {
    remove_segments(child, rest);
    if child.as_object().is_some_and(Map::is_empty) {
      map.remove(*head);
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn patch(writes: &[(&str, Value)]) -> RemotePatch {
    let mut p = RemotePatch::new();
    for (path, value) in writes {
      p.set(*path, value).unwrap();
    }
    p
  }

  #[tokio::test]
  async fn set_deep_creates_intermediate_objects() {
    let sink = MemorySink::new();
    sink
      .apply(patch(&[("a/b/c", json!(1))]))
      .await
      .unwrap();
    assert_eq!(sink.document("a/b/c"), Some(json!(1)));
    assert_eq!(sink.document("a/b"), Some(json!({ "c": 1 })));
  }

  #[tokio::test]
  async fn delete_prunes_empty_parents() {
    let sink = MemorySink::new();
    sink
      .apply(patch(&[("a/b/c", json!(1)), ("a/x", json!(2))]))
      .await
      .unwrap();

    let mut p = RemotePatch::new();
    p.delete("a/b/c");
    sink.apply(p).await.unwrap();

    assert_eq!(sink.document("a/b"), None);
    assert_eq!(sink.document("a/x"), Some(json!(2)));
  }

  #[tokio::test]
  async fn field_write_overwrites_scalar_with_object() {
    let sink = MemorySink::new();
    sink.apply(patch(&[("a/b", json!(5))])).await.unwrap();
    sink.apply(patch(&[("a/b/c", json!(6))])).await.unwrap();
    assert_eq!(sink.document("a/b/c"), Some(json!(6)));
  }

  #[tokio::test]
  async fn injected_failure_leaves_tree_untouched() {
    let sink = MemorySink::new();
    sink.apply(patch(&[("a/b", json!(1))])).await.unwrap();

    sink.fail_next(1);
    let err = sink.apply(patch(&[("a/b", json!(2))])).await;
    assert!(matches!(err, Err(Error::Injected)));
    assert_eq!(sink.document("a/b"), Some(json!(1)));
    assert_eq!(sink.batches_applied(), 1);

    // Failure injection is consumed.
    sink.apply(patch(&[("a/b", json!(3))])).await.unwrap();
    assert_eq!(sink.document("a/b"), Some(json!(3)));
  }

  #[tokio::test]
  async fn batch_with_set_and_delete_is_atomic() {
    let sink = MemorySink::new();
    sink
      .apply(patch(&[("s/one", json!(1)), ("s/two", json!(2))]))
      .await
      .unwrap();

    let mut p = RemotePatch::new();
    p.set("s/three", 3).unwrap();
    p.delete("s/one");
    sink.apply(p).await.unwrap();

    assert_eq!(sink.document("s"), Some(json!({ "two": 2, "three": 3 })));
  }
}
