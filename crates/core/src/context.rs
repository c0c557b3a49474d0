//! Correlation-context primitives.
//!
//! A correlation context is a small set of string identifiers (trace id,
//! debug flag, ...) propagated across logical operations so that related
//! activity can be linked together downstream.

use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Reserved detail-payload field that carries the correlation context.
pub const CONTEXT_KEY: &str = "__context__";

/// An immutable-once-read snapshot of correlation identifiers.
///
/// Keys and values are plain strings; the map is ordered so serialization is
/// deterministic. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationIds {
    ids: BTreeMap<String, String>,
}

impl CorrelationIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a single identifier.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.ids.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.ids.get(key).map(String::as_str)
    }

    /// Replace every identifier with the supplied set.
    pub fn replace_all_with(&mut self, ids: impl IntoIterator<Item = (String, String)>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear_all(&mut self) {
        self.ids.clear();
    }

    /// Derive a child context that inherits every identifier of this one.
    ///
    /// The child is independent: overriding or adding keys on it never
    /// touches the parent.
    pub fn child(&self) -> Self {
        self.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.ids.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for CorrelationIds
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

static GLOBAL: LazyLock<Arc<CorrelationIdStore>> =
    LazyLock::new(|| Arc::new(CorrelationIdStore::new()));

/// Ambient holder for the current correlation context.
///
/// Reads produce an immutable snapshot, so an in-flight publish that has
/// already captured its context is never affected by concurrent replacement.
/// The store is an injectable dependency: components take an
/// `Arc<CorrelationIdStore>` and only fall back to [`CorrelationIdStore::global`]
/// when none is supplied.
#[derive(Debug, Default)]
pub struct CorrelationIdStore {
    inner: RwLock<CorrelationIds>,
}

impl CorrelationIdStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the process-wide default store.
    pub fn global() -> Arc<CorrelationIdStore> {
        Arc::clone(&GLOBAL)
    }

    /// Snapshot of the current context.
    ///
    /// Returns an empty context when none has been established. Never fails:
    /// a poisoned lock is recovered (the snapshot is still coherent, writes
    /// to the map are atomic under the lock).
    pub fn current(&self) -> CorrelationIds {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Insert or overwrite one identifier in the ambient context.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .set(key, value);
    }

    /// Total replacement of the ambient context.
    pub fn replace_all_with(&self, ids: CorrelationIds) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = ids;
    }

    /// Reset the ambient context between logical request units.
    pub fn clear_all(&self) {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_all();
    }

    /// Child of the ambient snapshot with extra (possibly overriding) keys.
    pub fn child_with<K, V>(&self, extra: impl IntoIterator<Item = (K, V)>) -> CorrelationIds
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut child = self.current().child();
        for (key, value) in extra {
            child.set(key, value);
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_store_yields_empty_context() {
        let store = CorrelationIdStore::new();
        assert!(store.current().is_empty());
    }

    #[test]
    fn set_and_get_roundtrip() {
        let mut ids = CorrelationIds::new();
        ids.set("x-correlation-id", "id");
        assert_eq!(ids.get("x-correlation-id"), Some("id"));
        assert_eq!(ids.get("missing"), None);
    }

    #[test]
    fn replace_all_with_discards_previous_identifiers() {
        let store = CorrelationIdStore::new();
        store.set("old-key", "old");
        store.replace_all_with(
            [("x-correlation-id", "id"), ("debug-log-enabled", "true")]
                .into_iter()
                .collect(),
        );

        let current = store.current();
        assert_eq!(current.len(), 2);
        assert_eq!(current.get("x-correlation-id"), Some("id"));
        assert_eq!(current.get("old-key"), None);
    }

    #[test]
    fn clear_all_resets_to_empty() {
        let store = CorrelationIdStore::new();
        store.set("x-correlation-id", "id");
        store.clear_all();
        assert!(store.current().is_empty());
    }

    #[test]
    fn current_is_a_snapshot_not_a_view() {
        let store = CorrelationIdStore::new();
        store.set("x-correlation-id", "before");

        let snapshot = store.current();
        store.set("x-correlation-id", "after");

        assert_eq!(snapshot.get("x-correlation-id"), Some("before"));
        assert_eq!(store.current().get("x-correlation-id"), Some("after"));
    }

    #[test]
    fn child_inherits_and_overrides_without_touching_parent() {
        let store = CorrelationIdStore::new();
        store.set("x-correlation-id", "parent-id");
        store.set("debug-log-enabled", "true");

        let child = store.child_with([("x-correlation-id", "child-id")]);
        assert_eq!(child.get("x-correlation-id"), Some("child-id"));
        assert_eq!(child.get("debug-log-enabled"), Some("true"));
        assert_eq!(store.current().get("x-correlation-id"), Some("parent-id"));
    }

    #[test]
    fn serializes_as_flat_json_object() {
        let ids: CorrelationIds = [("b", "2"), ("a", "1")].into_iter().collect();
        let json = serde_json::to_string(&ids).unwrap();
        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
