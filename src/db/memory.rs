use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::{
    db::{DocumentStore, StorePath},
    errors::{AppError, AppResult},
};

/// In-process JSON tree with the same read semantics as the Realtime Database.
#[derive(Clone, Default)]
pub struct MemoryStore {
    root: Arc<RwLock<Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::from_value(Value::Object(Map::new()))
    }

    pub fn from_value(value: Value) -> Self {
        Self {
            root: Arc::new(RwLock::new(value)),
        }
    }

    pub async fn from_json_file(path: &str) -> AppResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to read seed file {}: {}", path, e)))?;
        let value: Value = serde_json::from_str(&raw)?;
        log::info!("Seeded memory store from {}", path);
        Ok(Self::from_value(value))
    }

    /// Replaces the value at `path`. Writing `null` removes it.
    pub async fn write(&self, path: &StorePath, value: Value) {
        let mut root = self.root.write().await;
        set_at(&mut root, path.segments(), value);
    }

    /// Merges `children` into the node at `path`, leaving other children untouched.
    pub async fn update(&self, path: &StorePath, children: Map<String, Value>) {
        for (key, value) in children {
            self.write(&path.child(key), value).await;
        }
    }
}

fn set_at(node: &mut Value, segments: &[String], value: Value) {
    let Some((first, rest)) = segments.split_first() else {
        *node = value;
        return;
    };
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        if rest.is_empty() && value.is_null() {
            map.remove(first);
            return;
        }
        let child = map.entry(first.clone()).or_insert(Value::Null);
        set_at(child, rest, value);
    }
}

/// Value at `path` inside `root`, walking arrays by index.
pub fn lookup(root: &Value, path: &StorePath) -> Option<Value> {
    let mut node = root;
    for segment in path.segments() {
        node = match node {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    if node.is_null() {
        None
    } else {
        Some(node.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read(&self, path: &StorePath) -> AppResult<Option<Value>> {
        let root = self.root.read().await;
        Ok(lookup(&root, path))
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_write_then_read_nested_path() {
        let store = MemoryStore::new();
        let path = StorePath::root().child("users").child("s1");
        store.write(&path, json!({ "displayName": "Ada" })).await;

        let value = store.read(&path).await.unwrap();
        assert_eq!(value, Some(json!({ "displayName": "Ada" })));
        assert_eq!(
            store.read(&StorePath::root().child("users")).await.unwrap(),
            Some(json!({ "s1": { "displayName": "Ada" } }))
        );
    }

    #[tokio::test]
    async fn test_missing_path_reads_none() {
        let store = MemoryStore::new();
        let value = store
            .read(&StorePath::root().child("lessons").child(1))
            .await
            .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_update_merges_and_null_removes() {
        let store = MemoryStore::from_value(json!({ "a": { "x": 1, "y": 2 } }));
        let mut patch = Map::new();
        patch.insert("y".to_string(), Value::Null);
        patch.insert("z".to_string(), json!(3));
        store.update(&StorePath::root().child("a"), patch).await;

        let value = store.read(&StorePath::root().child("a")).await.unwrap();
        assert_eq!(value, Some(json!({ "x": 1, "z": 3 })));
    }

    #[tokio::test]
    async fn test_reads_through_arrays() {
        let store = MemoryStore::from_value(json!({ "lessons": [null, { "title": "Intro" }] }));
        let value = store
            .read(&StorePath::root().child("lessons").child(1).child("title"))
            .await
            .unwrap();
        assert_eq!(value, Some(json!("Intro")));
    }
}
