//! Hierarchical key-path document store.
//!
//! Everything above this module reads the store through [`DocumentStore`],
//! so the Firebase client can be swapped for [`MemoryStore`] in tests and
//! local development.

pub mod firebase;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::{AppError, AppResult};

pub use firebase::FirebaseStore;
pub use memory::MemoryStore;

// Realtime Database keys cannot contain . $ # [ ] / or ASCII control characters.
static STORE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^.$#\[\]/\x00-\x1F\x7F]{1,768}$").expect("STORE_KEY_REGEX is a valid pattern")
});

pub fn is_valid_key(key: &str) -> bool {
    STORE_KEY_REGEX.is_match(key)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a slash separated path, rejecting segments that are not valid keys.
    pub fn parse(path: &str) -> AppResult<Self> {
        let mut parsed = Self::root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if !is_valid_key(segment) {
                return Err(AppError::ValidationError(format!(
                    "'{}' is not a valid store key",
                    segment
                )));
            }
            parsed.segments.push(segment.to_string());
        }
        Ok(parsed)
    }

    pub fn child(&self, key: impl fmt::Display) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the value stored at `path`, or `None` when nothing is stored there.
    async fn read(&self, path: &StorePath) -> AppResult<Option<Value>>;
    async fn health_check(&self) -> AppResult<()>;
}

/// Point-in-time value of one path.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    value: Option<Value>,
}

impl Snapshot {
    pub fn new(value: Option<Value>) -> Self {
        Self {
            value: value.filter(|v| !v.is_null()),
        }
    }

    pub fn exists(&self) -> bool {
        self.value.is_some()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.value
    }

    pub fn child(&self, key: &str) -> Option<&Value> {
        match self.value.as_ref()? {
            Value::Object(map) => map.get(key).filter(|v| !v.is_null()),
            Value::Array(items) => key
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx))
                .filter(|v| !v.is_null()),
            _ => None,
        }
    }

    /// First-level children by name. Objects come back in key order; arrays
    /// (Firebase's rendering of integer keyed nodes) in index order with holes skipped.
    pub fn children(&self) -> Vec<(String, &Value)> {
        match self.value.as_ref() {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), v))
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .filter(|(_, v)| !v.is_null())
                .map(|(idx, v)| (idx.to_string(), v))
                .collect(),
            _ => Vec::new(),
        }
    }
}

pub async fn read_snapshot(store: &dyn DocumentStore, path: &StorePath) -> AppResult<Snapshot> {
    let value = store.read(path).await.map_err(|err| {
        log::error!("Store read failed for '{}': {}", path, err);
        err
    })?;
    Ok(Snapshot::new(value))
}
