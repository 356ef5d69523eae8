//! Mapping-shaped document store with flat and nested key operations.
//!
//! Responsibilities:
//! - Create, read, update and delete top-level keys.
//! - Create, read, update and delete values addressed by a key path.
//!
//! Does NOT handle:
//! - Dotted-string key parsing (see `jsoncraft-config`).
//! - Persistence, beyond the `DocumentTemplate` lifecycle.
//!
//! Invariants:
//! - The store always holds a mapping; `{}` when unseeded or loaded from a
//!   `null` document.
//! - Existence and collision outcomes are reported as `bool`, never as errors.
//! - Nested operations reject an empty key path with `StoreError::EmptyKeyPath`.
//! - `update_nested` with `overwrite` replaces every intermediate it walks
//!   through with a fresh mapping, discarding sibling content.

use std::path::PathBuf;
use std::sync::OnceLock;

use serde_json::Value;

use crate::Map;
use crate::document::{DocumentTemplate, JsonDocument};
use crate::error::{Result, StoreError};

/// A JSON object document with CRUD helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonMap {
    document: JsonDocument<Map>,
}

fn empty_map() -> &'static Map {
    static EMPTY: OnceLock<Map> = OnceLock::new();
    EMPTY.get_or_init(Map::new)
}

impl JsonMap {
    /// Creates a mapping store for `path`, seeded with `initial` or `{}`.
    pub fn new(path: impl Into<PathBuf>, initial: Option<Map>) -> Self {
        Self {
            document: JsonDocument::new(path, Some(initial.unwrap_or_default())),
        }
    }

    /// Returns the underlying mapping.
    pub fn data(&self) -> &Map {
        match self.document.data() {
            Some(map) => map,
            None => empty_map(),
        }
    }

    fn data_mut(&mut self) -> &mut Map {
        self.document.data_slot().get_or_insert_with(Map::new)
    }

    /// Returns the top-level keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.data().keys().cloned().collect()
    }

    /// Inserts `value` under `key` if the key is absent.
    ///
    /// Returns `false`, leaving the stored value untouched, if the key exists.
    pub fn create(&mut self, key: &str, value: Value) -> bool {
        let data = self.data_mut();
        if data.contains_key(key) {
            return false;
        }
        data.insert(key.to_owned(), value);
        true
    }

    /// Inserts `value` at the end of `keys`, creating missing intermediate
    /// mappings along the way.
    ///
    /// Returns `false` if an intermediate exists but is not a mapping, or if
    /// the final key is already present.
    pub fn create_nested<S: AsRef<str>>(&mut self, value: Value, keys: &[S]) -> Result<bool> {
        let (last, parents) = keys.split_last().ok_or(StoreError::EmptyKeyPath)?;

        let mut current = self.data_mut();
        for key in parents {
            let entry = current
                .entry(key.as_ref())
                .or_insert_with(|| Value::Object(Map::new()));
            let Value::Object(next) = entry else {
                return Ok(false);
            };
            current = next;
        }

        if current.contains_key(last.as_ref()) {
            return Ok(false);
        }
        current.insert(last.as_ref().to_owned(), value);
        Ok(true)
    }

    /// Returns the value stored under `key`.
    pub fn read(&self, key: &str) -> Option<&Value> {
        self.data().get(key)
    }

    /// Returns the value at the end of `keys`.
    ///
    /// Yields `None` as soon as a key is missing or a level is not a mapping.
    pub fn read_nested<S: AsRef<str>>(&self, keys: &[S]) -> Result<Option<&Value>> {
        let (first, rest) = keys.split_first().ok_or(StoreError::EmptyKeyPath)?;

        let Some(mut current) = self.data().get(first.as_ref()) else {
            return Ok(None);
        };
        for key in rest {
            let Value::Object(map) = current else {
                return Ok(None);
            };
            let Some(next) = map.get(key.as_ref()) else {
                return Ok(None);
            };
            current = next;
        }
        Ok(Some(current))
    }

    /// Overwrites `key` if present, otherwise behaves like [`create`](Self::create).
    ///
    /// The result does not distinguish an update from a creation.
    pub fn update(&mut self, key: &str, value: Value) -> bool {
        let data = self.data_mut();
        if let Some(slot) = data.get_mut(key) {
            *slot = value;
            return true;
        }
        self.create(key, value)
    }

    /// Sets the value at the end of `keys`, creating intermediates as needed.
    ///
    /// An intermediate is replaced with an empty mapping when it is missing,
    /// when it is not a mapping, or when `overwrite` is set. With `overwrite`
    /// every level walked through loses its existing content.
    pub fn update_nested<S: AsRef<str>>(
        &mut self,
        value: Value,
        keys: &[S],
        overwrite: bool,
    ) -> Result<bool> {
        let (last, parents) = keys.split_last().ok_or(StoreError::EmptyKeyPath)?;

        let mut current = self.data_mut();
        for key in parents {
            let key = key.as_ref();
            let slot = current.entry(key).or_insert(Value::Null);
            if overwrite || !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            let Value::Object(next) = slot else {
                unreachable!("intermediate was just reset to a mapping");
            };
            current = next;
        }

        current.insert(last.as_ref().to_owned(), value);
        Ok(true)
    }

    /// [`update_nested`](Self::update_nested) with `overwrite` enabled.
    pub fn update_nested_default<S: AsRef<str>>(
        &mut self,
        value: Value,
        keys: &[S],
    ) -> Result<bool> {
        self.update_nested(value, keys, true)
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.data_mut().shift_remove(key).is_some()
    }

    /// Removes the value at the end of `keys`, returning whether it existed.
    ///
    /// Returns `false` if any intermediate is missing or not a mapping.
    pub fn delete_nested<S: AsRef<str>>(&mut self, keys: &[S]) -> Result<bool> {
        let (last, parents) = keys.split_last().ok_or(StoreError::EmptyKeyPath)?;

        let mut current = self.data_mut();
        for key in parents {
            let Some(Value::Object(next)) = current.get_mut(key.as_ref()) else {
                return Ok(false);
            };
            current = next;
        }
        Ok(current.shift_remove(last.as_ref()).is_some())
    }
}

impl DocumentTemplate for JsonMap {
    type Data = Map;

    fn document(&self) -> &JsonDocument<Map> {
        &self.document
    }

    fn document_mut(&mut self) -> &mut JsonDocument<Map> {
        &mut self.document
    }

    /// Loads the backing file. A `null` document loads as `{}`.
    fn load(&mut self) -> Result<()> {
        self.document.load()?;
        self.document.data_slot().get_or_insert_with(Map::new);
        Ok(())
    }
}
