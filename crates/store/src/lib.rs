//! File-backed JSON document stores.
//!
//! This crate provides whole-document JSON persistence for two document
//! shapes: a single key-value mapping (`JsonMap`) and an ordered list of
//! records (`JsonList`). Both share the load/save/backup lifecycle defined by
//! the `DocumentTemplate` trait.

pub mod constants;
pub mod document;
pub mod error;
pub mod io;
pub mod list;
pub mod map;

pub use document::{DocumentTemplate, JsonDocument};
pub use error::{ErrorKind, Result, StoreError};
pub use io::{dump_json, read_json, read_or_init_json, to_pretty_string, write_json};
pub use list::{JsonList, Record};
pub use map::JsonMap;

/// A JSON object with insertion-ordered string keys.
pub type Map = serde_json::Map<String, serde_json::Value>;
