//! List-shaped document store with bounds-checked index operations.
//!
//! Responsibilities:
//! - Append, insert, read, replace and remove records by index.
//! - Represent a cleared list distinctly from an empty one.
//!
//! Does NOT handle:
//! - Record validation; records are arbitrary JSON objects.
//!
//! Invariants:
//! - Out-of-range indices, including negative ones, never panic; they yield
//!   `false` or `None` and leave the list unchanged.
//! - `clear` moves the store to the cleared state (`data() == None`), which is
//!   observably different from an empty list (`data() == Some(&[])`).

use std::path::PathBuf;

use crate::Map;
use crate::document::{DocumentTemplate, JsonDocument};

/// A single list entry: a JSON object.
pub type Record = Map;

/// A JSON array-of-objects document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonList {
    document: JsonDocument<Vec<Record>>,
}

impl JsonList {
    /// Creates a list store for `path`, seeded with `initial` or `[]`.
    pub fn new(path: impl Into<PathBuf>, initial: Option<Vec<Record>>) -> Self {
        Self {
            document: JsonDocument::new(path, Some(initial.unwrap_or_default())),
        }
    }

    /// Returns the records, or `None` once the list has been cleared.
    pub fn data(&self) -> Option<&[Record]> {
        self.document.data().map(Vec::as_slice)
    }

    fn records(&self) -> &[Record] {
        self.data().unwrap_or_default()
    }

    fn records_mut(&mut self) -> &mut Vec<Record> {
        self.document.data_slot().get_or_insert_with(Vec::new)
    }

    /// Maps a signed index onto the current list, if it is in range.
    fn position(&self, index: isize) -> Option<usize> {
        usize::try_from(index).ok().filter(|&i| i < self.len())
    }

    /// Number of records; 0 when cleared.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over the current records.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records().iter()
    }

    /// Adds `item` to the end of the list.
    pub fn append(&mut self, item: Record) {
        self.records_mut().push(item);
    }

    /// Inserts `item` before `index`; `index == len()` appends.
    ///
    /// Returns `false` for any index outside `0..=len()`.
    pub fn insert(&mut self, index: isize, item: Record) -> bool {
        match usize::try_from(index) {
            Ok(i) if i <= self.len() => {
                self.records_mut().insert(i, item);
                true
            }
            _ => false,
        }
    }

    /// Returns the record at `index`.
    pub fn get(&self, index: isize) -> Option<&Record> {
        self.position(index).and_then(|i| self.records().get(i))
    }

    /// Replaces the record at `index`.
    pub fn update(&mut self, index: isize, item: Record) -> bool {
        let Some(i) = self.position(index) else {
            return false;
        };
        self.records_mut()[i] = item;
        true
    }

    /// Removes the record at `index`, shifting later records down.
    pub fn remove(&mut self, index: isize) -> bool {
        self.pop(index).is_some()
    }

    /// Removes and returns the record at `index`.
    pub fn pop(&mut self, index: isize) -> Option<Record> {
        let i = self.position(index)?;
        Some(self.records_mut().remove(i))
    }

    /// Moves the store to the cleared state.
    pub fn clear(&mut self) {
        *self.document.data_slot() = None;
    }
}

impl DocumentTemplate for JsonList {
    type Data = Vec<Record>;

    fn document(&self) -> &JsonDocument<Vec<Record>> {
        &self.document
    }

    fn document_mut(&mut self) -> &mut JsonDocument<Vec<Record>> {
        &mut self.document
    }
}

impl<'a> IntoIterator for &'a JsonList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
