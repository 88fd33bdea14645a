//! The ordered log of results produced by a run, and its traversal cursor.

use std::ops::Index;
use std::slice;

use crate::bucket::ResultEntry;

/// Insertion-ordered results of the most recent run.
///
/// Besides slice-style access the log carries a forward, resettable
/// traversal position (`rewind` / `current` / `key` / `advance` / `valid`).
/// The position is independent of the run that filled the log: clearing the
/// entries leaves it where it was.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLog<T> {
    entries: Vec<ResultEntry<T>>,
    position: usize,
}

impl<T> Default for ResultLog<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            position: 0,
        }
    }
}

impl<T> ResultLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries in the log.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ResultEntry<T>> {
        self.entries.get(index)
    }

    pub fn as_slice(&self) -> &[ResultEntry<T>] {
        &self.entries
    }

    pub fn iter(&self) -> slice::Iter<'_, ResultEntry<T>> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<ResultEntry<T>> {
        self.entries
    }

    // ========== Traversal ==========

    /// Moves the traversal position back to the first entry.
    pub const fn rewind(&mut self) {
        self.position = 0;
    }

    /// Entry at the traversal position, or `None` once past the end.
    pub fn current(&self) -> Option<&ResultEntry<T>> {
        self.entries.get(self.position)
    }

    /// The traversal position.
    pub const fn key(&self) -> usize {
        self.position
    }

    /// Moves the traversal position forward by one, even past the end.
    pub const fn advance(&mut self) {
        self.position = self.position.saturating_add(1);
    }

    /// Whether the traversal position indexes an existing entry.
    pub fn valid(&self) -> bool {
        self.position < self.entries.len()
    }

    // ========== Run support ==========

    /// Drops all entries, keeping the traversal position.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) const fn entries_mut(&mut self) -> &mut Vec<ResultEntry<T>> {
        &mut self.entries
    }
}

impl<T> Index<usize> for ResultLog<T> {
    type Output = ResultEntry<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.entries[index]
    }
}

impl<'a, T> IntoIterator for &'a ResultLog<T> {
    type Item = &'a ResultEntry<T>;
    type IntoIter = slice::Iter<'a, ResultEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<T> IntoIterator for ResultLog<T> {
    type Item = ResultEntry<T>;
    type IntoIter = std::vec::IntoIter<ResultEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<T> FromIterator<ResultEntry<T>> for ResultLog<T> {
    fn from_iter<I: IntoIterator<Item = ResultEntry<T>>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            position: 0,
        }
    }
}
