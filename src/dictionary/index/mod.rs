pub mod file;

pub use file::FileIndex;

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryEntry, RelevanceEntries};
use crate::error::Result;

/// DictionaryIndex
/// Storage for the `term -> RelevanceEntries` table of a dictionary.
///
/// A [`crate::Dictionary`] is generic over its index, the way the vectorizer
/// is generic over its engine: pick the backend once at construction.
///
/// Row semantics:
/// - `write` adds the entry's absolute relevance to the stored row,
///   creating the term and the row when absent
/// - `update` sets the stored row to the entry's absolute relevance
///
/// Terms handed to an index are already case folded.
pub trait DictionaryIndex {
    /// Prepare for writes
    fn open_writer(&mut self) -> Result<()>;

    /// Prepare for reads; true if previously stored data was found
    fn open_reader(&mut self) -> Result<bool>;

    /// Flush pending writes and release handles
    fn close(&mut self) -> Result<()>;

    /// Remove every stored term
    fn empty(&mut self) -> Result<()>;

    /// Entries of `term`, `None` if unknown
    fn read(&self, term: &str) -> Result<Option<Cow<'_, RelevanceEntries>>>;

    fn write(&mut self, term: &str, entry: &CategoryEntry) -> Result<()>;

    fn update(&mut self, term: &str, entry: &CategoryEntry) -> Result<()>;

    /// All stored terms
    fn terms(&self) -> Result<Vec<String>>;

    /// Number of stored terms
    fn term_count(&self) -> Result<usize> {
        Ok(self.terms()?.len())
    }

    /// Write every entry of a term
    fn write_entries(&mut self, term: &str, entries: &RelevanceEntries) -> Result<()> {
        for entry in entries {
            self.write(term, entry)?;
        }
        Ok(())
    }
}

/// Apply `write` semantics on an in-process table
pub(crate) fn write_row(
    table: &mut IndexMap<String, RelevanceEntries>,
    term: &str,
    entry: &CategoryEntry,
) -> Result<()> {
    table.entry(term.to_string()).or_default().accumulate_entry(entry);
    Ok(())
}

/// Apply `update` semantics on an in-process table
pub(crate) fn update_row(
    table: &mut IndexMap<String, RelevanceEntries>,
    term: &str,
    entry: &CategoryEntry,
) -> Result<()> {
    let entries = table.entry(term.to_string()).or_default();
    if entries.set_absolute_relevance(entry.category(), entry.absolute_relevance()) {
        Ok(())
    } else {
        entries.add(entry.clone())
    }
}

/// MemoryIndex
/// Keeps the whole table in process memory. Open and close are no-ops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryIndex {
    #[serde(with = "indexmap::map::serde_seq")]
    terms: IndexMap<String, RelevanceEntries>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Iterate stored terms and their entries
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RelevanceEntries)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl DictionaryIndex for MemoryIndex {
    fn open_writer(&mut self) -> Result<()> {
        Ok(())
    }

    fn open_reader(&mut self) -> Result<bool> {
        Ok(!self.terms.is_empty())
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    fn empty(&mut self) -> Result<()> {
        self.terms.clear();
        Ok(())
    }

    fn read(&self, term: &str) -> Result<Option<Cow<'_, RelevanceEntries>>> {
        Ok(self.terms.get(term).map(Cow::Borrowed))
    }

    fn write(&mut self, term: &str, entry: &CategoryEntry) -> Result<()> {
        write_row(&mut self.terms, term, entry)
    }

    fn update(&mut self, term: &str, entry: &CategoryEntry) -> Result<()> {
        update_row(&mut self.terms, term, entry)
    }

    fn terms(&self) -> Result<Vec<String>> {
        Ok(self.terms.keys().cloned().collect())
    }

    fn term_count(&self) -> Result<usize> {
        Ok(self.terms.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_accumulates_update_overwrites() {
        let mut index = MemoryIndex::new();
        index.write("cat", &CategoryEntry::new("pets", 1.0).unwrap()).unwrap();
        index.write("cat", &CategoryEntry::new("pets", 2.0).unwrap()).unwrap();
        assert_eq!(index.read("cat").unwrap().unwrap().get("pets").unwrap().absolute_relevance(), 3.0);

        index.update("cat", &CategoryEntry::new("pets", 5.0).unwrap()).unwrap();
        index.update("cat", &CategoryEntry::new("music", 1.0).unwrap()).unwrap();
        let entries = index.read("cat").unwrap().unwrap();
        assert_eq!(entries.get("pets").unwrap().absolute_relevance(), 5.0);
        assert_eq!(entries.relevance("music"), 1.0 / 6.0);
    }

    #[test]
    fn unknown_terms_read_as_none() {
        let mut index = MemoryIndex::new();
        assert!(!index.open_reader().unwrap());
        assert!(index.read("nothing").unwrap().is_none());
        index.write("a", &CategoryEntry::new("x", 1.0).unwrap()).unwrap();
        assert_eq!(index.terms().unwrap(), vec!["a".to_string()]);
        index.empty().unwrap();
        assert!(index.is_empty());
    }
}
