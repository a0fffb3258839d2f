use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::category::{validate_name, Category, CategoryEntries, CategoryEntriesBuilder, UNKNOWN_COUNT};
use crate::error::{DictionaryError, Result};
use crate::utils::normalizer::ratio_or_zero;
use crate::utils::sort::score_desc;

/// CategoryEntry
/// Absolute relevance of one category for one term, plus the cached
/// relative relevance inside its owning [`RelevanceEntries`].
///
/// Entries are only reachable through their collection, which refreshes the
/// relative value before handing out a reference.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryEntry {
    category: String,
    absolute_relevance: f64,
    /// f64 bits
    #[serde(skip)]
    relative_relevance: AtomicU64,
}

impl CategoryEntry {
    pub fn new(category: impl Into<String>, absolute_relevance: f64) -> Result<Self> {
        let category = category.into();
        validate_name(&category)?;
        Ok(CategoryEntry {
            category,
            absolute_relevance,
            relative_relevance: AtomicU64::new(0f64.to_bits()),
        })
    }

    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[inline]
    pub fn absolute_relevance(&self) -> f64 {
        self.absolute_relevance
    }

    /// Relative relevance, current as of the last refresh of the owning collection
    #[inline]
    pub fn relevance(&self) -> f64 {
        f64::from_bits(self.relative_relevance.load(Ordering::Relaxed))
    }

    #[inline]
    fn store_relevance(&self, value: f64) {
        self.relative_relevance.store(value.to_bits(), Ordering::Relaxed);
    }

    fn to_category(&self) -> Category {
        Category::from_parts(self.category.clone(), self.relevance(), UNKNOWN_COUNT)
    }
}

impl Clone for CategoryEntry {
    fn clone(&self) -> Self {
        Self {
            category: self.category.clone(),
            absolute_relevance: self.absolute_relevance,
            relative_relevance: AtomicU64::new(self.relative_relevance.load(Ordering::Relaxed)),
        }
    }
}

/// RelevanceEntries
/// The mutable, training side collection of [`CategoryEntry`], one per
/// dictionary term.
///
/// Entries are kept sorted by descending absolute relevance.
/// Relative relevances (`absolute / sum of absolutes`, 0 if the sum is 0)
/// are recomputed lazily: every change of an absolute relevance marks the
/// collection stale, and the first read afterwards recomputes all entries in
/// one pass.
#[derive(Debug, Serialize, Deserialize)]
pub struct RelevanceEntries {
    entries: Vec<CategoryEntry>,
    #[serde(skip, default = "stale")]
    relevances_stale: AtomicBool,
}

fn stale() -> AtomicBool {
    AtomicBool::new(true)
}

impl Default for RelevanceEntries {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for RelevanceEntries {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            relevances_stale: AtomicBool::new(self.relevances_stale.load(Ordering::Acquire)),
        }
    }
}

impl PartialEq for RelevanceEntries {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(other.entries.iter()).all(|(a, b)| {
                a.category == b.category && a.absolute_relevance == b.absolute_relevance
            })
    }
}

impl RelevanceEntries {
    pub fn new() -> Self {
        RelevanceEntries {
            entries: Vec::new(),
            relevances_stale: AtomicBool::new(false),
        }
    }

    /// Add a new entry.
    /// Fails with `DuplicateCategory` if the category is already present;
    /// increase the existing entry instead.
    pub fn add(&mut self, entry: CategoryEntry) -> Result<()> {
        if self.position(&entry.category).is_some() {
            return Err(DictionaryError::DuplicateCategory(entry.category));
        }
        self.entries.push(entry);
        self.mark_changed();
        Ok(())
    }

    /// Increase the absolute relevance of an existing entry.
    /// Returns false if there is no entry for `category`.
    pub fn add_absolute_relevance(&mut self, category: &str, value: f64) -> bool {
        match self.position(category) {
            Some(idx) => {
                self.entries[idx].absolute_relevance += value;
                self.mark_changed();
                true
            }
            None => false,
        }
    }

    /// Multiply the absolute relevance of an existing entry
    pub fn mult_absolute_relevance(&mut self, category: &str, factor: f64) -> bool {
        match self.position(category) {
            Some(idx) => {
                self.entries[idx].absolute_relevance *= factor;
                self.mark_changed();
                true
            }
            None => false,
        }
    }

    /// Overwrite the absolute relevance of an existing entry
    pub fn set_absolute_relevance(&mut self, category: &str, value: f64) -> bool {
        match self.position(category) {
            Some(idx) => {
                self.entries[idx].absolute_relevance = value;
                self.mark_changed();
                true
            }
            None => false,
        }
    }

    /// Increase `category` by `value`, creating the entry if needed
    pub fn accumulate(&mut self, category: &str, value: f64) -> Result<()> {
        if !self.add_absolute_relevance(category, value) {
            self.add(CategoryEntry::new(category, value)?)?;
        }
        Ok(())
    }

    /// `accumulate` for names taken from another validated entry
    pub(crate) fn accumulate_entry(&mut self, entry: &CategoryEntry) {
        if !self.add_absolute_relevance(&entry.category, entry.absolute_relevance) {
            self.entries.push(CategoryEntry {
                category: entry.category.clone(),
                absolute_relevance: entry.absolute_relevance,
                relative_relevance: AtomicU64::new(0f64.to_bits()),
            });
            self.mark_changed();
        }
    }

    /// Copy without the entries whose relative relevance is below `minimum`
    pub fn filtered(&self, minimum: f64) -> RelevanceEntries {
        self.refresh();
        let entries = self
            .entries
            .iter()
            .filter(|e| e.relevance() >= minimum)
            .cloned()
            .collect();
        RelevanceEntries {
            entries,
            relevances_stale: AtomicBool::new(true),
        }
    }

    /// Entry for `category`
    pub fn get(&self, category: &str) -> Option<&CategoryEntry> {
        self.refresh();
        self.position(category).map(|idx| &self.entries[idx])
    }

    /// Relative relevance of `category`, 0.0 if absent
    pub fn relevance(&self, category: &str) -> f64 {
        self.get(category).map_or(0.0, CategoryEntry::relevance)
    }

    /// Entries in descending relevance order
    pub fn iter(&self) -> std::slice::Iter<'_, CategoryEntry> {
        self.refresh();
        self.entries.iter()
    }

    /// Highest relevance entry
    pub fn most_relevant(&self) -> Option<&CategoryEntry> {
        self.refresh();
        self.entries.first()
    }

    pub fn total_absolute_relevance(&self) -> f64 {
        self.entries.iter().map(|e| e.absolute_relevance).sum()
    }

    /// Builder seeded with the absolute relevances
    pub fn to_builder(&self) -> CategoryEntriesBuilder {
        let mut builder = CategoryEntriesBuilder::new();
        for entry in &self.entries {
            builder.add_score(&entry.category, entry.absolute_relevance);
        }
        builder
    }

    #[inline]
    pub fn is_stale(&self) -> bool {
        self.relevances_stale.load(Ordering::Acquire)
    }

    fn position(&self, category: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.category == category)
    }

    fn mark_changed(&mut self) {
        self.entries
            .sort_by(|a, b| score_desc(a.absolute_relevance, b.absolute_relevance));
        self.relevances_stale.store(true, Ordering::Release);
    }

    /// Recompute all relative relevances if stale
    fn refresh(&self) {
        if !self.relevances_stale.load(Ordering::Acquire) {
            return;
        }
        let total = self.total_absolute_relevance();
        for entry in &self.entries {
            entry.store_relevance(ratio_or_zero(entry.absolute_relevance, total));
        }
        self.relevances_stale.store(false, Ordering::Release);
    }
}

impl CategoryEntries for RelevanceEntries {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn category(&self, name: &str) -> Option<Category> {
        self.get(name).map(CategoryEntry::to_category)
    }

    fn categories(&self) -> Vec<Category> {
        self.iter().map(CategoryEntry::to_category).collect()
    }

    fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn most_likely(&self) -> Option<Category> {
        self.most_relevant().map(CategoryEntry::to_category)
    }
}

impl<'a> IntoIterator for &'a RelevanceEntries {
    type Item = &'a CategoryEntry;
    type IntoIter = std::slice::Iter<'a, CategoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for RelevanceEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|e| format!("{}:{}({:.4})", e.category, e.absolute_relevance, e.relevance()))
            .collect();
        write!(f, "[{}]", parts.join(", "))
    }
}
