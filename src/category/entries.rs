use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::{Category, CategoryEntries};
use crate::utils::sort::probability_desc;

/// ImmutableCategoryEntries
/// A probability descending snapshot of categories, unique by name.
///
/// Produced by [`crate::CategoryEntriesBuilder::create`]; there is no
/// mutation after construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImmutableCategoryEntries {
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, Category>,
}

impl ImmutableCategoryEntries {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from categories, sorting them by probability.
    /// A later category with an already seen name replaces the earlier one.
    pub fn from_categories<I>(categories: I) -> Self
    where
        I: IntoIterator<Item = Category>,
    {
        let mut entries: IndexMap<String, Category> = IndexMap::new();
        for category in categories {
            entries.insert(category.name().to_string(), category);
        }
        entries.sort_by(|_, a, _, b| probability_desc(a, b));
        ImmutableCategoryEntries { entries }
    }

    /// Borrowing lookup
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.entries.get(name)
    }

    /// Iterate in probability descending order
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.values()
    }

    /// Borrowing variant of [`CategoryEntries::most_likely`]
    #[inline]
    pub fn most_likely_ref(&self) -> Option<&Category> {
        self.entries.first().map(|(_, c)| c)
    }

    /// Sum of all probabilities
    pub fn total_probability(&self) -> f64 {
        self.entries.values().map(Category::probability).sum()
    }
}

impl CategoryEntries for ImmutableCategoryEntries {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn category(&self, name: &str) -> Option<Category> {
        self.entries.get(name).cloned()
    }

    fn categories(&self) -> Vec<Category> {
        self.entries.values().cloned().collect()
    }

    fn probability(&self, name: &str) -> f64 {
        self.entries.get(name).map_or(0.0, Category::probability)
    }

    fn count(&self, name: &str) -> i64 {
        self.entries.get(name).map_or(0, Category::count)
    }

    fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn most_likely(&self) -> Option<Category> {
        self.most_likely_ref().cloned()
    }
}

impl<'a> IntoIterator for &'a ImmutableCategoryEntries {
    type Item = &'a Category;
    type IntoIter = indexmap::map::Values<'a, String, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl fmt::Display for ImmutableCategoryEntries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "CategoryEntries [")?;
            for category in self.entries.values() {
                writeln!(f, "    {}", category)?;
            }
            write!(f, "]")
        } else {
            let parts: Vec<String> = self.entries.values().map(|c| c.to_string()).collect();
            write!(f, "[{}]", parts.join(", "))
        }
    }
}
