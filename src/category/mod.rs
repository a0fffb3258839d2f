pub mod builder;
pub mod entries;
pub mod relevance;

pub use builder::CategoryEntriesBuilder;
pub use entries::ImmutableCategoryEntries;
pub use relevance::{CategoryEntry, RelevanceEntries};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, Result};

/// Count sentinel for categories whose score is not count based
pub const UNKNOWN_COUNT: i64 = -1;

/// Category
/// An immutable (name, probability, count) triple.
///
/// `count` is either a non-negative observation count or [`UNKNOWN_COUNT`]
/// when the probability was not derived from counting.
/// Ordering between categories is probability descending, see
/// [`crate::utils::sort::probability_desc`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    name: String,
    probability: f64,
    count: i64,
}

impl Category {
    /// Create a category without a count
    pub fn new(name: impl Into<String>, probability: f64) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Category {
            name,
            probability,
            count: UNKNOWN_COUNT,
        })
    }

    /// Create a count based category
    pub fn with_count(name: impl Into<String>, probability: f64, count: u64) -> Result<Self> {
        let count = i64::try_from(count)
            .map_err(|_| DictionaryError::InvalidArgument(format!("count {count} is out of range")))?;
        let mut category = Category::new(name, probability)?;
        category.count = count;
        Ok(category)
    }

    /// Name is validated by the owning collection
    pub(crate) fn from_parts(name: String, probability: f64, count: i64) -> Self {
        Category {
            name,
            probability,
            count,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// raw count, [`UNKNOWN_COUNT`] if not count based
    #[inline]
    pub fn count(&self) -> i64 {
        self.count
    }

    #[inline]
    pub fn has_count(&self) -> bool {
        self.count != UNKNOWN_COUNT
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_count() {
            write!(f, "{}={:.4} ({})", self.name, self.probability, self.count)
        } else {
            write!(f, "{}={:.4}", self.name, self.probability)
        }
    }
}

impl AsRef<str> for Category {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// CategoryEntries
/// Read contract shared by every collection of categories.
///
/// Absent names are answered with neutral values (`0.0`, `0`, `None`),
/// never with an error.
pub trait CategoryEntries {
    /// number of categories
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Category snapshot for `name`
    fn category(&self, name: &str) -> Option<Category>;

    /// Categories in probability descending order
    fn categories(&self) -> Vec<Category>;

    /// Probability of `name`, 0.0 if absent
    fn probability(&self, name: &str) -> f64 {
        self.category(name).map_or(0.0, |c| c.probability())
    }

    /// Count of `name`, 0 if absent
    fn count(&self, name: &str) -> i64 {
        self.category(name).map_or(0, |c| c.count())
    }

    fn contains(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// The category with the highest probability.
    /// Ties resolve to the first one in iteration order.
    fn most_likely(&self) -> Option<Category> {
        self.categories().into_iter().next()
    }
}

pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DictionaryError::InvalidArgument(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_rejects_empty_name() {
        assert!(matches!(
            Category::new("", 0.5),
            Err(DictionaryError::InvalidArgument(_))
        ));
        assert!(Category::new("   ", 0.5).is_err());
    }

    #[test]
    fn category_count_sentinel() {
        let plain = Category::new("sports", 0.25).unwrap();
        assert_eq!(plain.count(), UNKNOWN_COUNT);
        assert!(!plain.has_count());

        let counted = Category::with_count("sports", 0.25, 3).unwrap();
        assert_eq!(counted.count(), 3);
        assert!(counted.has_count());
        assert_eq!(format!("{}", counted), "sports=0.2500 (3)");
    }

    #[test]
    fn count_beyond_i64_is_rejected() {
        assert!(matches!(
            Category::with_count("x", 0.5, u64::MAX),
            Err(DictionaryError::InvalidArgument(_))
        ));
        let largest = Category::with_count("x", 0.5, i64::MAX as u64).unwrap();
        assert_eq!(largest.count(), i64::MAX);
        assert!(largest.has_count());

        let mut builder = CategoryEntriesBuilder::new();
        builder.add_entries(&ImmutableCategoryEntries::from_categories(vec![
            Category::with_count("x", 0.5, 7).unwrap(),
        ]));
        assert_eq!(builder.score("x"), 7.0);
    }
}
