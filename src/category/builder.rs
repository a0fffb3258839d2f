use indexmap::IndexMap;

use crate::category::{validate_name, Category, CategoryEntries, ImmutableCategoryEntries};
use crate::error::Result;
use crate::utils::normalizer::ratio_or_zero;

/// CategoryEntriesBuilder
/// Accumulates raw scores per category name and produces a normalized,
/// probability sorted [`ImmutableCategoryEntries`].
///
/// # Examples
/// ```
/// use category_dictionary::{CategoryEntries, CategoryEntriesBuilder};
/// let mut builder = CategoryEntriesBuilder::new();
/// builder.add("spam", 3.0).unwrap().add("ham", 1.0).unwrap();
///
/// let entries = builder.create();
/// assert_eq!(entries.most_likely().unwrap().name(), "spam");
/// assert_eq!(entries.probability("ham"), 0.25);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CategoryEntriesBuilder {
    scores: IndexMap<String, f64>,
}

impl CategoryEntriesBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing name -> score map
    pub fn from_map<I, S>(scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut builder = Self::new();
        for (name, score) in scores {
            builder.set(name, score)?;
        }
        Ok(builder)
    }

    /// Overwrite the score of `name`
    pub fn set(&mut self, name: impl Into<String>, score: f64) -> Result<&mut Self> {
        let name = name.into();
        validate_name(&name)?;
        self.scores.insert(name, score);
        Ok(self)
    }

    /// Add to the score of `name`, starting at `score` if absent
    pub fn add(&mut self, name: impl Into<String>, score: f64) -> Result<&mut Self> {
        let name = name.into();
        validate_name(&name)?;
        *self.scores.entry(name).or_insert(0.0) += score;
        Ok(self)
    }

    /// Add the same score to several names
    pub fn add_all<I, S>(&mut self, names: I, score: f64) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.add(name, score)?;
        }
        Ok(self)
    }

    /// Subtract from the score of `name`
    pub fn subtract(&mut self, name: impl Into<String>, score: f64) -> Result<&mut Self> {
        self.add(name, -score)
    }

    /// Merge another collection.
    /// Count based categories contribute their count, the others their probability.
    pub fn add_entries<E>(&mut self, entries: &E) -> &mut Self
    where
        E: CategoryEntries + ?Sized,
    {
        for category in entries.categories() {
            let contribution = if category.has_count() {
                category.count() as f64
            } else {
                category.probability()
            };
            self.add_score(category.name(), contribution);
        }
        self
    }

    /// `add` for names that are already validated
    pub(crate) fn add_score(&mut self, name: &str, score: f64) {
        match self.scores.get_mut(name) {
            Some(current) => *current += score,
            None => {
                self.scores.insert(name.to_string(), score);
            }
        }
    }

    /// Raw accumulated score, 0.0 if absent
    #[inline]
    pub fn score(&self, name: &str) -> f64 {
        self.scores.get(name).copied().unwrap_or(0.0)
    }

    /// Sum of all raw scores
    pub fn total_score(&self) -> f64 {
        self.scores.values().sum()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Normalize every score by the total.
    /// A total of exactly 0 yields probability 0 for every category.
    pub fn create(&self) -> ImmutableCategoryEntries {
        let total = self.total_score();
        ImmutableCategoryEntries::from_categories(self.scores.iter().map(|(name, score)| {
            Category::from_parts(name.clone(), ratio_or_zero(*score, total), crate::category::UNKNOWN_COUNT)
        }))
    }
}
