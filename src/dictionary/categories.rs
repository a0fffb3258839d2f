use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::category::validate_name;
use crate::error::Result;
use crate::utils::normalizer::ratio_or_zero;

/// Training statistics of one category in a dictionary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    name: String,
    /// new term/category pairings seen
    frequency: u64,
    /// sum of all term weights trained into this category
    total_term_weight: f64,
    prior: f64,
}

impl CategoryStats {
    fn new(name: String) -> Self {
        CategoryStats {
            name,
            frequency: 0,
            total_term_weight: 0.0,
            prior: 0.0,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    #[inline]
    pub fn total_term_weight(&self) -> f64 {
        self.total_term_weight
    }

    /// frequency / documents, as of the last `calculate_priors`
    #[inline]
    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub(crate) fn increase_frequency(&mut self) {
        self.frequency += 1;
    }

    pub(crate) fn increase_total_term_weight(&mut self, weight: f64) {
        self.total_term_weight += weight;
    }
}

impl AsRef<str> for CategoryStats {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Categories
/// The categories a dictionary classifies into, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(with = "indexmap::map::serde_seq")]
    entries: IndexMap<String, CategoryStats>,
}

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or register `name`
    pub fn register(&mut self, name: &str) -> Result<&mut CategoryStats> {
        validate_name(name)?;
        Ok(self
            .entries
            .entry(name.to_string())
            .or_insert_with(|| CategoryStats::new(name.to_string())))
    }

    pub fn get(&self, name: &str) -> Option<&CategoryStats> {
        self.entries.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut CategoryStats> {
        self.entries.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryStats> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// prior = frequency / total_documents, 0 when there are no documents
    pub fn calculate_priors(&mut self, total_documents: u64) {
        for stats in self.entries.values_mut() {
            stats.prior = ratio_or_zero(stats.frequency as f64, total_documents as f64);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_is_idempotent() {
        let mut categories = Categories::new();
        categories.register("spam").unwrap().increase_frequency();
        categories.register("spam").unwrap().increase_frequency();
        categories.register("ham").unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories.get("spam").unwrap().frequency(), 2);
        assert_eq!(categories.names().collect::<Vec<_>>(), vec!["spam", "ham"]);
        assert!(categories.register("").is_err());
    }

    #[test]
    fn priors_with_and_without_documents() {
        let mut categories = Categories::new();
        for _ in 0..3 {
            categories.register("spam").unwrap().increase_frequency();
        }
        categories.calculate_priors(0);
        assert_eq!(categories.get("spam").unwrap().prior(), 0.0);
        categories.calculate_priors(6);
        assert_eq!(categories.get("spam").unwrap().prior(), 0.5);
    }
}
