use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::category::{CategoryEntriesBuilder, ImmutableCategoryEntries};
use crate::dictionary::{Dictionary, DictionaryConfig};
use crate::error::Result;

/// Training example: the terms of one document and its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    pub terms: Vec<String>,
    pub category: String,
}

impl Instance {
    pub fn new<I, T>(terms: I, category: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Instance {
            terms: terms.into_iter().map(Into::into).collect(),
            category: category.into(),
        }
    }
}

/// Classifier
/// Train a model from labeled instances, then score feature lists with it.
pub trait Classifier {
    type Model;

    fn train(&self, instances: &[Instance]) -> Result<Self::Model>;

    /// Category distribution for one document, empty if nothing is known
    fn classify<T: AsRef<str>>(&self, features: &[T], model: &Self::Model) -> ImmutableCategoryEntries;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// aggregated categories below this relative relevance are dropped
    pub minimum_score: f64,
    /// weight every category by its prior
    pub use_priors: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            minimum_score: 0.0,
            use_priors: false,
        }
    }
}

/// DictionaryClassifier
/// Trains an in-memory [`Dictionary`] with weight 1.0 per term occurrence
/// and classifies by summing the absolute relevances of the document's
/// terms per category.
///
/// # Examples
/// ```
/// use category_dictionary::{CategoryEntries, Classifier, DictionaryClassifier, Instance};
///
/// let classifier = DictionaryClassifier::default();
/// let model = classifier
///     .train(&[
///         Instance::new(["free", "money"], "spam"),
///         Instance::new(["project", "plan"], "ham"),
///     ])
///     .unwrap();
/// let result = classifier.classify(&["money"], &model);
/// assert_eq!(result.most_likely().unwrap().name(), "spam");
/// ```
#[derive(Debug, Clone, Default)]
pub struct DictionaryClassifier {
    config: ClassifierConfig,
    dictionary_config: DictionaryConfig,
}

impl DictionaryClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        DictionaryClassifier {
            config,
            dictionary_config: DictionaryConfig::default(),
        }
    }

    /// Settings for the dictionaries built by `train`
    pub fn with_dictionary_config(mut self, dictionary_config: DictionaryConfig) -> Self {
        self.dictionary_config = dictionary_config;
        self
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Train more instances into an existing model
    pub fn train_into(&self, model: &mut Dictionary, instances: &[Instance]) -> Result<()> {
        for instance in instances {
            for term in &instance.terms {
                model.update_word(term, &instance.category, 1.0)?;
            }
            model.update_wcm(&instance.terms);
            model.increase_number_of_documents();
        }
        model.calculate_category_priors();
        debug!(
            dictionary = %model.name(),
            instances = instances.len(),
            terms = model.len(),
            "trained dictionary"
        );
        Ok(())
    }

    /// Classify many documents in parallel against one model
    pub fn classify_batch<D, T>(&self, documents: &[D], model: &Dictionary) -> Vec<ImmutableCategoryEntries>
    where
        D: AsRef<[T]> + Sync,
        T: AsRef<str>,
    {
        documents
            .par_iter()
            .map(|document| self.classify(document.as_ref(), model))
            .collect()
    }

    /// Share of `instances` whose most likely category is their own
    pub fn accuracy(&self, instances: &[Instance], model: &Dictionary) -> f64 {
        if instances.is_empty() {
            return 0.0;
        }
        let correct = instances
            .par_iter()
            .filter(|instance| {
                self.classify(&instance.terms, model)
                    .most_likely_ref()
                    .is_some_and(|best| best.name() == instance.category)
            })
            .count();
        correct as f64 / instances.len() as f64
    }
}

impl Classifier for DictionaryClassifier {
    type Model = Dictionary;

    fn train(&self, instances: &[Instance]) -> Result<Dictionary> {
        let mut model = Dictionary::new(self.dictionary_config.clone());
        self.train_into(&mut model, instances)?;
        Ok(model)
    }

    fn classify<T: AsRef<str>>(&self, features: &[T], model: &Dictionary) -> ImmutableCategoryEntries {
        let aggregated = model
            .category_entries_for_terms(features)
            .filtered(self.config.minimum_score);
        if !self.config.use_priors {
            return aggregated.to_builder().create();
        }

        let mut builder = CategoryEntriesBuilder::new();
        for entry in &aggregated {
            let prior = model
                .categories()
                .get(entry.category())
                .map_or(0.0, |stats| stats.prior());
            builder.add_score(entry.category(), entry.absolute_relevance() * prior);
        }
        builder.create()
    }
}
