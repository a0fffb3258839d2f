pub mod categories;
pub mod config;
pub mod export;
pub mod index;
pub mod serde;
pub mod session;

pub use categories::{Categories, CategoryStats};
pub use config::DictionaryConfig;
pub use index::{DictionaryIndex, FileIndex, MemoryIndex};
pub use session::IndexSession;

use std::borrow::Cow;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::category::{validate_name, CategoryEntry, RelevanceEntries};
use crate::correlation::{CorrelationMatrix, WordCorrelationMatrix};
use crate::error::{DictionaryError, Result};
use crate::utils::normalizer::fold_term;

/// progress of `index_into` is logged every this many terms
const PROGRESS_INTERVAL: usize = 4000;

/// Dictionary
/// Term to category relevance table plus the per category training
/// statistics.
///
/// The table lives in the index `S`. [`MemoryIndex`] keeps it in process,
/// [`FileIndex`] on disk; any other [`DictionaryIndex`] can be plugged in.
/// The backend is chosen once at construction and does not change what the
/// methods mean.
///
/// Reads are fail-soft: unknown terms and index failures both answer with
/// `None` or an empty collection, the latter logged at `warn`.
/// Writes return the index error to the caller.
#[derive(Debug, Clone)]
pub struct Dictionary<S = MemoryIndex>
where
    S: DictionaryIndex,
{
    config: DictionaryConfig,
    categories: Categories,
    number_of_documents: u64,
    wcm: WordCorrelationMatrix,
    index: S,
    index_open: bool,
}

impl<S> Dictionary<S>
where
    S: DictionaryIndex + Default,
{
    pub fn new(config: DictionaryConfig) -> Self {
        Self::with_index(config, S::default())
    }
}

impl<S> Dictionary<S>
where
    S: DictionaryIndex,
{
    /// Dictionary backed by `index`
    pub fn with_index(config: DictionaryConfig, index: S) -> Self {
        Dictionary {
            config,
            categories: Categories::new(),
            number_of_documents: 0,
            wcm: WordCorrelationMatrix::new(),
            index,
            index_open: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &DictionaryConfig {
        &self.config
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.config.case_sensitive
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    /// Word correlations collected by [`Dictionary::update_wcm`]
    pub fn wcm(&self) -> &WordCorrelationMatrix {
        &self.wcm
    }

    pub fn wcm_mut(&mut self) -> &mut WordCorrelationMatrix {
        &mut self.wcm
    }

    pub fn index(&self) -> &S {
        &self.index
    }

    pub fn into_index(self) -> S {
        self.index
    }

    pub fn number_of_documents(&self) -> u64 {
        self.number_of_documents
    }

    pub fn set_number_of_documents(&mut self, number_of_documents: u64) {
        self.number_of_documents = number_of_documents;
    }

    /// Count one more training document
    pub fn increase_number_of_documents(&mut self) {
        self.number_of_documents += 1;
    }

    /// prior = frequency / documents for every category
    pub fn calculate_category_priors(&mut self) {
        self.categories.calculate_priors(self.number_of_documents);
    }

    /// Number of stored terms, 0 if the index cannot tell
    pub fn len(&self) -> usize {
        match self.index.term_count() {
            Ok(count) => count,
            Err(e) => {
                warn!(dictionary = %self.config.name, error = %e, "could not count dictionary terms");
                0
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored terms, empty if the index cannot list them
    pub fn terms(&self) -> Vec<String> {
        match self.index.terms() {
            Ok(terms) => terms,
            Err(e) => {
                warn!(dictionary = %self.config.name, error = %e, "could not list dictionary terms");
                Vec::new()
            }
        }
    }

    /// Open the index for writing, then for reading.
    /// Returns whether the index already held data.
    pub fn use_index(&mut self) -> Result<bool> {
        self.index.open_writer()?;
        let found = self.index.open_reader()?;
        self.index_open = true;
        debug!(dictionary = %self.config.name, existing = found, "dictionary index opened");
        Ok(found)
    }

    /// Flush pending writes and keep the index open for reading
    pub fn close_index_writer(&mut self) -> Result<()> {
        self.index.close()?;
        self.index.open_reader()?;
        debug!(dictionary = %self.config.name, "dictionary index writer closed");
        Ok(())
    }

    pub fn close_index(&mut self) -> Result<()> {
        self.index.close()?;
        self.index_open = false;
        debug!(dictionary = %self.config.name, "dictionary index closed");
        Ok(())
    }

    /// Remove every stored term. Does nothing unless the index was opened
    /// with [`Dictionary::use_index`].
    pub fn empty_index(&mut self) -> Result<()> {
        if !self.index_open {
            warn!(dictionary = %self.config.name, "could not empty index because it was not yet opened");
            return Ok(());
        }
        self.index.empty()?;
        info!(dictionary = %self.config.name, "dictionary index emptied");
        Ok(())
    }

    /// Open the index for the lifetime of the returned guard
    pub fn open_index(&mut self) -> Result<IndexSession<'_, S>> {
        self.use_index()?;
        Ok(IndexSession::new(self))
    }

    pub fn is_index_open(&self) -> bool {
        self.index_open
    }

    /// Train `weight` for `term` into `category`.
    ///
    /// The first sighting of a term for a category creates the entry and
    /// counts towards the category frequency. Later sightings only add
    /// `weight` to the existing entry. Both add `weight` to the category's
    /// total term weight. The category is registered only once the index
    /// accepted the entry.
    ///
    /// Returns a copy of the term's stored entries after the update, or just
    /// the written entry when `read_from_index_for_update` is off.
    pub fn update_word(
        &mut self,
        term: &str,
        category: impl AsRef<str>,
        weight: f64,
    ) -> Result<RelevanceEntries> {
        let category = category.as_ref();
        validate_name(category)?;
        if term.is_empty() {
            return Err(DictionaryError::InvalidArgument("term must not be empty".to_string()));
        }
        let key = fold_term(term, self.config.case_sensitive);

        // None: unknown term, Some(None): known term without this category
        let stored = if self.config.read_from_index_for_update {
            self.index
                .read(&key)?
                .map(|row| row.get(category).map(CategoryEntry::absolute_relevance))
        } else {
            None
        };

        let first_sighting = !matches!(stored, Some(Some(_)));
        let entry = match stored {
            Some(Some(current)) => CategoryEntry::new(category, current + weight)?,
            _ => CategoryEntry::new(category, weight)?,
        };
        if stored.is_none() {
            self.index.write(&key, &entry)?;
        } else {
            self.index.update(&key, &entry)?;
        }

        let stats = self.categories.register(category)?;
        if first_sighting {
            stats.increase_frequency();
        }
        stats.increase_total_term_weight(weight);

        if !self.config.read_from_index_for_update {
            let mut written = RelevanceEntries::new();
            written.add(entry)?;
            return Ok(written);
        }
        Ok(self.index.read(&key)?.map(Cow::into_owned).unwrap_or_default())
    }

    /// Record consecutive term pairs of one document as co-occurrences
    pub fn update_wcm<T: AsRef<str>>(&mut self, terms: &[T]) {
        for pair in terms.windows(2) {
            let first = fold_term(pair[0].as_ref(), self.config.case_sensitive);
            let second = fold_term(pair[1].as_ref(), self.config.case_sensitive);
            self.wcm.update_pair(&first, &second);
        }
    }

    fn lookup(&self, term: &str) -> Option<Cow<'_, RelevanceEntries>> {
        let key = fold_term(term, self.config.case_sensitive);
        match self.index.read(&key) {
            Ok(found) => found,
            Err(e) => {
                warn!(dictionary = %self.config.name, term = %key, error = %e, "index read failed, treating term as unknown");
                None
            }
        }
    }

    /// Entries of `term`, empty if unknown
    pub fn entries(&self, term: &str) -> RelevanceEntries {
        self.lookup(term).map(Cow::into_owned).unwrap_or_default()
    }

    /// Entries of `term` with relevance at least `minimum_score`,
    /// `None` if the term is unknown
    pub fn category_entries(&self, term: &str, minimum_score: f64) -> Option<RelevanceEntries> {
        self.lookup(term).map(|entries| entries.filtered(minimum_score))
    }

    /// Sum the absolute relevances of all known `terms` per category.
    /// Unknown terms contribute nothing.
    pub fn category_entries_for_terms<T: AsRef<str>>(&self, terms: &[T]) -> RelevanceEntries {
        let mut aggregated = RelevanceEntries::new();
        for term in terms {
            if let Some(entries) = self.lookup(term.as_ref()) {
                for entry in entries.iter() {
                    aggregated.accumulate_entry(entry);
                }
            }
        }
        aggregated
    }

    /// Best entry of `term` if its relevance reaches `minimum_score`
    pub fn most_likely_category_entry(&self, term: &str, minimum_score: f64) -> Option<CategoryEntry> {
        let entries = self.lookup(term)?;
        let best = entries.most_relevant()?;
        (best.relevance() >= minimum_score).then(|| best.clone())
    }

    /// Vote over `terms`: each term's best entry adds its relevance to its
    /// category, and the first seen entry of the winning category is
    /// returned. Ties go to the category seen first.
    pub fn most_likely_category_entry_for_terms<T: AsRef<str>>(
        &self,
        terms: &[T],
        minimum_score: f64,
    ) -> Option<CategoryEntry> {
        let mut votes: IndexMap<String, (f64, CategoryEntry)> = IndexMap::new();
        for term in terms {
            let Some(best) = self.most_likely_category_entry(term.as_ref(), minimum_score) else {
                continue;
            };
            match votes.get_mut(best.category()) {
                Some((sum, _)) => *sum += best.relevance(),
                None => {
                    let category = best.category().to_string();
                    votes.insert(category, (best.relevance(), best));
                }
            }
        }
        votes
            .into_values()
            .fold(None, |winner: Option<(f64, CategoryEntry)>, (sum, entry)| match winner {
                Some((top, _)) if top >= sum => winner,
                _ => Some((sum, entry)),
            })
            .map(|(_, entry)| entry)
    }

    /// Copy every term into `target`, optionally emptying it first.
    /// Priors are recalculated before copying. Returns the number of terms.
    pub fn index_into<T>(&mut self, target: &mut T, empty_first: bool) -> Result<usize>
    where
        T: DictionaryIndex,
    {
        self.calculate_category_priors();
        target.open_writer()?;
        target.open_reader()?;
        if empty_first {
            target.empty()?;
        }

        let terms = self.index.terms()?;
        let total = terms.len();
        for (i, term) in terms.iter().enumerate() {
            if i % PROGRESS_INTERVAL == 0 {
                info!(
                    dictionary = %self.config.name,
                    progress = format!("{:.2}%", 100.0 * i as f64 / total as f64),
                    "saving dictionary"
                );
            }
            if let Some(entries) = self.index.read(term)? {
                target.write_entries(term, &entries)?;
            }
        }
        target.close()?;
        info!(dictionary = %self.config.name, terms = total, "dictionary saved to index");
        Ok(total)
    }
}
