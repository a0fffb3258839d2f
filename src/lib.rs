//! This crate is the statistical core of a text classifier: a term to category dictionary.

pub mod category;
pub mod classifier;
pub mod correlation;
pub mod dictionary;
pub mod error;
pub mod utils;

/// Dictionary
/// The top-level struct of this crate, mapping terms to per category relevances.
///
/// Internally, it holds:
/// - The term table, stored in a `DictionaryIndex`
/// - The categories with their frequency, total term weight and prior
/// - The number of training documents
/// - A word correlation matrix of neighbouring terms
///
/// `Dictionary<S>` has one generic parameter:
/// - `S`: the index backend (`MemoryIndex` by default, or `FileIndex`)
///
/// Training goes through `update_word`, classification through
/// `category_entries_for_terms` and the `most_likely_*` queries.
/// Unknown terms are never an error.
///
/// # Serialization
/// Supported.
/// The term table is read out of the index, so the snapshot does not depend on
/// the backend.
///
/// # Deserialization
/// Through `DictionaryData`, which is expanded into any index.
pub use dictionary::Dictionary;

/// Dictionary Data Structure for Deserialization
/// Owns the term table instead of an index.
/// Convert it into a `Dictionary` with `into_dictionary(index)`.
pub use dictionary::serde::DictionaryData;

/// Dictionary settings
/// Name, case sensitivity and whether updates read existing entries first.
pub use dictionary::DictionaryConfig;

/// Dictionary Index Trait
/// Storage contract for the term table.
///
/// By implementing this trait, you can plug another backend into `Dictionary<S>`.
/// Two implementations are provided:
/// - `MemoryIndex`: the table lives in process memory
/// - `FileIndex`: the table is a CBOR file, flushed atomically on close
pub use dictionary::index::{DictionaryIndex, FileIndex, MemoryIndex};

/// Index Session
/// Keeps the index of a dictionary open and closes it when dropped.
pub use dictionary::session::IndexSession;

/// Category statistics of a dictionary
/// - `Categories`: the registered categories in registration order
/// - `CategoryStats`: frequency, total term weight and prior of one category
pub use dictionary::categories::{Categories, CategoryStats};

/// Category and Category Entries
/// - `Category`: an immutable (name, probability, count) triple
/// - `CategoryEntries`: the read contract shared by every collection of categories
/// - `ImmutableCategoryEntries`: a probability sorted snapshot
pub use category::{Category, CategoryEntries, ImmutableCategoryEntries, UNKNOWN_COUNT};

/// Category Entries Builder
/// Accumulates raw scores per category and normalizes them into
/// `ImmutableCategoryEntries`.
/// Count based categories merge as counts, the others as probabilities.
pub use category::CategoryEntriesBuilder;

/// Relevance Entries
/// The training side collection of one term.
/// - `RelevanceEntries`: absolute relevances with lazily recomputed relative relevances
/// - `CategoryEntry`: one category of a term
pub use category::{CategoryEntry, RelevanceEntries};

/// Word Correlation Matrix
/// Symmetric co-occurrence counts of term pairs.
/// - `WordCorrelationMatrix`: one id list per term, small footprint
/// - `FastWordCorrelationMatrix`: nested maps, constant time pair lookup
///
/// Both produce identical query results through `CorrelationMatrix`.
pub use correlation::{CorrelationMatrix, FastWordCorrelationMatrix, WordCorrelation, WordCorrelationMatrix};

/// Classifier
/// Train a `Dictionary` from labeled instances and classify term lists into
/// normalized category distributions, one at a time or in parallel.
pub use classifier::{Classifier, ClassifierConfig, DictionaryClassifier, Instance};

/// Error type of this crate
pub use error::{DictionaryError, Result};
