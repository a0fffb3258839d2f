use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, DictionaryError>;

/// Errors raised by the dictionary core.
///
/// Unknown terms and categories are not errors; read paths answer them with
/// `None` or an empty collection.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Empty category name, empty term, or another malformed argument
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A `CategoryEntry` for this category is already present.
    /// Callers should increase the existing entry instead.
    #[error("duplicate category entry: {0}")]
    DuplicateCategory(String),

    /// The backing index could not be read or written
    #[error("dictionary index unavailable ({context}): {source}")]
    IndexUnavailable {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The index was used before `open_reader`/`open_writer`
    #[error("dictionary index is not open for {0}")]
    IndexNotOpen(&'static str),

    /// Snapshot encoding or decoding failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_cbor::Error),
}

impl DictionaryError {
    pub(crate) fn index_io(context: impl Into<String>, source: std::io::Error) -> Self {
        DictionaryError::IndexUnavailable {
            context: context.into(),
            source,
        }
    }
}
