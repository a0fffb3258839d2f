use std::ops::{Deref, DerefMut};

use tracing::warn;

use crate::dictionary::index::DictionaryIndex;
use crate::dictionary::Dictionary;
use crate::error::Result;

/// IndexSession
/// Scoped use of a dictionary index: opened by [`Dictionary::open_index`],
/// closed when dropped.
///
/// Call [`IndexSession::finish`] to observe close errors; a plain drop only
/// logs them.
pub struct IndexSession<'a, S>
where
    S: DictionaryIndex,
{
    dictionary: &'a mut Dictionary<S>,
    closed: bool,
}

impl<'a, S> IndexSession<'a, S>
where
    S: DictionaryIndex,
{
    pub(crate) fn new(dictionary: &'a mut Dictionary<S>) -> Self {
        IndexSession {
            dictionary,
            closed: false,
        }
    }

    /// Close the index and report the outcome
    pub fn finish(mut self) -> Result<()> {
        self.closed = true;
        self.dictionary.close_index()
    }
}

impl<S> Deref for IndexSession<'_, S>
where
    S: DictionaryIndex,
{
    type Target = Dictionary<S>;

    fn deref(&self) -> &Self::Target {
        self.dictionary
    }
}

impl<S> DerefMut for IndexSession<'_, S>
where
    S: DictionaryIndex,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.dictionary
    }
}

impl<S> Drop for IndexSession<'_, S>
where
    S: DictionaryIndex,
{
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.dictionary.close_index() {
            warn!(dictionary = %self.dictionary.name(), error = %e, "closing dictionary index failed");
        }
    }
}
