use std::io::{Read, Write};

use serde::{ser::Error as _, ser::SerializeStruct, Deserialize, Serialize};

use crate::category::RelevanceEntries;
use crate::correlation::WordCorrelationMatrix;
use crate::dictionary::{Categories, Dictionary, DictionaryConfig, DictionaryIndex};
use crate::error::Result;

/// Snapshot of a dictionary for deserialization.
/// It owns its term table instead of an index, so it can be read without
/// any backend. Use [`DictionaryData::into_dictionary`] to load the terms into
/// an index and get a [`Dictionary`] back.
#[derive(Debug, Deserialize)]
pub struct DictionaryData {
    pub config: DictionaryConfig,
    pub categories: Categories,
    pub number_of_documents: u64,
    pub wcm: WordCorrelationMatrix,
    /// term table, in index order
    pub terms: Vec<(String, RelevanceEntries)>,
}

impl DictionaryData {
    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }

    pub fn read_cbor<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_cbor::from_reader(reader)?)
    }

    /// Write the term table into `index` and wrap it in a [`Dictionary`].
    /// Rows already present in `index` are added to, not replaced.
    pub fn into_dictionary<S>(self, mut index: S) -> Result<Dictionary<S>>
    where
        S: DictionaryIndex,
    {
        if !self.terms.is_empty() {
            index.open_writer()?;
            for (term, entries) in &self.terms {
                index.write_entries(term, entries)?;
            }
            index.close()?;
        }
        Ok(Dictionary {
            config: self.config,
            categories: self.categories,
            number_of_documents: self.number_of_documents,
            wcm: self.wcm,
            index,
            index_open: false,
        })
    }
}

impl<S> Dictionary<S>
where
    S: DictionaryIndex,
{
    /// CBOR snapshot, readable with [`DictionaryData::from_cbor`].
    /// The index must be readable.
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn write_cbor<W: Write>(&self, writer: W) -> Result<()> {
        serde_cbor::to_writer(writer, self)?;
        Ok(())
    }
}

impl<S> Serialize for Dictionary<S>
where
    S: DictionaryIndex,
{
    /// Serializes the term table read out of the index, not the index itself.
    /// Deserialize through [`DictionaryData`].
    fn serialize<Ser>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error>
    where
        Ser: serde::Serializer,
    {
        let terms = self.index.terms().map_err(Ser::Error::custom)?;
        let mut rows = Vec::with_capacity(terms.len());
        for term in terms {
            if let Some(entries) = self.index.read(&term).map_err(Ser::Error::custom)? {
                rows.push((term, entries));
            }
        }

        let mut state = serializer.serialize_struct("Dictionary", 5)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("number_of_documents", &self.number_of_documents)?;
        state.serialize_field("wcm", &self.wcm)?;
        state.serialize_field("terms", &rows)?;
        state.end()
    }
}
