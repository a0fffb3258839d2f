use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::category::{CategoryEntry, RelevanceEntries};
use crate::dictionary::index::{update_row, write_row, DictionaryIndex};
use crate::error::{DictionaryError, Result};

/// FileIndex
/// Disk backed index storing the term table as one CBOR file.
///
/// `open_reader` loads the file, writes are buffered in memory and `close`
/// replaces the file atomically through a temporary file in the same
/// directory.
#[derive(Debug)]
pub struct FileIndex {
    path: PathBuf,
    terms: IndexMap<String, RelevanceEntries>,
    reader_open: bool,
    writer_open: bool,
    dirty: bool,
}

impl FileIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileIndex {
            path: path.into(),
            terms: IndexMap::new(),
            reader_open: false,
            writer_open: false,
            dirty: false,
        }
    }

    /// `<directory>/<name>.cbor`
    pub fn in_directory(directory: impl AsRef<Path>, name: &str) -> Self {
        Self::new(directory.as_ref().join(format!("{name}.cbor")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.reader_open || self.writer_open
    }

    fn load(&mut self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        let file = File::open(&self.path)
            .map_err(|e| DictionaryError::index_io(format!("open {}", self.path.display()), e))?;
        self.terms = serde_cbor::from_reader(BufReader::new(file))?;
        debug!(path = %self.path.display(), terms = self.terms.len(), "loaded dictionary index");
        Ok(true)
    }

    fn flush(&mut self) -> Result<()> {
        let directory = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let io_err = |context: &str, e| DictionaryError::index_io(format!("{context} {}", directory.display()), e);

        std::fs::create_dir_all(&directory).map_err(|e| io_err("create", e))?;
        let temp = NamedTempFile::new_in(&directory).map_err(|e| io_err("temp file in", e))?;
        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_cbor::to_writer(&mut writer, &self.terms)?;
            writer.flush().map_err(|e| io_err("write into", e))?;
        }
        temp.persist(&self.path)
            .map_err(|e| DictionaryError::index_io(format!("persist {}", self.path.display()), e.error))?;
        self.dirty = false;
        info!(path = %self.path.display(), terms = self.terms.len(), "flushed dictionary index");
        Ok(())
    }

    fn ensure_writer(&self) -> Result<()> {
        if self.writer_open {
            Ok(())
        } else {
            Err(DictionaryError::IndexNotOpen("writing"))
        }
    }
}

impl DictionaryIndex for FileIndex {
    fn open_writer(&mut self) -> Result<()> {
        if !self.reader_open && !self.writer_open {
            self.load()?;
        }
        self.writer_open = true;
        Ok(())
    }

    fn open_reader(&mut self) -> Result<bool> {
        let found = if self.writer_open || self.reader_open {
            !self.terms.is_empty() || self.path.exists()
        } else {
            self.load()?
        };
        self.reader_open = true;
        Ok(found)
    }

    fn close(&mut self) -> Result<()> {
        if self.dirty {
            self.flush()?;
        }
        self.reader_open = false;
        self.writer_open = false;
        self.terms = IndexMap::new();
        Ok(())
    }

    fn empty(&mut self) -> Result<()> {
        self.ensure_writer()?;
        self.terms.clear();
        self.dirty = true;
        Ok(())
    }

    fn read(&self, term: &str) -> Result<Option<Cow<'_, RelevanceEntries>>> {
        if !self.reader_open {
            return Err(DictionaryError::IndexNotOpen("reading"));
        }
        Ok(self.terms.get(term).map(Cow::Borrowed))
    }

    fn write(&mut self, term: &str, entry: &CategoryEntry) -> Result<()> {
        self.ensure_writer()?;
        write_row(&mut self.terms, term, entry)?;
        self.dirty = true;
        Ok(())
    }

    fn update(&mut self, term: &str, entry: &CategoryEntry) -> Result<()> {
        self.ensure_writer()?;
        update_row(&mut self.terms, term, entry)?;
        self.dirty = true;
        Ok(())
    }

    fn terms(&self) -> Result<Vec<String>> {
        if !self.reader_open {
            return Err(DictionaryError::IndexNotOpen("reading"));
        }
        Ok(self.terms.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survives_close_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::in_directory(dir.path(), "news");

        index.open_writer().unwrap();
        assert!(!index.open_reader().unwrap());
        index.write("cat", &CategoryEntry::new("pets", 2.0).unwrap()).unwrap();
        index.update("cat", &CategoryEntry::new("music", 1.0).unwrap()).unwrap();
        index.close().unwrap();
        assert!(index.path().exists());

        let mut reopened = FileIndex::in_directory(dir.path(), "news");
        assert!(reopened.open_reader().unwrap());
        let entries = reopened.read("cat").unwrap().unwrap();
        assert_eq!(entries.get("pets").unwrap().absolute_relevance(), 2.0);
        assert_eq!(entries.relevance("music"), 1.0 / 3.0);
    }

    #[test]
    fn closed_index_refuses_access() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::in_directory(dir.path(), "closed");
        assert!(matches!(index.read("x"), Err(DictionaryError::IndexNotOpen(_))));
        assert!(matches!(
            index.write("x", &CategoryEntry::new("c", 1.0).unwrap()),
            Err(DictionaryError::IndexNotOpen(_))
        ));
    }

    #[test]
    fn empty_clears_stored_terms() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::in_directory(dir.path(), "emptied");
        index.open_writer().unwrap();
        index.open_reader().unwrap();
        index.write("a", &CategoryEntry::new("c", 1.0).unwrap()).unwrap();
        index.close().unwrap();

        index.open_writer().unwrap();
        index.open_reader().unwrap();
        assert_eq!(index.terms().unwrap().len(), 1);
        index.empty().unwrap();
        index.close().unwrap();

        index.open_reader().unwrap();
        assert!(index.terms().unwrap().is_empty());
    }
}
