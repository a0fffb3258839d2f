use std::fmt;

use crate::dictionary::index::DictionaryIndex;
use crate::dictionary::Dictionary;

/// CSV view of a dictionary, see [`Dictionary::csv`]
pub struct Csv<'a, S>
where
    S: DictionaryIndex,
{
    dictionary: &'a Dictionary<S>,
}

impl<S> Dictionary<S>
where
    S: DictionaryIndex,
{
    /// CSV table of relative relevances.
    ///
    /// ```text
    /// Files processed,<documents>
    /// Words,<terms>
    ///
    /// Term,<category 1>,...,<category n>,
    /// <term>,<relevance 1>,...,<relevance n>,
    /// ```
    /// Categories are in registration order, absent entries are `0.0`.
    pub fn csv(&self) -> Csv<'_, S> {
        Csv { dictionary: self }
    }

    pub fn to_csv(&self) -> String {
        self.csv().to_string()
    }

    fn write_rows(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in self.terms() {
            write!(f, "{term},")?;
            let entries = self.entries(&term);
            for name in self.categories.names() {
                write!(f, "{:?},", entries.relevance(name))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<S> fmt::Display for Csv<'_, S>
where
    S: DictionaryIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dictionary = self.dictionary;
        writeln!(f, "Files processed,{}", dictionary.number_of_documents)?;
        writeln!(f, "Words,{}", dictionary.len())?;
        writeln!(f)?;
        write!(f, "Term,")?;
        for name in dictionary.categories.names() {
            write!(f, "{name},")?;
        }
        writeln!(f)?;
        dictionary.write_rows(f)
    }
}

/// Relevance table with the category priors in the header
impl<S> fmt::Display for Dictionary<S>
where
    S: DictionaryIndex,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Words,")?;
        for stats in self.categories.iter() {
            write!(f, "{}({:?}),", stats.name(), stats.prior())?;
        }
        writeln!(f)?;
        self.write_rows(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::dictionary::{Dictionary, DictionaryConfig};

    fn trained() -> Dictionary {
        let mut dictionary = Dictionary::new(DictionaryConfig::default());
        dictionary.update_word("ball", "sports", 3.0).unwrap();
        dictionary.update_word("ball", "toys", 1.0).unwrap();
        dictionary.update_word("doll", "toys", 1.0).unwrap();
        dictionary.increase_number_of_documents();
        dictionary.increase_number_of_documents();
        dictionary
    }

    #[test]
    fn csv_layout() {
        let csv = trained().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Files processed,2",
                "Words,2",
                "",
                "Term,sports,toys,",
                "ball,0.75,0.25,",
                "doll,0.0,1.0,",
            ]
        );
    }

    #[test]
    fn display_shows_priors() {
        let mut dictionary = trained();
        dictionary.calculate_category_priors();
        let text = dictionary.to_string();
        assert!(text.starts_with("Words,sports(0.5),toys(1.0),\n"));
        assert!(text.contains("doll,0.0,1.0,"));
    }
}
