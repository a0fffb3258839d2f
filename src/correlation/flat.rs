use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::correlation::{compute_relative_scores, CorrelationMatrix, WordCorrelation};

/// WordCorrelationMatrix
/// Keeps one list of correlation ids per term.
///
/// Pair lookup scans the row of the first term, which is cheap for the
/// short rows typical of tag and keyword co-occurrence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordCorrelationMatrix {
    correlations: Vec<WordCorrelation>,
    #[serde(with = "indexmap::map::serde_seq")]
    rows: IndexMap<String, Vec<usize>>,
}

impl WordCorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    fn find(&self, term1: &str, term2: &str) -> Option<usize> {
        self.rows
            .get(term1)?
            .iter()
            .copied()
            .find(|&id| self.correlations[id].other(term1) == Some(term2))
    }
}

impl CorrelationMatrix for WordCorrelationMatrix {
    fn correlation(&self, term1: &str, term2: &str) -> Option<&WordCorrelation> {
        self.find(term1, term2).map(|id| &self.correlations[id])
    }

    fn update_pair(&mut self, term1: &str, term2: &str) {
        if let Some(id) = self.find(term1, term2) {
            self.correlations[id].increase_absolute_correlation(1.0);
            return;
        }
        let id = self.correlations.len();
        self.correlations.push(WordCorrelation::new(term1, term2));
        self.rows.entry(term1.to_string()).or_default().push(id);
        if term1 != term2 {
            self.rows.entry(term2.to_string()).or_default().push(id);
        }
    }

    fn correlations_of(&self, term: &str) -> Vec<&WordCorrelation> {
        self.rows
            .get(term)
            .map(|ids| ids.iter().map(|&id| &self.correlations[id]).collect())
            .unwrap_or_default()
    }

    fn all_correlations(&self) -> &[WordCorrelation] {
        &self.correlations
    }

    fn make_relative_scores(&mut self) {
        compute_relative_scores(&mut self.correlations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_order_resolves_to_one_correlation() {
        let mut m = WordCorrelationMatrix::new();
        m.update_pair("eins", "zwei");
        m.update_pair("zwei", "eins");
        m.update_pair("eins", "zwei");

        assert_eq!(m.len(), 1);
        let ab = m.correlation("eins", "zwei").unwrap();
        let ba = m.correlation("zwei", "eins").unwrap();
        assert!(std::ptr::eq(ab, ba));
        assert_eq!(ab.absolute_correlation(), 3.0);
        assert!(m.correlation("eins", "drei").is_none());
    }

    #[test]
    fn self_pair_is_listed_once() {
        let mut m = WordCorrelationMatrix::new();
        m.update_pair("echo", "echo");
        m.update_pair("echo", "echo");
        assert_eq!(m.correlations_of("echo").len(), 1);
        assert_eq!(m.correlation("echo", "echo").unwrap().absolute_correlation(), 2.0);
    }
}
