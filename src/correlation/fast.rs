use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::correlation::{compute_relative_scores, CorrelationMatrix, WordCorrelation};

/// FastWordCorrelationMatrix
/// Nested `term -> term -> id` index for constant time pair lookup.
///
/// Every pair is registered under both terms, so the index is roughly
/// twice the size of [`crate::WordCorrelationMatrix`]. Query results are
/// identical.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FastWordCorrelationMatrix {
    correlations: Vec<WordCorrelation>,
    #[serde(with = "indexmap::map::serde_seq")]
    pairs: IndexMap<String, IndexMap<String, usize>>,
}

impl FastWordCorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn find(&self, term1: &str, term2: &str) -> Option<usize> {
        self.pairs.get(term1)?.get(term2).copied()
    }
}

impl CorrelationMatrix for FastWordCorrelationMatrix {
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
        self.pairs
            .entry(term1.to_string())
            .or_default()
            .insert(term2.to_string(), id);
        self.pairs
            .entry(term2.to_string())
            .or_default()
            .insert(term1.to_string(), id);
    }

    fn correlations_of(&self, term: &str) -> Vec<&WordCorrelation> {
        self.pairs
            .get(term)
            .map(|row| row.values().map(|&id| &self.correlations[id]).collect())
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
    fn symmetric_lookup() {
        let mut m = FastWordCorrelationMatrix::new();
        m.update_group(&["x", "y", "z"]);
        m.update_pair("z", "x");
        for (a, b) in [("x", "y"), ("y", "z"), ("x", "z")] {
            assert_eq!(
                m.correlation(a, b).unwrap().absolute_correlation(),
                m.correlation(b, a).unwrap().absolute_correlation()
            );
        }
        assert_eq!(m.correlation("x", "z").unwrap().absolute_correlation(), 2.0);
    }
}
