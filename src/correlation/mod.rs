pub mod fast;
pub mod flat;

pub use fast::FastWordCorrelationMatrix;
pub use flat::WordCorrelationMatrix;

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::utils::normalizer::ratio_or_zero;
use crate::utils::sort::top_k_by;

/// WordCorrelation
/// Co-occurrence of an unordered term pair.
///
/// `absolute` counts co-occurrences; `relative` is filled by
/// [`CorrelationMatrix::make_relative_scores`] as
/// `absolute / (row_sum(term1) + row_sum(term2) - absolute)`,
/// or `absolute / row_sum(term1)` for a term paired with itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordCorrelation {
    term1: String,
    term2: String,
    absolute: f64,
    relative: f64,
}

impl WordCorrelation {
    pub(crate) fn new(term1: &str, term2: &str) -> Self {
        WordCorrelation {
            term1: term1.to_string(),
            term2: term2.to_string(),
            absolute: 1.0,
            relative: 0.0,
        }
    }

    #[inline]
    pub fn term1(&self) -> &str {
        &self.term1
    }

    #[inline]
    pub fn term2(&self) -> &str {
        &self.term2
    }

    #[inline]
    pub fn absolute_correlation(&self) -> f64 {
        self.absolute
    }

    #[inline]
    pub fn relative_correlation(&self) -> f64 {
        self.relative
    }

    /// true if the pair contains `term`
    #[inline]
    pub fn involves(&self, term: &str) -> bool {
        self.term1 == term || self.term2 == term
    }

    /// The partner of `term` in this pair
    pub fn other(&self, term: &str) -> Option<&str> {
        if self.term1 == term {
            Some(&self.term2)
        } else if self.term2 == term {
            Some(&self.term1)
        } else {
            None
        }
    }

    #[inline]
    pub(crate) fn increase_absolute_correlation(&mut self, by: f64) {
        self.absolute += by;
    }
}

impl fmt::Display for WordCorrelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}+{}: {} ({:.4})",
            self.term1, self.term2, self.absolute, self.relative
        )
    }
}

/// Symmetric term pair co-occurrence counter.
///
/// Both `(a, b)` and `(b, a)` resolve to the same stored [`WordCorrelation`].
/// Implementations differ only in how pairs are indexed, never in results.
pub trait CorrelationMatrix {
    /// Correlation of an unordered pair
    fn correlation(&self, term1: &str, term2: &str) -> Option<&WordCorrelation>;

    /// Count one co-occurrence of `term1` and `term2`.
    /// A new pair starts at 1.0.
    fn update_pair(&mut self, term1: &str, term2: &str);

    /// Every correlation involving `term`, in first-seen order
    fn correlations_of(&self, term: &str) -> Vec<&WordCorrelation>;

    /// All stored correlations, each pair once
    fn all_correlations(&self) -> &[WordCorrelation];

    /// Recompute the relative correlation of every pair
    fn make_relative_scores(&mut self);

    /// Update every unordered pair of a term set exactly once.
    /// Duplicate terms in the input are collapsed first.
    fn update_group<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
        Self: Sized,
    {
        let set: IndexSet<&str> = terms.iter().map(AsRef::as_ref).collect();
        for i in 0..set.len() {
            for j in (i + 1)..set.len() {
                self.update_pair(set[i], set[j]);
            }
        }
    }

    /// Correlations of `term` with at least `min_cooccurrences` absolute count
    fn correlations(&self, term: &str, min_cooccurrences: f64) -> Vec<&WordCorrelation> {
        self.correlations_of(term)
            .into_iter()
            .filter(|c| c.absolute_correlation() >= min_cooccurrences)
            .collect()
    }

    /// The `k` correlations of `term` with the highest relative correlation
    fn top_correlations(&self, term: &str, k: usize) -> Vec<&WordCorrelation> {
        top_k_by(self.correlations_of(term), k, |c| c.relative_correlation())
    }

    /// Number of stored pairs
    fn len(&self) -> usize {
        self.all_correlations().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Relative scores for a correlation arena, computed in parallel
pub(crate) fn compute_relative_scores(correlations: &mut [WordCorrelation]) {
    let relatives: Vec<f64> = {
        let mut row_sums: HashMap<&str, f64> = HashMap::new();
        for c in correlations.iter() {
            *row_sums.entry(c.term1.as_str()).or_insert(0.0) += c.absolute;
            if c.term1 != c.term2 {
                *row_sums.entry(c.term2.as_str()).or_insert(0.0) += c.absolute;
            }
        }
        let row_sum = |term: &str| row_sums.get(term).copied().unwrap_or(0.0);

        correlations
            .par_iter()
            .map(|c| {
                let denominator = if c.term1 == c.term2 {
                    row_sum(&c.term1)
                } else {
                    row_sum(&c.term1) + row_sum(&c.term2) - c.absolute
                };
                ratio_or_zero(c.absolute, denominator)
            })
            .collect()
    };
    for (correlation, relative) in correlations.iter_mut().zip(relatives) {
        correlation.relative = relative;
    }
    tracing::debug!(pairs = correlations.len(), "recomputed relative word correlations");
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn trained<M: CorrelationMatrix + Default>() -> M {
        let mut m = M::default();
        m.update_group(&["rust", "fast", "safe"]);
        m.update_group(&["rust", "fast"]);
        m.update_pair("safe", "rust");
        m.update_pair("safe", "safe");
        m.make_relative_scores();
        m
    }

    fn summary<M: CorrelationMatrix>(m: &M, term: &str) -> Vec<(String, f64, f64)> {
        m.correlations_of(term)
            .into_iter()
            .map(|c| (c.other(term).unwrap().to_string(), c.absolute_correlation(), c.relative_correlation()))
            .collect()
    }

    #[test]
    fn flat_and_fast_agree() {
        let flat: WordCorrelationMatrix = trained();
        let fast: FastWordCorrelationMatrix = trained();
        for term in ["rust", "fast", "safe", "unknown"] {
            assert_eq!(summary(&flat, term), summary(&fast, term), "term {term}");
            let top_flat: Vec<_> = flat.top_correlations(term, 2).into_iter().cloned().collect();
            let top_fast: Vec<_> = fast.top_correlations(term, 2).into_iter().cloned().collect();
            assert_eq!(top_flat, top_fast);
        }
        assert_eq!(flat.all_correlations(), fast.all_correlations());
    }

    #[test]
    fn relative_scores_follow_row_sums() {
        let m: WordCorrelationMatrix = trained();
        // rows: rust = rf 2 + rs 2 = 4, fast = rf 2 + fs 1 = 3, safe = fs 1 + rs 2 + ss 1 = 4
        let rf = m.correlation("rust", "fast").unwrap();
        assert_eq!(rf.absolute_correlation(), 2.0);
        assert!((rf.relative_correlation() - 2.0 / (4.0 + 3.0 - 2.0)).abs() < 1e-12);

        let ss = m.correlation("safe", "safe").unwrap();
        assert!((ss.relative_correlation() - 1.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn group_updates_each_pair_once() {
        let mut m = WordCorrelationMatrix::default();
        m.update_group(&["a", "b", "c", "d", "a"]);
        assert_eq!(m.len(), 6);
        for c in m.all_correlations() {
            assert_eq!(c.absolute_correlation(), 1.0);
        }
    }

    #[test]
    fn filters_by_min_cooccurrences() {
        let m: FastWordCorrelationMatrix = trained();
        let strong: Vec<&str> = m
            .correlations("rust", 2.0)
            .into_iter()
            .map(|c| c.other("rust").unwrap())
            .collect();
        assert_eq!(strong, vec!["fast", "safe"]);
        assert!(m.correlations("fast", 5.0).is_empty());
    }

    #[test]
    fn top_correlations_are_descending_and_bounded() {
        let m: WordCorrelationMatrix = trained();
        let top = m.top_correlations("safe", 2);
        assert_eq!(top.len(), 2);
        assert!(top[0].relative_correlation() >= top[1].relative_correlation());
        assert_eq!(m.top_correlations("safe", 10).len(), 3);
        assert!(m.top_correlations("nothing", 3).is_empty());
    }

    #[derive(Debug, Clone)]
    enum Update {
        Pair(usize, usize),
        Group(Vec<usize>),
    }

    fn update() -> impl Strategy<Value = Update> {
        prop_oneof![
            (0usize..6, 0usize..6).prop_map(|(a, b)| Update::Pair(a, b)),
            proptest::collection::vec(0usize..6, 0..5).prop_map(Update::Group),
        ]
    }

    proptest! {
        #[test]
        fn any_update_sequence_stays_symmetric(updates in proptest::collection::vec(update(), 0..30)) {
            let terms = ["a", "b", "c", "d", "e", "f"];
            let mut flat = WordCorrelationMatrix::new();
            let mut fast = FastWordCorrelationMatrix::new();
            for step in &updates {
                match step {
                    Update::Pair(i, j) => {
                        flat.update_pair(terms[*i], terms[*j]);
                        fast.update_pair(terms[*i], terms[*j]);
                    }
                    Update::Group(ids) => {
                        let group: Vec<&str> = ids.iter().map(|&i| terms[i]).collect();
                        flat.update_group(&group);
                        fast.update_group(&group);
                    }
                }
            }
            flat.make_relative_scores();
            fast.make_relative_scores();

            for a in terms {
                for b in terms {
                    let ab = flat.correlation(a, b).map(WordCorrelation::absolute_correlation);
                    let ba = flat.correlation(b, a).map(WordCorrelation::absolute_correlation);
                    prop_assert_eq!(ab, ba);
                    prop_assert_eq!(ab, fast.correlation(b, a).map(WordCorrelation::absolute_correlation));
                    prop_assert_eq!(
                        flat.correlation(a, b).map(WordCorrelation::relative_correlation),
                        fast.correlation(a, b).map(WordCorrelation::relative_correlation)
                    );
                }
                prop_assert_eq!(summary(&flat, a), summary(&fast, a));
            }
            prop_assert_eq!(flat.all_correlations(), fast.all_correlations());
        }
    }
}
