use std::cmp::Ordering;

use crate::category::Category;

/// Probability descending order for categories.
/// NaN sorts last.
#[inline]
pub fn probability_desc(a: &Category, b: &Category) -> Ordering {
    score_desc(a.probability(), b.probability())
}

/// Descending order for raw scores, NaN last
#[inline]
pub fn score_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.total_cmp(&a),
    }
}

/// Keep the `k` best items by `score`, descending.
/// Stable: equal scores keep their input order.
pub fn top_k_by<T, F>(mut items: Vec<T>, k: usize, score: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    if k == 0 {
        return Vec::new();
    }
    items.sort_by(|a, b| score_desc(score(a), score(b)));
    items.truncate(k);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_non_increasing(values: &[f64]) {
        for i in 1..values.len() {
            assert!(values[i - 1] >= values[i], "not sorted at {i}: {} < {}", values[i - 1], values[i]);
        }
    }

    #[test]
    fn score_desc_puts_nan_last() {
        let mut values = vec![0.1, f64::NAN, 0.7, 0.3, f64::NAN, 1.0];
        values.sort_by(|a, b| score_desc(*a, *b));
        assert_non_increasing(&values[..4]);
        assert!(values[4].is_nan());
        assert!(values[5].is_nan());
    }

    #[test]
    fn top_k_is_stable_and_bounded() {
        let items = vec![("a", 0.5), ("b", 0.9), ("c", 0.5), ("d", 0.1)];
        let top = top_k_by(items.clone(), 3, |(_, s)| *s);
        assert_eq!(top, vec![("b", 0.9), ("a", 0.5), ("c", 0.5)]);

        let all = top_k_by(items.clone(), 10, |(_, s)| *s);
        assert_eq!(all.len(), 4);

        assert!(top_k_by(items, 0, |(_, s)| *s).is_empty());
    }
}
