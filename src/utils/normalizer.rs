use std::borrow::Cow;

/// Fold a term to the dictionary key form.
/// Borrowed when nothing changes.
#[inline]
pub fn fold_term(term: &str, case_sensitive: bool) -> Cow<'_, str> {
    if case_sensitive || !term.chars().any(char::is_uppercase) {
        Cow::Borrowed(term)
    } else {
        Cow::Owned(term.to_lowercase())
    }
}

/// `value / total`, 0.0 when total is 0
#[inline]
pub fn ratio_or_zero(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_term_borrows_lowercase_input() {
        assert!(matches!(fold_term("cat", false), Cow::Borrowed("cat")));
        assert_eq!(fold_term("CaT", false), "cat");
        assert_eq!(fold_term("CaT", true), "CaT");
        assert_eq!(fold_term("ÄPFEL", false), "äpfel");
    }

    #[test]
    fn ratio_of_zero_total_is_zero() {
        assert_eq!(ratio_or_zero(3.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(0.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(1.0, 4.0), 0.25);
    }
}
