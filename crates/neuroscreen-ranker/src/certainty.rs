//! Certainty-factor combination.
//!
//! Each relation weight is a certainty factor CF = MB − MD in [−1, 1].
//! Several CFs pointing at the same disease are merged pairwise:
//!
//! ```text
//! same sign (or zero):  cf1 + cf2 × (1 − |cf1|)
//! opposite signs:       (cf1 + cf2) / (1 − min(|cf1|, |cf2|))
//! ```
//!
//! Results are not clamped. Floating-point folding is order-sensitive, so
//! lists are always folded left-to-right in retrieval order.

/// Combine two certainty factors.
///
/// A missing side means "no prior evidence" and acts as the identity.
/// Strictly opposite signs that cancel completely (denominator 0) yield 0.
pub fn combine_pair(cf1: Option<f64>, cf2: Option<f64>) -> Option<f64> {
    match (cf1, cf2) {
        (None, other) | (other, None) => other,
        (Some(a), Some(b)) => Some(combine(a, b)),
    }
}

/// Combine two present certainty factors.
pub fn combine(cf1: f64, cf2: f64) -> f64 {
    let opposite = (cf1 < 0.0 && cf2 > 0.0) || (cf1 > 0.0 && cf2 < 0.0);
    if !opposite {
        return cf1 + cf2 * (1.0 - cf1.abs());
    }

    let denominator = 1.0 - cf1.abs().min(cf2.abs());
    if denominator == 0.0 {
        return 0.0;
    }
    (cf1 + cf2) / denominator
}

/// Fold a list of CFs left-to-right with [`combine`]. Empty → 0.
pub fn combine_list(weights: &[f64]) -> f64 {
    match weights.split_first() {
        None => 0.0,
        Some((first, rest)) => rest.iter().fold(*first, |acc, &w| combine(acc, w)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_absent_side_is_identity() {
        for x in [-1.0, -0.35, 0.0, 0.42, 1.0] {
            assert_eq!(combine_pair(Some(x), None), Some(x));
            assert_eq!(combine_pair(None, Some(x)), Some(x));
        }
        assert_eq!(combine_pair(None, None), None);
    }

    #[test]
    fn test_same_sign_positive() {
        let cf = combine_pair(Some(0.6), Some(0.4)).unwrap();
        assert!(close(cf, 0.76), "got {}", cf);
    }

    #[test]
    fn test_same_sign_negative() {
        // -0.6 + -0.4 × (1 − 0.6) = -0.76
        assert!(close(combine(-0.6, -0.4), -0.76));
    }

    #[test]
    fn test_zero_counts_as_same_sign() {
        assert!(close(combine(0.0, -0.5), -0.5));
        assert!(close(combine(0.5, 0.0), 0.5));
    }

    #[test]
    fn test_opposite_signs() {
        assert_eq!(combine(0.5, -0.5), 0.0);
        assert_eq!(combine(0.8, -0.8), 0.0);
        // (0.7 − 0.4) / (1 − 0.4) = 0.5
        assert!(close(combine(0.7, -0.4), 0.5));
        assert!(close(combine(-0.4, 0.7), 0.5));
    }

    #[test]
    fn test_full_cancellation_is_zero() {
        // Denominator is 1 − min(1, 1) = 0.
        assert_eq!(combine(1.0, -1.0), 0.0);
        assert_eq!(combine(-1.0, 1.0), 0.0);
    }

    #[test]
    fn test_certain_evidence_dominates_weaker_counter_evidence() {
        // min(|1.0|, |−0.3|) = 0.3, so the denominator is 0.7, not 0.
        assert!(close(combine(1.0, -0.3), 1.0));
    }

    #[test]
    fn test_combine_list_edges() {
        assert_eq!(combine_list(&[]), 0.0);
        assert_eq!(combine_list(&[0.5]), 0.5);
        assert_eq!(combine_list(&[-0.25]), -0.25);
    }

    #[test]
    fn test_combine_list_matches_left_fold() {
        let weights = [0.5, 0.3, -0.6, 0.2];
        let expected = combine(combine(combine(0.5, 0.3), -0.6), 0.2);
        assert_eq!(combine_list(&weights), expected);
        assert!(close(combine_list(&[0.5, 0.3]), 0.65));
    }

    #[test]
    fn test_same_sign_lists_are_order_insensitive_within_precision() {
        let a = combine_list(&[0.7, 0.4, 0.2, 0.9]);
        let b = combine_list(&[0.9, 0.2, 0.4, 0.7]);
        let c = combine_list(&[0.2, 0.9, 0.7, 0.4]);
        assert!(close(a, b) && close(b, c));
    }

    #[test]
    fn test_results_stay_in_range_for_valid_inputs() {
        let grid = [-1.0, -0.75, -0.5, -0.1, 0.0, 0.1, 0.5, 0.75, 1.0];
        for &a in &grid {
            for &b in &grid {
                let cf = combine(a, b);
                assert!((-1.0 - EPS..=1.0 + EPS).contains(&cf), "combine({}, {}) = {}", a, b, cf);
            }
        }
    }
}
