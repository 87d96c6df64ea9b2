//! Score calculation shared by both engines.
//!
//! A score is `round(100 * ideal / actual)` clamped to `0..=100`, or 0 on
//! failure. "Units" are clicks in both engines: one per zone for hazard
//! images, one per card for the matching deck.

/// Highest possible score.
pub const MAX_SCORE: u8 = 100;

/// Map ideal vs actual effort to a 0-100 score.
///
/// ```
/// use firm_games::scoring::score;
///
/// assert_eq!(score(6, 6, false), 100);
/// assert_eq!(score(6, 12, false), 50);
/// assert_eq!(score(6, 3, false), 100);
/// assert_eq!(score(6, 6, true), 0);
/// ```
#[must_use]
pub fn score(ideal_units: u32, actual_units: u32, failed: bool) -> u8 {
    if failed {
        return 0;
    }
    let ratio = 100.0 * f64::from(ideal_units) / f64::from(actual_units.max(1));
    ratio.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

/// Like `score`, but zero actual effort scores 0 instead of the ideal.
///
/// Engines use this on success, where zero clicks can only mean the input
/// stream never reached the engine.
#[must_use]
pub fn score_for_effort(ideal_units: u32, actual_units: u32, failed: bool) -> u8 {
    if actual_units == 0 {
        return 0;
    }
    score(ideal_units, actual_units, failed)
}

/// Arithmetic mean of per-round scores, vetoed to 0 by any zero round.
///
/// Empty input scores 0.
///
/// ```
/// use firm_games::scoring::mean_with_failure_veto;
///
/// assert_eq!(mean_with_failure_veto(&[100, 50]), 75);
/// assert_eq!(mean_with_failure_veto(&[100, 100, 0]), 0);
/// ```
#[must_use]
pub fn mean_with_failure_veto(scores: &[u8]) -> u8 {
    if scores.is_empty() || scores.contains(&0) {
        return 0;
    }
    let total: u32 = scores.iter().map(|&s| u32::from(s)).sum();
    let mean = f64::from(total) / scores.len() as f64;
    mean.round().clamp(0.0, f64::from(MAX_SCORE)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_matching_examples() {
        // 3 pairs = 6 cards
        assert_eq!(score(6, 6, false), 100);
        assert_eq!(score(6, 12, false), 50);
    }

    #[test]
    fn test_hazard_examples() {
        assert_eq!(score(4, 4, false), 100);
        assert_eq!(score(4, 8, false), 50);
        assert_eq!(score(4, 2, true), 0);
    }

    #[test]
    fn test_rounding_half_up() {
        // 100 * 1 / 8 = 12.5
        assert_eq!(score(1, 8, false), 13);
        // 100 * 2 / 3 = 66.67
        assert_eq!(score(2, 3, false), 67);
    }

    #[test]
    fn test_zero_actual() {
        assert_eq!(score(4, 0, false), 100);
        assert_eq!(score_for_effort(4, 0, false), 0);
        assert_eq!(score_for_effort(4, 4, false), 100);
    }

    #[test]
    fn test_mean_rounds() {
        assert_eq!(mean_with_failure_veto(&[100, 67, 50]), 72);
        assert_eq!(mean_with_failure_veto(&[]), 0);
    }

    proptest! {
        #[test]
        fn score_in_range(ideal in 0u32..10_000, actual in 0u32..10_000) {
            prop_assert!(score(ideal, actual, false) <= MAX_SCORE);
        }

        #[test]
        fn failed_is_zero(ideal in 0u32..10_000, actual in 0u32..10_000) {
            prop_assert_eq!(score(ideal, actual, true), 0);
        }

        #[test]
        fn non_increasing_in_effort(ideal in 1u32..200, actual in 1u32..5_000) {
            prop_assert!(score(ideal, actual + 1, false) <= score(ideal, actual, false));
        }

        #[test]
        fn veto_on_any_zero(mut scores in prop::collection::vec(1u8..=100, 1..8), at in 0usize..8) {
            let at = at % scores.len();
            scores[at] = 0;
            prop_assert_eq!(mean_with_failure_veto(&scores), 0);
        }
    }
}
