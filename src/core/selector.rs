// Best-match selection over a frame's gesture scores

use crate::models::gesture::{GestureScore, SelectionResult};

/// Pick the highest score at or above `floor`.
///
/// Comparison is strict, so on an exact tie the earliest score (registry
/// order) wins. Nothing clearing the floor is the normal "no gesture" outcome.
pub fn select(scores: &[GestureScore], floor: f32) -> SelectionResult {
    let mut best: Option<&GestureScore> = None;

    for candidate in scores.iter().filter(|s| s.confidence >= floor) {
        match best {
            Some(current) if candidate.confidence <= current.confidence => {}
            _ => best = Some(candidate),
        }
    }

    match best {
        Some(score) => SelectionResult::Detected(score.clone()),
        None => SelectionResult::NoGesture,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(values: &[(&str, f32)]) -> Vec<GestureScore> {
        values.iter().map(|(n, c)| GestureScore::new(*n, *c)).collect()
    }

    #[test]
    fn test_picks_maximum_above_floor() {
        let s = scores(&[("a", 7.5), ("b", 9.0), ("c", 8.0)]);
        assert_eq!(select(&s, 7.0), SelectionResult::Detected(GestureScore::new("b", 9.0)));
    }

    #[test]
    fn test_nothing_clears_floor() {
        let s = scores(&[("a", 6.9), ("b", 0.0), ("c", 3.2)]);
        assert_eq!(select(&s, 7.0), SelectionResult::NoGesture);
        assert_eq!(select(&[], 7.0), SelectionResult::NoGesture);
    }

    #[test]
    fn test_floor_is_inclusive() {
        let s = scores(&[("a", 7.0)]);
        assert_eq!(select(&s, 7.0).gesture_name(), Some("a"));
    }

    #[test]
    fn test_never_returns_below_floor() {
        let s = scores(&[("low", 9.9), ("high", 10.0)]);
        for floor in [0.0, 5.0, 9.95, 10.0] {
            if let Some(confidence) = select(&s, floor).confidence() {
                assert!(confidence >= floor);
            }
        }
        assert_eq!(select(&s, 10.5), SelectionResult::NoGesture);
    }

    #[test]
    fn test_tie_goes_to_first_registered() {
        let s = scores(&[("first", 8.0), ("second", 9.5), ("third", 9.5)]);
        assert_eq!(select(&s, 7.0).gesture_name(), Some("second"));

        let s = scores(&[("x", 10.0), ("y", 10.0)]);
        for _ in 0..5 {
            assert_eq!(select(&s, 0.0).gesture_name(), Some("x"));
        }
    }
}
