//! Elo rating engine
//!
//! Pairwise score exchange: the expected result is a logistic function of the score
//! difference and each side moves by `K_FACTOR` times its surprise.

use rand::Rng;

use crate::domain::entities::Outcome;

/// Maximum score change per match
pub const K_FACTOR: f64 = 32.0;

/// Half-width of the uniform exponent jitter, `[-JITTER_HALF_WIDTH, JITTER_HALF_WIDTH)`
pub const JITTER_HALF_WIDTH: f64 = 0.005;

/// Score scale: a 400 point gap means 10:1 expected odds
const SCALE: f64 = 400.0;

/// Expected result for `own` against `opponent`.
///
/// `jitter` is added to the exponent. Pass the same value for both sides of one match.
pub fn expected_score(own: f64, opponent: f64, jitter: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent - own) / SCALE + jitter))
}

/// Draw one jitter value for a match
pub fn sample_jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(-JITTER_HALF_WIDTH..JITTER_HALF_WIDTH)
}

/// New scores for `(a, b)` after a match.
///
/// `None` leaves both scores unchanged.
pub fn rate(a: f64, b: f64, outcome: Option<Outcome>, jitter: f64) -> (f64, f64) {
    let Some(outcome) = outcome else {
        return (a, b);
    };

    let expected_a = expected_score(a, b, jitter);
    let expected_b = expected_score(b, a, jitter);

    let (result_a, result_b) = match outcome {
        Outcome::AWins => (1.0, 0.0),
        Outcome::BWins => (0.0, 1.0),
    };

    (
        a + K_FACTOR * (result_a - expected_a),
        b + K_FACTOR * (result_b - expected_b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn equal_scores_expect_half() {
        assert!((expected_score(1000.0, 1000.0, 0.0) - 0.5).abs() < EPSILON);
    }

    #[test]
    fn equal_scores_a_wins() {
        let (a, b) = rate(1000.0, 1000.0, Some(Outcome::AWins), 0.0);
        assert!((a - 1016.0).abs() < EPSILON);
        assert!((b - 984.0).abs() < EPSILON);
    }

    #[test]
    fn equal_scores_b_wins() {
        let (a, b) = rate(1000.0, 1000.0, Some(Outcome::BWins), 0.0);
        assert!((a - 984.0).abs() < EPSILON);
        assert!((b - 1016.0).abs() < EPSILON);
    }

    #[test]
    fn exchange_is_zero_sum_without_jitter() {
        let scores = [0.0, 712.5, 1000.0, 1234.0, 1600.0, 2400.0];
        for &a in &scores {
            for &b in &scores {
                for outcome in [Outcome::AWins, Outcome::BWins] {
                    let (new_a, new_b) = rate(a, b, Some(outcome), 0.0);
                    assert!(
                        ((new_a + new_b) - (a + b)).abs() < 1e-6,
                        "not zero-sum for {} vs {} ({:?})",
                        a,
                        b,
                        outcome
                    );
                }
            }
        }
    }

    #[test]
    fn upset_moves_more_than_expected_win() {
        let (favourite_win, _) = rate(1400.0, 1000.0, Some(Outcome::AWins), 0.0);
        let (_, underdog_win) = rate(1400.0, 1000.0, Some(Outcome::BWins), 0.0);
        assert!(favourite_win - 1400.0 < underdog_win - 1000.0);
    }

    #[test]
    fn no_outcome_is_a_no_op() {
        assert_eq!(rate(1100.0, 900.0, None, 0.003), (1100.0, 900.0));
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let j = sample_jitter(&mut rng);
            assert!((-JITTER_HALF_WIDTH..JITTER_HALF_WIDTH).contains(&j));
        }
    }

    #[test]
    fn jitter_only_nudges_scores() {
        let (a, b) = rate(1000.0, 1000.0, Some(Outcome::AWins), JITTER_HALF_WIDTH);
        assert!((a - 1016.0).abs() < 0.1);
        assert!((b - 984.0).abs() < 0.1);
        assert!(a > 1000.0 && b < 1000.0);
    }
}
