//! Guess scoring.
//!
//! A correct guess earns XP on a straight line from [`MAX_AWARD`] at the
//! instant the word is chosen down to [`MIN_AWARD`] at the end of the
//! guessing window. Guessers who answer quickly earn close to double what
//! a last-second guess earns, and nobody who guesses correctly gets less
//! than the floor.
//!
//! With the default 60 s window:
//!
//! | latency | award |
//! |---------|-------|
//! | 0 s     | 100   |
//! | 10 s    | 92    |
//! | 30 s    | 75    |
//! | 60 s    | 50    |
//!
//! Only the guesser is paid. The drawer earns nothing from a round, and a
//! round ends at its first correct guess, so it pays out at most once.

use std::time::Duration;

/// Award for an instant guess.
pub const MAX_AWARD: u32 = 100;

/// Award for a guess at (or past) the end of the guessing window.
pub const MIN_AWARD: u32 = 50;

/// XP for a correct guess made `latency` into a guessing window of length
/// `round`.
///
/// `max(50, 100 - round(50 * latency / round))`: linear from 100 down to
/// 50, never lower. A zero-length window awards the minimum.
pub fn award(latency: Duration, round: Duration) -> u32 {
    if round.is_zero() {
        return MIN_AWARD;
    }
    let ratio = latency.as_secs_f64() / round.as_secs_f64();
    let penalty = (f64::from(MAX_AWARD - MIN_AWARD) * ratio).round();
    if penalty >= f64::from(MAX_AWARD - MIN_AWARD) {
        return MIN_AWARD;
    }
    // 0 <= penalty < 50 here.
    MAX_AWARD - penalty as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND: Duration = Duration::from_secs(60);

    #[test]
    fn test_award_bounds() {
        assert_eq!(award(Duration::ZERO, ROUND), 100);
        assert_eq!(award(ROUND, ROUND), 50);
        assert_eq!(award(Duration::from_secs(600), ROUND), 50);
    }

    #[test]
    fn test_award_midpoint() {
        assert_eq!(award(Duration::from_secs(30), ROUND), 75);
        assert_eq!(award(Duration::from_secs(6), ROUND), 95);
    }

    #[test]
    fn test_award_rounds_to_nearest() {
        // 50 * 1.5 / 60 = 1.25 -> 1
        assert_eq!(award(Duration::from_millis(1_500), ROUND), 99);
        // 50 * 2.1 / 60 = 1.75 -> 2
        assert_eq!(award(Duration::from_millis(2_100), ROUND), 98);
    }

    #[test]
    fn test_award_is_non_increasing() {
        let mut previous = MAX_AWARD;
        for ms in (0..=70_000).step_by(250) {
            let xp = award(Duration::from_millis(ms), ROUND);
            assert!(xp <= previous, "award rose at {ms} ms");
            assert!((MIN_AWARD..=MAX_AWARD).contains(&xp));
            previous = xp;
        }
    }

    #[test]
    fn test_award_zero_window() {
        assert_eq!(award(Duration::ZERO, Duration::ZERO), MIN_AWARD);
    }
}
