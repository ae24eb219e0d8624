//! Retention-based review scheduler.
//!
//! Memory follows an exponential forgetting curve:
//! - Stability (S): days until recall probability decays by a factor of e
//! - Difficulty (D): 0.1-1.0, higher shortens intervals
//! - Retrievability (R): `e^(-t/S)` after `t` days

use chrono::{DateTime, Duration, Utc};
use lexicon_core::Rating;

pub use lexicon_core::{BASE_DIFFICULTY, BASE_STABILITY};

/// Scheduler parameters.
#[derive(Debug, Clone)]
pub struct RetentionScheduler {
    /// Recall probability the interval is solved for.
    pub target_retention: f64,
    /// Share of stability kept after a lapse.
    pub again_retention: f64,
    pub hard_penalty: f64,
    pub easy_bonus: f64,
    /// Global interval scaling.
    pub interval_modifier: f64,
    pub min_interval_days: i64,
    pub max_interval_days: i64,
}

impl Default for RetentionScheduler {
    fn default() -> Self {
        Self {
            target_retention: 0.85,
            again_retention: 0.2,
            hard_penalty: 0.5,
            easy_bonus: 1.3,
            interval_modifier: 1.0,
            min_interval_days: 1,
            max_interval_days: 365 * 10,
        }
    }
}

/// Result of scheduling a word after a review.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReview {
    pub stability: f64,
    pub difficulty: f64,
    pub interval_days: i64,
    /// Recall probability expected at the next review.
    pub predicted_retention: f64,
    pub next_review: DateTime<Utc>,
}

impl RetentionScheduler {
    /// Compute new parameters and the next review date.
    pub fn schedule(
        &self,
        stability: f64,
        difficulty: f64,
        last_review: Option<DateTime<Utc>>,
        rating: Rating,
        now: DateTime<Utc>,
    ) -> ScheduledReview {
        let stability = if stability > 0.0 {
            stability
        } else {
            BASE_STABILITY
        };
        let elapsed = Self::elapsed_days(last_review, now);
        let retrievability = Self::retrievability(elapsed as f64, stability);

        let (new_stability, actual_success, weight) = match rating {
            Rating::Again => (stability * self.again_retention, 0.0, 0.2),
            Rating::Hard => (
                stability * (1.0 + self.hard_penalty * (1.0 - retrievability)),
                0.6,
                0.15,
            ),
            Rating::Good => (stability * (1.0 + (1.0 - retrievability)), 1.0, 0.1),
            Rating::Easy => (
                stability * (1.0 + self.easy_bonus * (1.0 - retrievability)),
                1.0,
                0.08,
            ),
        };
        // Failing a word that should have been recalled makes it harder.
        let new_difficulty = (difficulty + (retrievability - actual_success) * weight).clamp(0.1, 1.0);

        let interval_days = self.interval_days(new_stability, new_difficulty);
        let predicted_retention = Self::retrievability(interval_days as f64, new_stability);

        ScheduledReview {
            stability: new_stability,
            difficulty: new_difficulty,
            interval_days,
            predicted_retention,
            next_review: now + Duration::days(interval_days),
        }
    }

    /// Solve `e^(-t/S) = target` for `t`, shortened for difficult words.
    fn interval_days(&self, stability: f64, difficulty: f64) -> i64 {
        let optimal = -stability * self.target_retention.ln();
        let difficulty_modifier = 1.0 - (difficulty - 0.3) * 0.5;
        let days = (optimal * difficulty_modifier * self.interval_modifier).round() as i64;
        days.clamp(self.min_interval_days, self.max_interval_days)
    }

    /// Whole days since the last review; first reviews count as one day.
    fn elapsed_days(last_review: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
        last_review
            .map(|last| now.signed_duration_since(last).num_days().max(1))
            .unwrap_or(1)
    }

    fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
        (-elapsed_days / stability).exp()
    }

    /// Current recall probability of a word.
    pub fn estimate_retention(
        stability: f64,
        last_review: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> f64 {
        let stability = if stability > 0.0 {
            stability
        } else {
            BASE_STABILITY
        };
        match last_review {
            Some(last) => {
                let elapsed = now.signed_duration_since(last).num_days().max(0);
                Self::retrievability(elapsed as f64, stability)
            }
            None => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn easy_grows_stability_more_than_good() {
        let scheduler = RetentionScheduler::default();
        let current = now();
        let good = scheduler.schedule(2.0, 0.3, None, Rating::Good, current);
        let easy = scheduler.schedule(2.0, 0.3, None, Rating::Easy, current);
        let hard = scheduler.schedule(2.0, 0.3, None, Rating::Hard, current);

        assert!(easy.stability > good.stability);
        assert!(good.stability > hard.stability);
        assert!(hard.stability > 2.0);
    }

    #[test]
    fn again_keeps_a_fifth_of_stability() {
        let scheduler = RetentionScheduler::default();
        let result = scheduler.schedule(10.0, 0.3, None, Rating::Again, now());
        assert!((result.stability - 2.0).abs() < 1e-9);
    }

    #[test]
    fn difficulty_increases_on_again() {
        let scheduler = RetentionScheduler::default();
        let result = scheduler.schedule(10.0, 0.5, None, Rating::Again, now());
        assert!(result.difficulty > 0.5);
    }

    #[test]
    fn difficulty_decreases_on_easy() {
        let scheduler = RetentionScheduler::default();
        let result = scheduler.schedule(0.5, 0.5, None, Rating::Easy, now());
        assert!(result.difficulty < 0.5);
    }

    #[test]
    fn difficulty_clamped_to_bounds() {
        let scheduler = RetentionScheduler::default();
        // Imported words may carry difficulties outside the range.
        let result = scheduler.schedule(1.0, 5.0, None, Rating::Good, now());
        assert!(result.difficulty <= 1.0);

        let result = scheduler.schedule(0.1, 0.1, None, Rating::Easy, now());
        assert!(result.difficulty >= 0.1);
    }

    #[test]
    fn interval_clamped_to_bounds() {
        let scheduler = RetentionScheduler::default();
        let current = now();

        let short = scheduler.schedule(0.5, 0.3, None, Rating::Again, current);
        assert_eq!(short.interval_days, 1);
        assert_eq!(short.next_review, current + Duration::days(1));

        let long = scheduler.schedule(1.0e6, 0.3, None, Rating::Good, current);
        assert_eq!(long.interval_days, 3650);
    }

    #[test]
    fn interval_follows_target_retention() {
        let scheduler = RetentionScheduler::default();
        // Long gap: retrievability near zero, so Good doubles stability.
        let current = now();
        let last = current - Duration::days(400);
        let result = scheduler.schedule(50.0, 0.3, Some(last), Rating::Good, current);

        let expected_stability = 50.0 * (1.0 + (1.0 - (-400.0f64 / 50.0).exp()));
        assert!((result.stability - expected_stability).abs() < 1e-9);
        let expected_days = (-result.stability * 0.85f64.ln()
            * (1.0 - (result.difficulty - 0.3) * 0.5))
            .round() as i64;
        assert_eq!(result.interval_days, expected_days);
    }

    #[test]
    fn non_positive_stability_uses_base() {
        let scheduler = RetentionScheduler::default();
        let result = scheduler.schedule(0.0, 0.3, None, Rating::Good, now());
        assert!(result.stability.is_finite());
        assert!(result.stability > 0.0);
    }

    #[test]
    fn retention_estimate_decays() {
        let current = now();
        assert_eq!(RetentionScheduler::estimate_retention(5.0, None, current), 1.0);

        let fresh = RetentionScheduler::estimate_retention(5.0, Some(current), current);
        let week = RetentionScheduler::estimate_retention(
            5.0,
            Some(current - Duration::days(7)),
            current,
        );
        assert!((fresh - 1.0).abs() < 1e-9);
        assert!(week < fresh);
        assert!((week - (-7.0f64 / 5.0).exp()).abs() < 1e-6);
    }
}
