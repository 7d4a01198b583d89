//! Score engine: folds batch metrics, achievements and streaks into the
//! athlete's running score

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::points;
use crate::models::CoreMetrics;

/// Which branch of the scoring policy a calculation took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBranch {
    /// Current period at or above baseline on a majority of metrics
    Improved,
    /// Current period below baseline on a majority of metrics
    Regressed,
    /// Even split between improved and regressed metrics
    Mixed,
}

/// Intermediate values from one scoring calculation
///
/// Every input the policy branched on is exposed here so callers (and
/// tests) can assert on the calculation directly instead of scraping logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Signed count of metrics at or above baseline, in {-4, -2, 0, 2, 4}
    pub scale: i32,
    /// Policy branch taken
    pub branch: ScoreBranch,
    /// Badge + challenge + streak points added (halved and ceiled on the
    /// non-improved branches)
    pub base_points: i64,
    /// Penalty subtracted on the regressed branch (`scale` squared), 0 otherwise
    pub penalty: i64,
    /// Amount the improvement ratchet grew by this call
    pub improvement_delta: f64,
    /// Improvement bonus added at the end of the call
    pub improvement_bonus: i64,
    /// Score before this calculation
    pub previous_score: i64,
    /// Score after this calculation, clamped at zero
    pub score: i64,
}

/// Accumulated score state for one athlete
///
/// Created once per athlete and mutated by every scoring call for the rest
/// of the athlete's lifetime; there is no terminal state. `improvement` is
/// a ratchet: it only ever grows, and feeds a recurring bonus into every
/// subsequent call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Current score; never negative
    pub score: i64,
    /// Snapshot of the score at the start of the most recent calculation
    pub previous_score: i64,
    /// Cumulative sum of positive score deltas across all calls
    pub improvement: f64,
}

impl Score {
    /// Recurring bonus seeded by the improvement ratchet
    fn improvement_bonus(&self) -> i64 {
        (self.improvement * points::IMPROVEMENT_BONUS_RATE).ceil() as i64
            * points::IMPROVEMENT_BONUS_STEP
    }

    /// Fold any positive score delta into the improvement ratchet
    fn accrue_improvement(&mut self) -> f64 {
        let delta = self.score - self.previous_score;
        if delta > 0 {
            self.improvement += delta as f64;
            delta as f64
        } else {
            0.0
        }
    }

    /// Clamp the score at zero after a calculation
    fn fix_negative_score(&mut self) {
        if self.score < 0 {
            self.score = 0;
        }
    }

    /// Improvement counter rounded for display
    pub fn improvement_display(&self) -> f64 {
        (self.improvement * 100.0).round() / 100.0
    }

    /// Run one scoring calculation
    ///
    /// Compares the current-period metrics against the baseline metric by
    /// metric: each of average speed, max speed, distance and moving time
    /// contributes +1 when current >= baseline and -1 otherwise, giving a
    /// scale in {-4, -2, 0, 2, 4}. The sign of the scale picks the policy:
    ///
    /// - **scale > 0**: full credit. The scale, badge points, challenge
    ///   points and streak are all added, and the full improvement bonus
    ///   follows.
    /// - **scale < 0**: the scale squared is subtracted as a penalty, then
    ///   half the badge/challenge/streak points (ceiled) and half the
    ///   improvement bonus are granted, so a bad week never zeroes the
    ///   athlete out entirely.
    /// - **scale == 0**: full badge/challenge/streak points but only half
    ///   the improvement bonus.
    ///
    /// The improvement ratchet accrues the positive score delta *before*
    /// the bonus is added, on every branch. The two halved-bonus branches
    /// are intentionally written out separately from the full-bonus one:
    /// the duplication is the reward-shaping policy itself.
    pub fn calculate(
        &mut self,
        current: &CoreMetrics,
        baseline: &CoreMetrics,
        badge_points: i64,
        challenge_points: i64,
        streak: u32,
    ) -> ScoreBreakdown {
        self.previous_score = self.score;
        let streak = streak as i64;

        let mut scale: i32 = 0;
        scale += if current.average_speed >= baseline.average_speed { 1 } else { -1 };
        scale += if current.max_speed >= baseline.max_speed { 1 } else { -1 };
        scale += if current.distance >= baseline.distance { 1 } else { -1 };
        scale += if current.moving_time >= baseline.moving_time { 1 } else { -1 };

        let branch;
        let base_points;
        let penalty;
        let improvement_delta;
        let improvement_bonus;

        if scale > 0 {
            branch = ScoreBranch::Improved;
            penalty = 0;
            base_points = scale as i64 + badge_points + challenge_points + streak;
            self.score += base_points;

            improvement_delta = self.accrue_improvement();
            improvement_bonus = self.improvement_bonus();
            self.score += improvement_bonus;
        } else if scale < 0 {
            branch = ScoreBranch::Regressed;
            penalty = (scale * scale) as i64;
            self.score -= penalty;
            base_points = half_ceil(badge_points + challenge_points + streak);
            self.score += base_points;

            improvement_delta = self.accrue_improvement();
            improvement_bonus = half_ceil(self.improvement_bonus());
            self.score += improvement_bonus;
        } else {
            branch = ScoreBranch::Mixed;
            penalty = 0;
            base_points = badge_points + challenge_points + streak;
            self.score += base_points;

            improvement_delta = self.accrue_improvement();
            improvement_bonus = half_ceil(self.improvement_bonus());
            self.score += improvement_bonus;
        }

        self.fix_negative_score();

        let breakdown = ScoreBreakdown {
            scale,
            branch,
            base_points,
            penalty,
            improvement_delta,
            improvement_bonus,
            previous_score: self.previous_score,
            score: self.score,
        };

        debug!(
            score.scale = breakdown.scale,
            score.branch = ?breakdown.branch,
            score.base_points = breakdown.base_points,
            score.penalty = breakdown.penalty,
            score.improvement_bonus = breakdown.improvement_bonus,
            score.previous = breakdown.previous_score,
            score.new = breakdown.score,
            "Score calculated"
        );

        breakdown
    }
}

/// Ceiled half of an integer point value
fn half_ceil(value: i64) -> i64 {
    ((value as f64) * 0.5).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(average_speed: f64, max_speed: f64, distance: f64, moving_time: f64) -> CoreMetrics {
        CoreMetrics {
            average_speed,
            max_speed,
            distance,
            moving_time,
        }
    }

    #[test]
    fn test_improved_branch_with_bonus() {
        let mut score = Score::default();
        let current = metrics(3.5, 5.0, 10_000.0, 3600.0);
        let baseline = metrics(3.0, 4.5, 9_000.0, 3000.0);

        let breakdown = score.calculate(&current, &baseline, 10, 5, 3);

        // scale 4, base 4 + 10 + 5 + 3 = 22, improvement 22,
        // bonus ceil(22 * 0.01) * 5 = 5, final 27
        assert_eq!(breakdown.scale, 4);
        assert_eq!(breakdown.branch, ScoreBranch::Improved);
        assert_eq!(breakdown.base_points, 22);
        assert_eq!(breakdown.improvement_delta, 22.0);
        assert_eq!(breakdown.improvement_bonus, 5);
        assert_eq!(score.improvement, 22.0);
        assert_eq!(score.score, 27);
    }

    #[test]
    fn test_equal_metrics_count_as_improved() {
        let mut score = Score::default();
        let same = metrics(3.0, 4.0, 5000.0, 1500.0);

        let breakdown = score.calculate(&same.clone(), &same, 0, 0, 0);
        assert_eq!(breakdown.scale, 4);
        assert_eq!(breakdown.branch, ScoreBranch::Improved);
    }

    #[test]
    fn test_regressed_branch_penalty_and_half_credit() {
        let mut score = Score {
            score: 50,
            previous_score: 50,
            improvement: 0.0,
        };
        let current = metrics(2.0, 3.0, 4000.0, 1000.0);
        let baseline = metrics(3.0, 4.0, 5000.0, 1500.0);

        let breakdown = score.calculate(&current, &baseline, 5, 5, 3);

        // scale -4, penalty 16, base ceil(13 * 0.5) = 7 -> 50 - 16 + 7 = 41,
        // no positive delta, no bonus
        assert_eq!(breakdown.scale, -4);
        assert_eq!(breakdown.branch, ScoreBranch::Regressed);
        assert_eq!(breakdown.penalty, 16);
        assert_eq!(breakdown.base_points, 7);
        assert_eq!(breakdown.improvement_delta, 0.0);
        assert_eq!(score.improvement, 0.0);
        assert_eq!(score.score, 41);
    }

    #[test]
    fn test_regressed_branch_can_still_accrue_improvement() {
        let mut score = Score::default();
        let current = metrics(2.0, 5.0, 4000.0, 1000.0);
        let baseline = metrics(3.0, 4.0, 5000.0, 1500.0);

        // scale -2: penalty 4, base ceil(25 * 0.5) = 13 -> delta +9
        let breakdown = score.calculate(&current, &baseline, 10, 10, 5);

        assert_eq!(breakdown.scale, -2);
        assert_eq!(breakdown.penalty, 4);
        assert_eq!(breakdown.base_points, 13);
        assert_eq!(breakdown.improvement_delta, 9.0);
        assert_eq!(score.improvement, 9.0);
        // bonus ceil(ceil(9 * 0.01) * 5 * 0.5) = 3
        assert_eq!(breakdown.improvement_bonus, 3);
        assert_eq!(score.score, 12);
    }

    #[test]
    fn test_mixed_branch_full_points_half_bonus() {
        let mut score = Score {
            score: 0,
            previous_score: 0,
            improvement: 400.0,
        };
        let current = metrics(3.5, 5.0, 4000.0, 1000.0);
        let baseline = metrics(3.0, 4.0, 5000.0, 1500.0);

        let breakdown = score.calculate(&current, &baseline, 5, 0, 2);

        // scale 0, base 7, improvement ratchets by 7,
        // bonus ceil(ceil(407 * 0.01) * 5 * 0.5) = ceil(25 * 0.5) = 13
        assert_eq!(breakdown.scale, 0);
        assert_eq!(breakdown.branch, ScoreBranch::Mixed);
        assert_eq!(breakdown.base_points, 7);
        assert_eq!(score.improvement, 407.0);
        assert_eq!(breakdown.improvement_bonus, 13);
        assert_eq!(score.score, 20);
    }

    #[test]
    fn test_negative_score_clamped_to_zero() {
        let mut score = Score {
            score: 5,
            previous_score: 5,
            improvement: 0.0,
        };
        let current = metrics(2.0, 3.0, 4000.0, 1000.0);
        let baseline = metrics(3.0, 4.0, 5000.0, 1500.0);

        // scale -4 penalty 16 against a score of 5 with no points at all
        let breakdown = score.calculate(&current, &baseline, 0, 0, 0);

        assert_eq!(breakdown.penalty, 16);
        assert_eq!(score.score, 0);
        assert!(breakdown.score >= 0);
    }

    #[test]
    fn test_improvement_never_decreases() {
        let mut score = Score {
            score: 100,
            previous_score: 100,
            improvement: 50.0,
        };
        let current = metrics(2.0, 3.0, 4000.0, 1000.0);
        let baseline = metrics(3.0, 4.0, 5000.0, 1500.0);

        score.calculate(&current, &baseline, 0, 0, 0);
        assert_eq!(score.improvement, 50.0);

        score.calculate(&current, &baseline, 0, 0, 0);
        assert_eq!(score.improvement, 50.0);
    }

    #[test]
    fn test_deterministic_given_same_state() {
        let current = metrics(3.5, 5.0, 10_000.0, 3600.0);
        let baseline = metrics(3.0, 4.5, 9_000.0, 3000.0);

        let mut a = Score::default();
        let mut b = Score::default();
        let first = a.calculate(&current, &baseline, 10, 5, 3);
        let second = b.calculate(&current, &baseline, 10, 5, 3);

        assert_eq!(first, second);
        assert_eq!(a, b);
    }

    #[test]
    fn test_improvement_display_rounding() {
        let score = Score {
            score: 0,
            previous_score: 0,
            improvement: 12.3456,
        };
        assert_eq!(score.improvement_display(), 12.35);
    }

    #[test]
    fn test_half_ceil() {
        assert_eq!(half_ceil(13), 7);
        assert_eq!(half_ceil(12), 6);
        assert_eq!(half_ceil(0), 0);
        assert_eq!(half_ceil(1), 1);
    }
}
