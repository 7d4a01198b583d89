// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Scoring Module
//!
//! The full scoring pipeline for one athlete. Each component is a pure
//! transformation; the only state that changes is the athlete's profile,
//! and only through [`run_scoring_pass`].
//!
//! This module includes:
//! - Activity filtering, metric aggregation and baseline tracking
//! - Consecutive-day streak calculation
//! - Badge and weekly-challenge evaluation
//! - The score engine with its improvement ratchet
//!
//! Everything executes synchronously within a single call. Concurrent
//! passes for the *same* athlete must be serialized by the caller:
//! aggregation replaces the profile's totals wholesale, and interleaved
//! calls could observe a half-updated profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{ActivityRecord, AthleteProfile, MetricsSummary};

pub mod achievements;
pub mod aggregator;
pub mod engine;
pub mod streak;

pub use achievements::{evaluate_badges, evaluate_challenges, BadgeSet, ChallengeSet};
pub use aggregator::{aggregate, apply_batch, filter_running};
pub use engine::{Score, ScoreBranch, ScoreBreakdown};
pub use streak::calculate_streak;

/// Everything one scoring pass produces for external consumption
///
/// The updated [`AthleteProfile`] itself is mutated in place; this carries
/// the derived results the storage and presentation layers want alongside
/// it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringOutcome {
    /// Aggregated batch metrics
    pub summary: MetricsSummary,
    /// Badge flags earned this pass
    pub badges: BadgeSet,
    /// Weekly challenge flags completed this pass
    pub challenges: ChallengeSet,
    /// Consecutive-day streak
    pub streak: u32,
    /// Score after this pass
    pub score: i64,
    /// Cumulative improvement, rounded for display
    pub improvement: f64,
    /// Intermediate values of the score calculation
    pub breakdown: ScoreBreakdown,
}

/// Run one full scoring pass over an activity batch
///
/// The batch must be the athlete's full activity history (see
/// [`aggregator::aggregate`]). Components run in a fixed order: filter,
/// aggregate + baseline, streak, badges, challenges, score. The streak and
/// challenge evaluation read the unfiltered feed; badges read the fresh
/// baseline; the score engine consumes all of it.
///
/// Returns `None` when the batch contains no running activities. Nothing
/// is mutated in that case: scoring zeroed current metrics against a real
/// baseline would register as a regression on every metric, so the pass is
/// skipped outright.
///
/// `now` anchors all calendar logic (streak recency, week start), which
/// keeps the pass deterministic for a given clock reading.
pub fn run_scoring_pass(
    profile: &mut AthleteProfile,
    activities: &[ActivityRecord],
    now: DateTime<Utc>,
) -> Option<ScoringOutcome> {
    let running = filter_running(activities);
    if running.is_empty() {
        warn!(
            athlete = %profile.username,
            feed_size = activities.len(),
            "No running activities in batch, nothing to score"
        );
        return None;
    }

    let today = now.date_naive();

    apply_batch(profile, aggregate(&running));
    let summary = MetricsSummary::from_profile(profile);

    profile.streak = calculate_streak(activities, today);

    let badges = evaluate_badges(&profile.baseline);
    let challenges = evaluate_challenges(activities, profile.streak, today);

    let breakdown = profile.score.calculate(
        &profile.current,
        &profile.baseline,
        badges.points(),
        challenges.points(),
        profile.streak,
    );

    info!(
        athlete = %profile.username,
        workouts = summary.total_workouts,
        streak = profile.streak,
        badge_points = badges.points(),
        challenge_points = challenges.points(),
        score = breakdown.score,
        "Scoring pass complete"
    );

    Some(ScoringOutcome {
        summary,
        badges,
        challenges,
        streak: profile.streak,
        score: breakdown.score,
        improvement: profile.score.improvement_display(),
        breakdown,
    })
}
