//! Badge and weekly-challenge evaluation
//!
//! Both sets are point-in-time indicators: every pass re-derives all flags
//! from scratch, so losing form loses the flag. Permanent "ever achieved"
//! unlocks would be separate persisted state and are deliberately not
//! modeled here.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::constants::{badges, challenges, points};
use crate::models::{ActivityRecord, CoreMetrics};

/// Badge flags derived from the athlete's baseline
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeSet {
    /// Baseline moving time of at least 1000 seconds
    pub moving_time: bool,
    /// Baseline distance of at least 5 km
    pub distance: bool,
    /// Baseline max speed of at least 4 m/s
    pub max_speed: bool,
}

impl BadgeSet {
    /// Points contributed to the score, 5 per earned badge
    pub fn points(&self) -> i64 {
        [self.moving_time, self.distance, self.max_speed]
            .iter()
            .filter(|&&earned| earned)
            .count() as i64
            * points::PER_BADGE
    }
}

/// Weekly challenge flags scoped to the current calendar week
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSet {
    /// Ran at least 3 times this week
    pub runs: bool,
    /// Covered at least 15 km this week
    pub distance: bool,
    /// Holding a streak of at least 5 days
    pub streak: bool,
}

impl ChallengeSet {
    /// Points contributed to the score, 5 per completed challenge
    pub fn points(&self) -> i64 {
        [self.runs, self.distance, self.streak]
            .iter()
            .filter(|&&done| done)
            .count() as i64
            * points::PER_CHALLENGE
    }
}

/// Evaluate badge flags against the current baseline
///
/// Thresholds are league-wide constants, not per-athlete settings.
pub fn evaluate_badges(baseline: &CoreMetrics) -> BadgeSet {
    BadgeSet {
        moving_time: baseline.moving_time >= badges::MOVING_TIME_SECS,
        distance: baseline.distance >= badges::DISTANCE_METERS,
        max_speed: baseline.max_speed >= badges::MAX_SPEED_MPS,
    }
}

/// Midnight at the start of the most recent Monday
fn week_start(today: NaiveDate) -> NaiveDateTime {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    monday.and_time(NaiveTime::MIN)
}

/// Evaluate weekly challenge flags
///
/// Takes the full feed and re-applies the running-type check itself, so it
/// works on pre-filtered and unfiltered input alike. `streak` must come
/// from the streak calculation of the same pass, which therefore has to
/// run first.
pub fn evaluate_challenges(
    activities: &[ActivityRecord],
    streak: u32,
    today: NaiveDate,
) -> ChallengeSet {
    let week_start = week_start(today);

    let mut week_runs = 0usize;
    let mut week_distance = 0.0;

    for activity in activities {
        if !activity.sport.is_running() {
            continue;
        }
        if let Some(start) = activity.start_time() {
            if start.naive_utc() >= week_start {
                week_runs += 1;
                week_distance += activity.distance;
            }
        }
    }

    ChallengeSet {
        runs: week_runs >= challenges::WEEKLY_RUNS,
        distance: week_distance >= challenges::WEEKLY_DISTANCE_METERS,
        streak: streak >= challenges::STREAK_DAYS,
    }
}
