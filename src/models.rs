// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Data Models
//!
//! Core data structures for the scoring engine. Activity records arrive in
//! the JSON shape produced by fitness providers; every defaulting rule for
//! missing or null fields is applied here, at the deserialization boundary,
//! so the aggregation logic downstream never performs presence checks.
//!
//! ## Core Models
//!
//! - [`ActivityRecord`]: one workout as reported by the provider
//! - [`SportKind`]: activity type with a catch-all for non-running sports
//! - [`AthleteProfile`]: the athlete's long-lived state (totals, baseline,
//!   current-period metrics, streak and score)
//! - [`ActivityTotals`]: running sums over one aggregation batch
//! - [`CoreMetrics`]: the four metrics compared against the baseline
//! - [`MetricsSummary`]: the summary object handed back to the storage layer

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::scoring::engine::Score;

/// Activity type as reported by the provider
///
/// Only the three running variants are eligible for scoring; everything
/// else is carried through [`SportKind::Other`] and filtered out. A record
/// with no `type` field at all is treated as a plain run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SportKind {
    /// Outdoor run
    #[default]
    Run,
    /// Treadmill or virtual run
    VirtualRun,
    /// Trail run
    TrailRun,
    /// Any non-running sport (ride, swim, hike, ...)
    #[serde(untagged)]
    Other(String),
}

impl SportKind {
    /// Whether this activity type counts toward the running baseline
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Run | Self::VirtualRun | Self::TrailRun)
    }
}

/// One workout from the provider's activity feed
///
/// Immutable once deserialized; the scoring pipeline only ever reads it.
/// Required numeric fields default to zero when absent, optional metrics
/// deserialize `null` and absence alike to `None` and are treated as zero
/// by the aggregator. Unknown fields in the feed are ignored.
///
/// # Examples
///
/// ```rust
/// use stride_score::models::{ActivityRecord, SportKind};
///
/// let record: ActivityRecord = serde_json::from_str(r#"{
///     "type": "TrailRun",
///     "start_date_local": "2024-03-04T07:30:00Z",
///     "distance": 8000.0,
///     "moving_time": 2400,
///     "average_speed": 3.3,
///     "max_speed": 4.8,
///     "average_heartrate": null
/// }"#).unwrap();
///
/// assert_eq!(record.sport, SportKind::TrailRun);
/// assert!(record.sport.is_running());
/// assert_eq!(record.average_heartrate, None);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ActivityRecord {
    /// Activity type; absent means `Run`
    #[serde(rename = "type", default)]
    pub sport: SportKind,
    /// Start time as reported in the athlete's local timezone
    #[serde(default)]
    pub start_date_local: Option<DateTime<Utc>>,
    /// Start time in UTC, used when no local timestamp is present
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,
    /// Distance covered in meters
    #[serde(default)]
    pub distance: f64,
    /// Moving time in seconds
    #[serde(default)]
    pub moving_time: f64,
    /// Elapsed wall-clock time in seconds; falls back to `moving_time`
    #[serde(default)]
    pub elapsed_time: Option<f64>,
    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: f64,
    /// Maximum speed in m/s
    #[serde(default)]
    pub max_speed: f64,
    /// Average cadence (steps per minute), when recorded
    #[serde(default)]
    pub average_cadence: Option<f64>,
    /// Average heart rate (BPM), when recorded
    #[serde(default)]
    pub average_heartrate: Option<f64>,
    /// Total elevation gain in meters, when recorded
    #[serde(default)]
    pub total_elevation_gain: Option<f64>,
}

impl ActivityRecord {
    /// Start time of the activity, preferring the local timestamp
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_date_local.or(self.start_date)
    }

    /// Calendar date the activity started on
    pub fn start_day(&self) -> Option<NaiveDate> {
        self.start_time().map(|t| t.date_naive())
    }
}

/// Errors raised when an activity feed cannot be decoded at all
///
/// Malformed-but-well-typed records (missing metrics, null values) are
/// recovered by defaulting and never reach this error; only structurally
/// invalid input is rejected.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The feed was valid JSON but not an array of records
    #[error("activity feed must be a JSON array")]
    NotAnArray,
    /// The feed was not valid JSON, or a record had a non-numeric
    /// required field
    #[error("malformed activity feed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Decode a raw provider activity feed into typed records
///
/// The boundary validation for the scoring core: anything that is not an
/// array of object-shaped records is rejected here, so the pipeline can
/// assume well-typed input.
pub fn parse_activity_feed(raw: &str) -> Result<Vec<ActivityRecord>, FeedError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if !value.is_array() {
        return Err(FeedError::NotAnArray);
    }
    Ok(serde_json::from_value(value)?)
}

/// Running sums across one aggregation batch
///
/// Built from zero on every pass: a batch is the athlete's full activity
/// history, and re-running the same batch reproduces the same totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityTotals {
    /// Number of eligible running activities in the batch
    pub workouts: u32,
    /// Summed distance (meters)
    pub distance: f64,
    /// Summed moving time (seconds)
    pub moving_time: f64,
    /// Summed per-activity average speeds (m/s)
    pub average_speed: f64,
    /// Summed per-activity max speeds (m/s)
    pub max_speed: f64,
    /// Summed elapsed time (seconds)
    pub elapsed_time: f64,
    /// Summed average cadence
    pub average_cadence: f64,
    /// Summed average heart rate
    pub average_heartrate: f64,
    /// Summed elevation gain (meters)
    pub elevation_gain: f64,
}

/// The four metrics the score engine compares against the baseline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreMetrics {
    /// Per-workout average speed (m/s)
    pub average_speed: f64,
    /// Per-workout max speed (m/s)
    pub max_speed: f64,
    /// Per-workout distance (meters)
    pub distance: f64,
    /// Per-workout moving time (seconds)
    pub moving_time: f64,
}

/// Long-lived per-athlete state
///
/// Supplied by the storage layer before a pass and persisted again after.
/// Baseline and current-period fields are only meaningful once
/// `totals.workouts > 0`; before the first successful aggregation they
/// hold their defaults and must not be consumed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// Real name, shown when the athlete opts in
    pub name: String,
    /// Account username
    pub username: String,
    /// Name shown on leaderboards, controlled by [`Self::show_real_name`]
    pub display_name: String,
    /// Running sums from the most recent aggregation pass
    pub totals: ActivityTotals,
    /// Per-workout averages over the full history
    pub baseline: CoreMetrics,
    /// Most recent batch's averages, the comparison subject for scoring
    pub current: CoreMetrics,
    /// Per-workout average cadence
    pub average_cadence: f64,
    /// Per-workout average heart rate
    pub average_heartrate: f64,
    /// Per-workout average elapsed time (seconds)
    pub average_elapsed_time: f64,
    /// Per-workout average elevation gain (meters)
    pub average_elevation_gain: f64,
    /// Consecutive calendar days with at least one activity
    pub streak: u32,
    /// Accumulated score state
    pub score: Score,
}

impl AthleteProfile {
    /// Create a fresh profile; leaderboards show the username until the
    /// athlete opts into their real name
    pub fn new(name: impl Into<String>, username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            name: name.into(),
            display_name: username.clone(),
            username,
            ..Self::default()
        }
    }

    /// Privacy toggle for which name appears on leaderboards
    pub fn show_real_name(&mut self, show: bool) {
        self.display_name = if show {
            self.name.clone()
        } else {
            self.username.clone()
        };
    }

    /// Whether at least one aggregation pass has produced a usable baseline
    pub fn has_baseline(&self) -> bool {
        self.totals.workouts > 0
    }
}

/// Aggregated metrics handed back to the storage layer after a pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub total_workouts: u32,
    pub total_distance: f64,
    pub total_moving_time: f64,
    pub average_speed: f64,
    pub max_speed: f64,
}

impl MetricsSummary {
    /// Snapshot the summary fields from a freshly aggregated profile
    pub fn from_profile(profile: &AthleteProfile) -> Self {
        Self {
            total_workouts: profile.totals.workouts,
            total_distance: profile.totals.distance,
            total_moving_time: profile.totals.moving_time,
            average_speed: profile.current.average_speed,
            max_speed: profile.current.max_speed,
        }
    }
}
