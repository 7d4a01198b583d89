// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Constants Module
//!
//! Fixed thresholds and point values for the scoring engine. These are
//! league-wide constants, not per-athlete configuration.

/// Badge thresholds, applied to the athlete's per-workout baseline
pub mod badges {
    /// Moving-time badge: baseline moving time of at least this many seconds
    pub const MOVING_TIME_SECS: f64 = 1000.0;

    /// Distance badge: baseline distance of at least this many meters (5 km)
    pub const DISTANCE_METERS: f64 = 5000.0;

    /// Max-speed badge: baseline max speed of at least this many m/s (~14.4 km/h)
    pub const MAX_SPEED_MPS: f64 = 4.0;
}

/// Weekly challenge thresholds, applied to the current calendar week
/// (most recent Monday 00:00 onward)
pub mod challenges {
    /// Runs challenge: at least this many runs this week
    pub const WEEKLY_RUNS: usize = 3;

    /// Distance challenge: at least this many meters this week (15 km)
    pub const WEEKLY_DISTANCE_METERS: f64 = 15_000.0;

    /// Streak challenge: a current streak of at least this many days
    pub const STREAK_DAYS: u32 = 5;
}

/// Point values fed into the score engine
pub mod points {
    /// Points awarded per earned badge flag
    pub const PER_BADGE: i64 = 5;

    /// Points awarded per completed weekly challenge flag
    pub const PER_CHALLENGE: i64 = 5;

    /// Fraction of the cumulative improvement counter that seeds the
    /// recurring bonus
    pub const IMPROVEMENT_BONUS_RATE: f64 = 0.01;

    /// Multiplier applied to the ceiled improvement fraction
    pub const IMPROVEMENT_BONUS_STEP: i64 = 5;
}
