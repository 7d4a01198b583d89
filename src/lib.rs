// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Stride Score
//!
//! A scoring and gamification engine for runner activity data. The crate
//! takes a runner's activity feed (as produced by a fitness provider such
//! as Strava), reduces it to a per-workout performance baseline, and
//! converts each batch into a single improvement score plus badge and
//! weekly-challenge flags.
//!
//! ## Scope
//!
//! The engine is a pure in-memory transformation:
//!
//! ```text
//! (prior profile state, activity batch) -> (updated profile, score, badges, challenges)
//! ```
//!
//! OAuth token handling, persistence, leaderboards and the HTTP surface are
//! external collaborators. They hand this crate a list of activity records
//! and the athlete's previously persisted state, and persist whatever comes
//! back. Nothing in the library performs network or file I/O (the
//! `score-batch` binary reads its inputs from disk, the library never
//! does).
//!
//! ## Pipeline
//!
//! A scoring pass runs the components in a fixed order:
//!
//! 1. Filter the feed down to running-type activities
//! 2. Aggregate raw metrics across the batch and derive the baseline
//! 3. Calculate the consecutive-day streak
//! 4. Evaluate badge flags against the baseline
//! 5. Evaluate weekly challenge flags against the current calendar week
//! 6. Fold everything into the athlete's running score
//!
//! ## Example
//!
//! ```rust
//! use chrono::Utc;
//! use stride_score::models::{ActivityRecord, AthleteProfile};
//! use stride_score::scoring::run_scoring_pass;
//!
//! let feed = r#"[{
//!     "type": "Run",
//!     "start_date_local": "2024-03-04T07:30:00Z",
//!     "distance": 5000.0,
//!     "moving_time": 1500,
//!     "average_speed": 3.3,
//!     "max_speed": 4.8
//! }]"#;
//!
//! let activities: Vec<ActivityRecord> = serde_json::from_str(feed).unwrap();
//! let mut profile = AthleteProfile::new("Ada Lovelace", "ada");
//!
//! if let Some(outcome) = run_scoring_pass(&mut profile, &activities, Utc::now()) {
//!     println!("score: {}", outcome.score);
//! }
//! ```

/// Typed data model for activities, athlete state and score state
pub mod models;

/// Fixed thresholds and point values for badges, challenges and bonuses
pub mod constants;

/// Scoring pipeline: aggregation, streaks, achievements and the score engine
pub mod scoring;

/// Production logging configuration with structured output
pub mod logging;
