//! Consecutive-day activity streak calculation

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::models::ActivityRecord;

/// Count consecutive calendar days with at least one activity
///
/// The streak is anchored to `today`: it only exists when the most recent
/// activity day is today or yesterday, otherwise it is broken and reports
/// zero. Multiple activities on one day count once. Walking backwards from
/// the most recent day, the first missing day ends the count.
///
/// Any activity keeps a day alive, not just runs, so this takes the
/// unfiltered feed. Pure in `today`: the same timestamps always produce
/// the same streak no matter when during the day it is computed.
pub fn calculate_streak(activities: &[ActivityRecord], today: NaiveDate) -> u32 {
    let days: BTreeSet<NaiveDate> = activities.iter().filter_map(|a| a.start_day()).collect();
    if days.is_empty() {
        return 0;
    }

    // most recent first; the set already deduped per day
    let sorted: Vec<NaiveDate> = days.into_iter().rev().collect();

    let yesterday = today - Duration::days(1);
    if sorted[0] != today && sorted[0] != yesterday {
        return 0;
    }

    let mut streak = 1;
    let mut expected = sorted[0] - Duration::days(1);

    for day in &sorted[1..] {
        if *day == expected {
            streak += 1;
            expected = expected - Duration::days(1);
        } else if *day < expected {
            break;
        }
    }

    streak
}
