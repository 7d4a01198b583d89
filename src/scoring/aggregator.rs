//! Batch aggregation: activity filtering, metric totals and baseline
//! derivation

use tracing::debug;

use crate::models::{ActivityRecord, ActivityTotals, AthleteProfile, CoreMetrics};

/// Select the running-type activities from a heterogeneous feed
///
/// Order preserving and non-mutating. Records with no `type` field were
/// already defaulted to `Run` at the deserialization boundary, so they are
/// included. An empty result means there is nothing to score downstream.
pub fn filter_running(activities: &[ActivityRecord]) -> Vec<&ActivityRecord> {
    activities.iter().filter(|a| a.sport.is_running()).collect()
}

/// Reduce a batch of running activities to fresh totals
///
/// An explicit reducer: totals always start from zero, so running the same
/// batch twice produces identical sums. The batch is the athlete's full
/// activity history; prior totals are replaced, never accumulated onto
/// (callers syncing deltas must concatenate before calling).
pub fn aggregate(running: &[&ActivityRecord]) -> ActivityTotals {
    let mut totals = ActivityTotals::default();

    for activity in running {
        totals.workouts += 1;
        totals.distance += activity.distance;
        totals.moving_time += activity.moving_time;
        totals.average_speed += activity.average_speed;
        totals.max_speed += activity.max_speed;
        totals.elapsed_time += activity.elapsed_time.unwrap_or(activity.moving_time);
        totals.average_cadence += activity.average_cadence.unwrap_or(0.0);
        totals.average_heartrate += activity.average_heartrate.unwrap_or(0.0);
        totals.elevation_gain += activity.total_elevation_gain.unwrap_or(0.0);
    }

    totals
}

/// Fold fresh batch totals into the athlete's profile
///
/// With at least one workout, each baseline field becomes its total divided
/// by the workout count, and the current-period metrics are set equal to
/// the fresh baseline: under full-history batches the current batch *is*
/// the new baseline. With zero workouts the baseline and current fields are
/// left at their prior values and must not be consumed (the pipeline skips
/// scoring entirely in that case).
///
/// Optional-metric averages only divide when their running sum is nonzero,
/// so a genuinely-zero sum is never pushed through repeated division.
pub fn apply_batch(profile: &mut AthleteProfile, totals: ActivityTotals) {
    if totals.workouts > 0 {
        let workouts = f64::from(totals.workouts);

        profile.baseline = CoreMetrics {
            average_speed: totals.average_speed / workouts,
            max_speed: totals.max_speed / workouts,
            distance: totals.distance / workouts,
            moving_time: totals.moving_time / workouts,
        };

        profile.average_cadence = per_workout(totals.average_cadence, workouts);
        profile.average_heartrate = per_workout(totals.average_heartrate, workouts);
        profile.average_elapsed_time = per_workout(totals.elapsed_time, workouts);
        profile.average_elevation_gain = per_workout(totals.elevation_gain, workouts);

        profile.current = profile.baseline.clone();

        debug!(
            workouts = totals.workouts,
            baseline.distance = profile.baseline.distance,
            baseline.moving_time = profile.baseline.moving_time,
            baseline.average_speed = profile.baseline.average_speed,
            "Baseline recalculated"
        );
    }

    profile.totals = totals;
}

/// Per-workout average for an optional metric, skipping the division when
/// nothing was accumulated
fn per_workout(sum: f64, workouts: f64) -> f64 {
    if sum != 0.0 {
        sum / workouts
    } else {
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SportKind;

    fn run(distance: f64, moving_time: f64, average_speed: f64, max_speed: f64) -> ActivityRecord {
        ActivityRecord {
            sport: SportKind::Run,
            distance,
            moving_time,
            average_speed,
            max_speed,
            ..ActivityRecord::default()
        }
    }

    fn ride() -> ActivityRecord {
        ActivityRecord {
            sport: SportKind::Other("Ride".to_string()),
            distance: 40_000.0,
            moving_time: 5400.0,
            average_speed: 7.4,
            max_speed: 15.0,
            ..ActivityRecord::default()
        }
    }

    #[test]
    fn test_filter_keeps_running_types_in_order() {
        let activities = vec![
            run(5000.0, 1500.0, 3.3, 4.5),
            ride(),
            ActivityRecord {
                sport: SportKind::VirtualRun,
                ..run(4000.0, 1200.0, 3.3, 4.0)
            },
            ActivityRecord {
                sport: SportKind::TrailRun,
                ..run(9000.0, 3600.0, 2.5, 3.8)
            },
        ];

        let running = filter_running(&activities);
        assert_eq!(running.len(), 3);
        assert_eq!(running[0].distance, 5000.0);
        assert_eq!(running[1].distance, 4000.0);
        assert_eq!(running[2].distance, 9000.0);
    }

    #[test]
    fn test_ride_contributes_nothing() {
        let activities = vec![
            run(15_000.0, 4500.0, 3.3, 4.5),
            run(8000.0, 2400.0, 3.3, 4.2),
            run(5000.0, 1800.0, 2.8, 4.0),
            run(12_000.0, 5400.0, 2.2, 3.8),
            run(10_000.0, 3000.0, 3.3, 4.6),
            ride(),
        ];

        let totals = aggregate(&filter_running(&activities));
        assert_eq!(totals.workouts, 5);
        assert_eq!(totals.distance, 50_000.0);
        assert_eq!(totals.moving_time, 17_100.0);
    }

    #[test]
    fn test_baseline_arithmetic() {
        let activities = vec![
            run(15_000.0, 4500.0, 3.0, 4.0),
            run(8000.0, 2400.0, 3.0, 4.0),
            run(5000.0, 1800.0, 3.0, 4.0),
            run(12_000.0, 5400.0, 3.0, 4.0),
            run(10_000.0, 3000.0, 3.0, 4.0),
        ];

        let mut profile = AthleteProfile::new("Test", "test");
        apply_batch(&mut profile, aggregate(&filter_running(&activities)));

        assert_eq!(profile.totals.distance, 50_000.0);
        assert_eq!(profile.totals.moving_time, 17_100.0);
        assert_eq!(profile.baseline.distance, 10_000.0);
        assert_eq!(profile.baseline.moving_time, 3420.0);
        assert_eq!(profile.current, profile.baseline);
    }

    #[test]
    fn test_aggregation_is_idempotent_for_a_fixed_batch() {
        let activities = vec![run(5000.0, 1500.0, 3.3, 4.5), run(7000.0, 2100.0, 3.3, 4.8)];
        let running = filter_running(&activities);

        let first = aggregate(&running);
        let second = aggregate(&running);
        assert_eq!(first, second);

        let mut profile_a = AthleteProfile::new("Test", "test");
        let mut profile_b = AthleteProfile::new("Test", "test");
        apply_batch(&mut profile_a, first);
        apply_batch(&mut profile_b, second);
        assert_eq!(profile_a.baseline, profile_b.baseline);
        assert_eq!(profile_a.totals, profile_b.totals);
    }

    #[test]
    fn test_elapsed_time_falls_back_to_moving_time() {
        let mut with_elapsed = run(5000.0, 1500.0, 3.3, 4.5);
        with_elapsed.elapsed_time = Some(1650.0);
        let without_elapsed = run(4000.0, 1200.0, 3.3, 4.0);

        let activities = vec![with_elapsed, without_elapsed];
        let totals = aggregate(&filter_running(&activities));
        assert_eq!(totals.elapsed_time, 1650.0 + 1200.0);
    }

    #[test]
    fn test_missing_optional_metrics_count_as_zero() {
        let mut with_hr = run(5000.0, 1500.0, 3.3, 4.5);
        with_hr.average_heartrate = Some(152.0);
        with_hr.average_cadence = Some(170.0);
        let bare = run(4000.0, 1200.0, 3.3, 4.0);

        let activities = vec![with_hr, bare];
        let totals = aggregate(&filter_running(&activities));
        assert_eq!(totals.average_heartrate, 152.0);
        assert_eq!(totals.average_cadence, 170.0);
        assert_eq!(totals.elevation_gain, 0.0);
    }

    #[test]
    fn test_zero_optional_sum_skips_division() {
        let activities = vec![run(5000.0, 1500.0, 3.3, 4.5), run(4000.0, 1200.0, 3.3, 4.0)];

        let mut profile = AthleteProfile::new("Test", "test");
        apply_batch(&mut profile, aggregate(&filter_running(&activities)));

        // no cadence recorded anywhere: the zero sum stays zero untouched
        assert_eq!(profile.average_cadence, 0.0);
        // elapsed time fell back to moving time, so it does average
        assert_eq!(profile.average_elapsed_time, 1350.0);
    }

    #[test]
    fn test_empty_batch_leaves_baseline_untouched() {
        let mut profile = AthleteProfile::new("Test", "test");
        apply_batch(
            &mut profile,
            aggregate(&filter_running(&[run(5000.0, 1500.0, 3.3, 4.5)])),
        );
        let baseline = profile.baseline.clone();

        apply_batch(&mut profile, aggregate(&[]));
        assert_eq!(profile.baseline, baseline);
        assert_eq!(profile.totals.workouts, 0);
        assert!(!profile.has_baseline());
    }
}
