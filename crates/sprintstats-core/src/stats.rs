//! Sprint-level aggregate statistics.
//!
//! Pure folds over completed-issue lists. Sub-task issues never contribute
//! to any aggregate, whether they appear at top level or nested under a
//! parent's sub-task list.

use crate::issue::Issue;

/// Sentinel reported for cycle-time stats when no issue in the input has a
/// measurable cycle time. Callers rely on `-1` rather than an error or NaN.
const NO_CYCLE_TIME: i64 = -1;

/// Aggregated statistics for a single sprint.
#[derive(Debug, Clone, PartialEq)]
pub struct SprintStats {
    pub velocity: f64,
    pub min_cycle_time: i64,
    pub max_cycle_time: i64,
    pub average_cycle_time: f64,
    pub cycle_time_stddev: f64,
}

/// Cycle-time distribution in whole days.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleTimes {
    pub min: i64,
    pub max: i64,
    pub average: f64,
    pub stddev: f64,
}

impl CycleTimes {
    fn empty() -> Self {
        Self {
            min: NO_CYCLE_TIME,
            max: NO_CYCLE_TIME,
            average: -1.0,
            stddev: -1.0,
        }
    }
}

/// Sum story points over all non-sub-task issues, substituting
/// `default_points` wherever an issue was never scored.
///
/// An empty input yields `0`.
#[must_use]
pub fn sum_story_points(issues: &[Issue], default_points: f64) -> f64 {
    issues
        .iter()
        .filter(|issue| !issue.is_subtask())
        .map(|issue| issue.story_points.unwrap_or(default_points))
        .sum()
}

/// Compute the cycle-time distribution over all non-sub-task issues that
/// carry both a creation and a resolution timestamp.
///
/// When no issue qualifies, every output is the `-1` sentinel.
#[must_use]
pub fn calculate_cycle_times(issues: &[Issue]) -> CycleTimes {
    let times: Vec<i64> = issues
        .iter()
        .filter(|issue| !issue.is_subtask())
        .filter_map(Issue::cycle_time_days)
        .collect();

    let Some(&first) = times.first() else {
        return CycleTimes::empty();
    };

    let (min, max) = times
        .iter()
        .fold((first, first), |(min, max), &t| (min.min(t), max.max(t)));

    let n = times.len() as f64;
    let mean = times.iter().map(|&t| t as f64).sum::<f64>() / n;
    // Population variance: divide by N, not N-1.
    let variance = times.iter().map(|&t| (t as f64 - mean).powi(2)).sum::<f64>() / n;

    CycleTimes {
        min,
        max,
        average: mean,
        stddev: variance.sqrt(),
    }
}

/// Gather the full stats record for a sprint's completed issues.
#[must_use]
pub fn gather_stats(completed: &[Issue], default_points: f64) -> SprintStats {
    let velocity = sum_story_points(completed, default_points);
    let cycle = calculate_cycle_times(completed);
    SprintStats {
        velocity,
        min_cycle_time: cycle.min,
        max_cycle_time: cycle.max,
        average_cycle_time: cycle.average,
        cycle_time_stddev: cycle.stddev,
    }
}
