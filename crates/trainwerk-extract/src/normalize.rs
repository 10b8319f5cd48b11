// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Normalizer: drops later duplicates and imposes canonical ordering.

use std::collections::HashSet;

use chrono::NaiveDate;
use trainwerk_core::{DateCandidate, MetricRecord, MetricType, WorkoutRecord, WorkoutType};
use tracing::debug;

/// Deduplicated, ordered records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    pub workouts: Vec<WorkoutRecord>,
    pub metrics: Vec<MetricRecord>,
    pub dates: Vec<DateCandidate>,
}

/// Deduplicate workouts by `(type, date)` and metrics by `(type, value)`,
/// keeping the first occurrence, then sort workouts and dates ascending.
///
/// Undated records sort last and ties keep their input order, so running
/// this on its own output changes nothing.
pub fn normalize(
    workouts: Vec<WorkoutRecord>,
    metrics: Vec<MetricRecord>,
    dates: Vec<DateCandidate>,
) -> Normalized {
    let (workouts_in, metrics_in) = (workouts.len(), metrics.len());

    let mut workouts = dedup_workouts(workouts);
    workouts.sort_by_key(|workout| undated_last(workout.date));

    let metrics = dedup_metrics(metrics);

    let mut dates = dates;
    dates.sort_by_key(|candidate| (candidate.parsed.is_none(), candidate.parsed));

    debug!(
        workouts_removed = workouts_in - workouts.len(),
        metrics_removed = metrics_in - metrics.len(),
        "Records normalized"
    );

    Normalized {
        workouts,
        metrics,
        dates,
    }
}

pub fn dedup_workouts(workouts: Vec<WorkoutRecord>) -> Vec<WorkoutRecord> {
    let mut seen: HashSet<(WorkoutType, Option<NaiveDate>)> = HashSet::new();
    workouts
        .into_iter()
        .filter(|workout| seen.insert((workout.workout_type, workout.date)))
        .collect()
}

/// Values are compared by bit pattern, so `74.2` and `74.20` are equal and
/// `74.2` and `74.21` are not.
pub fn dedup_metrics(metrics: Vec<MetricRecord>) -> Vec<MetricRecord> {
    let mut seen: HashSet<(MetricType, u64)> = HashSet::new();
    metrics
        .into_iter()
        .filter(|metric| seen.insert((metric.metric_type, metric.value.to_bits())))
        .collect()
}

fn undated_last(date: Option<NaiveDate>) -> (bool, Option<NaiveDate>) {
    (date.is_none(), date)
}
