// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use trainwerk_core::{DateCandidate, DateRange, MetricRecord, Summary, WorkoutRecord};

/// Aggregate counts over normalized records.
///
/// `dates` must already be sorted; the range is taken from the first and last
/// parsed candidates. Distinct types are listed in first-seen order.
pub fn build_summary(
    workouts: &[WorkoutRecord],
    metrics: &[MetricRecord],
    dates: &[DateCandidate],
) -> Summary {
    let mut parsed = dates.iter().filter(|candidate| candidate.parsed.is_some());
    let date_range = parsed.next().map(|first| {
        let last = parsed.last().unwrap_or(first);
        DateRange {
            first: first.formatted.clone(),
            last: last.formatted.clone(),
        }
    });

    let mut workout_types = Vec::new();
    for workout in workouts {
        if !workout_types.contains(&workout.workout_type) {
            workout_types.push(workout.workout_type);
        }
    }

    let mut metric_types = Vec::new();
    for metric in metrics {
        if !metric_types.contains(&metric.metric_type) {
            metric_types.push(metric.metric_type);
        }
    }

    Summary {
        workout_count: workouts.len(),
        exercise_count: workouts.iter().map(|w| w.exercises.len()).sum(),
        metric_count: metrics.len(),
        date_range,
        workout_types,
        metric_types,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble_workouts;
    use crate::patterns::dates::find_dates;
    use crate::patterns::metrics::find_metrics;
    use chrono::Utc;
    use trainwerk_core::{MetricType, WorkoutType};

    #[test]
    fn counts_and_distinct_types() {
        let text = "musculation\nSquat 3x10\nFentes 3x12\ncardio\ncourse\nPompes 20 reps\nmusculation";
        let workouts = assemble_workouts(text);
        let metrics = find_metrics("IMC 22\nPoids 70 kg\nIMC 23", Utc::now());
        let summary = build_summary(&workouts, &metrics, &[]);

        assert_eq!(summary.workout_count, 4);
        assert_eq!(summary.exercise_count, 3);
        assert_eq!(summary.metric_count, 3);
        assert_eq!(
            summary.workout_types,
            vec![WorkoutType::Strength, WorkoutType::Cardio, WorkoutType::Running]
        );
        assert_eq!(summary.metric_types, vec![MetricType::Bmi, MetricType::Weight]);
        assert_eq!(summary.date_range, None);
    }

    #[test]
    fn date_range_skips_text_only_candidates() {
        let dates = find_dates("01/03/2024 12/03/2024 mardi");
        let summary = build_summary(&[], &[], &dates);
        assert_eq!(
            summary.date_range,
            Some(DateRange {
                first: "01/03/2024".into(),
                last: "12/03/2024".into(),
            })
        );
    }

    #[test]
    fn single_date_is_both_ends() {
        let dates = find_dates("samedi 05/04/2024");
        let range = build_summary(&[], &[], &dates).date_range.unwrap();
        assert_eq!(range.first, range.last);
    }

    #[test]
    fn text_only_dates_give_no_range() {
        let dates = find_dates("lundi et mardi");
        assert_eq!(build_summary(&[], &[], &dates).date_range, None);
    }
}
