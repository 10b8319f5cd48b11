// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workout assembler: a single-pass, line-oriented state machine that groups
// line-level entities into workout records.

use chrono::NaiveDate;
use trainwerk_core::{ExerciseRecord, RecordId, WorkoutRecord};
use tracing::{debug, instrument, trace};

use crate::patterns::dates::first_date;
use crate::patterns::exercises::match_exercise;
use crate::patterns::measures::{match_calories, match_duration, match_note};
use crate::patterns::workout_types::match_workout_type;

#[derive(Debug)]
enum State {
    NoOpenWorkout,
    WorkoutOpen(WorkoutRecord),
}

/// Feeds lines in order and collects the workouts they describe.
///
/// The current date is sticky: once a line carries a date, every workout
/// opened afterwards gets it until another date replaces it.
#[derive(Debug)]
pub struct WorkoutAssembler {
    state: State,
    current_date: Option<NaiveDate>,
    finished: Vec<WorkoutRecord>,
    opened: usize,
}

impl WorkoutAssembler {
    pub fn new() -> Self {
        Self {
            state: State::NoOpenWorkout,
            current_date: None,
            finished: Vec::new(),
            opened: 0,
        }
    }

    /// Process one line.
    ///
    /// A line may update the date and also carry a note, an exercise, a
    /// duration, and calories for the open workout.
    pub fn feed_line(&mut self, line: &str) {
        let line_date = first_date(line);
        if let Some(date) = line_date {
            trace!(%date, "Current date updated");
            self.current_date = Some(date);
        }

        let opened_here = match match_workout_type(line) {
            Some(workout_type) => {
                self.close_open_workout();
                self.opened += 1;
                let id = RecordId::workout(self.opened);
                debug!(%id, %workout_type, date = ?self.current_date, "Workout opened");
                self.state = State::WorkoutOpen(WorkoutRecord::new(
                    id,
                    workout_type,
                    self.current_date,
                ));
                true
            }
            None => false,
        };

        let State::WorkoutOpen(workout) = &mut self.state else {
            return;
        };

        // An undated workout takes the first date found inside it.
        if workout.date.is_none() {
            workout.date = line_date;
        }

        if let Some(note) = match_note(line) {
            workout.notes.push(note);
        }

        // The type keyword line is a header, not an exercise.
        if !opened_here {
            if let Some(found) = match_exercise(line) {
                let id = RecordId::exercise(&workout.id, workout.exercises.len() + 1);
                workout.exercises.push(ExerciseRecord {
                    id,
                    name: found.name,
                    sets: found.sets,
                    notes: found.notes,
                });
            }
        }

        if let Some(seconds) = match_duration(line) {
            workout.duration = Some(seconds);
        }
        if let Some(calories) = match_calories(line) {
            workout.calories = Some(calories);
        }
    }

    /// Close any open workout and return everything assembled, in the order
    /// the workouts were opened.
    pub fn finish(mut self) -> Vec<WorkoutRecord> {
        self.close_open_workout();
        self.finished
    }

    fn close_open_workout(&mut self) {
        if let State::WorkoutOpen(workout) =
            std::mem::replace(&mut self.state, State::NoOpenWorkout)
        {
            debug!(
                id = %workout.id,
                exercises = workout.exercises.len(),
                "Workout closed"
            );
            self.finished.push(workout);
        }
    }
}

impl Default for WorkoutAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble workouts from every line of `text`.
#[instrument(skip_all, fields(lines = text.lines().count()))]
pub fn assemble_workouts(text: &str) -> Vec<WorkoutRecord> {
    let mut assembler = WorkoutAssembler::new();
    for line in text.lines() {
        assembler.feed_line(line);
    }
    let workouts = assembler.finish();
    debug!(workouts = workouts.len(), "Assembly complete");
    workouts
}

#[cfg(test)]
mod tests {
    use super::*;
    use trainwerk_core::{SetRecord, WorkoutType};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_and_type_then_exercise_then_duration() {
        let text = "12/03/2024 musculation\n\
                    Développé couché - 3 séries 10 reps 40kg\n\
                    durée: 45 min";
        let workouts = assemble_workouts(text);
        assert_eq!(workouts.len(), 1);

        let workout = &workouts[0];
        assert_eq!(workout.workout_type, WorkoutType::Strength);
        assert_eq!(workout.date, Some(ymd(2024, 3, 12)));
        assert_eq!(workout.duration, Some(2700));
        assert_eq!(workout.exercises.len(), 1);

        let exercise = &workout.exercises[0];
        assert_eq!(exercise.name, "Développé Couché");
        assert_eq!(exercise.id.0, "workout-001-ex-01");
        let expected = SetRecord {
            reps: Some(10),
            weight: Some(40.0),
            rest_time: None,
        };
        assert_eq!(exercise.sets, vec![expected; 3]);
    }

    #[test]
    fn type_switch_closes_previous_workout() {
        let workouts = assemble_workouts("cardio\ncalories: 300\nmusculation\ncalories: 450");
        assert_eq!(workouts.len(), 2);
        assert_eq!(workouts[0].workout_type, WorkoutType::Cardio);
        assert_eq!(workouts[0].calories, Some(300));
        assert_eq!(workouts[1].workout_type, WorkoutType::Strength);
        assert_eq!(workouts[1].calories, Some(450));
        assert_eq!(workouts[0].id.0, "workout-001");
        assert_eq!(workouts[1].id.0, "workout-002");
    }

    #[test]
    fn lines_before_any_workout_are_ignored() {
        let workouts = assemble_workouts("Squat 3x10 60kg\ncalories: 200\nnatation\n");
        assert_eq!(workouts.len(), 1);
        assert!(workouts[0].exercises.is_empty());
        assert_eq!(workouts[0].calories, None);
    }

    #[test]
    fn date_is_sticky_until_replaced() {
        let text = "Semaine du 04/03/2024\ncourse\nvélo\n11/03/2024\nnatation";
        let workouts = assemble_workouts(text);
        let dates: Vec<_> = workouts.iter().map(|w| w.date).collect();
        assert_eq!(
            dates,
            vec![
                Some(ymd(2024, 3, 4)),
                Some(ymd(2024, 3, 4)),
                Some(ymd(2024, 3, 11))
            ]
        );
    }

    #[test]
    fn workout_without_date() {
        let workouts = assemble_workouts("yoga\ndurée 1h");
        assert_eq!(workouts[0].date, None);
        assert_eq!(workouts[0].duration, Some(3600));
    }

    #[test]
    fn header_line_sets_duration_but_is_not_an_exercise() {
        let workouts = assemble_workouts("Natation - durée: 45 min");
        assert!(workouts[0].exercises.is_empty());
        assert_eq!(workouts[0].duration, Some(2700));
    }

    #[test]
    fn later_measure_lines_overwrite() {
        let workouts = assemble_workouts("cardio\ncalories: 300\n520 kcal");
        assert_eq!(workouts[0].calories, Some(520));
    }

    #[test]
    fn note_lines_attach_to_open_workout() {
        let workouts = assemble_workouts("musculation\nRemarque: épaule fragile\nSquat 3x5 100kg");
        assert_eq!(workouts[0].notes, vec!["épaule fragile".to_string()]);
        assert_eq!(workouts[0].exercises.len(), 1);
    }

    #[test]
    fn exercises_numbered_within_workout() {
        let workouts =
            assemble_workouts("musculation\nSquat 3x10\nFentes 3x12\ncardio\nBurpees 4x15");
        let ids: Vec<_> = workouts
            .iter()
            .flat_map(|w| w.exercises.iter().map(|e| e.id.0.clone()))
            .collect();
        assert_eq!(
            ids,
            vec!["workout-001-ex-01", "workout-001-ex-02", "workout-002-ex-01"]
        );
    }

    #[test]
    fn assembler_is_deterministic() {
        let text = "12/03/2024 musculation\nSquat 3x10 60kg\ndurée: 45 min\n\
                    cardio\ncalories: 300\n13/03/2024\nyoga\nnote: détente";
        assert_eq!(assemble_workouts(text), assemble_workouts(text));
    }

    #[test]
    fn set_count_matches_synthesized_sets() {
        let text = "musculation\nSquat 5x5 100kg\nPompes - 4 séries 20 reps\n\
                    Tractions 12 reps\nDips: 3 sets";
        for workout in assemble_workouts(text) {
            for exercise in &workout.exercises {
                let expected = match exercise.name.as_str() {
                    "Squat" => 5,
                    "Pompes" => 4,
                    "Tractions" => 0,
                    "Dips" => 3,
                    other => panic!("unexpected exercise {other}"),
                };
                assert_eq!(exercise.sets.len(), expected, "{}", exercise.name);
            }
        }
    }

    #[test]
    fn exercise_and_date_on_one_line_both_apply() {
        let workouts = assemble_workouts("musculation\nSquat 3x10 60kg 12/03/2024");
        assert_eq!(workouts[0].exercises.len(), 1);
        assert_eq!(workouts[0].exercises[0].name, "Squat");
        assert_eq!(workouts[0].exercises[0].sets.len(), 3);
        assert_eq!(workouts[0].date, Some(ymd(2024, 3, 12)));
    }

    #[test]
    fn dated_workout_keeps_its_date() {
        let workouts = assemble_workouts("04/03/2024 musculation\nSquat 3x10 11/03/2024\ncourse");
        assert_eq!(workouts[0].date, Some(ymd(2024, 3, 4)));
        assert_eq!(workouts[1].date, Some(ymd(2024, 3, 11)));
    }

    #[test]
    fn note_line_still_sets_measures() {
        let workouts = assemble_workouts("cardio\nNote: séance dure, 400 kcal");
        assert_eq!(workouts[0].notes, vec!["séance dure, 400 kcal".to_string()]);
        assert_eq!(workouts[0].calories, Some(400));
        assert!(workouts[0].exercises.is_empty());
    }

    #[test]
    fn metric_and_calendar_lines_are_not_exercises() {
        let text = "musculation\nVO2max: 45\nMuscle mass 30 kg\nIndice de masse corporelle 23\n\
                    Hauteur 180\nLean mass 60 kg\nBodyfat 18 %\nLundi 4 mars\nSquat 3x10";
        let workouts = assemble_workouts(text);
        let names: Vec<_> = workouts[0].exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Squat"]);
    }

    #[test]
    fn rowing_exercise_stays_in_strength_session() {
        let workouts = assemble_workouts("musculation\nRowing haltère 3x10\nSquat 3x8");
        assert_eq!(workouts.len(), 1);
        assert_eq!(workouts[0].workout_type, WorkoutType::Strength);
        assert_eq!(workouts[0].exercises.len(), 2);
    }

    #[test]
    fn rest_time_is_not_workout_duration() {
        let workouts = assemble_workouts("musculation\nrest time: 90\ndurée: 50 min");
        assert_eq!(workouts[0].duration, Some(3000));

        let workouts = assemble_workouts("musculation\nrest time: 90");
        assert_eq!(workouts[0].duration, None);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(assemble_workouts("").is_empty());
        assert!(assemble_workouts("\n\n   \n").is_empty());
    }
}
