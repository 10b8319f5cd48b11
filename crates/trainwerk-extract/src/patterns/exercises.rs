// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Exercise-line patterns. Four line shapes are tried in order and the first
// that matches is used:
//
//   (a) `Exercice: Squat 4x8 80kg`        explicit label
//   (b) `Développé couché - 3 séries ...` word phrase, then a number
//   (c) `3x10 40kg squat`                 sets x reps, optional weight, name
//   (d) `(A) Curl - 3 séries 12 reps`     anything, dash, set/rep count
//
// Set, rep, weight, and rest details are then read from the remainder. Date
// spans are blanked out first, so a dated exercise line still matches.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use trainwerk_core::SetRecord;

use super::dates::blank_dates;
use super::metrics::METRIC_PATTERNS;
use super::{compile, parse_count, parse_number};

/// Set counts above this are not believed.
pub const MAX_SET_COUNT: u32 = 50;

/// Leading labels that mark a line as a measure rather than an exercise.
/// Every metric label in [`METRIC_PATTERNS`] is reserved as well.
pub const RESERVED_LABELS: &[&str] = &[
    "durée", "duree", "duration", "temps", "time", "calories", "calorie", "kcal", "cal", "poids",
    "weight", "imc", "bmi", "taille", "height", "masse", "graisse", "body", "fc", "fréquence",
    "frequence", "pouls", "pulse", "heart", "vo2", "vo2max", "date", "page", "note", "notes",
    "remarque", "commentaire", "comment", "séance", "seance", "session", "semaine", "week",
    "total", "repos", "rest", "distance",
];

static LABELLED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)^\s*(?:exercice|exercise|exo)\s*:\s*(?P<name>[^\d]+?)\s*(?P<details>(?:\d.*)?)$")
});

static NAME_THEN_NUMBER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"^\s*(?P<name>\p{L}[\p{L}'’\s\-]*?)\s*[:\-–]?\s*(?P<details>\d.*)$")
});

static SETS_BY_REPS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)^\s*(?P<sets>\d+)\s*[x×*]\s*(?P<reps>\d+)",
        r"(?:\s*(?:@\s*)?(?P<weight>\d+(?:[.,]\d+)?)\s*(?P<unit>kgs?|lbs?))?",
        r"\s+(?P<name>\p{L}.*)$"
    ))
});

static NAME_DASH_SETS: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)^\s*(?P<name>.+?)\s+[-–]\s+",
        r"(?P<details>\d+\s*(?:séries?|series?|sets?|reps?|répétitions?|repetitions?|x).*)$"
    ))
});

static SETS_X_REPS: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)(\d+)\s*[x×*]\s*(\d+)"));

static SET_COUNT: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)(\d+)\s*(?:séries|série|series|serie|sets|set)\b"));

static REP_COUNT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)(\d+)\s*(?:répétitions|répétition|repetitions|repetition|reps|rep|rép)\b")
});

static WEIGHT: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)(\d+(?:[.,]\d+)?)\s*(kgs|kg|lbs|lb)\b"));

static REST: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)\b(?:repos|rest|récupération|recuperation|récup|recup)\s*:?\s*(\d+)\s*(min|mn|sec|s)?\b")
});

/// Which line shape produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseShape {
    Labelled,
    NameThenNumber,
    SetsByReps,
    NameDashSets,
}

/// An exercise recognised on one line, before it is given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseMatch {
    pub shape: ExerciseShape,
    pub name: String,
    pub sets: Vec<SetRecord>,
    pub notes: Vec<String>,
}

/// Details read from the text around an exercise name.
#[derive(Debug, Clone, Default, PartialEq)]
struct SetDetails {
    sets: Option<u32>,
    reps: Option<u32>,
    weight: Option<(f64, String)>,
    rest: Option<u32>,
}

/// Match `line` against the four exercise shapes.
///
/// Dates and weekday or month names are ignored. Lines or names that start
/// with a reserved label (`durée`, `calories`, `IMC`, `VO2max`, ...) are
/// never exercises.
pub fn match_exercise(line: &str) -> Option<ExerciseMatch> {
    let line = blank_dates(line);
    if line.trim().is_empty() || starts_with_reserved_label(&line) {
        return None;
    }

    let (shape, raw_name, details) = match_shape(&line)?;
    let name = clean_name(&raw_name);
    if name.is_empty() || starts_with_reserved_label(&name) {
        return None;
    }

    let (sets, notes) = details.into_records();
    Some(ExerciseMatch {
        shape,
        name,
        sets,
        notes,
    })
}

fn match_shape(line: &str) -> Option<(ExerciseShape, String, SetDetails)> {
    if let Some(caps) = captures(&LABELLED, line) {
        return Some((
            ExerciseShape::Labelled,
            group(&caps, "name").to_string(),
            parse_details(group(&caps, "details")),
        ));
    }
    if let Some(caps) = captures(&NAME_THEN_NUMBER, line) {
        return Some((
            ExerciseShape::NameThenNumber,
            group(&caps, "name").to_string(),
            parse_details(group(&caps, "details")),
        ));
    }
    if let Some(caps) = captures(&SETS_BY_REPS, line) {
        let name = group(&caps, "name");
        let mut details = parse_details(name);
        details.sets = parse_count(group(&caps, "sets"));
        details.reps = parse_count(group(&caps, "reps"));
        if let Some(weight) = parse_number(group(&caps, "weight")) {
            details.weight = Some((weight, group(&caps, "unit").to_lowercase()));
        }
        return Some((ExerciseShape::SetsByReps, name.to_string(), details));
    }
    if let Some(caps) = captures(&NAME_DASH_SETS, line) {
        return Some((
            ExerciseShape::NameDashSets,
            group(&caps, "name").to_string(),
            parse_details(group(&caps, "details")),
        ));
    }
    None
}

fn captures<'t>(pattern: &LazyLock<Option<Regex>>, text: &'t str) -> Option<Captures<'t>> {
    pattern.as_ref()?.captures(text)
}

fn group<'t>(caps: &Captures<'t>, name: &str) -> &'t str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn parse_details(text: &str) -> SetDetails {
    let mut details = SetDetails::default();

    if let Some(caps) = captures(&SETS_X_REPS, text) {
        details.sets = caps.get(1).and_then(|m| parse_count(m.as_str()));
        details.reps = caps.get(2).and_then(|m| parse_count(m.as_str()));
    } else {
        details.sets = first_count(&SET_COUNT, text);
        details.reps = first_count(&REP_COUNT, text);
    }

    if let Some(caps) = captures(&WEIGHT, text) {
        let value = caps.get(1).and_then(|m| parse_number(m.as_str()));
        let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
        if let (Some(value), Some(unit)) = (value, unit) {
            details.weight = Some((value, unit));
        }
    }

    if let Some(caps) = captures(&REST, text) {
        let amount = caps.get(1).and_then(|m| parse_count(m.as_str()));
        let minutes = caps
            .get(2)
            .is_some_and(|m| matches!(m.as_str().to_lowercase().as_str(), "min" | "mn"));
        details.rest = amount.map(|n| if minutes { n.saturating_mul(60) } else { n });
    }

    details
}

fn first_count(pattern: &LazyLock<Option<Regex>>, text: &str) -> Option<u32> {
    captures(pattern, text)?
        .get(1)
        .and_then(|m| parse_count(m.as_str()))
}

impl SetDetails {
    /// One identical set per counted set. Without a believable set count the
    /// details are kept as notes instead.
    fn into_records(self) -> (Vec<SetRecord>, Vec<String>) {
        match self.sets {
            Some(count) if (1..=MAX_SET_COUNT).contains(&count) => {
                let set = SetRecord {
                    reps: self.reps,
                    weight: self.weight.map(|(value, _)| value),
                    rest_time: self.rest,
                };
                (vec![set; count as usize], Vec::new())
            }
            _ => {
                let mut notes = Vec::new();
                if let Some(reps) = self.reps {
                    notes.push(format!("{reps} reps"));
                }
                if let Some((value, unit)) = self.weight {
                    notes.push(format!("{value} {unit}"));
                }
                if let Some(rest) = self.rest {
                    notes.push(format!("rest {rest}s"));
                }
                (Vec::new(), notes)
            }
        }
    }
}

/// Strip punctuation and title-case each word. Leading list numbers are
/// dropped.
pub fn clean_name(raw: &str) -> String {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .skip_while(|word| word.chars().all(|c| c.is_ascii_digit()))
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Whether `text`, past any leading punctuation, begins with a reserved or
/// metric label as a whole word.
fn starts_with_reserved_label(text: &str) -> bool {
    let text = text
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    RESERVED_LABELS
        .iter()
        .chain(METRIC_PATTERNS.iter().flat_map(|pattern| pattern.labels.iter()))
        .any(|label| {
            text.strip_prefix(label)
                .is_some_and(|rest| !rest.starts_with(char::is_alphanumeric))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(reps: Option<u32>, weight: Option<f64>) -> SetRecord {
        SetRecord {
            reps,
            weight,
            rest_time: None,
        }
    }

    #[test]
    fn patterns_compile() {
        for pattern in [
            &LABELLED,
            &NAME_THEN_NUMBER,
            &SETS_BY_REPS,
            &NAME_DASH_SETS,
            &SETS_X_REPS,
            &SET_COUNT,
            &REP_COUNT,
            &WEIGHT,
            &REST,
        ] {
            assert!(pattern.is_some());
        }
    }

    #[test]
    fn name_dash_series_reps_weight() {
        let ex = match_exercise("Développé couché - 3 séries 10 reps 40kg").unwrap();
        assert_eq!(ex.shape, ExerciseShape::NameThenNumber);
        assert_eq!(ex.name, "Développé Couché");
        assert_eq!(ex.sets, vec![set(Some(10), Some(40.0)); 3]);
        assert!(ex.notes.is_empty());
    }

    #[test]
    fn labelled_exercise() {
        let ex = match_exercise("Exercice: squat barre 4x8 80kg").unwrap();
        assert_eq!(ex.shape, ExerciseShape::Labelled);
        assert_eq!(ex.name, "Squat Barre");
        assert_eq!(ex.sets, vec![set(Some(8), Some(80.0)); 4]);
    }

    #[test]
    fn labelled_exercise_without_details() {
        let ex = match_exercise("exercise: Plank").unwrap();
        assert_eq!(ex.name, "Plank");
        assert!(ex.sets.is_empty());
        assert!(ex.notes.is_empty());
    }

    #[test]
    fn sets_by_reps_with_weight_then_name() {
        let ex = match_exercise("3x10 40kg squat").unwrap();
        assert_eq!(ex.shape, ExerciseShape::SetsByReps);
        assert_eq!(ex.name, "Squat");
        assert_eq!(ex.sets, vec![set(Some(10), Some(40.0)); 3]);

        let ex = match_exercise("4 × 12 fentes marchées").unwrap();
        assert_eq!(ex.name, "Fentes Marchées");
        assert_eq!(ex.sets, vec![set(Some(12), None); 4]);
    }

    #[test]
    fn name_dash_sets_fallback_shape() {
        let ex = match_exercise("(A) Curl biceps - 3 séries 12 reps").unwrap();
        assert_eq!(ex.shape, ExerciseShape::NameDashSets);
        assert_eq!(ex.name, "A Curl Biceps");
        assert_eq!(ex.sets.len(), 3);
    }

    #[test]
    fn rest_time_is_carried_on_each_set() {
        let ex = match_exercise("Tractions: 4 sets 8 reps repos 2 min").unwrap();
        assert_eq!(ex.sets.len(), 4);
        assert!(ex.sets.iter().all(|s| s.rest_time == Some(120)));

        let ex = match_exercise("Dips 3x12 rest 90s").unwrap();
        assert!(ex.sets.iter().all(|s| s.rest_time == Some(90)));
    }

    #[test]
    fn details_without_set_count_become_notes() {
        let ex = match_exercise("Pompes 20 reps").unwrap();
        assert!(ex.sets.is_empty());
        assert_eq!(ex.notes, vec!["20 reps".to_string()]);

        let ex = match_exercise("Soulevé de terre 100 kg").unwrap();
        assert!(ex.sets.is_empty());
        assert_eq!(ex.notes, vec!["100 kg".to_string()]);
    }

    #[test]
    fn implausible_set_count_is_ignored() {
        let ex = match_exercise("Corde à sauter - 200 séries").unwrap();
        assert!(ex.sets.is_empty());
    }

    #[test]
    fn reserved_labels_are_not_exercises() {
        for line in [
            "durée: 45 min",
            "calories: 300",
            "IMC: 23.5",
            "Poids: 74.2 kg",
            "Page 2",
            "Note: 3x10 facile",
        ] {
            assert_eq!(match_exercise(line), None, "{line}");
        }
    }

    #[test]
    fn date_only_lines_are_not_exercises() {
        assert_eq!(match_exercise("Séance du 12/03/2024"), None);
        assert_eq!(match_exercise("Bilan 12/03/2024"), None);
        assert_eq!(match_exercise("2024-03-12"), None);
    }

    #[test]
    fn dated_exercise_line_still_matches() {
        let ex = match_exercise("Squat 3x10 60kg 12/03/2024").unwrap();
        assert_eq!(ex.name, "Squat");
        assert_eq!(ex.sets, vec![set(Some(10), Some(60.0)); 3]);

        let ex = match_exercise("12/03/2024 Fentes 3x12").unwrap();
        assert_eq!(ex.name, "Fentes");
        assert_eq!(ex.sets.len(), 3);
    }

    #[test]
    fn every_metric_label_is_reserved() {
        for pattern in METRIC_PATTERNS {
            for label in pattern.labels {
                let line = format!("{label}: 45");
                assert_eq!(match_exercise(&line), None, "{line}");
                let line = format!("{label} 30 kg");
                assert_eq!(match_exercise(&line), None, "{line}");
            }
        }
    }

    #[test]
    fn metric_lines_are_not_exercises() {
        for line in [
            "VO2max: 45",
            "Muscle mass 30 kg",
            "Indice de masse corporelle 23",
            "Hauteur 180",
            "Lean mass 60 kg",
            "Bodyfat 18 %",
            "- IMC 23.5",
        ] {
            assert_eq!(match_exercise(line), None, "{line}");
        }
    }

    #[test]
    fn calendar_names_are_not_exercises() {
        for line in ["Lundi 4 mars", "Sunday 10", "Février 2024", "mardi - 3 séries"] {
            assert_eq!(match_exercise(line), None, "{line}");
        }
    }

    #[test]
    fn label_must_be_a_whole_word() {
        let ex = match_exercise("Calf raises 3x15").unwrap();
        assert_eq!(ex.name, "Calf Raises");
        let ex = match_exercise("Timed plank - 3 séries").unwrap();
        assert_eq!(ex.name, "Timed Plank");
    }

    #[test]
    fn plain_words_are_not_exercises() {
        assert_eq!(match_exercise("Bonne séance aujourd'hui"), None);
        assert_eq!(match_exercise(""), None);
        assert_eq!(match_exercise("--- page 2 ---"), None);
    }

    #[test]
    fn name_cleaning() {
        assert_eq!(clean_name("  rowing   (haltère) "), "Rowing Haltère");
        assert_eq!(clean_name("1. ÉCARTÉ couché"), "Écarté Couché");
        assert_eq!(clean_name("!!!"), "");
    }
}
