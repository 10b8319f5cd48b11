// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Workout-type vocabulary: one keyword list per type tag, French and English.
// Table order is match priority.

use std::sync::LazyLock;

use regex::Regex;
use trainwerk_core::WorkoutType;

use super::compile;

/// Keywords per workout type, in match priority order.
///
/// Specific disciplines come before the generic `cardio` bucket so that
/// "cardio HIIT" is an interval session.
pub const WORKOUT_KEYWORDS: &[(WorkoutType, &[&str])] = &[
    (
        WorkoutType::Interval,
        &["hiit", "fractionné", "fractionne", "interval", "intervalles", "tabata"],
    ),
    (
        WorkoutType::Strength,
        &[
            "musculation",
            "muscu",
            "renforcement",
            "haltérophilie",
            "halterophilie",
            "strength",
            "weightlifting",
            "weight training",
        ],
    ),
    (
        WorkoutType::Running,
        &["course à pied", "course", "footing", "jogging", "running", "run", "trail"],
    ),
    (
        WorkoutType::Cycling,
        &["vélo", "velo", "cyclisme", "vtt", "spinning", "cycling", "bike"],
    ),
    (
        WorkoutType::Swimming,
        &["natation", "piscine", "nage", "swimming", "swim"],
    ),
    (
        WorkoutType::Flexibility,
        &[
            "yoga",
            "pilates",
            "stretching",
            "étirements",
            "etirements",
            "souplesse",
            "mobilité",
            "mobilite",
            "flexibility",
        ],
    ),
    (
        WorkoutType::Combat,
        &[
            "boxe", "boxing", "kickboxing", "mma", "judo", "karaté", "karate", "jiu-jitsu", "lutte",
            "combat",
        ],
    ),
    (
        WorkoutType::Climbing,
        &["escalade", "bouldering", "climbing"],
    ),
    (
        WorkoutType::TeamSport,
        &[
            "football",
            "basket",
            "basketball",
            "handball",
            "volley",
            "volleyball",
            "rugby",
            "sport collectif",
            "team sport",
        ],
    ),
    (
        WorkoutType::Cardio,
        &["cardio", "elliptique", "elliptical", "aérobic", "aerobic"],
    ),
];

static WORKOUT_PATTERNS: LazyLock<Vec<(WorkoutType, Regex)>> = LazyLock::new(|| {
    WORKOUT_KEYWORDS
        .iter()
        .filter_map(|(workout_type, keywords)| {
            compile(&keyword_pattern(keywords)).map(|re| (*workout_type, re))
        })
        .collect()
});

/// Case-insensitive whole-word alternation over `keywords`.
pub fn keyword_pattern(keywords: &[&str]) -> String {
    let alternation: Vec<String> = keywords.iter().map(|kw| regex::escape(kw)).collect();
    format!(r"(?i)\b(?:{})\b", alternation.join("|"))
}

/// The workout type a line announces. First entry in table order wins.
pub fn match_workout_type(line: &str) -> Option<WorkoutType> {
    WORKOUT_PATTERNS
        .iter()
        .find(|(_, re)| re.is_match(line))
        .map(|(workout_type, _)| *workout_type)
}
