// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-workout measures: duration, calories, and free-text note lines.

use std::sync::LazyLock;

use regex::Regex;

use super::{compile, parse_count, parse_number};

static DURATION_LABEL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)\b(?P<label>durée|duree|duration|temps total|total time|temps|time)\s*:?\s*(?P<value>\d.*)$")
});

/// Words that turn a duration label into a rest or recovery period.
const REST_QUALIFIERS: &[&str] = &[
    "rest", "repos", "recovery", "récupération", "recuperation", "récup", "recup",
];

static CLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"^(\d{1,3}):(\d{2})(?::(\d{2}))?\b"));

static HOURS_MINUTES: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)^(\d{1,2})\s*h\s*(\d{1,2})?\b"));

static AMOUNT_UNIT: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)^(\d+(?:[.,]\d+)?)\s*",
        r"(heures|heure|hours|hour|hrs|hr|minutes|minute|mins|min|mn|secondes|seconde|seconds|second|secs|sec|s)?\b"
    ))
});

static CALORIES_LABELLED: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)\b(?:calories|calorie|kcal|cal|dépense|depense)\s*:?\s*(\d+(?:[.,]\d+)?)")
});

static CALORIES_SUFFIXED: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:kcal|calories|cal)\b"));

static NOTE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(r"(?i)^\s*(?:notes|note|remarques|remarque|commentaires|commentaire|comments|comment)\s*:\s*(.+?)\s*$")
});

/// Duration in seconds from a labelled line (`durée: 45 min`).
///
/// Accepts `mm:ss`, `hh:mm:ss`, `1h30`, and a number with an optional unit;
/// a bare number is minutes. `rest time: 90` is a rest period, not a duration.
pub fn match_duration(line: &str) -> Option<u32> {
    let caps = DURATION_LABEL.as_ref()?.captures(line)?;
    let label = caps.name("label")?;
    if follows_rest_qualifier(&line[..label.start()]) {
        return None;
    }
    parse_duration(caps.name("value")?.as_str())
}

fn follows_rest_qualifier(before: &str) -> bool {
    before
        .split(|c: char| !c.is_alphanumeric())
        .rfind(|word| !word.is_empty())
        .is_some_and(|word| REST_QUALIFIERS.contains(&word.to_lowercase().as_str()))
}

/// Parse the value part of a duration.
pub fn parse_duration(value: &str) -> Option<u32> {
    let value = value.trim();

    if let Some(caps) = CLOCK.as_ref().and_then(|re| re.captures(value)) {
        let first: u32 = caps.get(1)?.as_str().parse().ok()?;
        let second: u32 = caps.get(2)?.as_str().parse().ok()?;
        return match caps.get(3) {
            Some(third) => {
                let third: u32 = third.as_str().parse().ok()?;
                Some(first * 3600 + second * 60 + third)
            }
            None => Some(first * 60 + second),
        };
    }

    if let Some(caps) = HOURS_MINUTES.as_ref().and_then(|re| re.captures(value)) {
        let hours: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minutes: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        return Some(hours * 3600 + minutes * 60);
    }

    let caps = AMOUNT_UNIT.as_ref()?.captures(value)?;
    let amount = parse_number(caps.get(1)?.as_str())?;
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
    let seconds_per_unit = match unit.as_deref() {
        Some(u) if u.starts_with('h') => 3600.0,
        Some(u) if u.starts_with('s') => 1.0,
        _ => 60.0,
    };
    let seconds = (amount * seconds_per_unit).round();
    (seconds <= f64::from(u32::MAX)).then_some(seconds as u32)
}

/// Calorie count from `calories: 300` or `450 kcal`.
pub fn match_calories(line: &str) -> Option<u32> {
    [&CALORIES_LABELLED, &CALORIES_SUFFIXED]
        .into_iter()
        .filter_map(|pattern| pattern.as_ref())
        .find_map(|re| {
            re.captures(line)
                .and_then(|caps| caps.get(1))
                .and_then(|m| parse_count(m.as_str()))
        })
}

/// The text of a `note:` / `remarque:` line.
pub fn match_note(line: &str) -> Option<String> {
    let caps = NOTE.as_ref()?.captures(line)?;
    Some(caps.get(1)?.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labelled_minutes() {
        assert_eq!(match_duration("durée: 45 min"), Some(2700));
        assert_eq!(match_duration("Duration 30"), Some(1800));
        assert_eq!(match_duration("Temps : 90 s"), Some(90));
    }

    #[test]
    fn clock_forms() {
        assert_eq!(match_duration("temps: 42:30"), Some(42 * 60 + 30));
        assert_eq!(match_duration("time 1:05:00"), Some(3900));
    }

    #[test]
    fn hours_forms() {
        assert_eq!(match_duration("durée 1h30"), Some(5400));
        assert_eq!(match_duration("durée: 2 h"), Some(7200));
        assert_eq!(match_duration("duration: 1.5 hours"), Some(5400));
    }

    #[test]
    fn unlabelled_or_unrelated_lines_have_no_duration() {
        assert_eq!(match_duration("45 min"), None);
        assert_eq!(match_duration("temps de repos: 60 s"), None);
        assert_eq!(match_duration("rest time: 90"), None);
        assert_eq!(match_duration("Recovery time 2:00"), None);
        assert_eq!(match_duration("Développé couché - 3 séries 10 reps 40kg"), None);
    }

    #[test]
    fn duration_label_after_other_words() {
        assert_eq!(match_duration("Natation - durée: 45 min"), Some(2700));
        assert_eq!(match_duration("Total time 1:05:00"), Some(3900));
    }

    #[test]
    fn calories_labelled_or_suffixed() {
        assert_eq!(match_calories("calories: 300"), Some(300));
        assert_eq!(match_calories("Dépense : 450 kcal"), Some(450));
        assert_eq!(match_calories("Total 520 kcal brûlées"), Some(520));
        assert_eq!(match_calories("3 séries 10 reps"), None);
    }

    #[test]
    fn note_lines() {
        assert_eq!(match_note("Remarque: genou sensible "), Some("genou sensible".into()));
        assert_eq!(match_note("notes : bonne forme"), Some("bonne forme".into()));
        assert_eq!(match_note("Notebook 3x10"), None);
    }
}
