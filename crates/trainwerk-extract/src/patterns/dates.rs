// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Date patterns: numeric day/month/year and year/month/day with `/`, `-` or
// `.` separators, plus bare French and English weekday and month names.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use trainwerk_core::DateCandidate;

use super::compile;

/// Display format for parsed dates.
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y";

static DAY_MONTH_YEAR: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"\b(\d{1,2})[/.\-](\d{1,2})[/.\-](\d{4}|\d{2})\b"));

static YEAR_MONTH_DAY: LazyLock<Option<Regex>> =
    LazyLock::new(|| compile(r"\b(\d{4})[/.\-](\d{1,2})[/.\-](\d{1,2})\b"));

static CALENDAR_NAME: LazyLock<Option<Regex>> = LazyLock::new(|| {
    compile(concat!(
        r"(?i)\b(?:",
        r"lundi|mardi|mercredi|jeudi|vendredi|samedi|dimanche|",
        r"monday|tuesday|wednesday|thursday|friday|saturday|sunday|",
        r"janvier|février|fevrier|mars|avril|mai|juin|juillet|août|aout|",
        r"septembre|octobre|novembre|décembre|decembre|",
        r"january|february|march|april|june|july|august|september|october|november|december",
        r")\b"
    ))
});

#[derive(Debug, Clone, Copy)]
enum Order {
    DayMonthYear,
    YearMonthDay,
}

/// Every date-like span in `text`, in text order.
///
/// Numeric matches that are not real calendar dates are dropped. Where two
/// patterns overlap, the one starting first wins.
pub fn find_dates(text: &str) -> Vec<DateCandidate> {
    date_spans(text).into_iter().map(|(_, candidate)| candidate).collect()
}

/// `line` with every date span, calendar names included, replaced by spaces.
/// Byte offsets of the remaining text are unchanged.
pub fn blank_dates(line: &str) -> String {
    let mut blanked = String::with_capacity(line.len());
    let mut cursor = 0;
    for (range, _) in date_spans(line) {
        blanked.push_str(&line[cursor..range.start]);
        blanked.extend(std::iter::repeat_n(' ', range.len()));
        cursor = range.end;
    }
    blanked.push_str(&line[cursor..]);
    blanked
}

fn date_spans(text: &str) -> Vec<(Range<usize>, DateCandidate)> {
    let mut spans: Vec<(Range<usize>, DateCandidate)> = Vec::new();

    for (pattern, order) in [
        (&*DAY_MONTH_YEAR, Order::DayMonthYear),
        (&*YEAR_MONTH_DAY, Order::YearMonthDay),
    ] {
        let Some(re) = pattern else { continue };
        for caps in re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            let (Some(a), Some(b), Some(c)) = (caps.get(1), caps.get(2), caps.get(3)) else {
                continue;
            };
            let parsed = match order {
                Order::DayMonthYear => numeric_date(c.as_str(), b.as_str(), a.as_str()),
                Order::YearMonthDay => numeric_date(a.as_str(), b.as_str(), c.as_str()),
            };
            if let Some(date) = parsed {
                spans.push((whole.range(), parsed_candidate(whole.as_str(), date)));
            }
        }
    }

    if let Some(re) = &*CALENDAR_NAME {
        for m in re.find_iter(text) {
            spans.push((
                m.range(),
                DateCandidate {
                    original: m.as_str().to_string(),
                    parsed: None,
                    formatted: m.as_str().to_string(),
                },
            ));
        }
    }

    spans.sort_by_key(|(range, _)| range.start);
    let mut kept = Vec::with_capacity(spans.len());
    let mut covered_until = 0usize;
    for (range, candidate) in spans {
        if range.start < covered_until {
            continue;
        }
        covered_until = range.end;
        kept.push((range, candidate));
    }
    kept
}

/// The first real calendar date on `line`, if any.
pub fn first_date(line: &str) -> Option<NaiveDate> {
    find_dates(line)
        .into_iter()
        .find_map(|candidate| candidate.parsed.map(|instant| instant.date_naive()))
}

/// Two-digit years are read as 20xx.
fn numeric_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
}

fn parsed_candidate(original: &str, date: NaiveDate) -> DateCandidate {
    DateCandidate {
        original: original.to_string(),
        parsed: Some(date.and_time(NaiveTime::MIN).and_utc()),
        formatted: date.format(DISPLAY_FORMAT).to_string(),
    }
}
