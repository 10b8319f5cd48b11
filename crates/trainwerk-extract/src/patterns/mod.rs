// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Entity extraction engine: independent pattern libraries, each a pure
// function of text. Dates and metrics are scanned over the whole document;
// workout types, exercises, and measures are matched line by line by the
// assembler.

pub mod dates;
pub mod exercises;
pub mod measures;
pub mod metrics;
pub mod workout_types;

use chrono::{DateTime, Utc};
use regex::Regex;
use trainwerk_core::{DateCandidate, MetricRecord};
use tracing::{debug, instrument, warn};

/// Compile a built-in pattern. An invalid pattern is logged and disabled
/// rather than aborting the run.
pub(crate) fn compile(pattern: &str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(pattern, %err, "Disabling invalid pattern");
            None
        }
    }
}

/// Parse a captured number, accepting `.` or `,` as the decimal separator.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().replace(',', ".").parse().ok()?;
    value.is_finite().then_some(value)
}

/// Parse a captured number as a non-negative whole count, rounding decimals.
pub(crate) fn parse_count(raw: &str) -> Option<u32> {
    let value = parse_number(raw)?;
    if value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.round() as u32)
}

/// Document-wide entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entities {
    pub dates: Vec<DateCandidate>,
    pub metrics: Vec<MetricRecord>,
}

/// Scan the whole text for dates and metrics.
///
/// `timestamp` is stamped on every metric found.
#[instrument(skip_all, fields(chars = text.len()))]
pub fn scan_entities(text: &str, timestamp: DateTime<Utc>) -> Entities {
    let entities = Entities {
        dates: dates::find_dates(text),
        metrics: metrics::find_metrics(text, timestamp),
    };
    debug!(
        dates = entities.dates.len(),
        metrics = entities.metrics.len(),
        "Entities scanned"
    );
    entities
}
