// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metric patterns: labelled numeric values for body and fitness
// measurements, each with its accepted unit suffixes.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use trainwerk_core::{MetricRecord, MetricType, RecordId};

use super::{compile, parse_number};

/// How one metric type is written.
#[derive(Debug, Clone, Copy)]
pub struct MetricPattern {
    pub metric_type: MetricType,
    /// Labels, longest first where one is a prefix of another.
    pub labels: &'static [&'static str],
    /// Accepted unit suffixes. Empty for unitless metrics.
    pub units: &'static [&'static str],
}

pub const METRIC_PATTERNS: &[MetricPattern] = &[
    MetricPattern {
        metric_type: MetricType::Bmi,
        labels: &["indice de masse corporelle", "imc", "bmi"],
        units: &[],
    },
    MetricPattern {
        metric_type: MetricType::Weight,
        labels: &["poids corporel", "poids", "body weight", "weight"],
        units: &["kgs", "kg", "lbs", "lb"],
    },
    MetricPattern {
        metric_type: MetricType::Height,
        labels: &["taille", "height", "hauteur"],
        units: &["cm", "m"],
    },
    MetricPattern {
        metric_type: MetricType::BodyFat,
        labels: &[
            "masse grasse",
            "taux de graisse",
            "graisse corporelle",
            "body fat",
            "bodyfat",
        ],
        units: &["%"],
    },
    MetricPattern {
        metric_type: MetricType::MuscleMass,
        labels: &["masse musculaire", "masse maigre", "muscle mass", "lean mass"],
        units: &["kgs", "kg", "lbs", "lb", "%"],
    },
    MetricPattern {
        metric_type: MetricType::Vo2Max,
        labels: &["vo2 max", "vo2max", "vo₂max"],
        units: &["ml/kg/min", "ml/min/kg"],
    },
    MetricPattern {
        metric_type: MetricType::HeartRate,
        labels: &[
            "fréquence cardiaque",
            "frequence cardiaque",
            "heart rate",
            "fc repos",
            "fc max",
            "pouls",
            "pulse",
            "fc",
        ],
        units: &["bpm"],
    },
];

impl MetricPattern {
    /// `label [(...)] [:=] value [unit]`, case-insensitive.
    pub fn regex_source(&self) -> String {
        let labels: Vec<String> = self.labels.iter().map(|l| regex::escape(l)).collect();
        let mut source = format!(
            r"(?i)\b(?:{})\s*(?:\([^)]*\))?\s*[:=]?\s*(?P<value>\d+(?:[.,]\d+)?)",
            labels.join("|")
        );
        if !self.units.is_empty() {
            let units: Vec<String> = self.units.iter().map(|u| regex::escape(u)).collect();
            source.push_str(&format!(r"\s*(?P<unit>{})?", units.join("|")));
        }
        source.push_str(r"(?:[^\p{L}\d]|$)");
        source
    }
}

static COMPILED: LazyLock<Vec<(MetricType, Regex)>> = LazyLock::new(|| {
    METRIC_PATTERNS
        .iter()
        .filter_map(|pattern| compile(&pattern.regex_source()).map(|re| (pattern.metric_type, re)))
        .collect()
});

/// Every metric in `text`, in text order.
///
/// Each pattern scans the whole text independently; ids follow the final
/// order and every record carries `timestamp`.
pub fn find_metrics(text: &str, timestamp: DateTime<Utc>) -> Vec<MetricRecord> {
    let mut found: Vec<(usize, MetricType, f64, Option<String>)> = Vec::new();

    for (metric_type, re) in COMPILED.iter() {
        for caps in re.captures_iter(text) {
            let Some(value) = caps.name("value") else { continue };
            let Some(number) = parse_number(value.as_str()) else { continue };
            let unit = caps.name("unit").map(|u| u.as_str().to_lowercase());
            found.push((value.start(), *metric_type, number, unit));
        }
    }

    found.sort_by_key(|(position, _, _, _)| *position);
    found
        .into_iter()
        .enumerate()
        .map(|(index, (_, metric_type, value, unit))| MetricRecord {
            id: RecordId::metric(index + 1),
            metric_type,
            value,
            unit,
            timestamp,
        })
        .collect()
}
