// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Trainwerk extraction pipeline.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ExtractionError;

/// Unique identifier for one extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractionId(pub Uuid);

impl ExtractionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ExtractionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ExtractionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a record inside one extraction result.
///
/// Derived from the record's position (`workout-001`, `workout-001-ex-02`,
/// `metric-003`) so that the same input always yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn workout(index: usize) -> Self {
        Self(format!("workout-{index:03}"))
    }

    pub fn exercise(workout: &RecordId, index: usize) -> Self {
        Self(format!("{}-ex-{index:02}", workout.0))
    }

    pub fn metric(index: usize) -> Self {
        Self(format!("metric-{index:03}"))
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Supported input document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentType {
    Pdf,
    Jpeg,
    Png,
    Tiff,
}

impl DocumentType {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Tiff => "image/tiff",
        }
    }

    /// Infer document type from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }

    /// Infer document type from the leading magic bytes.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        if header.starts_with(b"%PDF") {
            Some(Self::Pdf)
        } else if header.starts_with(b"\x89PNG") {
            Some(Self::Png)
        } else if header.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if header.starts_with(b"II*\0") || header.starts_with(b"MM\0*") {
            Some(Self::Tiff)
        } else {
            None
        }
    }

    /// Raster images have no text layer and are their own single page.
    pub fn is_image(&self) -> bool {
        !matches!(self, Self::Pdf)
    }
}

/// Closed vocabulary of workout categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutType {
    Cardio,
    Strength,
    Running,
    Cycling,
    Swimming,
    Flexibility,
    Interval,
    Combat,
    Climbing,
    TeamSport,
    Unknown,
}

impl WorkoutType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cardio => "cardio",
            Self::Strength => "strength",
            Self::Running => "running",
            Self::Cycling => "cycling",
            Self::Swimming => "swimming",
            Self::Flexibility => "flexibility",
            Self::Interval => "interval",
            Self::Combat => "combat",
            Self::Climbing => "climbing",
            Self::TeamSport => "team-sport",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body and fitness measurement categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    Bmi,
    Weight,
    Height,
    BodyFat,
    MuscleMass,
    Vo2Max,
    HeartRate,
    Other,
}

impl MetricType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bmi => "bmi",
            Self::Weight => "weight",
            Self::Height => "height",
            Self::BodyFat => "bodyFat",
            Self::MuscleMass => "muscleMass",
            Self::Vo2Max => "vo2Max",
            Self::HeartRate => "heartRate",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One set of an exercise. Values are stored as written; no unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetRecord {
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    /// Rest time in seconds.
    pub rest_time: Option<u32>,
}

/// An exercise inside a workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseRecord {
    pub id: RecordId,
    /// Title-cased, punctuation stripped.
    pub name: String,
    /// One entry per parsed set; empty when no set count was found.
    pub sets: Vec<SetRecord>,
    pub notes: Vec<String>,
}

/// A workout block recognised from a type keyword.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub workout_type: WorkoutType,
    pub date: Option<NaiveDate>,
    pub exercises: Vec<ExerciseRecord>,
    /// Duration in seconds.
    pub duration: Option<u32>,
    pub calories: Option<u32>,
    pub notes: Vec<String>,
}

impl WorkoutRecord {
    pub fn new(id: RecordId, workout_type: WorkoutType, date: Option<NaiveDate>) -> Self {
        Self {
            id,
            workout_type,
            date,
            exercises: Vec::new(),
            duration: None,
            calories: None,
            notes: Vec::new(),
        }
    }
}

/// A body or fitness measurement found anywhere in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub metric_type: MetricType,
    pub value: f64,
    pub unit: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A date-like span of text.
///
/// Weekday and month names without a full date are kept with `parsed: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateCandidate {
    pub original: String,
    pub parsed: Option<DateTime<Utc>>,
    /// `dd/mm/yyyy` for parsed dates, the original text otherwise.
    pub formatted: String,
}

/// First and last parsed date, formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub first: String,
    pub last: String,
}

/// Aggregates over one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub workout_count: usize,
    pub exercise_count: usize,
    pub metric_count: usize,
    pub date_range: Option<DateRange>,
    pub workout_types: Vec<WorkoutType>,
    pub metric_types: Vec<MetricType>,
}

/// Everything recovered from one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionData {
    /// Text from the document's own text layer.
    pub raw_text: String,
    /// Text from the OCR fallback, empty when it did not run.
    pub ocr_text: String,
    pub workouts: Vec<WorkoutRecord>,
    pub metrics: Vec<MetricRecord>,
    pub dates: Vec<DateCandidate>,
    pub summary: Summary,
}

/// The result envelope returned by `extract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub id: ExtractionId,
    pub filename: String,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    /// `None` when the run failed terminally.
    pub data: Option<ExtractionData>,
    /// `"<stage>: <message>"` for every recorded error, in order.
    pub errors: Vec<String>,
    /// The typed errors behind `errors`, index for index. Not transported.
    #[serde(skip)]
    pub causes: Vec<Arc<ExtractionError>>,
}

impl ExtractionResult {
    pub fn succeeded(
        filename: String,
        timestamp: DateTime<Utc>,
        data: ExtractionData,
        errors: Vec<ExtractionError>,
    ) -> Self {
        Self::with_errors(filename, timestamp, Some(data), errors)
    }

    pub fn failed(filename: String, timestamp: DateTime<Utc>, errors: Vec<ExtractionError>) -> Self {
        Self::with_errors(filename, timestamp, None, errors)
    }

    fn with_errors(
        filename: String,
        timestamp: DateTime<Utc>,
        data: Option<ExtractionData>,
        errors: Vec<ExtractionError>,
    ) -> Self {
        Self {
            id: ExtractionId::new(),
            filename,
            timestamp,
            success: data.is_some(),
            data,
            errors: errors.iter().map(ExtractionError::to_error_entry).collect(),
            causes: errors.into_iter().map(Arc::new).collect(),
        }
    }

    /// Plain nested-map form for transport.
    pub fn to_json_value(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
