// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for people uploading their fitness reports.
//
// Every technical error is mapped to plain English with a clear suggestion.
// The severity drives how the caller presents it.

use crate::error::ExtractionError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary problem, trying again may work.
    Transient,
    /// The user must do something (re-scan, pick another file).
    ActionRequired,
    /// Retrying the same file will not help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the caller may retry automatically.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert an `ExtractionError` into a `HumanError`.
pub fn humanize_error(err: &ExtractionError) -> HumanError {
    match err {
        ExtractionError::TextLayer(_) => HumanError {
            message: "This document has no selectable text.".into(),
            suggestion: "We read it as a scan instead. Results may be less precise than for a digital export.".into(),
            retriable: false,
            severity: Severity::Transient,
        },

        ExtractionError::Rasterize(_) => HumanError {
            message: "We couldn't open the pages of this document.".into(),
            suggestion: "The file may be damaged. Try exporting it again as a PDF, then upload the new file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ExtractionError::Enhance(_) | ExtractionError::Recognize(_) => HumanError {
            message: "Text recognition didn't work on this scan.".into(),
            suggestion: "Try scanning the report again with better lighting, making sure the text is clear and in focus.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        ExtractionError::UnsupportedDocument(detail) => HumanError {
            message: "This type of document isn't supported.".into(),
            suggestion: format!("Upload a PDF or a photo (PNG, JPEG, TIFF) of your report. (File type: {detail})"),
            retriable: false,
            severity: Severity::Permanent,
        },

        ExtractionError::NoText => HumanError {
            message: "We couldn't find any text in this document.".into(),
            suggestion: "Check that the file is your fitness report and that the pages are not blank, then try again.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        ExtractionError::Timeout { .. } => HumanError {
            message: "Reading this document took too long.".into(),
            suggestion: "Large scans take a while. Try again, or upload only the pages with your workouts.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ExtractionError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try uploading it again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the server's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        ExtractionError::Serialization(_) => HumanError {
            message: "We had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
