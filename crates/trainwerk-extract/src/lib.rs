// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// trainwerk-extract: From raw report text to structured workout and metric
// records, plus the orchestrator that decides when OCR is needed.

pub mod assembler;
pub mod normalize;
pub mod patterns;
pub mod pipeline;
pub mod summary;

pub use assembler::{WorkoutAssembler, assemble_workouts};
pub use normalize::{Normalized, normalize};
pub use patterns::{Entities, scan_entities};
pub use pipeline::{Extractor, combine_texts, needs_ocr};
pub use summary::build_summary;
