// XPress Testdata - Capture manifest
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Manifest for describing pre-generated captures.
//!
//! Manifests record what a capture contains and what the preparation is
//! expected to do with it.

use crate::scenario::Capture;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Manifest error types.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Expected placement of the reference curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedPlacement {
    Contained,
    Appended,
}

/// Capture manifest describing a pre-generated raw file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureManifest {
    /// Capture name (matches filename without extension).
    pub name: String,
    pub description: String,
    /// Raw rows in the process window.
    pub main_samples: usize,
    /// Raw rows of the reference stroke.
    pub reference_samples: usize,
    /// Stroke counters present in the window.
    pub strokes: Vec<i64>,
    pub reference_stroke: i64,
    pub expected_placement: ExpectedPlacement,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Random seed used.
    pub seed: u64,
}

impl CaptureManifest {
    /// Describe `capture`.
    pub fn from_capture(capture: &Capture) -> Self {
        let mut strokes: Vec<i64> = capture.main.iter().map(|s| s.state.stroke_id).collect();
        strokes.sort_unstable();
        strokes.dedup();

        let expected_placement = if capture.scenario.expects_contained_reference() {
            ExpectedPlacement::Contained
        } else {
            ExpectedPlacement::Appended
        };

        Self {
            name: capture.name().to_string(),
            description: format!("{:?} scenario", capture.scenario),
            main_samples: capture.main.len(),
            reference_samples: capture.reference.len(),
            strokes,
            reference_stroke: capture.reference_stroke,
            expected_placement,
            generated_at: Utc::now(),
            seed: capture.seed,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to JSON file.
    pub fn to_json_file(&self, path: impl AsRef<std::path::Path>) -> Result<(), ManifestError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load from JSON file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self, ManifestError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
