// XPress Testdata - Capture scenarios
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Capture scenarios.
//!
//! A capture is what the operator would pull from the plant historian: a
//! process window plus one reference stroke, together with the parameter
//! file that selects them.

use crate::generator::{generate_stream, GeneratorConfig};
use crate::profile::PressProfile;
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use xpress::config::PARAMETER_TIMESTAMP_FORMAT;
use xpress::{write_samples, PrepConfig, Sample, DEFAULT_DELIMITER};

/// Stroke counter used for reference strokes recorded outside the window.
pub const GOLDEN_STROKE: i64 = 900_001;

/// Capture scenario types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaptureScenario {
    /// Reference stroke is one of the strokes inside the window.
    ReferenceInWindow,
    /// Reference stroke was recorded during an earlier shift.
    ReferenceFromEarlierShift,
    /// Long idle periods between strokes.
    IdleGaps,
    /// Historian delivers rows unordered, with controller glitches.
    ShuffledDelivery,
}

impl CaptureScenario {
    pub const ALL: [CaptureScenario; 4] = [
        CaptureScenario::ReferenceInWindow,
        CaptureScenario::ReferenceFromEarlierShift,
        CaptureScenario::IdleGaps,
        CaptureScenario::ShuffledDelivery,
    ];

    /// File-friendly name.
    pub fn name(self) -> &'static str {
        match self {
            CaptureScenario::ReferenceInWindow => "press_reference_in_window",
            CaptureScenario::ReferenceFromEarlierShift => "press_reference_earlier_shift",
            CaptureScenario::IdleGaps => "press_idle_gaps",
            CaptureScenario::ShuffledDelivery => "press_shuffled_delivery",
        }
    }

    /// Whether the reference curve lies within the process window.
    pub fn expects_contained_reference(self) -> bool {
        !matches!(self, CaptureScenario::ReferenceFromEarlierShift)
    }
}

/// Generated process window and reference stroke.
#[derive(Debug, Clone)]
pub struct Capture {
    pub scenario: CaptureScenario,
    pub main: Vec<Sample>,
    pub reference: Vec<Sample>,
    pub reference_stroke: i64,
    pub window_start: NaiveDateTime,
    pub window_end: NaiveDateTime,
    pub seed: u64,
}

/// Generate a capture for `scenario`.
pub fn create_capture(scenario: CaptureScenario, seed: u64) -> Capture {
    let profile = PressProfile::servo_press().with_noise(1.5);
    let mut config = GeneratorConfig::new().with_strokes(8, 1_001).with_seed(seed);

    match scenario {
        CaptureScenario::ReferenceInWindow | CaptureScenario::ReferenceFromEarlierShift => {}
        CaptureScenario::IdleGaps => {
            config = config.with_idle_ms(2_500);
        }
        CaptureScenario::ShuffledDelivery => {
            config = config.with_shuffle(true).with_glitch_probability(0.15);
        }
    }

    let main = generate_stream(&config, &profile);

    let (reference, reference_stroke) = match scenario {
        CaptureScenario::ReferenceFromEarlierShift => {
            let earlier = GeneratorConfig::new()
                .with_start(config.start - Duration::hours(6))
                .with_strokes(1, GOLDEN_STROKE)
                .with_seed(seed.wrapping_add(1));
            let reference = generate_stream(&earlier, &profile.clone().with_force_scale(1.05));
            (reference, GOLDEN_STROKE)
        }
        _ => {
            // A stroke in the middle keeps its grid inside the window's grid.
            let stroke = config.stroke_id(config.strokes / 2);
            let reference = main
                .iter()
                .filter(|s| s.state.stroke_id == stroke)
                .cloned()
                .collect();
            (reference, stroke)
        }
    };

    Capture {
        scenario,
        window_start: config.start - Duration::seconds(1),
        window_end: config.end() + Duration::seconds(1),
        main,
        reference,
        reference_stroke,
        seed,
    }
}

impl Capture {
    pub fn name(&self) -> &'static str {
        self.scenario.name()
    }

    /// Every raw row the historian holds for this capture.
    ///
    /// A reference stroke from the window is not duplicated.
    pub fn historian_rows(&self) -> Vec<Sample> {
        let mut rows = self.main.clone();
        if !self.scenario.expects_contained_reference() {
            rows.extend(self.reference.iter().cloned());
        }
        rows
    }

    /// Parameter file selecting this capture.
    pub fn parameters(&self) -> PrepConfig {
        let order = self
            .main
            .first()
            .map(|s| s.state.clone())
            .unwrap_or_default();
        PrepConfig {
            company_code: "1000".to_string(),
            work_center: order.work_center,
            begin: self.window_start.format(PARAMETER_TIMESTAMP_FORMAT).to_string(),
            end: self.window_end.format(PARAMETER_TIMESTAMP_FORMAT).to_string(),
            operation: String::new(),
            material: String::new(),
            reference_curve: self.reference_stroke.to_string(),
        }
    }

    /// Write the historian rows as a raw delimited file.
    pub fn write_raw(&self, path: impl AsRef<Path>) -> xpress::Result<()> {
        let file = File::create(path)?;
        write_samples(BufWriter::new(file), DEFAULT_DELIMITER, &self.historian_rows())
    }

    /// Write the parameter file as YAML.
    pub fn write_parameters(&self, path: impl AsRef<Path>) -> xpress::Result<()> {
        let yaml = serde_yaml::to_string(&self.parameters())?;
        std::fs::write(path, yaml)?;
        Ok(())
    }
}
