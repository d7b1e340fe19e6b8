// XPress Testdata - Core generator
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Press stream generation.
//!
//! A stream is a run of strokes. Inside a stroke samples arrive at random
//! intervals between `min_interval_ms` and `max_interval_ms`. Between strokes
//! the press idles for `idle_ms` without reporting.

use crate::profile::PressProfile;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};
use xpress::{MachineState, Measurements, Sample};

/// Operation state reported while the press runs.
pub const RUNNING_STATE: &str = "RUN";

/// Operation state of the occasional controller glitch.
pub const GLITCH_STATE: &str = "HOLD";

/// Order data stamped onto every sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub work_center: String,
    pub order_number: String,
    pub operation: String,
    pub confirmation_number: String,
    pub material_number: String,
}

impl Default for OrderInfo {
    fn default() -> Self {
        Self {
            work_center: "XP01".to_string(),
            order_number: "4711".to_string(),
            operation: "0010".to_string(),
            confirmation_number: "98765".to_string(),
            material_number: "MAT-100".to_string(),
        }
    }
}

/// Generator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Timestamp of the first sample.
    pub start: NaiveDateTime,
    /// Number of strokes.
    pub strokes: usize,
    /// Stroke counter of the first stroke.
    pub first_stroke: i64,
    /// Duration of one stroke in milliseconds.
    pub stroke_duration_ms: i64,
    /// Silent time between strokes in milliseconds.
    pub idle_ms: i64,
    /// Shortest interval between two samples.
    pub min_interval_ms: i64,
    /// Longest interval between two samples.
    pub max_interval_ms: i64,
    /// Probability that a sample reports [`GLITCH_STATE`].
    pub glitch_probability: f64,
    /// Deliver samples in random order.
    pub shuffled: bool,
    pub order: OrderInfo,
    /// Random seed for reproducibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(2021, 3, 1)
                .and_then(|d| d.and_hms_opt(8, 0, 0))
                .unwrap_or_default(),
            strokes: 5,
            first_stroke: 1,
            stroke_duration_ms: 1_200,
            idle_ms: 0,
            min_interval_ms: 2,
            max_interval_ms: 6,
            glitch_probability: 0.0,
            shuffled: false,
            order: OrderInfo::default(),
            seed: None,
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = start;
        self
    }

    /// Set number of strokes and the counter of the first one.
    pub fn with_strokes(mut self, strokes: usize, first_stroke: i64) -> Self {
        self.strokes = strokes;
        self.first_stroke = first_stroke;
        self
    }

    pub fn with_stroke_duration_ms(mut self, ms: i64) -> Self {
        self.stroke_duration_ms = ms;
        self
    }

    pub fn with_idle_ms(mut self, ms: i64) -> Self {
        self.idle_ms = ms;
        self
    }

    /// Set the sampling jitter range (inclusive, at least 1ms).
    pub fn with_interval_ms(mut self, min: i64, max: i64) -> Self {
        self.min_interval_ms = min.max(1);
        self.max_interval_ms = max.max(self.min_interval_ms);
        self
    }

    pub fn with_glitch_probability(mut self, p: f64) -> Self {
        self.glitch_probability = p.clamp(0.0, 1.0);
        self
    }

    pub fn with_shuffle(mut self, shuffled: bool) -> Self {
        self.shuffled = shuffled;
        self
    }

    pub fn with_order(mut self, order: OrderInfo) -> Self {
        self.order = order;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Start of stroke `index` (zero based).
    pub fn stroke_start(&self, index: usize) -> NaiveDateTime {
        self.start + Duration::milliseconds(index as i64 * (self.stroke_duration_ms + self.idle_ms))
    }

    /// Stroke counter of stroke `index` (zero based).
    pub fn stroke_id(&self, index: usize) -> i64 {
        self.first_stroke + index as i64
    }

    /// End of the last stroke. Every sample lies before it.
    pub fn end(&self) -> NaiveDateTime {
        match self.strokes {
            0 => self.start,
            n => self.stroke_start(n - 1) + Duration::milliseconds(self.stroke_duration_ms),
        }
    }
}

fn state(config: &GeneratorConfig, stroke_id: i64, operation_state: &str) -> MachineState {
    MachineState {
        work_center: config.order.work_center.clone(),
        order_number: config.order.order_number.clone(),
        operation: config.order.operation.clone(),
        operation_state: operation_state.to_string(),
        confirmation_number: config.order.confirmation_number.clone(),
        material_number: config.order.material_number.clone(),
        stroke_id,
        stroke_time: config.stroke_duration_ms,
    }
}

/// Generate the raw samples of a press stream.
pub fn generate_stream(config: &GeneratorConfig, profile: &PressProfile) -> Vec<Sample> {
    let mut rng: Box<dyn RngCore> = match config.seed {
        Some(s) => Box::new(StdRng::seed_from_u64(s)),
        None => Box::new(StdRng::from_entropy()),
    };
    let noise = (profile.noise_std > 0.0)
        .then(|| Normal::new(0.0, profile.noise_std).ok())
        .flatten();
    let duration = config.stroke_duration_ms.max(1);

    let mut samples = Vec::new();
    for index in 0..config.strokes {
        let stroke_id = config.stroke_id(index);
        let stroke_start = config.stroke_start(index);

        let mut offset = 0;
        while offset < duration {
            let phase = offset as f64 / duration as f64;
            let mut jitter = || noise.map(|n| n.sample(&mut *rng)).unwrap_or(0.0);

            let measurements = Measurements {
                force_left: profile.force_left.evaluate(phase) + jitter(),
                force_right: profile.force_right.evaluate(phase) + jitter(),
                position_combined: profile.position_combined.evaluate(phase) + jitter(),
                position_left: profile.position_left.evaluate(phase) + jitter(),
            };
            let position_right = profile.position_right.evaluate(phase) + jitter();

            let operation_state = if rng.gen::<f64>() < config.glitch_probability {
                GLITCH_STATE
            } else {
                RUNNING_STATE
            };

            let mut sample = Sample::new(stroke_start + Duration::milliseconds(offset))
                .with_state(state(config, stroke_id, operation_state))
                .with_measurements(measurements);
            sample.position_right = position_right;
            samples.push(sample);

            offset += rng.gen_range(config.min_interval_ms.max(1)..=config.max_interval_ms.max(1));
        }
    }

    if config.shuffled {
        samples.shuffle(&mut *rng);
    }
    samples
}
