// XPress Testdata - Stroke curves
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Channel curves over one press stroke.
//!
//! Every curve is evaluated at the stroke phase `0.0..=1.0`, so the same
//! profile fits strokes of any duration.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Shape of one channel across a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StrokeCurve {
    /// Constant value.
    Constant { value: f64 },

    /// Load peak in the middle of the stroke.
    ///
    /// `value = base + peak * sin(PI * phase)^sharpness`
    HalfSine { base: f64, peak: f64, sharpness: f64 },

    /// Ram travel: from `top` down to `bottom` at mid-stroke and back.
    Triangle { top: f64, bottom: f64 },

    /// Linear ramp from `start` to `end`.
    Ramp { start: f64, end: f64 },
}

impl StrokeCurve {
    /// Evaluate the curve at `phase`, clamped to `0.0..=1.0`.
    pub fn evaluate(&self, phase: f64) -> f64 {
        let phase = phase.clamp(0.0, 1.0);
        match *self {
            StrokeCurve::Constant { value } => value,
            StrokeCurve::HalfSine {
                base,
                peak,
                sharpness,
            } => base + peak * (PI * phase).sin().powf(sharpness),
            StrokeCurve::Triangle { top, bottom } => {
                let depth = 1.0 - (2.0 * phase - 1.0).abs();
                top - (top - bottom) * depth
            }
            StrokeCurve::Ramp { start, end } => start + (end - start) * phase,
        }
    }
}

/// Curves of all channels a press reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PressProfile {
    pub force_left: StrokeCurve,
    pub force_right: StrokeCurve,
    pub position_combined: StrokeCurve,
    pub position_left: StrokeCurve,
    pub position_right: StrokeCurve,
    /// Standard deviation of gaussian noise added to every channel.
    pub noise_std: f64,
}

impl PressProfile {
    /// Servo press with slightly unbalanced left/right columns.
    pub fn servo_press() -> Self {
        Self {
            force_left: StrokeCurve::HalfSine {
                base: 5.0,
                peak: 420.0,
                sharpness: 4.0,
            },
            force_right: StrokeCurve::HalfSine {
                base: 5.0,
                peak: 395.0,
                sharpness: 4.0,
            },
            position_combined: StrokeCurve::Triangle {
                top: 250.0,
                bottom: 12.0,
            },
            position_left: StrokeCurve::Triangle {
                top: 250.0,
                bottom: 11.5,
            },
            position_right: StrokeCurve::Triangle {
                top: 250.0,
                bottom: 12.5,
            },
            noise_std: 0.0,
        }
    }

    /// Flat profile, every channel at `value`.
    pub fn flat(value: f64) -> Self {
        let curve = StrokeCurve::Constant { value };
        Self {
            force_left: curve,
            force_right: curve,
            position_combined: curve,
            position_left: curve,
            position_right: curve,
            noise_std: 0.0,
        }
    }

    pub fn with_noise(mut self, std: f64) -> Self {
        self.noise_std = std;
        self
    }

    /// Scale every force curve, e.g. for a heavier reference part.
    pub fn with_force_scale(mut self, factor: f64) -> Self {
        for curve in [&mut self.force_left, &mut self.force_right] {
            *curve = match *curve {
                StrokeCurve::Constant { value } => StrokeCurve::Constant {
                    value: value * factor,
                },
                StrokeCurve::HalfSine {
                    base,
                    peak,
                    sharpness,
                } => StrokeCurve::HalfSine {
                    base: base * factor,
                    peak: peak * factor,
                    sharpness,
                },
                StrokeCurve::Triangle { top, bottom } => StrokeCurve::Triangle {
                    top: top * factor,
                    bottom: bottom * factor,
                },
                StrokeCurve::Ramp { start, end } => StrokeCurve::Ramp {
                    start: start * factor,
                    end: end * factor,
                },
            };
        }
        self
    }
}

impl Default for PressProfile {
    fn default() -> Self {
        Self::servo_press()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_sine_peaks_mid_stroke() {
        let curve = StrokeCurve::HalfSine {
            base: 0.0,
            peak: 100.0,
            sharpness: 1.0,
        };
        assert!(curve.evaluate(0.0).abs() < 1e-9);
        assert!((curve.evaluate(0.5) - 100.0).abs() < 1e-9);
        assert!(curve.evaluate(1.0).abs() < 1e-6);
    }

    #[test]
    fn test_triangle_bottom_dead_centre() {
        let curve = StrokeCurve::Triangle {
            top: 200.0,
            bottom: 10.0,
        };
        assert_eq!(curve.evaluate(0.0), 200.0);
        assert_eq!(curve.evaluate(0.5), 10.0);
        assert_eq!(curve.evaluate(1.0), 200.0);
        assert_eq!(curve.evaluate(0.25), 105.0);
    }

    #[test]
    fn test_phase_clamped() {
        let curve = StrokeCurve::Ramp {
            start: 0.0,
            end: 10.0,
        };
        assert_eq!(curve.evaluate(-1.0), 0.0);
        assert_eq!(curve.evaluate(2.0), 10.0);
    }

    #[test]
    fn test_force_scale() {
        let profile = PressProfile::flat(2.0).with_force_scale(3.0);
        assert_eq!(profile.force_left.evaluate(0.3), 6.0);
        assert_eq!(profile.position_left.evaluate(0.3), 2.0);
    }
}
