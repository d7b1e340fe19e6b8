// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Record model
//!
//! Named-field records for raw samples and gridded cells. Fields are grouped
//! into categorical machine state (resolved by majority vote) and numeric
//! measurement channels (resolved by mean), each with an explicit enumeration
//! so aggregation code never addresses fields by position.

use chrono::NaiveDateTime;
use std::fmt;

/// Absolute timestamp of a sample or grid point.
pub type Timestamp = NaiveDateTime;

/// Which of the two input streams a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// The requested process window
    Main,
    /// The golden/reference cycle
    Reference,
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamKind::Main => write!(f, "main"),
            StreamKind::Reference => write!(f, "reference"),
        }
    }
}

/// Categorical machine state carried by every sample and cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MachineState {
    pub work_center: String,
    pub order_number: String,
    pub operation: String,
    pub operation_state: String,
    pub confirmation_number: String,
    pub material_number: String,
    /// Cycle/stroke counter. Zero means "no stroke".
    pub stroke_id: i64,
    /// Current stroke time as reported by the press controller.
    pub stroke_time: i64,
}

/// A borrowed categorical value, grouped by exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalValue<'a> {
    Text(&'a str),
    Code(i64),
}

/// Enumeration of the categorical fields of [`MachineState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    WorkCenter,
    OrderNumber,
    Operation,
    OperationState,
    ConfirmationNumber,
    MaterialNumber,
    StrokeId,
    StrokeTime,
}

impl CategoricalField {
    /// All categorical fields, in column order.
    pub const ALL: [CategoricalField; 8] = [
        CategoricalField::WorkCenter,
        CategoricalField::OrderNumber,
        CategoricalField::Operation,
        CategoricalField::OperationState,
        CategoricalField::ConfirmationNumber,
        CategoricalField::MaterialNumber,
        CategoricalField::StrokeId,
        CategoricalField::StrokeTime,
    ];

    /// Read this field from a state.
    pub fn value(self, state: &MachineState) -> CategoricalValue<'_> {
        match self {
            CategoricalField::WorkCenter => CategoricalValue::Text(&state.work_center),
            CategoricalField::OrderNumber => CategoricalValue::Text(&state.order_number),
            CategoricalField::Operation => CategoricalValue::Text(&state.operation),
            CategoricalField::OperationState => CategoricalValue::Text(&state.operation_state),
            CategoricalField::ConfirmationNumber => {
                CategoricalValue::Text(&state.confirmation_number)
            }
            CategoricalField::MaterialNumber => CategoricalValue::Text(&state.material_number),
            CategoricalField::StrokeId => CategoricalValue::Code(state.stroke_id),
            CategoricalField::StrokeTime => CategoricalValue::Code(state.stroke_time),
        }
    }

    /// Write a value read from the same field back into `state`.
    ///
    /// A value of the wrong kind for this field is ignored.
    pub fn assign(self, state: &mut MachineState, value: CategoricalValue<'_>) {
        match (self, value) {
            (CategoricalField::WorkCenter, CategoricalValue::Text(v)) => {
                state.work_center = v.to_string()
            }
            (CategoricalField::OrderNumber, CategoricalValue::Text(v)) => {
                state.order_number = v.to_string()
            }
            (CategoricalField::Operation, CategoricalValue::Text(v)) => {
                state.operation = v.to_string()
            }
            (CategoricalField::OperationState, CategoricalValue::Text(v)) => {
                state.operation_state = v.to_string()
            }
            (CategoricalField::ConfirmationNumber, CategoricalValue::Text(v)) => {
                state.confirmation_number = v.to_string()
            }
            (CategoricalField::MaterialNumber, CategoricalValue::Text(v)) => {
                state.material_number = v.to_string()
            }
            (CategoricalField::StrokeId, CategoricalValue::Code(v)) => state.stroke_id = v,
            (CategoricalField::StrokeTime, CategoricalValue::Code(v)) => state.stroke_time = v,
            _ => {}
        }
    }
}

/// The four aggregated numeric channels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    pub force_left: f64,
    pub force_right: f64,
    pub position_combined: f64,
    pub position_left: f64,
}

/// Enumeration of the fields of [`Measurements`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericChannel {
    ForceLeft,
    ForceRight,
    PositionCombined,
    PositionLeft,
}

impl NumericChannel {
    /// All numeric channels, in column order.
    pub const ALL: [NumericChannel; 4] = [
        NumericChannel::ForceLeft,
        NumericChannel::ForceRight,
        NumericChannel::PositionCombined,
        NumericChannel::PositionLeft,
    ];

    pub fn get(self, m: &Measurements) -> f64 {
        match self {
            NumericChannel::ForceLeft => m.force_left,
            NumericChannel::ForceRight => m.force_right,
            NumericChannel::PositionCombined => m.position_combined,
            NumericChannel::PositionLeft => m.position_left,
        }
    }

    pub fn set(self, m: &mut Measurements, value: f64) {
        match self {
            NumericChannel::ForceLeft => m.force_left = value,
            NumericChannel::ForceRight => m.force_right = value,
            NumericChannel::PositionCombined => m.position_combined = value,
            NumericChannel::PositionLeft => m.position_left = value,
        }
    }
}

/// One raw measurement record.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub timestamp: Timestamp,
    pub state: MachineState,
    pub measurements: Measurements,
    /// Right-hand position. Loaded with the record but not aggregated.
    pub position_right: f64,
}

impl Sample {
    /// Create a sample with default state and zero measurements.
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            state: MachineState::default(),
            measurements: Measurements::default(),
            position_right: 0.0,
        }
    }

    /// Set the stroke counter.
    pub fn with_stroke(mut self, stroke_id: i64) -> Self {
        self.state.stroke_id = stroke_id;
        self
    }

    /// Set the machine state.
    pub fn with_state(mut self, state: MachineState) -> Self {
        self.state = state;
        self
    }

    /// Set the measurements.
    pub fn with_measurements(mut self, measurements: Measurements) -> Self {
        self.measurements = measurements;
        self
    }
}

/// One row of a gridded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// Grid point this cell represents.
    pub timestamp: Timestamp,
    /// Milliseconds since the stream's first grid point.
    pub elapsed_ms: f64,
    pub state: MachineState,
    /// Aggregated process channels.
    pub main: Measurements,
    /// Reference-curve channels spliced alongside the process channels.
    pub reference: Measurements,
}

impl Cell {
    /// A zero-initialised cell at `timestamp`.
    pub fn empty(timestamp: Timestamp) -> Self {
        Self {
            timestamp,
            elapsed_ms: 0.0,
            state: MachineState::default(),
            main: Measurements::default(),
            reference: Measurements::default(),
        }
    }

    /// A cell is populated once it carries a non-zero stroke counter.
    pub fn is_populated(&self) -> bool {
        self.state.stroke_id != 0
    }
}
