// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Raw sample interchange format
//!
//! Delimited files of raw samples use the column names of the press data
//! store. [`RawRecord`] is the serde shape of one such row.

use crate::error::{PrepError, Result};
use crate::record::{MachineState, Measurements, Sample};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

/// Timestamp format written for `SysDateTimeOPC`.
pub const RAW_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// One raw row as stored by the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "MCH_WorkCenter")]
    pub work_center: String,
    #[serde(rename = "MCOD_OrderNumber")]
    pub order_number: String,
    #[serde(rename = "MCOD_Operation")]
    pub operation: String,
    #[serde(rename = "MCOD_OperationState")]
    pub operation_state: String,
    #[serde(rename = "MCOD_ConfirmationNumber")]
    pub confirmation_number: String,
    #[serde(rename = "MCOD_MaterialNumber")]
    pub material_number: String,
    #[serde(rename = "SysDateTimeOPC")]
    pub timestamp: String,
    #[serde(rename = "PDT_Force_LR")]
    pub force_left: f64,
    #[serde(rename = "PDT_Force_UR")]
    pub force_right: f64,
    #[serde(rename = "PDT_Position_1_2")]
    pub position_combined: f64,
    #[serde(rename = "PDT_Position_LR")]
    pub position_left: f64,
    #[serde(rename = "PDT_Position_UR")]
    pub position_right: f64,
    #[serde(rename = "PDT_Gesamthubzaehler")]
    pub stroke_id: i64,
    #[serde(rename = "PDT_Hubzeit_aktuell")]
    pub stroke_time: i64,
}

/// Parse a `SysDateTimeOPC` value, with or without fractional seconds.
pub fn parse_raw_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

impl RawRecord {
    /// Convert into a sample; `row` is used for error reporting.
    pub fn into_sample(self, row: usize) -> Result<Sample> {
        let timestamp =
            parse_raw_timestamp(&self.timestamp).ok_or_else(|| PrepError::InvalidRecord {
                row,
                reason: format!("unparsable SysDateTimeOPC '{}'", self.timestamp),
            })?;

        Ok(Sample {
            timestamp,
            state: MachineState {
                work_center: self.work_center,
                order_number: self.order_number,
                operation: self.operation,
                operation_state: self.operation_state,
                confirmation_number: self.confirmation_number,
                material_number: self.material_number,
                stroke_id: self.stroke_id,
                stroke_time: self.stroke_time,
            },
            measurements: Measurements {
                force_left: self.force_left,
                force_right: self.force_right,
                position_combined: self.position_combined,
                position_left: self.position_left,
            },
            position_right: self.position_right,
        })
    }
}

impl From<&Sample> for RawRecord {
    fn from(sample: &Sample) -> Self {
        Self {
            work_center: sample.state.work_center.clone(),
            order_number: sample.state.order_number.clone(),
            operation: sample.state.operation.clone(),
            operation_state: sample.state.operation_state.clone(),
            confirmation_number: sample.state.confirmation_number.clone(),
            material_number: sample.state.material_number.clone(),
            timestamp: sample.timestamp.format(RAW_TIMESTAMP_FORMAT).to_string(),
            force_left: sample.measurements.force_left,
            force_right: sample.measurements.force_right,
            position_combined: sample.measurements.position_combined,
            position_left: sample.measurements.position_left,
            position_right: sample.position_right,
            stroke_id: sample.state.stroke_id,
            stroke_time: sample.state.stroke_time,
        }
    }
}

/// Read raw samples from delimited text with a header row.
pub fn read_samples<R: Read>(reader: R, delimiter: u8) -> Result<Vec<Sample>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut samples = Vec::new();
    for (i, record) in reader.deserialize::<RawRecord>().enumerate() {
        // Header is line 1
        samples.push(record?.into_sample(i + 2)?);
    }
    Ok(samples)
}

/// Write raw samples as delimited text with a header row.
pub fn write_samples<W: Write>(writer: W, delimiter: u8, samples: &[Sample]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    for sample in samples {
        writer.serialize(RawRecord::from(sample))?;
    }
    writer.flush()?;
    Ok(())
}
