// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Column contract of the prepared dataset
//!
//! Downstream consumers (visualisation cockpit, spreadsheet imports) address
//! the prepared table by these names in this order. Reference channels are
//! mapped positionally onto the `_Rerf` columns.

use crate::error::Result;
use crate::record::Cell;
use serde::Serialize;
use std::io::Write;

/// Default delimiter of the export file.
pub const DEFAULT_DELIMITER: u8 = b';';

/// Ordered output columns.
pub const COLUMNS: [&str; 17] = [
    "TimeRef",
    "MCH_WorkCenter",
    "MCOD_OrderNumber",
    "MCOD_Operation",
    "MCOD_OperationState",
    "MCOD_ConfirmationNumber",
    "MCOD_MaterialNumber",
    "PDT_Force_LR",
    "PDT_Force_UR",
    "PDT_Position_1_2",
    "PDT_Position_LR",
    "PDT_Gesamthubzaehler",
    "PDT_Hubzeit_aktuell",
    "PDT_Force_LR_Rerf",
    "PDT_Force_UR_Rerf",
    "PDT_Position_LR_Rerf",
    "PDT_Position_UR_Rerf",
];

/// One exported row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow<'a> {
    #[serde(rename = "TimeRef")]
    pub elapsed_ms: f64,
    #[serde(rename = "MCH_WorkCenter")]
    pub work_center: &'a str,
    #[serde(rename = "MCOD_OrderNumber")]
    pub order_number: &'a str,
    #[serde(rename = "MCOD_Operation")]
    pub operation: &'a str,
    #[serde(rename = "MCOD_OperationState")]
    pub operation_state: &'a str,
    #[serde(rename = "MCOD_ConfirmationNumber")]
    pub confirmation_number: &'a str,
    #[serde(rename = "MCOD_MaterialNumber")]
    pub material_number: &'a str,
    #[serde(rename = "PDT_Force_LR")]
    pub force_left: f64,
    #[serde(rename = "PDT_Force_UR")]
    pub force_right: f64,
    #[serde(rename = "PDT_Position_1_2")]
    pub position_combined: f64,
    #[serde(rename = "PDT_Position_LR")]
    pub position_left: f64,
    #[serde(rename = "PDT_Gesamthubzaehler")]
    pub stroke_id: i64,
    #[serde(rename = "PDT_Hubzeit_aktuell")]
    pub stroke_time: i64,
    #[serde(rename = "PDT_Force_LR_Rerf")]
    pub reference_force_left: f64,
    #[serde(rename = "PDT_Force_UR_Rerf")]
    pub reference_force_right: f64,
    #[serde(rename = "PDT_Position_LR_Rerf")]
    pub reference_position_combined: f64,
    #[serde(rename = "PDT_Position_UR_Rerf")]
    pub reference_position_left: f64,
}

impl<'a> From<&'a Cell> for ExportRow<'a> {
    fn from(cell: &'a Cell) -> Self {
        Self {
            elapsed_ms: cell.elapsed_ms,
            work_center: &cell.state.work_center,
            order_number: &cell.state.order_number,
            operation: &cell.state.operation,
            operation_state: &cell.state.operation_state,
            confirmation_number: &cell.state.confirmation_number,
            material_number: &cell.state.material_number,
            force_left: cell.main.force_left,
            force_right: cell.main.force_right,
            position_combined: cell.main.position_combined,
            position_left: cell.main.position_left,
            stroke_id: cell.state.stroke_id,
            stroke_time: cell.state.stroke_time,
            reference_force_left: cell.reference.force_left,
            reference_force_right: cell.reference.force_right,
            reference_position_combined: cell.reference.position_combined,
            reference_position_left: cell.reference.position_left,
        }
    }
}

/// Write `rows` as delimited text: header row, no index column.
pub fn write_rows<W: Write>(writer: W, delimiter: u8, rows: &[Cell]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(COLUMNS)?;
    for row in rows {
        writer.serialize(ExportRow::from(row))?;
    }
    writer.flush()?;
    Ok(())
}
