// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Parameter file
//!
//! The operator's parameter file is YAML with PascalCase keys:
//!
//! ```yaml
//! CompanyCode: 1000
//! WorkCenter: XP01
//! Begin: 01.03.2021 08:00:00
//! End: 01.03.2021 08:05:00
//! Operation: 4711
//! Material: ""
//! ReferenceCurve: 1001
//! ```
//!
//! Scalars may be written as strings or numbers. Empty values disable the
//! corresponding filter.

use crate::error::{QueryError, Result};
use crate::record::Timestamp;
use crate::source::{SampleQuery, TimeRange};
use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// Day-first timestamp format used by `Begin` and `End`.
pub const PARAMETER_TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

fn scalar_string<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<String, D::Error> {
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Int(i)) => i.to_string(),
        Some(Scalar::Float(f)) => f.to_string(),
        Some(Scalar::Bool(b)) => b.to_string(),
        None => String::new(),
    })
}

/// Operator parameters for one preparation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PrepConfig {
    #[serde(deserialize_with = "scalar_string")]
    pub company_code: String,
    #[serde(deserialize_with = "scalar_string")]
    pub work_center: String,
    #[serde(deserialize_with = "scalar_string")]
    pub begin: String,
    #[serde(deserialize_with = "scalar_string")]
    pub end: String,
    /// Production order filter
    #[serde(deserialize_with = "scalar_string")]
    pub operation: String,
    #[serde(deserialize_with = "scalar_string")]
    pub material: String,
    /// Cycle id of the reference curve
    #[serde(deserialize_with = "scalar_string")]
    pub reference_curve: String,
}

/// A validated preparation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRequest {
    pub range: TimeRange,
    pub order_number: Option<String>,
    pub material_number: Option<String>,
    pub reference_curve: Option<i64>,
}

impl PrepareRequest {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            order_number: None,
            material_number: None,
            reference_curve: None,
        }
    }

    pub fn with_reference_curve(mut self, stroke_id: i64) -> Self {
        self.reference_curve = Some(stroke_id);
        self
    }

    /// Query for the process window.
    pub fn main_query(&self) -> SampleQuery {
        SampleQuery {
            range: Some(self.range),
            order_number: self.order_number.clone(),
            material_number: self.material_number.clone(),
            stroke_id: None,
        }
    }

    /// Query for the reference curve, if one was requested.
    pub fn reference_query(&self) -> Option<SampleQuery> {
        self.reference_curve.map(SampleQuery::cycle)
    }
}

/// Parse a `Begin`/`End` value. Accepts the day-first format and ISO.
pub fn parse_parameter_timestamp(value: &str) -> std::result::Result<Timestamp, QueryError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, PARAMETER_TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .map_err(|_| QueryError::InvalidTimestamp(value.to_string()))
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl PrepConfig {
    /// Parse a YAML parameter document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML parameter file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Turn the parameters into a request, validating every literal.
    pub fn to_request(&self) -> std::result::Result<PrepareRequest, QueryError> {
        let begin = parse_parameter_timestamp(&self.begin)?;
        let end = parse_parameter_timestamp(&self.end)?;

        let reference_curve = match non_empty(&self.reference_curve) {
            Some(id) => Some(id.parse::<i64>().map_err(|_| QueryError::InvalidFilter {
                field: "PDT_Gesamthubzaehler",
                value: id,
            })?),
            None => None,
        };

        let request = PrepareRequest {
            range: TimeRange::new(begin, end),
            order_number: non_empty(&self.operation),
            material_number: non_empty(&self.material),
            reference_curve,
        };
        request.main_query().validate()?;
        Ok(request)
    }

    /// Parameter summary in the order the operator sees it.
    pub fn summary(&self) -> Vec<String> {
        vec![
            format!("Begin: {}", self.begin),
            format!("End: {}", self.end),
            format!("Operation: {}", self.operation),
            format!("Material: {}", self.material),
            format!("ReferenceCurve: {}", self.reference_curve),
        ]
    }
}
