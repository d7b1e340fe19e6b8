// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Data-access abstraction
//!
//! A [`SampleSource`] answers a [`SampleQuery`] with an unordered collection
//! of samples. The preparation driver sorts what it receives.

use crate::error::{QueryError, Result};
use crate::record::{Sample, Timestamp};

/// Open time interval `begin < t < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub begin: Timestamp,
    pub end: Timestamp,
}

impl TimeRange {
    pub fn new(begin: Timestamp, end: Timestamp) -> Self {
        Self { begin, end }
    }

    pub fn contains(&self, t: Timestamp) -> bool {
        t > self.begin && t < self.end
    }
}

/// Selection of samples from a data source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleQuery {
    pub range: Option<TimeRange>,
    pub order_number: Option<String>,
    pub material_number: Option<String>,
    pub stroke_id: Option<i64>,
}

impl SampleQuery {
    /// Query the process window with optional order/material filters.
    pub fn window(range: TimeRange) -> Self {
        Self {
            range: Some(range),
            ..Default::default()
        }
    }

    /// Query every sample of one cycle.
    pub fn cycle(stroke_id: i64) -> Self {
        Self {
            stroke_id: Some(stroke_id),
            ..Default::default()
        }
    }

    pub fn with_order_number(mut self, order_number: impl Into<String>) -> Self {
        self.order_number = Some(order_number.into());
        self
    }

    pub fn with_material_number(mut self, material_number: impl Into<String>) -> Self {
        self.material_number = Some(material_number.into());
        self
    }

    /// Reject queries a source could not execute.
    pub fn validate(&self) -> std::result::Result<(), QueryError> {
        if let Some(range) = &self.range {
            if range.begin >= range.end {
                return Err(QueryError::InvertedRange {
                    begin: range.begin.to_string(),
                    end: range.end.to_string(),
                });
            }
        } else if self.stroke_id.is_none() {
            return Err(QueryError::Unbounded);
        }

        let filters = [
            ("MCOD_OrderNumber", &self.order_number),
            ("MCOD_MaterialNumber", &self.material_number),
        ];
        for (field, value) in filters {
            if let Some(value) = value {
                if value.trim().is_empty() || value.contains('\'') {
                    return Err(QueryError::InvalidFilter {
                        field,
                        value: value.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// True if `sample` satisfies every filter of this query.
    pub fn matches(&self, sample: &Sample) -> bool {
        if let Some(range) = &self.range {
            if !range.contains(sample.timestamp) {
                return false;
            }
        }
        if let Some(order) = &self.order_number {
            if &sample.state.order_number != order {
                return false;
            }
        }
        if let Some(material) = &self.material_number {
            if &sample.state.material_number != material {
                return false;
            }
        }
        if let Some(stroke) = self.stroke_id {
            if sample.state.stroke_id != stroke {
                return false;
            }
        }
        true
    }
}

/// External data-access collaborator.
pub trait SampleSource {
    /// Fetch the samples selected by `query`, in no particular order.
    fn fetch(&self, query: &SampleQuery) -> Result<Vec<Sample>>;
}

/// Samples held in memory, filtered on fetch.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    samples: Vec<Sample>,
}

impl MemorySource {
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl SampleSource for MemorySource {
    fn fetch(&self, query: &SampleQuery) -> Result<Vec<Sample>> {
        query.validate()?;
        Ok(self
            .samples
            .iter()
            .filter(|s| query.matches(s))
            .cloned()
            .collect())
    }
}
