// XPress - Press-forming data preparation
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Time-ordered sample streams

use crate::record::{Sample, StreamKind, Timestamp};

/// A stream of samples sorted ascending by timestamp.
///
/// Construction sorts the input (stable, so duplicate timestamps keep their
/// fetch order). Every consumer of a `SampleStream` may rely on the order.
#[derive(Debug, Clone)]
pub struct SampleStream {
    kind: StreamKind,
    samples: Vec<Sample>,
}

impl SampleStream {
    /// Sort `samples` by timestamp and wrap them.
    pub fn new(kind: StreamKind, mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { kind, samples }
    }

    /// Main-stream shorthand.
    pub fn main(samples: Vec<Sample>) -> Self {
        Self::new(StreamKind::Main, samples)
    }

    /// Reference-stream shorthand.
    pub fn reference(samples: Vec<Sample>) -> Self {
        Self::new(StreamKind::Reference, samples)
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp, if any.
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}
