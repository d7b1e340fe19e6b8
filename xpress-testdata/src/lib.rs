// XPress Testdata - Synthetic press streams
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! # XPress Testdata
//!
//! Synthetic press-stream generator for the XPress preparation pipeline.
//!
//! - **Irregular sampling**: jittered 2–6ms intervals inside every stroke
//! - **Stroke curves**: force peaks and ram travel per stroke
//! - **Captures**: process window plus reference stroke, with the matching
//!   parameter file
//!
//! ## Quick Start
//!
//! ```rust
//! use xpress_testdata::{create_capture, CaptureScenario};
//! use xpress::{MemorySource, MemoryStatusLog, Preparer};
//!
//! let capture = create_capture(CaptureScenario::ReferenceInWindow, 42);
//! let request = capture.parameters().to_request().unwrap();
//! let source = MemorySource::new(capture.historian_rows());
//!
//! let dataset = Preparer::new(&source)
//!     .run(&request, &mut MemoryStatusLog::new())
//!     .unwrap();
//! assert!(!dataset.is_empty());
//! ```

pub mod generator;
pub mod manifest;
pub mod profile;
pub mod scenario;

// Re-exports for convenience
pub use generator::{generate_stream, GeneratorConfig, OrderInfo};
pub use manifest::{CaptureManifest, ExpectedPlacement, ManifestError};
pub use profile::{PressProfile, StrokeCurve};
pub use scenario::{create_capture, Capture, CaptureScenario};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
