//! # XPress - Press-forming data preparation
//!
//! Turns two irregularly sampled press streams, the process window and a
//! short reference ("golden") cycle, into one analysis-ready table on a
//! uniform 10ms grid.
//!
//! ## Key Features
//!
//! - **Fixed grid**: one cell per 10ms over the observed span
//! - **Majority vote**: categorical machine state resolved per cell by mode
//! - **Channel means**: force and position channels averaged per cell
//! - **Reference stitching**: the golden cycle is spliced in at every stroke
//!   boundary and appended after the data when recorded elsewhere
//!
//! ## Quick Start
//!
//! ```rust
//! use xpress::{build_dataset, MemoryStatusLog, Sample, SampleStream};
//! use chrono::{Duration, NaiveDate};
//!
//! let t0 = NaiveDate::from_ymd_opt(2021, 3, 1)
//!     .and_then(|d| d.and_hms_opt(8, 0, 0))
//!     .unwrap();
//! let main: Vec<Sample> = (0..200)
//!     .map(|i| Sample::new(t0 + Duration::milliseconds(i * 4)).with_stroke(1 + i / 100))
//!     .collect();
//! let reference: Vec<Sample> = main.iter().filter(|s| s.state.stroke_id == 2).cloned().collect();
//!
//! let mut log = MemoryStatusLog::new();
//! let dataset = build_dataset(
//!     &SampleStream::main(main),
//!     &SampleStream::reference(reference),
//!     &mut log,
//! )
//! .unwrap();
//!
//! assert!(!dataset.is_empty());
//! assert!(log.contains("Cleanse Matrix"));
//! ```
//!
//! ## Modules
//!
//! - [`record`]: Samples, cells and their field enumerations
//! - [`grid`]: Fixed-period grid construction
//! - [`aggregator`]: Per-cell mode/mean aggregation
//! - [`aligner`]: Reference-curve placement
//! - [`merger`]: Splicing at cycle boundaries and cleansing
//! - [`pipeline`]: Entry points and the source-driven preparer
//! - [`source`]: Data-access abstraction
//! - [`config`]: Operator parameter file
//! - [`export`]: Output column contract
//! - [`raw`]: Raw sample interchange format

// Modules
pub mod aggregator;
pub mod aligner;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod merger;
pub mod metrics;
pub mod pipeline;
pub mod raw;
pub mod record;
pub mod source;
pub mod status;
pub mod stream;

// Re-exports for convenient access
pub use aggregator::{most_common, AggregationReport, CellAggregator, ChannelTarget};
pub use aligner::{AlignedTable, Placement, ReferenceAligner};
pub use config::{PrepConfig, PrepareRequest};
pub use error::{PrepError, QueryError, Result};
pub use export::{COLUMNS, DEFAULT_DELIMITER};
pub use grid::{Grid, GridBuilder};
pub use merger::{MergeReport, StreamMerger};
pub use metrics::PrepareMetrics;
pub use pipeline::{build_dataset, build_main_dataset, FinalDataset, Preparer};
pub use raw::{read_samples, write_samples, RawRecord};
pub use record::{
    CategoricalField, Cell, MachineState, Measurements, NumericChannel, Sample, StreamKind,
    Timestamp,
};
pub use source::{MemorySource, SampleQuery, SampleSource, TimeRange};
pub use status::{LogStatus, MemoryStatusLog, StatusSink};
pub use stream::SampleStream;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Grid period in milliseconds
pub const GRID_PERIOD_MS: i64 = 10;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_column_contract() {
        assert_eq!(COLUMNS.len(), 17);
        assert_eq!(COLUMNS[0], "TimeRef");
        assert_eq!(COLUMNS[11], "PDT_Gesamthubzaehler");
    }
}
