//! Exports Prometheus-compatible `query_range` results into flat CSV files.
//!
//! One run issues a single request and writes one row per sample:
//!
//! ```text
//! 1970-01-01T00:00:00Z,node-1,1.5
//! 1970-01-01T01:00:00Z,node-1,2.0
//! ```
//!
//! Whether the output file is truncated or appended to is a configuration choice ([`WriteMode`]). Append mode never
//! reads what is already in the file, so exporting overlapping ranges twice duplicates the overlap.

#[macro_use]
extern crate tracing;

mod errors;
mod exporter;
mod logging;
pub mod request;
pub mod response;
pub mod row;
pub mod sink;

pub use errors::{
    init_errors,
    ExportError,
};
pub use exporter::{
    ExportSummary,
    Exporter,
};
pub use logging::init_logging;
pub use metrics_export_config::{
    Args,
    AuthConfig,
    Config,
    LineEnding,
    Step,
    WriteMode,
};
pub use request::{
    Auth,
    QueryRange,
};
