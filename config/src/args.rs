use clap::Parser;
use std::path::PathBuf;

/// Export a query_range result from the metrics backend into a CSV file.
///
/// Each sample becomes one headerless row: `<ISO-8601 UTC timestamp>Z,<node id>,<value>`.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Metric expression, passed to the backend verbatim.
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Start of the range (RFC3339, unix seconds or any expression the backend accepts).
    #[arg(value_name = "START", allow_hyphen_values = true)]
    pub start: String,

    /// End of the range (RFC3339, unix seconds or any expression the backend accepts).
    #[arg(value_name = "END", allow_hyphen_values = true)]
    pub end: String,

    /// CSV file to create, truncate or append to depending on `write_mode`.
    #[arg(value_name = "OUTPUT_PATH")]
    pub output_path: PathBuf,

    /// Additional YAML config file, applied on top of the user config.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log request and decoding details.
    #[arg(short, long)]
    pub verbose: bool,
}
