use clap::Parser;
use color_eyre::Result;
use eyre::Context as _;
use moonlet_metrics_export::{
    init_errors,
    init_logging,
    Args,
    Config,
    Exporter,
    QueryRange,
};
use tracing::info;

fn main() -> Result<()> {
    init_errors()?;
    let args = Args::parse();
    init_logging(args.verbose)?;

    let config = Config::new(&args).context("Failed to load configuration")?;
    let exporter = Exporter::from_config(&config, |name| std::env::var(name).ok())?;

    let range = QueryRange::new(args.query, args.start, args.end);
    let summary = exporter.export(&range, &args.output_path)?;

    info!(
        series = summary.series,
        rows = summary.rows,
        mode = %exporter.write_mode(),
        output = %args.output_path.display(),
        "export finished"
    );
    Ok(())
}
