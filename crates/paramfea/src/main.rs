#[cfg(feature = "native")]
use clap::{Parser, Subcommand};
#[cfg(feature = "native")]
use paramfea::report::{format_failures, format_matrix, format_summary};
#[cfg(feature = "native")]
use paramfea::{ExportFormat, PreviewEngine, RowFilter, SweepFile, export_table, init_logging};
#[cfg(feature = "native")]
use paramfea_core::SweepOrchestrator;
#[cfg(feature = "native")]
use paramfea_core::sweep::ParameterSpace;
#[cfg(feature = "native")]
use std::path::{Path, PathBuf};

#[cfg(feature = "native")]
#[derive(Parser, Debug)]
#[command(name = "paramfea")]
#[command(about = "Plan and inspect parametric FEA sweeps")]
struct Args {
    /// Path to the data directory (default: ~/.paramfea/)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only write to the log file, not to stderr
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[cfg(feature = "native")]
#[derive(Subcommand, Debug)]
enum Command {
    /// Enumerate a sweep without solving and print its parameter matrix
    Plan {
        /// YAML sweep definition
        sweep: PathBuf,

        /// Write the planned matrix to this file
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Export format (csv, jsonl, json); inferred from the extension if omitted
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Rows to print
        #[arg(long, default_value_t = 50)]
        max_rows: usize,
    },
    /// Validate a sweep definition and report its size
    Check {
        /// YAML sweep definition
        sweep: PathBuf,
    },
}

#[cfg(feature = "native")]
fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".paramfea")
}

#[cfg(feature = "native")]
fn check(path: &Path) -> color_eyre::Result<()> {
    let file = SweepFile::load(path)?;
    let config = file.to_config()?;
    let space = ParameterSpace::new(&config.variables)?;

    let shape: Vec<String> = space.shape().iter().map(ToString::to_string).collect();
    println!(
        "{}: {} combinations ({})",
        path.display(),
        space.len(),
        shape.join(" x ")
    );
    println!("parameters: {}", config.parameter_labels().join(", "));
    println!("outputs:    {}", config.output_labels().join(", "));
    println!(
        "solver:     {} -> {}",
        config.solver.solver_name, config.solver.results_name
    );
    tracing::info!(path = %path.display(), combinations = space.len(), "Sweep file is valid");
    Ok(())
}

#[cfg(feature = "native")]
fn plan(
    path: &Path,
    export: Option<&Path>,
    format: Option<ExportFormat>,
    max_rows: usize,
) -> color_eyre::Result<()> {
    let file = SweepFile::load(path)?;
    let config = file.to_config()?;
    let options = PreviewEngine::options(file.run_options());
    let mut engine = PreviewEngine::new(file.model.clone());

    let table = SweepOrchestrator::new(config).run(&mut engine, &options)?;

    print!("{}", format_matrix(&table, Some(max_rows)));
    println!();
    print!("{}", format_summary(&table.summary()));
    let failures = format_failures(&table);
    if !failures.is_empty() {
        print!("{failures}");
    }

    if let Some(export) = export {
        export_table(&table, export, format, RowFilter::All)?;
        println!("planned matrix written to {}", export.display());
    }
    Ok(())
}

#[cfg(feature = "native")]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let data_dir = args.data_dir.unwrap_or_else(default_data_dir);

    init_logging(&data_dir, &args.log_level, args.quiet)?;

    match args.command {
        Command::Plan {
            sweep,
            export,
            format,
            max_rows,
        } => plan(&sweep, export.as_deref(), format, max_rows),
        Command::Check { sweep } => check(&sweep),
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("This binary requires the 'native' feature.");
}
