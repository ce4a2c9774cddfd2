//! GPC Sheets CLI - report extraction and comparison plots

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use gpc_sheets::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gpc")]
#[command(
    author,
    version,
    about = "Extract GPC report data from .xls/.xlsx files and plot MWD/SCB comparisons"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load reports and print every extracted dataset
    Show {
        /// Input report files (xls, xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Plot MWD and SCB curves of the selected reports
    Plot {
        /// Input report files (xls, xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// File name to plot, repeatable (default: the first loaded file)
        #[arg(short, long = "select", value_name = "NAME")]
        select: Vec<String>,

        /// Leave out the molecular weight distribution curves
        #[arg(long)]
        no_mwd: bool,

        /// Leave out the short chain branching curves
        #[arg(long)]
        no_scb: bool,

        /// Write the figure as gpc_comparison_plot.png
        #[arg(short, long)]
        export: bool,

        /// Directory for the exported figure
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// List file names with their sample names
    Names {
        /// Input report files (xls, xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Show { files, json } => show(&files, json),
        Commands::Plot {
            files,
            select,
            no_mwd,
            no_scb,
            export,
            output,
        } => plot_files(&files, select, !no_mwd, !no_scb, export.then_some(output.as_path())),
        Commands::Names { files } => list_names(&files),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Load every file, reporting failures and carrying on with the rest.
fn load(files: &[PathBuf]) -> Session {
    let mut session = Session::new();
    for err in session.load_batch(files) {
        eprintln!("Error: {err}");
    }
    log::debug!("loaded {} of {} files", session.len(), files.len());
    session
}

fn show(files: &[PathBuf], json: bool) -> Result<()> {
    let session = load(files);

    if json {
        let records: Vec<serde_json::Value> = session
            .iter()
            .map(|(name, record)| {
                Ok(serde_json::json!({
                    "file": name,
                    "record": serde_json::to_value(record)?,
                }))
            })
            .collect::<serde_json::Result<_>>()
            .context("Failed to serialize records")?;
        let text = serde_json::to_string_pretty(&records).context("Failed to serialize records")?;
        writeln!(io::stdout(), "{text}").context("Failed to write to stdout")?;
    } else {
        write!(io::stdout(), "{}", SessionDisplay(&session)).context("Failed to write to stdout")?;
    }

    Ok(())
}

fn plot_files(
    files: &[PathBuf],
    select: Vec<String>,
    show_mwd: bool,
    show_scb: bool,
    export_dir: Option<&Path>,
) -> Result<()> {
    let session = load(files);

    let selection = if select.is_empty() {
        session.file_names().take(1).map(str::to_string).collect()
    } else {
        select
    };

    let request = PlotRequest {
        selection,
        show_mwd,
        show_scb,
    };
    let outcome = plot(&session, &request);

    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    let Some(figure) = outcome.figure else {
        return Ok(());
    };

    let chart = figure.chart();
    println!(
        "{}: {} line(s)",
        chart.title.as_deref().unwrap_or_default(),
        chart.series.len()
    );
    for series in chart.legend_entries() {
        println!(
            "  {} ({} points, {})",
            series.name.as_deref().unwrap_or_default(),
            series.len(),
            series.color
        );
    }

    if let Some(dir) = export_dir {
        let png = figure.export_png().context("Failed to render the figure")?;
        let path = dir.join(EXPORT_FILE_NAME);
        std::fs::write(&path, &png)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote {} bytes to '{}'", png.len(), path.display());
    }

    Ok(())
}

fn list_names(files: &[PathBuf]) -> Result<()> {
    let session = load(files);
    let mut stdout = io::stdout().lock();

    for name in session.file_names() {
        let sample = session.sample_name(name).unwrap_or_default();
        writeln!(stdout, "{name}\t{sample}").context("Failed to write to stdout")?;
    }

    Ok(())
}
