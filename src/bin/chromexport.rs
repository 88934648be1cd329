use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use chromexport::app::{self, App, ExportOptions};
use chromexport::domain::GenomeId;
use chromexport::ncbi::NcbiHttpClient;

#[derive(Parser)]
#[command(name = "chromexport")]
#[command(about = "Export per-chromosome metadata for NCBI genome assemblies to CSV")]
#[command(version, author)]
#[command(group = ArgGroup::new("input").required(true).multiple(false))]
struct Cli {
    /// NCBI genome assembly accession (e.g. GCA_023547065.1)
    #[arg(group = "input")]
    genome_id: Option<String>,

    /// File with genome accessions, one per line
    #[arg(long, short = 'f', value_name = "PATH", group = "input")]
    file: Option<PathBuf>,

    /// Output CSV path (default: chromosomes.csv, or <accession>_chromosomes.csv in single mode)
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<String>,

    /// Include unplaced scaffolds (default: chromosomes only)
    #[arg(long)]
    include_unplaced: bool,

    /// Columns to exclude from the output (space- or comma-separated)
    #[arg(long, value_name = "COLUMN", num_args = 1..)]
    exclude_col: Vec<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = ExportOptions {
        include_unplaced: cli.include_unplaced,
        excluded_columns: split_excluded(&cli.exclude_col),
    };

    let client = NcbiHttpClient::new().into_diagnostic()?;
    let app = App::new(client);

    if let Some(list_path) = cli.file {
        let genome_ids = app::read_genome_list(&list_path).into_diagnostic()?;
        let output_path = app::resolve_output_path(cli.output.as_deref(), None);
        app.export_batch(&genome_ids, &options, &output_path)
            .into_diagnostic()?;
    } else {
        let Some(raw_id) = cli.genome_id else {
            return Err(miette::Report::msg(
                "either a genome accession or --file is required",
            ));
        };
        let genome_id: GenomeId = raw_id.parse().into_diagnostic()?;
        let output_path = app::resolve_output_path(cli.output.as_deref(), Some(&genome_id));
        app.export_single(&genome_id, &options, &output_path)
            .into_diagnostic()?;
    }

    Ok(())
}

/// `--exclude-col` values may come space-separated from clap or comma-joined
/// in a single argument.
fn split_excluded(raw: &[String]) -> Vec<String> {
    raw.iter()
        .flat_map(|value| value.split(','))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}
