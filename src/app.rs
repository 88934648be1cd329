use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::domain::{ChromosomeRow, GenomeId, Projection};
use crate::error::ExportError;
use crate::ncbi::{self, DatasetsClient};
use crate::output;
use crate::table;

#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub include_unplaced: bool,
    pub excluded_columns: Vec<String>,
}

pub struct App<C: DatasetsClient> {
    client: C,
}

impl<C: DatasetsClient> App<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Fetch, classify, and sort the chromosome table for one assembly.
    /// Never fails: transport errors yield partial or empty data, a mapping
    /// error empties the row set for this assembly while keeping whatever
    /// organism name was already resolved.
    pub fn fetch_table(
        &self,
        genome_id: &GenomeId,
        include_unplaced: bool,
    ) -> (Vec<ChromosomeRow>, String) {
        info!(genome_id = %genome_id, "fetching chromosome data from NCBI Datasets API");

        let reports = ncbi::fetch_all_sequence_reports(&self.client, genome_id);
        if reports.is_empty() {
            info!(genome_id = %genome_id, "no sequence reports found in API response");
            return (Vec::new(), "Unknown".to_string());
        }

        let organism = ncbi::fetch_organism_name(&self.client, genome_id);

        match table::build_rows(&reports, genome_id.as_str(), &organism, include_unplaced) {
            Ok(rows) => (rows, organism),
            Err(err) => {
                error!(genome_id = %genome_id, "error parsing chromosome data: {err:?}");
                (Vec::new(), organism)
            }
        }
    }

    /// Single-assembly export into a fresh file.
    pub fn export_single(
        &self,
        genome_id: &GenomeId,
        options: &ExportOptions,
        output_path: &Path,
    ) -> Result<usize, ExportError> {
        let projection = Projection::new(&options.excluded_columns);

        println!("Processing {genome_id}...");
        let (rows, organism) = self.fetch_table(genome_id, options.include_unplaced);
        if rows.is_empty() {
            println!("No chromosome data found for {genome_id}");
            return Ok(0);
        }

        output::truncate(output_path)?;
        let written = output::append_rows(output_path, &rows, &projection)?;
        println!(
            "Data exported to {} ({organism}) - {written} rows",
            output_path.display()
        );
        Ok(written)
    }

    /// Batch export: one shared file, one header, assemblies appended in
    /// order. Per-assembly failures are logged and the batch continues.
    pub fn export_batch(
        &self,
        genome_ids: &[GenomeId],
        options: &ExportOptions,
        output_path: &Path,
    ) -> Result<usize, ExportError> {
        let projection = Projection::new(&options.excluded_columns);

        output::truncate(output_path)?;

        let mut total = 0;
        for genome_id in genome_ids {
            println!("Processing {genome_id}...");
            let (rows, organism) = self.fetch_table(genome_id, options.include_unplaced);
            if rows.is_empty() {
                println!("No chromosome data found for {genome_id}");
                continue;
            }
            let written = output::append_rows(output_path, &rows, &projection)?;
            println!("Data exported for {genome_id} ({organism}) - {written} rows");
            total += written;
        }

        println!("All data exported to {}", output_path.display());
        Ok(total)
    }
}

/// Output-path resolution as a pure function of the inputs: an explicit path
/// wins, a single-mode run defaults to `<id>_chromosomes.csv`, batch mode to
/// `chromosomes.csv`.
pub fn resolve_output_path(provided: Option<&str>, genome_id: Option<&GenomeId>) -> PathBuf {
    match (provided, genome_id) {
        (Some(path), _) => PathBuf::from(path),
        (None, Some(id)) => PathBuf::from(format!("{id}_chromosomes.csv")),
        (None, None) => PathBuf::from("chromosomes.csv"),
    }
}

/// One accession per line; blank lines skipped.
pub fn read_genome_list(path: &Path) -> Result<Vec<GenomeId>, ExportError> {
    let content =
        fs::read_to_string(path).map_err(|_| ExportError::InputRead(path.to_path_buf()))?;
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.parse())
        .collect()
}
