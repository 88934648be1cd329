use serde_json::Value;

use crate::domain::ChromosomeRow;
use crate::error::ExportError;
use crate::order;

/// Decide inclusion for every raw sequence report and map the kept ones into
/// normalized rows, sorted into conventional chromosome order.
///
/// All-or-nothing per assembly: a report entry with an unexpected shape fails
/// the whole call, so the caller never emits a partial table.
pub fn build_rows(
    reports: &[Value],
    genome_id: &str,
    organism: &str,
    include_unplaced: bool,
) -> Result<Vec<ChromosomeRow>, ExportError> {
    let mut rows = Vec::new();

    for report in reports {
        if !report.is_object() {
            return Err(ExportError::MalformedReport(format!(
                "expected a JSON object, got {report}"
            )));
        }

        let location_type = str_field(report, "assigned_molecule_location_type").unwrap_or("");
        let role = str_field(report, "role").unwrap_or("");

        let is_chromosome = location_type == "Chromosome";
        let is_assembled = role == "assembled-molecule";

        if !is_chromosome && !(include_unplaced && is_assembled) {
            continue;
        }

        let chromosome = str_field(report, "chr_name")
            .or_else(|| str_field(report, "assigned_molecule"))
            .unwrap_or("N/A")
            .to_string();

        // Chromosome-typed records should not carry "Un", but filter
        // explicitly anyway.
        if !include_unplaced && chromosome == "Un" {
            continue;
        }

        rows.push(ChromosomeRow {
            genome_id: genome_id.to_string(),
            taxon: organism.to_string(),
            chromosome,
            genbank: str_field(report, "genbank_accession")
                .unwrap_or("N/A")
                .to_string(),
            // Lowercase default kept as-is for output compatibility with the
            // historical exporter.
            refseq: str_field(report, "refseq_accession")
                .unwrap_or("n/a")
                .to_string(),
            size_bp: report.get("length").and_then(|v| v.as_u64()).unwrap_or(0),
            gc_percent: gc_field(report),
        });
    }

    order::sort_rows(&mut rows);
    Ok(rows)
}

fn str_field<'a>(report: &'a Value, key: &str) -> Option<&'a str> {
    report.get(key).and_then(|v| v.as_str())
}

/// GC percent rounded to one decimal. A value of exactly zero is treated the
/// same as a missing field; a genuine 0.0% sequence is therefore emitted as
/// empty. Known limitation, preserved for output compatibility.
fn gc_field(report: &Value) -> Option<f64> {
    let gc = report.get("gc_percent").and_then(|v| v.as_f64())?;
    if gc == 0.0 {
        return None;
    }
    Some((gc * 10.0).round() / 10.0)
}
