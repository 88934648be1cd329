use std::fs;
use std::sync::Mutex;

use serde_json::{Value, json};

use chromexport::app::{App, ExportOptions};
use chromexport::domain::GenomeId;
use chromexport::error::ExportError;
use chromexport::ncbi::{self, DatasetsClient, SequencePage};

/// Serves one queued sequence page per call (`None` simulates a transport
/// failure) regardless of the requested accession or token.
struct MockDatasets {
    pages: Vec<Option<SequencePage>>,
    dataset_report: Option<Value>,
    calls: Mutex<usize>,
}

impl MockDatasets {
    fn new(pages: Vec<Option<SequencePage>>, dataset_report: Option<Value>) -> Self {
        Self {
            pages,
            dataset_report,
            calls: Mutex::new(0),
        }
    }
}

impl DatasetsClient for MockDatasets {
    fn fetch_sequence_page(
        &self,
        _genome_id: &GenomeId,
        _page_token: Option<&str>,
    ) -> Result<SequencePage, ExportError> {
        let mut idx = self.calls.lock().unwrap();
        let page = self.pages.get(*idx).cloned();
        *idx += 1;
        match page {
            Some(Some(page)) => Ok(page),
            _ => Err(ExportError::NcbiHttp("connection reset".to_string())),
        }
    }

    fn fetch_dataset_report(&self, _genome_id: &GenomeId) -> Result<Value, ExportError> {
        self.dataset_report
            .clone()
            .ok_or_else(|| ExportError::NcbiStatus {
                status: 404,
                message: "not found".to_string(),
            })
    }
}

fn report(name: &str) -> Value {
    json!({
        "assigned_molecule_location_type": "Chromosome",
        "chr_name": name,
        "genbank_accession": format!("CM00{name}.1"),
        "length": 500_000,
        "gc_percent": 38.46,
    })
}

fn page(names: &[&str], next_page_token: Option<&str>) -> SequencePage {
    SequencePage {
        reports: names.iter().map(|n| report(n)).collect(),
        next_page_token: next_page_token.map(str::to_string),
    }
}

fn dataset_report(organism: &str) -> Value {
    json!({
        "reports": [{ "organism": { "organism_name": organism } }]
    })
}

fn id(value: &str) -> GenomeId {
    value.parse().unwrap()
}

#[test]
fn pagination_accumulates_pages_in_order() {
    let client = MockDatasets::new(
        vec![
            Some(page(&["1", "2"], Some("token-1"))),
            Some(page(&["3"], None)),
        ],
        None,
    );

    let reports = ncbi::fetch_all_sequence_reports(&client, &id("GCF_000005845.2"));
    let names: Vec<&str> = reports
        .iter()
        .map(|r| r["chr_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["1", "2", "3"]);
}

#[test]
fn transport_failure_mid_pagination_yields_partial_results() {
    let client = MockDatasets::new(vec![Some(page(&["1", "2"], Some("token-1"))), None], None);

    let reports = ncbi::fetch_all_sequence_reports(&client, &id("GCF_000005845.2"));
    assert_eq!(reports.len(), 2);
}

#[test]
fn organism_name_defaults_to_unknown_on_failure() {
    let client = MockDatasets::new(Vec::new(), None);
    let name = ncbi::fetch_organism_name(&client, &id("GCF_000005845.2"));
    assert_eq!(name, "Unknown");
}

#[test]
fn organism_name_extracted_from_dataset_report() {
    let client = MockDatasets::new(Vec::new(), Some(dataset_report("Escherichia coli")));
    let name = ncbi::fetch_organism_name(&client, &id("GCF_000005845.2"));
    assert_eq!(name, "Escherichia coli");
}

#[test]
fn mapping_error_empties_rows_but_keeps_organism() {
    let bad_page = SequencePage {
        reports: vec![report("1"), json!("not-an-object")],
        next_page_token: None,
    };
    let client = MockDatasets::new(vec![Some(bad_page)], Some(dataset_report("Mus musculus")));
    let app = App::new(client);

    let (rows, organism) = app.fetch_table(&id("GCF_000001635.27"), false);
    assert!(rows.is_empty());
    assert_eq!(organism, "Mus musculus");
}

#[test]
fn fetch_table_sorts_into_conventional_order() {
    let client = MockDatasets::new(
        vec![Some(page(&["chrX", "chr10", "chr2", "chrMT"], None))],
        Some(dataset_report("Homo sapiens")),
    );
    let app = App::new(client);

    let (rows, _) = app.fetch_table(&id("GCF_000001405.40"), false);
    let labels: Vec<&str> = rows.iter().map(|r| r.chromosome.as_str()).collect();
    assert_eq!(labels, vec!["chr2", "chr10", "chrX", "chrMT"]);
}

#[test]
fn batch_export_shares_one_header_across_assemblies() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chromosomes.csv");

    // One page per assembly; the mock serves them in call order.
    let client = MockDatasets::new(
        vec![Some(page(&["1", "2"], None)), Some(page(&["1"], None))],
        Some(dataset_report("Saccharomyces cerevisiae")),
    );
    let app = App::new(client);

    let ids = [id("GCA_000146045.2"), id("GCA_000002945.2")];
    let written = app
        .export_batch(&ids, &ExportOptions::default(), &out)
        .unwrap();
    assert_eq!(written, 3);

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[0],
        "GenomeID,Taxon,Chromosome,GenBank,RefSeq,Size (bp),GC content (%)"
    );
    assert!(lines[1].starts_with("GCA_000146045.2,"));
    assert!(lines[2].starts_with("GCA_000146045.2,"));
    assert!(lines[3].starts_with("GCA_000002945.2,"));
    assert_eq!(lines.iter().filter(|l| l.starts_with("GenomeID")).count(), 1);
}

#[test]
fn batch_continues_past_assembly_with_no_data() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("chromosomes.csv");

    // First assembly fails outright, second succeeds.
    let client = MockDatasets::new(
        vec![None, Some(page(&["1"], None))],
        Some(dataset_report("Danio rerio")),
    );
    let app = App::new(client);

    let ids = [id("GCA_000000001.1"), id("GCF_000002035.6")];
    let written = app
        .export_batch(&ids, &ExportOptions::default(), &out)
        .unwrap();
    assert_eq!(written, 1);

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("GCF_000002035.6,"));
}

#[test]
fn single_export_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");
    fs::write(&out, "stale content\n").unwrap();

    let client = MockDatasets::new(
        vec![Some(page(&["1"], None))],
        Some(dataset_report("Apis mellifera")),
    );
    let app = App::new(client);

    app.export_single(&id("GCA_003254395.2"), &ExportOptions::default(), &out)
        .unwrap();

    let content = fs::read_to_string(&out).unwrap();
    assert!(content.starts_with("GenomeID,"));
    assert!(!content.contains("stale content"));
}

#[test]
fn excluded_columns_are_dropped_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.csv");

    let client = MockDatasets::new(
        vec![Some(page(&["1"], None))],
        Some(dataset_report("Apis mellifera")),
    );
    let app = App::new(client);

    let options = ExportOptions {
        include_unplaced: false,
        excluded_columns: vec!["RefSeq".to_string()],
    };
    app.export_single(&id("GCA_003254395.2"), &options, &out)
        .unwrap();

    let content = fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines[0],
        "GenomeID,Taxon,Chromosome,GenBank,Size (bp),GC content (%)"
    );
    assert_eq!(
        lines[1],
        "GCA_003254395.2,Apis mellifera,1,CM001.1,500000,38.5"
    );
}
