use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Column display names in canonical output order.
pub const COLUMNS: [&str; 7] = [
    "GenomeID",
    "Taxon",
    "Chromosome",
    "GenBank",
    "RefSeq",
    "Size (bp)",
    "GC content (%)",
];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomeId(String);

impl GenomeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GenomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GenomeId {
    type Err = ExportError;

    // Accessions are passed through to the API as-is; the only thing we
    // refuse is an empty identifier.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_string();
        if normalized.is_empty() {
            return Err(ExportError::InvalidGenomeId(value.to_string()));
        }
        Ok(Self(normalized))
    }
}

/// One normalized output record for a single assembled sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromosomeRow {
    pub genome_id: String,
    pub taxon: String,
    pub chromosome: String,
    pub genbank: String,
    pub refseq: String,
    pub size_bp: u64,
    pub gc_percent: Option<f64>,
}

impl ChromosomeRow {
    /// Cell values in `COLUMNS` order. A missing GC percent serializes as an
    /// empty cell.
    pub fn values(&self) -> [String; 7] {
        [
            self.genome_id.clone(),
            self.taxon.clone(),
            self.chromosome.clone(),
            self.genbank.clone(),
            self.refseq.clone(),
            self.size_bp.to_string(),
            self.gc_percent
                .map(|gc| format!("{gc:.1}"))
                .unwrap_or_default(),
        ]
    }
}

/// Column selection applied to header and rows alike. Built from an exclusion
/// set of display names; only removes columns, never adds or renames.
#[derive(Debug, Clone)]
pub struct Projection {
    keep: Vec<usize>,
}

impl Projection {
    pub fn new(excluded: &[String]) -> Self {
        let keep = COLUMNS
            .iter()
            .enumerate()
            .filter(|(_, name)| !excluded.iter().any(|ex| ex == *name))
            .map(|(idx, _)| idx)
            .collect();
        Self { keep }
    }

    pub fn identity() -> Self {
        Self::new(&[])
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.keep.iter().map(|&idx| COLUMNS[idx]).collect()
    }

    pub fn project(&self, row: &ChromosomeRow) -> Vec<String> {
        let values = row.values();
        self.keep.iter().map(|&idx| values[idx].clone()).collect()
    }
}
