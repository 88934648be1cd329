use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ExportError {
    #[error("invalid genome accession: {0}")]
    InvalidGenomeId(String),

    #[error("NCBI request failed: {0}")]
    NcbiHttp(String),

    #[error("NCBI returned status {status}: {message}")]
    NcbiStatus { status: u16, message: String },

    #[error("malformed sequence report: {0}")]
    MalformedReport(String),

    #[error("failed to read genome list at {0}")]
    InputRead(PathBuf),

    #[error("CSV write failed: {0}")]
    Csv(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
