use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::domain::GenomeId;
use crate::error::ExportError;

const NCBI_DATASETS_BASE: &str = "https://api.ncbi.nlm.nih.gov/datasets/v2alpha";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// One page of the sequence_reports endpoint. Raw reports stay loosely typed;
/// the mapper reads fields through default-supplying accessors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SequencePage {
    #[serde(default)]
    pub reports: Vec<Value>,
    pub next_page_token: Option<String>,
}

pub trait DatasetsClient: Send + Sync {
    fn fetch_sequence_page(
        &self,
        genome_id: &GenomeId,
        page_token: Option<&str>,
    ) -> Result<SequencePage, ExportError>;

    fn fetch_dataset_report(&self, genome_id: &GenomeId) -> Result<Value, ExportError>;
}

#[derive(Clone)]
pub struct NcbiHttpClient {
    client: Client,
    base_url: String,
}

impl NcbiHttpClient {
    pub fn new() -> Result<Self, ExportError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("chromexport/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| ExportError::NcbiHttp(err.to_string()))?,
        );

        if let Ok(api_key) = std::env::var("NCBI_API_KEY") {
            if !api_key.trim().is_empty() {
                headers.insert(
                    "api-key",
                    HeaderValue::from_str(api_key.trim())
                        .map_err(|err| ExportError::NcbiHttp(err.to_string()))?,
                );
            }
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ExportError::NcbiHttp(err.to_string()))?;

        Ok(Self {
            client,
            base_url: NCBI_DATASETS_BASE.to_string(),
        })
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ExportError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(|err| ExportError::NcbiHttp(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "NCBI request failed".to_string());
            return Err(ExportError::NcbiStatus { status, message });
        }

        response
            .json()
            .map_err(|err| ExportError::NcbiHttp(err.to_string()))
    }
}

impl DatasetsClient for NcbiHttpClient {
    fn fetch_sequence_page(
        &self,
        genome_id: &GenomeId,
        page_token: Option<&str>,
    ) -> Result<SequencePage, ExportError> {
        let url = format!(
            "{}/genome/accession/{}/sequence_reports",
            self.base_url,
            genome_id.as_str()
        );
        let query: Vec<(&str, &str)> = match page_token {
            Some(token) => vec![("page_token", token)],
            None => Vec::new(),
        };
        self.get_json(&url, &query)
    }

    fn fetch_dataset_report(&self, genome_id: &GenomeId) -> Result<Value, ExportError> {
        let url = format!(
            "{}/genome/accession/{}/dataset_report",
            self.base_url,
            genome_id.as_str()
        );
        self.get_json(&url, &[])
    }
}

/// Follow the page token until exhausted, accumulating reports in arrival
/// order. A failed page ends pagination early; whatever was accumulated is
/// final (no retries, never an error to the caller).
pub fn fetch_all_sequence_reports<C: DatasetsClient>(
    client: &C,
    genome_id: &GenomeId,
) -> Vec<Value> {
    let mut reports = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let page = match client.fetch_sequence_page(genome_id, page_token.as_deref()) {
            Ok(page) => page,
            Err(err) => {
                warn!(genome_id = %genome_id, "error fetching page: {err}");
                break;
            }
        };

        reports.extend(page.reports);

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    reports
}

/// Single dataset_report lookup for the organism display name. Any failure
/// falls back to "Unknown".
pub fn fetch_organism_name<C: DatasetsClient>(client: &C, genome_id: &GenomeId) -> String {
    let report = match client.fetch_dataset_report(genome_id) {
        Ok(report) => report,
        Err(err) => {
            warn!(genome_id = %genome_id, "could not fetch organism name: {err}");
            return "Unknown".to_string();
        }
    };

    report
        .get("reports")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|v| v.get("organism"))
        .and_then(|v| v.get("organism_name"))
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
        .to_string()
}
