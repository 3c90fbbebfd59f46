//! Results document retrieval.
//!
//! This module fetches the JSON results document over HTTP (or reads it
//! from disk) and extracts the records of the results table.

use crate::models::ResultRecord;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while obtaining the results table.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a JSON array of datasets")]
    NotAnArray,

    #[error("no table named '{0}' in the document")]
    TableNotFound(String),

    #[error("table '{0}' has no data array")]
    MalformedTable(String),
}

/// Where the results document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    File(PathBuf),
}

impl DataSource {
    /// Interpret a `--source` value: http(s) URLs are fetched, anything
    /// else is a local path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{}", url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for fetching a document.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// HTTP request timeout.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while waiting.
    pub show_progress: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// One entry of the top-level document array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Fetch and parse the document, returning its datasets.
pub async fn fetch_document(
    source: &DataSource,
    options: &FetchOptions,
) -> Result<Vec<Dataset>, SourceError> {
    let body = match source {
        DataSource::Url(url) => fetch_url(url, options).await?,
        DataSource::File(path) => {
            debug!("Reading results document from {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })?
        }
    };

    parse_document(&body)
}

async fn fetch_url(url: &str, options: &FetchOptions) -> Result<String, SourceError> {
    info!("Fetching results document: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(options.timeout_seconds))
        .build()
        .map_err(|source| SourceError::Http {
            url: url.to_string(),
            source,
        })?;

    let spinner = options.show_progress.then(|| loading_spinner(url));

    let result = download(&client, url, options).await;

    if let Some(pb) = spinner {
        match &result {
            Ok(body) => pb.finish_with_message(format!("Downloaded {} bytes", body.len())),
            Err(_) => pb.abandon_with_message("Download failed"),
        }
    }

    result
}

async fn download(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<String, SourceError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| classify(url, e, options))?;

    if !response.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }

    response.text().await.map_err(|e| classify(url, e, options))
}

fn classify(url: &str, err: reqwest::Error, options: &FetchOptions) -> SourceError {
    if err.is_timeout() {
        SourceError::Timeout {
            url: url.to_string(),
            seconds: options.timeout_seconds,
        }
    } else {
        SourceError::Http {
            url: url.to_string(),
            source: err,
        }
    }
}

fn loading_spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(format!("Loading {}", url));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Parse the document text into its datasets.
pub fn parse_document(body: &str) -> Result<Vec<Dataset>, SourceError> {
    let value: Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Err(SourceError::NotAnArray);
    }

    let datasets: Vec<Value> = serde_json::from_value(value)?;

    // Entries that are not objects cannot be tables; keep positions but blank them.
    Ok(datasets
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap_or_default())
        .collect())
}

/// Extract the records of the table with the given name.
pub fn extract_table(
    datasets: &[Dataset],
    table: &str,
) -> Result<Vec<ResultRecord>, SourceError> {
    let dataset = datasets
        .iter()
        .find(|d| d.kind.as_deref() == Some("table") && d.name.as_deref() == Some(table))
        .ok_or_else(|| SourceError::TableNotFound(table.to_string()))?;

    let Some(Value::Array(rows)) = &dataset.data else {
        return Err(SourceError::MalformedTable(table.to_string()));
    };

    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;

    for row in rows {
        if !row.is_object() {
            skipped += 1;
            continue;
        }
        match serde_json::from_value::<ResultRecord>(row.clone()) {
            Ok(record) => records.push(record),
            Err(e) => {
                debug!("Skipping unreadable row: {}", e);
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed rows in table '{}'", skipped, table);
    }
    info!("Extracted {} records from table '{}'", records.len(), table);

    Ok(records)
}
