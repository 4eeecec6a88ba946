//! Loader - fetches the venue list and suburb groups documents
//!
//! Either document may be a local path or an http(s) URL. Both are loaded
//! concurrently, parsed, and handed to `VenueStore::from_records`.

use crate::domain::store::{LoadReport, VenueStore};
use crate::domain::suburb_groups::SuburbGroups;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Where a JSON document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl std::str::FromStr for DataSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Ok(DataSource::Url(s.to_string()))
        } else {
            Ok(DataSource::File(PathBuf::from(s)))
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

pub struct Loader {
    client: reqwest::Client,
}

impl Loader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }

    /// Raw document text
    pub async fn fetch_text(&self, source: &DataSource) -> Result<String> {
        let text = match source {
            DataSource::File(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading {}", path.display()))?,
            DataSource::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("requesting {url}"))?;
                let status = response.status();
                if !status.is_success() {
                    bail!("{url} returned {status}");
                }
                response.text().await.with_context(|| format!("reading body of {url}"))?
            }
        };
        debug!(source = %source, bytes = text.len(), "document_fetched");
        Ok(text)
    }

    pub async fn load_venue_records(&self, source: &DataSource) -> Result<Vec<serde_json::Value>> {
        let text = self.fetch_text(source).await?;
        parse_venue_records(&text).with_context(|| format!("parsing venues from {source}"))
    }

    /// No source means no groups; every suburb then lands in "Others"
    pub async fn load_suburb_groups(&self, source: Option<&DataSource>) -> Result<SuburbGroups> {
        let Some(source) = source else {
            return Ok(SuburbGroups::new());
        };
        let text = self.fetch_text(source).await?;
        parse_suburb_groups(&text).with_context(|| format!("parsing suburb groups from {source}"))
    }

    pub async fn load_store(
        &self,
        venues: &DataSource,
        groups: Option<&DataSource>,
    ) -> Result<(VenueStore, LoadReport)> {
        let (records, groups) =
            tokio::try_join!(self.load_venue_records(venues), self.load_suburb_groups(groups))?;
        let (store, report) = VenueStore::from_records(records, groups);
        info!(source = %venues, loaded = report.loaded, skipped = report.skipped, "venues_loaded");
        Ok((store, report))
    }
}

/// Top level must be an array; each element is validated later
pub fn parse_venue_records(text: &str) -> Result<Vec<serde_json::Value>> {
    let value: serde_json::Value = serde_json::from_str(text).context("invalid JSON")?;
    match value {
        serde_json::Value::Array(records) => Ok(records),
        other => bail!("expected an array of venues, found {}", json_kind(&other)),
    }
}

pub fn parse_suburb_groups(text: &str) -> Result<SuburbGroups> {
    serde_json::from_str(text).context("expected an object mapping group labels to suburb arrays")
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
