//! Seed loaders: fetch the session-initial record list once.

use super::{parse_records_json, SourceError};
use crate::catalog::Record;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Fetches the seed record list.
///
/// Implementors provide [`SeedLoader::load`]; callers use
/// [`SeedLoader::fetch_seed`], which logs any failure and degrades to an
/// empty list. Failed loads are not retried.
#[async_trait]
pub trait SeedLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Record>, SourceError>;

    /// Human readable location, used in logs.
    fn describe(&self) -> String;

    async fn fetch_seed(&self) -> Vec<Record> {
        match self.load().await {
            Ok(records) => {
                info!(
                    "Loaded {} seed records from {}",
                    records.len(),
                    self.describe()
                );
                records
            }
            Err(err) => {
                warn!(
                    "Could not load seed data from {}: {}",
                    self.describe(),
                    err
                );
                Vec::new()
            }
        }
    }
}

/// Reads the seed list from a JSON file.
pub struct FileSeedLoader {
    path: PathBuf,
}

impl FileSeedLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeedLoader for FileSeedLoader {
    async fn load(&self) -> Result<Vec<Record>, SourceError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        parse_records_json(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Downloads the seed list from a URL.
pub struct HttpSeedLoader {
    url: String,
    client: reqwest::Client,
}

impl HttpSeedLoader {
    pub fn new(url: impl Into<String>, timeout_sec: u64) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;
        Ok(Self::with_client(url, client))
    }

    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }
}

#[async_trait]
impl SeedLoader for HttpSeedLoader {
    async fn load(&self) -> Result<Vec<Record>, SourceError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_records_json(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a fixed, already decoded record list.
#[derive(Clone, Default)]
pub struct StaticSeedLoader {
    records: Vec<Record>,
}

impl StaticSeedLoader {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl SeedLoader for StaticSeedLoader {
    async fn load(&self) -> Result<Vec<Record>, SourceError> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}
