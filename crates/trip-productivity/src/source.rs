//! Record store access
//!
//! The store exposes `load(resource) -> list of records`. Two backends are
//! provided: a directory of JSON files and the REST endpoint of the
//! back-office. A report needs all five collections, so they are fetched
//! concurrently and any single failure fails the whole load.

use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::LoadError;
use crate::report::Snapshot;

/// Anything that can load a named collection of raw records
pub trait RecordSource {
    fn load(&self, resource: &str) -> impl Future<Output = Result<Vec<Value>, LoadError>> + Send;
}

/// Collection names in the record store
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub trips: String,
    pub manifests: String,
    pub general_bookings: String,
    pub part_load_bookings: String,
    pub full_load_bookings: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            trips: constants::TRIPS_RESOURCE.to_string(),
            manifests: constants::MANIFESTS_RESOURCE.to_string(),
            general_bookings: constants::GENERAL_BOOKINGS_RESOURCE.to_string(),
            part_load_bookings: constants::PART_LOAD_BOOKINGS_RESOURCE.to_string(),
            full_load_bookings: constants::FULL_LOAD_BOOKINGS_RESOURCE.to_string(),
        }
    }
}

/// Load every collection a report needs, concurrently
pub async fn load_snapshot<S: RecordSource>(
    source: &S,
    resources: &Resources,
) -> Result<Snapshot, LoadError> {
    let (trips, manifests, general_bookings, part_load_bookings, full_load_bookings) = tokio::try_join!(
        source.load(&resources.trips),
        source.load(&resources.manifests),
        source.load(&resources.general_bookings),
        source.load(&resources.part_load_bookings),
        source.load(&resources.full_load_bookings),
    )?;

    Ok(Snapshot {
        trips,
        manifests,
        general_bookings,
        part_load_bookings,
        full_load_bookings,
    })
}

/// Accept either a bare array or an object wrapping one under `data`
fn extract_records(resource: &str, body: Value) -> Result<Vec<Value>, LoadError> {
    match body {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove(constants::RECORDS_ENVELOPE_KEY) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(LoadError::NotAList {
                resource: resource.to_string(),
            }),
        },
        _ => Err(LoadError::NotAList {
            resource: resource.to_string(),
        }),
    }
}

// =============================================================================
// JSON files
// =============================================================================

/// Reads `<data_dir>/<resource>.json`
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, resource: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", resource))
    }
}

impl RecordSource for FileSource {
    async fn load(&self, resource: &str) -> Result<Vec<Value>, LoadError> {
        let path = self.path_for(resource);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| LoadError::Io {
                resource: resource.to_string(),
                source,
            })?;
        let body: Value = serde_json::from_str(&content).map_err(|source| LoadError::Json {
            resource: resource.to_string(),
            source,
        })?;
        extract_records(resource, body)
    }
}

// =============================================================================
// REST record store
// =============================================================================

/// Fetches `GET <base_url>/<resource>`
#[derive(Debug, Clone)]
pub struct RestSource {
    client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl RestSource {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }
}

impl RecordSource for RestSource {
    async fn load(&self, resource: &str) -> Result<Vec<Value>, LoadError> {
        let http_error = |source| LoadError::Http {
            resource: resource.to_string(),
            source,
        };

        let mut request = self.client.get(self.url_for(resource));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(http_error)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LoadError::Status {
                resource: resource.to_string(),
                status,
                body,
            });
        }

        let body: Value = response.json().await.map_err(http_error)?;
        extract_records(resource, body)
    }
}
