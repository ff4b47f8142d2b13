//! Documentation version records and the fetch lifecycle

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::documentation::error::FetchError;

/// Viewer mount path used when the service does not report one
pub const DEFAULT_PREFIX: &str = "/documentation";

/// A single generated documentation version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub id: String,
    /// `None` when the version has never been generated
    pub generated_at: Option<DateTime<Utc>>,
}

impl VersionRecord {
    pub fn new(id: impl Into<String>, generated_at: Option<DateTime<Utc>>) -> Self {
        Self {
            id: id.into(),
            generated_at,
        }
    }
}

/// Versions returned by one fetch, in service order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionListResult {
    pub versions: Vec<VersionRecord>,
    pub current_version: Option<String>,
    pub prefix: String,
}

impl VersionListResult {
    pub fn new(versions: Vec<VersionRecord>) -> Self {
        Self {
            versions,
            current_version: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_current_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = Some(version.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.versions.iter().any(|v| v.id == id)
    }
}

/// Lifecycle of one asynchronous version-list load
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Success(VersionListResult),
    Failure(FetchError),
}

impl FetchState {
    pub fn result(&self) -> Option<&VersionListResult> {
        match self {
            FetchState::Success(result) => Some(result),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionsResponse {
    versions: Vec<VersionEntry>,
    #[serde(default)]
    current_version: Option<String>,
    #[serde(default)]
    prefix: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VersionEntry {
    id: String,
    #[serde(default)]
    generated_at: Option<String>,
}

/// Parse the body of the versions endpoint
///
/// Rejects empty or duplicated ids and timestamps in an unknown format.
pub fn parse_versions_response(body: &str) -> Result<VersionListResult, FetchError> {
    let response: VersionsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let mut seen = HashSet::new();
    let mut versions = Vec::with_capacity(response.versions.len());
    for entry in response.versions {
        if !is_valid_version_id(&entry.id) {
            return Err(FetchError::Parse(format!("invalid version id: {:?}", entry.id)));
        }
        if !seen.insert(entry.id.clone()) {
            return Err(FetchError::Parse(format!(
                "duplicate version id: {}",
                entry.id
            )));
        }
        let generated_at = match entry.generated_at.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_timestamp(raw).ok_or_else(|| {
                FetchError::Parse(format!("invalid generatedAt for {}: {}", entry.id, raw))
            })?),
        };
        versions.push(VersionRecord::new(entry.id, generated_at));
    }

    let prefix = response
        .prefix
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_PREFIX.to_string());

    Ok(VersionListResult {
        versions,
        current_version: response.current_version.filter(|v| !v.is_empty()),
        prefix,
    })
}

/// Whether an id can address its own resource as a single URL path segment
///
/// `.` and `..` are collapsed by URL normalization and `\` is a path
/// separator for http URLs, so those would reach a different endpoint.
pub fn is_valid_version_id(id: &str) -> bool {
    !id.trim().is_empty() && id != "." && id != ".." && !id.contains('\\')
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM-DD` (both as UTC)
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
