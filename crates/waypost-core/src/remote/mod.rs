//! Remote service client.
//!
//! The remote is a small JSON CRUD service and is strictly best-effort: every
//! transport failure, timeout, non-2xx status, or unparseable body collapses
//! into [`Error::RemoteUnavailable`], which callers log and fall back from.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{RecordId, SyncRecord};
use crate::util::{compact_text, is_http_url, normalize_text_option};

const REMOTE_HTTP_TIMEOUT_SECS: u64 = 4;

/// Port for one remote record collection.
///
/// Implemented for markers and drawings alike by [`HttpRemote`]; tests supply
/// their own recording or failing implementations.
#[async_trait]
pub trait RemoteCollection<R: SyncRecord>: Send + Sync {
    /// Fetch the full remote collection.
    async fn fetch_all(&self) -> Result<Vec<R>>;

    /// Append one record to the remote collection.
    async fn push(&self, record: &R) -> Result<()>;

    /// Replace the entire remote collection with the client's ("client wins").
    async fn sync_all(&self, records: &[R]) -> Result<()>;

    /// Delete one record by id; the remote treats absent ids as a no-op.
    async fn delete(&self, id: &RecordId) -> Result<()>;
}

/// HTTP client for the Waypost API.
#[derive(Clone)]
pub struct HttpRemote {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpRemote {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.into())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REMOTE_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|error| Error::RemoteUnavailable(format!("build HTTP client: {error}")))?;
        Ok(Self { base_url, client })
    }

    /// Liveness probe against `/api/health`.
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/api/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(unavailable)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::RemoteUnavailable(format!(
                "health check returned HTTP {}",
                status.as_u16()
            )));
        }
        let payload = response
            .json::<HealthResponse>()
            .await
            .map_err(unavailable)?;
        if payload.status == "ok" {
            Ok(())
        } else {
            Err(Error::RemoteUnavailable(format!(
                "health status was '{}'",
                compact_text(&payload.status)
            )))
        }
    }

    fn collection_url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    async fn expect_success(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::RemoteUnavailable(format!(
                "{context} returned HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )))
        }
    }
}

#[async_trait]
impl<R: SyncRecord> RemoteCollection<R> for HttpRemote {
    async fn fetch_all(&self) -> Result<Vec<R>> {
        let url = self.collection_url(R::COLLECTION.remote_path());
        let response = self.client.get(&url).send().await.map_err(unavailable)?;
        let response = Self::expect_success(response, "fetch").await?;
        response.json::<Vec<R>>().await.map_err(unavailable)
    }

    async fn push(&self, record: &R) -> Result<()> {
        let url = self.collection_url(R::COLLECTION.remote_path());
        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(unavailable)?;
        Self::expect_success(response, "push").await?;
        Ok(())
    }

    async fn sync_all(&self, records: &[R]) -> Result<()> {
        let url = format!(
            "{}/sync",
            self.collection_url(R::COLLECTION.remote_path())
        );
        let response = self
            .client
            .post(&url)
            .json(records)
            .send()
            .await
            .map_err(unavailable)?;
        Self::expect_success(response, "sync").await?;
        Ok(())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let url = format!("{}/{id}", self.collection_url(R::COLLECTION.remote_path()));
        let response = self.client.delete(&url).send().await.map_err(unavailable)?;
        Self::expect_success(response, "delete").await?;
        Ok(())
    }
}

fn unavailable(error: reqwest::Error) -> Error {
    Error::RemoteUnavailable(error.to_string())
}

fn normalize_base_url(raw: String) -> Result<String> {
    let base_url = normalize_text_option(Some(raw))
        .ok_or_else(|| Error::RemoteUnavailable("base URL must not be empty".to_string()))?;
    if is_http_url(&base_url) {
        Ok(base_url.trim_end_matches('/').to_string())
    } else {
        Err(Error::RemoteUnavailable(
            "base URL must include http:// or https://".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url(String::new()).is_err());
        assert!(normalize_base_url("api.example.com".to_string()).is_err());
    }

    #[test]
    fn normalize_base_url_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:3001/".to_string()).unwrap(),
            "http://localhost:3001"
        );
    }

    #[test]
    fn collection_urls_follow_api_layout() {
        let remote = HttpRemote::new("http://localhost:3001").unwrap();
        assert_eq!(
            remote.collection_url("markers"),
            "http://localhost:3001/api/markers"
        );
        assert_eq!(
            remote.collection_url("drawings"),
            "http://localhost:3001/api/drawings"
        );
    }
}
