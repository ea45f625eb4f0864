// CobbleLog - platform/http_store.rs
//
// REST implementation of the log store:
//   GET    {base}/log       -> 200 + JSON array of records
//   DELETE {base}/log/{id}  -> any 2xx
//
// The client keeps a cookie store so session cookies set by the store are
// sent back on later requests (the "credentials included" contract).

use crate::core::store::{collect_records, FetchedRecords, LogStore};
use crate::util::constants;
use crate::util::error::{RequestFailure, StoreError};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::time::Duration;

/// Blocking HTTP client for the log store.
#[derive(Debug, Clone)]
pub struct HttpLogStore {
    client: Client,
    base: Url,
}

impl HttpLogStore {
    /// Build a store client for `base_url` (e.g. `http://localhost:4000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base = parse_base_url(base_url)?;
        let client = Client::builder()
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::ClientBuild { source: e })?;

        tracing::debug!(base = %base, timeout_secs = timeout.as_secs(), "Log store client ready");
        Ok(Self { client, base })
    }

    /// `{base}/log`
    pub fn collection_url(&self) -> Url {
        self.url_with(&[constants::LOG_RESOURCE])
    }

    /// `{base}/log/{id}`, with `id` percent-encoded as a single segment.
    pub fn record_url(&self, id: &str) -> Url {
        self.url_with(&[constants::LOG_RESOURCE, id])
    }

    fn url_with(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // parse_base_url rejected cannot-be-a-base URLs, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

/// Validate a base URL: it must be absolute http(s) and able to carry a path.
pub fn parse_base_url(base_url: &str) -> Result<Url, StoreError> {
    let invalid = |reason: String| StoreError::InvalidUrl {
        url: base_url.to_string(),
        reason,
    };

    let url = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("URL cannot carry a path".to_string()));
    }
    Ok(url)
}

fn status_failure(status: StatusCode) -> RequestFailure {
    RequestFailure::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

impl LogStore for HttpLogStore {
    fn fetch_all(&self) -> Result<FetchedRecords, StoreError> {
        let url = self.collection_url();
        let failed = |cause| StoreError::FetchFailed {
            url: url.to_string(),
            cause,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| failed(RequestFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(status_failure(status)));
        }

        let body = response
            .text()
            .map_err(|e| failed(RequestFailure::Transport(e)))?;
        let items: Vec<serde_json::Value> =
            serde_json::from_str(&body).map_err(|e| failed(RequestFailure::Decode(e)))?;

        let fetched = collect_records(items);
        tracing::info!(
            url = %url,
            records = fetched.records.len(),
            dropped = fetched.malformed.len(),
            "Fetched logs"
        );
        Ok(fetched)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = self.record_url(id);
        let failed = |cause| StoreError::DeleteFailed {
            id: id.to_string(),
            url: url.to_string(),
            cause,
        };

        let response = self
            .client
            .delete(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .send()
            .map_err(|e| failed(RequestFailure::Transport(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(status_failure(status)));
        }

        tracing::info!(id, "Deleted log");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(base: &str) -> HttpLogStore {
        HttpLogStore::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_collection_url() {
        assert_eq!(
            store("http://localhost:4000").collection_url().as_str(),
            "http://localhost:4000/log"
        );
        assert_eq!(
            store("http://localhost:4000/api/").collection_url().as_str(),
            "http://localhost:4000/api/log"
        );
    }

    #[test]
    fn test_record_url_encodes_id() {
        let s = store("http://localhost:4000");
        assert_eq!(
            s.record_url("65f0c0ffee").as_str(),
            "http://localhost:4000/log/65f0c0ffee"
        );
        assert_eq!(
            s.record_url("a/b").as_str(),
            "http://localhost:4000/log/a%2Fb"
        );
    }

    #[test]
    fn test_rejects_unusable_base_urls() {
        assert!(matches!(
            parse_base_url("localhost:4000/log"),
            Err(StoreError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("ftp://example.com"),
            Err(StoreError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(StoreError::InvalidUrl { .. })
        ));
    }
}
