//! Remote wiki API client
//!
//! This module issues the individual HTTP calls the crawler is built from:
//! one call per listing window and one call per content version. It owns
//! error classification — transport, timeout, auth, status, decode — so the
//! crawler can decide failure scope without inspecting HTTP details.

mod wire;

pub use wire::{ContentEnvelope, Page, PageEnvelope, Space, SpaceEnvelope};

use crate::config::SourceConfig;
use crate::ClientError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Client for a single wiki instance at a fixed base URL.
///
/// Cheap to share; all state is immutable after construction. Credentials,
/// when present, are attached to every request as HTTP basic auth.
pub struct ConfluenceClient {
    http: Client,
    base_url: String,
    username: Option<String>,
    token: Option<String>,
}

impl ConfluenceClient {
    /// Creates a client for the wiki described by `source`.
    ///
    /// The trailing slash on the base URL, if any, is dropped so URL
    /// assembly stays uniform.
    pub fn new(source: &SourceConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("wikisift/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(ConfluenceClient {
            http,
            base_url: source.base_url.trim_end_matches('/').to_string(),
            username: source.username.clone(),
            token: source.token.clone(),
        })
    }

    /// Fetches one window of the space listing starting at `start`.
    pub async fn spaces(&self, start: usize) -> Result<SpaceEnvelope, ClientError> {
        let url = format!("{}/rest/api/space?start={}", self.base_url, start);
        self.get_json(url).await
    }

    /// Fetches one window of a space's page listing starting at `start`.
    pub async fn pages(&self, space_key: &str, start: usize) -> Result<PageEnvelope, ClientError> {
        let url = format!(
            "{}/rest/api/space/{}/content?start={}",
            self.base_url, space_key, start
        );
        self.get_json(url).await
    }

    /// Fetches one version of a page's content.
    ///
    /// `version == 0` requests the current body; a positive value requests
    /// that exact historical snapshot.
    pub async fn content(&self, page_id: &str, version: i64) -> Result<ContentEnvelope, ClientError> {
        let url = self.content_url(page_id, version);
        self.get_json(url).await
    }

    /// API URL for one content version; recorded on items as the source URL.
    pub fn content_url(&self, page_id: &str, version: i64) -> String {
        let mut url = format!(
            "{}/rest/api/content/{}?expand=body.storage.value,version,history.previousVersion",
            self.base_url, page_id
        );
        if version > 0 {
            url.push_str(&format!("&status=historical&version={}", version));
        }
        url
    }

    /// Human-facing URL for a page; findings are attributed to it.
    pub fn display_url(&self, space_key: &str, page_id: &str) -> String {
        format!("{}/spaces/{}/pages/{}", self.base_url, space_key, page_id)
    }

    /// Issues one GET, classifies failures, and decodes the JSON envelope.
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
    ) -> Result<T, ClientError> {
        let mut request = self.http.get(&url);
        if let (Some(username), Some(token)) = (&self.username, &self.token) {
            request = request.basic_auth(username, Some(token));
        }

        let response = request.send().await.map_err(|source| {
            if source.is_timeout() {
                ClientError::Timeout { url: url.clone() }
            } else {
                ClientError::Transport {
                    url: url.clone(),
                    source,
                }
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ClientError::Auth {
                url,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ClientError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| {
            if source.is_timeout() {
                ClientError::Timeout { url: url.clone() }
            } else {
                ClientError::Transport {
                    url: url.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&body).map_err(|source| ClientError::Decode { url, source })
    }
}
