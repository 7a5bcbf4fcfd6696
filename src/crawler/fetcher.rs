//! Content retrieval for a single page version
//!
//! Each call fetches exactly one version of one page and reports the
//! previous-version pointer, if any. The sequential walk down a page's
//! history chain lives in the coordinator; this module stays one request
//! deep.

use crate::client::{ConfluenceClient, Page};
use crate::ClientError;

/// One retrieved body, addressed well enough for a report to point a
/// reader back at it.
#[derive(Debug, Clone)]
pub struct ContentItem {
    /// The page body in storage format.
    pub body: String,

    /// The API URL the body was retrieved from.
    pub source_url: String,

    /// The human-facing page URL findings are attributed to.
    pub display_url: String,

    /// Key of the owning space.
    pub space_key: String,

    /// ID of the page.
    pub page_id: String,

    /// 0 for the current body, the snapshot number otherwise.
    pub version: i64,
}

/// Result of fetching one version: the item plus chain information.
#[derive(Debug)]
pub struct FetchedVersion {
    pub item: ContentItem,

    /// Version number the server reported for this body.
    pub number: Option<i64>,

    /// Previous version to fetch next; `None` when the chain is exhausted
    /// (a pointer of zero counts as exhausted, not as a version).
    pub previous_version: Option<i64>,
}

/// Fetches one version of `page`'s content.
///
/// `version == 0` requests the current body; a positive value requests that
/// exact historical snapshot. A missing body decodes as an empty string
/// rather than an error, since pages with no storage body are legitimate.
pub async fn fetch_content(
    client: &ConfluenceClient,
    space_key: &str,
    page: &Page,
    version: i64,
) -> Result<FetchedVersion, ClientError> {
    let envelope = client.content(&page.id, version).await?;

    let body = envelope
        .body
        .and_then(|b| b.storage)
        .map(|s| s.value)
        .unwrap_or_default();

    let number = envelope.version.map(|v| v.number);
    let previous_version = envelope
        .history
        .and_then(|h| h.previous_version)
        .map(|v| v.number)
        .filter(|n| *n > 0);

    let item = ContentItem {
        body,
        source_url: client.content_url(&page.id, version),
        display_url: client.display_url(space_key, &page.id),
        space_key: space_key.to_string(),
        page_id: page.id.clone(),
        version,
    };

    Ok(FetchedVersion {
        item,
        number,
        previous_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> ConfluenceClient {
        let source = SourceConfig {
            base_url: base_url.to_string(),
            username: None,
            token: None,
            spaces: vec![],
            history: false,
        };
        ConfluenceClient::new(&source, Duration::from_secs(5)).unwrap()
    }

    fn test_page(id: &str) -> Page {
        serde_json::from_str(&format!(
            r#"{{"id":"{}","type":"page","title":"Test Page"}}"#,
            id
        ))
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_current_version() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"body":{"storage":{"value":"<p>secret stuff</p>"}},
                    "history":{"previousVersion":{"number":3}},
                    "version":{"number":4}}"#,
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = fetch_content(&client, "DEV", &test_page("123"), 0)
            .await
            .unwrap();

        assert_eq!(fetched.item.body, "<p>secret stuff</p>");
        assert_eq!(fetched.item.space_key, "DEV");
        assert_eq!(fetched.item.page_id, "123");
        assert_eq!(fetched.item.version, 0);
        assert_eq!(fetched.number, Some(4));
        assert_eq!(fetched.previous_version, Some(3));
        assert!(fetched.item.display_url.ends_with("/spaces/DEV/pages/123"));
    }

    #[tokio::test]
    async fn test_fetch_historical_version_uses_status_param() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/123"))
            .and(query_param("status", "historical"))
            .and(query_param("version", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"body":{"storage":{"value":"older"}},
                    "history":{"previousVersion":{"number":2}},
                    "version":{"number":3}}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = fetch_content(&client, "DEV", &test_page("123"), 3)
            .await
            .unwrap();

        assert_eq!(fetched.item.body, "older");
        assert_eq!(fetched.item.version, 3);
        assert_eq!(fetched.previous_version, Some(2));
    }

    #[tokio::test]
    async fn test_zero_previous_pointer_ends_chain() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"body":{"storage":{"value":"first"}},
                    "history":{"previousVersion":{"number":0}},
                    "version":{"number":1}}"#,
            ))
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = fetch_content(&client, "DEV", &test_page("123"), 0)
            .await
            .unwrap();

        assert_eq!(fetched.previous_version, None);
    }

    #[tokio::test]
    async fn test_missing_body_is_empty_string() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/123"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"version":{"number":1}}"#),
            )
            .mount(&server)
            .await;

        let client = test_client(&server.uri());
        let fetched = fetch_content(&client, "DEV", &test_page("123"), 0)
            .await
            .unwrap();

        assert_eq!(fetched.item.body, "");
        assert_eq!(fetched.previous_version, None);
    }
}
