//! JSON envelope types for the wiki REST API
//!
//! These mirror the remote wire format exactly; anything the crawler does
//! not consume is left undeclared and ignored during deserialization.

use serde::Deserialize;

/// A top-level content container in the wiki, analogous to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct Space {
    pub id: i64,
    /// Unique, stable identifier; page listing and content URLs key off it.
    pub key: String,
    pub name: String,
}

/// One window of `GET /rest/api/space?start={offset}`.
#[derive(Debug, Deserialize)]
pub struct SpaceEnvelope {
    #[serde(default)]
    pub results: Vec<Space>,
    /// Number of results in this window.
    #[serde(default)]
    pub size: i64,
}

/// One content document within a space.
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
}

/// One window of `GET /rest/api/space/{key}/content?start={offset}`.
#[derive(Debug, Deserialize)]
pub struct PageEnvelope {
    #[serde(default)]
    pub results: Vec<Page>,
}

/// `GET /rest/api/content/{id}?expand=body.storage.value,version,history.previousVersion`.
#[derive(Debug, Deserialize)]
pub struct ContentEnvelope {
    pub body: Option<ContentBody>,
    pub history: Option<ContentHistory>,
    pub version: Option<VersionPointer>,
}

#[derive(Debug, Deserialize)]
pub struct ContentBody {
    pub storage: Option<StorageBody>,
}

#[derive(Debug, Deserialize)]
pub struct StorageBody {
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentHistory {
    #[serde(rename = "previousVersion")]
    pub previous_version: Option<VersionPointer>,
}

#[derive(Debug, Deserialize)]
pub struct VersionPointer {
    pub number: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_envelope_shape() {
        let json = r#"{"results":[{"id":42,"key":"DEV","name":"Development"}],"size":1}"#;
        let envelope: SpaceEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.size, 1);
        assert_eq!(envelope.results.len(), 1);
        assert_eq!(envelope.results[0].id, 42);
        assert_eq!(envelope.results[0].key, "DEV");
        assert_eq!(envelope.results[0].name, "Development");
    }

    #[test]
    fn test_space_envelope_ignores_extra_fields() {
        let json = r#"{"results":[{"id":1,"key":"A","name":"A","_links":{"self":"x"}}],"size":1,"start":0,"limit":25}"#;
        let envelope: SpaceEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.results.len(), 1);
    }

    #[test]
    fn test_page_envelope_shape() {
        let json = r#"{"results":[{"id":"98765","type":"page","title":"Runbook"}]}"#;
        let envelope: PageEnvelope = serde_json::from_str(json).unwrap();

        assert_eq!(envelope.results.len(), 1);
        assert_eq!(envelope.results[0].id, "98765");
        assert_eq!(envelope.results[0].kind, "page");
        assert_eq!(envelope.results[0].title, "Runbook");
    }

    #[test]
    fn test_empty_window_is_valid() {
        let envelope: SpaceEnvelope = serde_json::from_str(r#"{"results":[],"size":0}"#).unwrap();
        assert!(envelope.results.is_empty());

        let envelope: PageEnvelope = serde_json::from_str(r#"{"results":[]}"#).unwrap();
        assert!(envelope.results.is_empty());
    }

    #[test]
    fn test_content_envelope_with_history() {
        let json = r#"{
            "body": {"storage": {"value": "<p>hello</p>"}},
            "history": {"previousVersion": {"number": 5}},
            "version": {"number": 6}
        }"#;
        let envelope: ContentEnvelope = serde_json::from_str(json).unwrap();

        let value = envelope.body.unwrap().storage.unwrap().value;
        assert_eq!(value, "<p>hello</p>");
        assert_eq!(
            envelope.history.unwrap().previous_version.unwrap().number,
            5
        );
        assert_eq!(envelope.version.unwrap().number, 6);
    }

    #[test]
    fn test_content_envelope_without_history() {
        let json = r#"{"body": {"storage": {"value": "v1"}}, "version": {"number": 1}}"#;
        let envelope: ContentEnvelope = serde_json::from_str(json).unwrap();

        assert!(envelope.history.is_none());
    }
}
