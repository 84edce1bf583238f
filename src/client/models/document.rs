//! Store document models

use serde::{Deserialize, Serialize};

use super::int64;
use crate::directory::{DOCUMENT_SEGMENT, ResourceRecord};

/// Document indexed inside a file search store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document identifier (`fileSearchStores/{store}/documents/{id}`)
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    /// Indexing state (STATE_PENDING, STATE_ACTIVE, STATE_FAILED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, with = "int64")]
    pub size_bytes: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_metadata: Vec<CustomMetadata>,
}

impl Document {
    /// Store identifier this document belongs to, taken from its name.
    pub fn store(&self) -> Option<&str> {
        self.name
            .split_once(DOCUMENT_SEGMENT)
            .map(|(store, _)| store)
    }
}

impl From<&Document> for ResourceRecord {
    fn from(doc: &Document) -> Self {
        let record = ResourceRecord::new(doc.display_name.clone(), doc.name.clone());
        match doc.store() {
            Some(store) => record.with_parent(store),
            None => record,
        }
    }
}

/// Custom key/value metadata attached to a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomMetadata {
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
}

impl CustomMetadata {
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            string_value: Some(value.into()),
            numeric_value: None,
        }
    }

    /// Value rendered for display, whichever kind it is.
    pub fn value_text(&self) -> String {
        match (&self.string_value, self.numeric_value) {
            (Some(s), _) => s.clone(),
            (None, Some(n)) => n.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_store_from_name() {
        let doc = Document {
            name: "fileSearchStores/abc/documents/d1".to_string(),
            ..Default::default()
        };
        assert_eq!(doc.store(), Some("fileSearchStores/abc"));
    }

    #[test]
    fn test_document_record_carries_parent() {
        let doc = Document {
            name: "fileSearchStores/abc/documents/d1".to_string(),
            display_name: "guide.pdf".to_string(),
            ..Default::default()
        };
        let record = ResourceRecord::from(&doc);
        assert_eq!(record.display_name, "guide.pdf");
        assert_eq!(record.parent.as_deref(), Some("fileSearchStores/abc"));
    }

    #[test]
    fn test_custom_metadata_values() {
        let json = r#"[
            {"key": "author", "stringValue": "Ada"},
            {"key": "year", "numericValue": 1843}
        ]"#;
        let meta: Vec<CustomMetadata> = serde_json::from_str(json).unwrap();
        assert_eq!(meta[0].value_text(), "Ada");
        assert_eq!(meta[1].value_text(), "1843");
    }
}
