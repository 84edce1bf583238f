//! Files API models

use serde::{Deserialize, Serialize};

use super::int64;
use crate::directory::ResourceRecord;

/// Uploaded file resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// File identifier (`files/{id}`)
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    #[serde(default, with = "int64")]
    pub size_bytes: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_time: Option<String>,

    /// Download/reference URI
    #[serde(default)]
    pub uri: String,

    /// Processing state (PROCESSING, ACTIVE, FAILED)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl From<&File> for ResourceRecord {
    fn from(file: &File) -> Self {
        ResourceRecord::new(file.display_name.clone(), file.name.clone())
    }
}
