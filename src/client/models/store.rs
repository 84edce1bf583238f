//! File search store models

use serde::{Deserialize, Serialize};

use super::document::CustomMetadata;
use super::int64;
use crate::directory::ResourceRecord;

/// File search store resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchStore {
    /// Store identifier (`fileSearchStores/{id}`)
    pub name: String,

    /// Human-readable store name
    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,

    #[serde(default, with = "int64")]
    pub active_documents_count: u64,

    #[serde(default, with = "int64")]
    pub pending_documents_count: u64,

    #[serde(default, with = "int64")]
    pub failed_documents_count: u64,

    #[serde(default, with = "int64")]
    pub size_bytes: u64,
}

impl From<&FileSearchStore> for ResourceRecord {
    fn from(store: &FileSearchStore) -> Self {
        ResourceRecord::new(store.display_name.clone(), store.name.clone())
    }
}

/// Body of `POST fileSearchStores`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub display_name: String,
}

/// Body of `POST {store}:importFile`
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFileRequest {
    /// File identifier (`files/{id}`)
    pub file_name: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_metadata: Vec<CustomMetadata>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunking_config: Option<ChunkingConfig>,
}

/// Chunking options applied when a file is imported into a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkingConfig {
    pub white_space_config: WhiteSpaceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteSpaceConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens_per_chunk: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_overlap_tokens: Option<u32>,
}

impl ChunkingConfig {
    /// Build a chunking config from CLI values; zero means "server default".
    pub fn from_limits(max_tokens: u32, overlap: u32) -> Option<Self> {
        let max_tokens_per_chunk = (max_tokens > 0).then_some(max_tokens);
        let max_overlap_tokens = (overlap > 0).then_some(overlap);
        if max_tokens_per_chunk.is_none() && max_overlap_tokens.is_none() {
            return None;
        }
        Some(Self {
            white_space_config: WhiteSpaceConfig {
                max_tokens_per_chunk,
                max_overlap_tokens,
            },
        })
    }
}
