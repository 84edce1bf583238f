//! Gemini File Search API data models
//!
//! This module contains the resource types returned by the Gemini REST API.
//! Models are organized by resource type for easy discovery.

mod document;
mod file;
mod model;
mod operation;
mod query;
mod store;

// Re-export all models for convenient access
pub use document::{CustomMetadata, Document};
pub use file::File;
pub use model::Model;
pub use operation::{Operation, OperationError, OperationStatus, OperationType};
pub use query::{
    Candidate, Content, FileSearchTool, GenerateContentRequest, GenerateContentResponse,
    GroundingChunk, GroundingMetadata, Part, RetrievedContext, Tool,
};
pub use store::{
    ChunkingConfig, CreateStoreRequest, FileSearchStore, ImportFileRequest, WhiteSpaceConfig,
};

/// Serde helpers for `int64` fields, which the REST API encodes as JSON strings.
pub(crate) mod int64 {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Number(u64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<StringOrNumber>::deserialize(deserializer)? {
            None => Ok(0),
            Some(StringOrNumber::Number(n)) => Ok(n),
            Some(StringOrNumber::String(s)) => s.parse().map_err(serde::de::Error::custom),
        }
    }

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(*value)
    }
}
