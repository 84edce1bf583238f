//! generateContent request/response models

use serde::{Deserialize, Serialize};

/// Body of `POST models/{model}:generateContent`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

impl GenerateContentRequest {
    /// Single-turn user prompt, optionally grounded on file search stores.
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(text.into()),
                }],
            }],
            tools: Vec::new(),
        }
    }

    pub fn with_file_search(mut self, stores: Vec<String>, metadata_filter: Option<String>) -> Self {
        if !stores.is_empty() {
            self.tools.push(Tool {
                file_search: FileSearchTool {
                    file_search_store_names: stores,
                    metadata_filter,
                },
            });
        }
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub file_search: FileSearchTool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSearchTool {
    pub file_search_store_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of every candidate part.
    pub fn text(&self) -> String {
        self.candidates
            .iter()
            .flat_map(|c| c.content.iter())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Titles of the retrieved chunks that grounded the answer, deduplicated.
    pub fn sources(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        let chunks = self
            .candidates
            .iter()
            .filter_map(|c| c.grounding_metadata.as_ref())
            .flat_map(|g| g.grounding_chunks.iter());
        for chunk in chunks {
            if let Some(title) = chunk
                .retrieved_context
                .as_ref()
                .and_then(|ctx| ctx.title.clone())
                && !titles.contains(&title)
            {
                titles.push(title);
            }
        }
        titles
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingMetadata {
    #[serde(default)]
    pub grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundingChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retrieved_context: Option<RetrievedContext>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetrievedContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}
