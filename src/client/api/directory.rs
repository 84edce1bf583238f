//! Directory listing API trait
//!
//! This is the one remote capability name resolution depends on: given a
//! resource kind (and the parent store for documents), list everything that
//! exists right now.

use async_trait::async_trait;

use crate::client::ApiResult;
use crate::client::models::{Document, File, FileSearchStore, Model};
use crate::directory::{ResourceKind, ResourceRecord};
use crate::error::ApiError;

/// Collection listing operations for the Gemini API
///
/// Every `list_*` method follows pagination to the end and returns the full
/// set; callers never see page tokens.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// List all file search stores
    async fn list_stores(&self) -> ApiResult<Vec<FileSearchStore>>;

    /// List uploaded files
    async fn list_files(&self) -> ApiResult<Vec<File>>;

    /// List documents inside one store
    async fn list_documents(&self, store: &str) -> ApiResult<Vec<Document>>;

    /// List the model catalog
    async fn list_models(&self) -> ApiResult<Vec<Model>>;

    /// List a kind as name/identifier records.
    ///
    /// Models that cannot answer queries are left out since they are never a
    /// valid `--model` value.
    async fn list(&self, kind: ResourceKind, parent: Option<&str>) -> ApiResult<Vec<ResourceRecord>> {
        let records: Vec<ResourceRecord> = match kind {
            ResourceKind::Store => self.list_stores().await?.iter().map(Into::into).collect(),
            ResourceKind::File => self.list_files().await?.iter().map(Into::into).collect(),
            ResourceKind::Document => {
                let store = parent.ok_or_else(|| {
                    ApiError::BadRequest("listing documents requires a store".to_string())
                })?;
                self.list_documents(store)
                    .await?
                    .iter()
                    .map(|doc| ResourceRecord::from(doc).with_parent(store))
                    .collect()
            }
            ResourceKind::Model => self
                .list_models()
                .await?
                .iter()
                .filter(|m| m.supports_generate_content())
                .map(Into::into)
                .collect(),
        };
        Ok(records)
    }
}
