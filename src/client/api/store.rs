//! Store, document and operation API trait

use async_trait::async_trait;

use crate::client::ApiResult;
use crate::client::models::{Document, FileSearchStore, ImportFileRequest, Operation};

/// Store-scoped operations: store CRUD, imports and the documents they produce
#[async_trait]
pub trait StoreApi: Send + Sync {
    /// Fetch one store by identifier
    async fn get_store(&self, store: &str) -> ApiResult<FileSearchStore>;

    /// Create a store with the given display name
    async fn create_store(&self, display_name: &str) -> ApiResult<FileSearchStore>;

    /// Delete a store; `force` also deletes the documents inside it
    async fn delete_store(&self, store: &str, force: bool) -> ApiResult<()>;

    /// Import an already uploaded file into a store
    async fn import_file(&self, store: &str, request: &ImportFileRequest) -> ApiResult<Operation>;

    /// Fetch one document by identifier
    async fn get_document(&self, document: &str) -> ApiResult<Document>;

    /// Delete a document; `force` also deletes its chunks
    async fn delete_document(&self, document: &str, force: bool) -> ApiResult<()>;

    /// Poll a long-running import or upload operation
    async fn get_operation(&self, name: &str) -> ApiResult<Operation>;
}
