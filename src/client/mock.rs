//! Mock Gemini API client for testing
//!
//! Provides an in-memory implementation of the API traits for unit testing
//! without making real API calls.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::ApiResult;
use super::api::{DirectoryApi, FileApi, QueryApi, StoreApi};
use super::models::{
    Candidate, Content, Document, File, FileSearchStore, GenerateContentRequest, GenerateContentResponse,
    ImportFileRequest, Model, Operation, Part,
};
use crate::directory::DOCUMENT_SEGMENT;
use crate::error::ApiError;

/// Mock API client for testing.
///
/// Configure data via builder methods, then use in tests.
///
/// # Example
/// ```ignore
/// let mock = MockGeminiClient::new()
///     .with_stores(vec![store("fileSearchStores/abc", "Manuals")])
///     .await;
///
/// let stores = mock.list_stores().await?;
/// assert_eq!(stores.len(), 1);
/// ```
#[derive(Default)]
pub struct MockGeminiClient {
    stores: Arc<Mutex<Vec<FileSearchStore>>>,
    files: Arc<Mutex<Vec<File>>>,
    /// Documents keyed by owning store identifier
    documents: Arc<Mutex<HashMap<String, Vec<Document>>>>,
    models: Arc<Mutex<Vec<Model>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Error returned by every call until cleared
    failure: Arc<Mutex<Option<ApiError>>>,
    /// Artificial delay applied to listing calls
    latency: Arc<Mutex<Option<Duration>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Imports received, for assertions
    imports: Arc<Mutex<Vec<(String, ImportFileRequest)>>>,
    next_id: Arc<Mutex<usize>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub list_stores: usize,
    pub list_files: usize,
    pub list_documents: usize,
    pub list_models: usize,
    pub create_store: usize,
    pub delete_store: usize,
    pub import_file: usize,
    pub get_operation: usize,
    pub upload_file: usize,
    pub generate_content: usize,
    /// Listing calls running right now
    pub active_listings: usize,
    /// Most listing calls ever running at once
    pub peak_listings: usize,
}

impl CallCounts {
    /// Number of directory listing calls of any kind.
    pub fn listings(&self) -> usize {
        self.list_stores + self.list_files + self.list_documents + self.list_models
    }
}

/// Build a store record for tests.
pub fn store(name: &str, display_name: &str) -> FileSearchStore {
    FileSearchStore {
        name: name.to_string(),
        display_name: display_name.to_string(),
        ..Default::default()
    }
}

/// Build a file record for tests.
pub fn file(name: &str, display_name: &str) -> File {
    File {
        name: name.to_string(),
        display_name: display_name.to_string(),
        ..Default::default()
    }
}

/// Build a document record for tests.
pub fn document(name: &str, display_name: &str) -> Document {
    Document {
        name: name.to_string(),
        display_name: display_name.to_string(),
        ..Default::default()
    }
}

/// Build a query-capable model for tests.
pub fn model(name: &str) -> Model {
    Model {
        name: name.to_string(),
        supported_generation_methods: vec!["generateContent".to_string()],
        ..Default::default()
    }
}

impl MockGeminiClient {
    /// Create a new mock client with default (empty) responses.
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_stores(self, stores: Vec<FileSearchStore>) -> Self {
        *self.stores.lock().await = stores;
        self
    }

    pub async fn with_files(self, files: Vec<File>) -> Self {
        *self.files.lock().await = files;
        self
    }

    /// Configure documents; each is filed under the store in its name.
    pub async fn with_documents(self, documents: Vec<Document>) -> Self {
        {
            let mut by_store = self.documents.lock().await;
            for doc in documents {
                let store = doc
                    .name
                    .split_once(DOCUMENT_SEGMENT)
                    .map(|(store, _)| store.to_string())
                    .unwrap_or_default();
                by_store.entry(store).or_default().push(doc);
            }
        }
        self
    }

    pub async fn with_models(self, models: Vec<Model>) -> Self {
        *self.models.lock().await = models;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        self.set_error(error).await;
        self
    }

    /// Delay every listing call by `latency`.
    pub async fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().await = Some(latency);
        self
    }

    /// Queue a one-shot error on an already shared mock.
    pub async fn set_error(&self, error: ApiError) {
        *self.error.lock().await = Some(error);
    }

    /// Fail every call with `error` until [`clear_failure`](Self::clear_failure).
    pub async fn set_failure(&self, error: ApiError) {
        *self.failure.lock().await = Some(error);
    }

    pub async fn clear_failure(&self) {
        *self.failure.lock().await = None;
    }

    /// Replace the store list on an already shared mock.
    pub async fn set_stores(&self, stores: Vec<FileSearchStore>) {
        *self.stores.lock().await = stores;
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Imports received so far, as (store, request) pairs.
    pub async fn imports(&self) -> Vec<(String, ImportFileRequest)> {
        self.imports.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> ApiResult<()> {
        if let Some(e) = self.error.lock().await.take() {
            return Err(e);
        }
        if let Some(e) = self.failure.lock().await.clone() {
            return Err(e);
        }
        Ok(())
    }

    /// Apply the configured latency to a listing call, tracking overlap.
    async fn simulate_latency(&self) {
        {
            let mut counts = self.call_count.lock().await;
            counts.active_listings += 1;
            counts.peak_listings = counts.peak_listings.max(counts.active_listings);
        }
        let latency = *self.latency.lock().await;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        self.call_count.lock().await.active_listings -= 1;
    }

    async fn next_id(&self) -> usize {
        let mut id = self.next_id.lock().await;
        *id += 1;
        *id
    }
}

// ============================================================================
// DirectoryApi Implementation
// ============================================================================

#[async_trait]
impl DirectoryApi for MockGeminiClient {
    async fn list_stores(&self) -> ApiResult<Vec<FileSearchStore>> {
        self.call_count.lock().await.list_stores += 1;
        self.simulate_latency().await;
        self.check_error().await?;

        Ok(self.stores.lock().await.clone())
    }

    async fn list_files(&self) -> ApiResult<Vec<File>> {
        self.call_count.lock().await.list_files += 1;
        self.simulate_latency().await;
        self.check_error().await?;

        Ok(self.files.lock().await.clone())
    }

    async fn list_documents(&self, store: &str) -> ApiResult<Vec<Document>> {
        self.call_count.lock().await.list_documents += 1;
        self.simulate_latency().await;
        self.check_error().await?;

        Ok(self
            .documents
            .lock()
            .await
            .get(store)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_models(&self) -> ApiResult<Vec<Model>> {
        self.call_count.lock().await.list_models += 1;
        self.simulate_latency().await;
        self.check_error().await?;

        Ok(self.models.lock().await.clone())
    }
}

// ============================================================================
// StoreApi Implementation
// ============================================================================

#[async_trait]
impl StoreApi for MockGeminiClient {
    async fn get_store(&self, name: &str) -> ApiResult<FileSearchStore> {
        self.check_error().await?;

        self.stores
            .lock()
            .await
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    async fn create_store(&self, display_name: &str) -> ApiResult<FileSearchStore> {
        self.check_error().await?;
        self.call_count.lock().await.create_store += 1;

        let created = store(
            &format!("fileSearchStores/mock-{}", self.next_id().await),
            display_name,
        );
        self.stores.lock().await.push(created.clone());
        Ok(created)
    }

    async fn delete_store(&self, name: &str, _force: bool) -> ApiResult<()> {
        self.check_error().await?;
        self.call_count.lock().await.delete_store += 1;

        let mut stores = self.stores.lock().await;
        let before = stores.len();
        stores.retain(|s| s.name != name);
        if stores.len() == before {
            return Err(ApiError::NotFound(name.to_string()));
        }
        Ok(())
    }

    async fn import_file(&self, name: &str, request: &ImportFileRequest) -> ApiResult<Operation> {
        self.check_error().await?;
        self.call_count.lock().await.import_file += 1;

        self.imports
            .lock()
            .await
            .push((name.to_string(), request.clone()));
        Ok(Operation {
            name: format!("{}/operations/op-{}", name, self.next_id().await),
            done: false,
            ..Default::default()
        })
    }

    async fn get_document(&self, name: &str) -> ApiResult<Document> {
        self.check_error().await?;

        self.documents
            .lock()
            .await
            .values()
            .flatten()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    async fn delete_document(&self, name: &str, _force: bool) -> ApiResult<()> {
        self.check_error().await?;

        let mut documents = self.documents.lock().await;
        for docs in documents.values_mut() {
            docs.retain(|d| d.name != name);
        }
        Ok(())
    }

    /// Operations finish the first time they are polled.
    async fn get_operation(&self, name: &str) -> ApiResult<Operation> {
        self.check_error().await?;
        self.call_count.lock().await.get_operation += 1;

        Ok(Operation {
            name: name.to_string(),
            done: true,
            ..Default::default()
        })
    }
}

// ============================================================================
// FileApi Implementation
// ============================================================================

#[async_trait]
impl FileApi for MockGeminiClient {
    async fn get_file(&self, name: &str) -> ApiResult<File> {
        self.check_error().await?;

        self.files
            .lock()
            .await
            .iter()
            .find(|f| f.name == name)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(name.to_string()))
    }

    async fn delete_file(&self, name: &str) -> ApiResult<()> {
        self.check_error().await?;

        self.files.lock().await.retain(|f| f.name != name);
        Ok(())
    }

    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> ApiResult<File> {
        self.check_error().await?;
        self.call_count.lock().await.upload_file += 1;

        let mut uploaded = file(
            &format!("files/mock-{}", self.next_id().await),
            display_name,
        );
        uploaded.mime_type = Some(mime_type.to_string());
        uploaded.size_bytes = bytes.len() as u64;
        self.files.lock().await.push(uploaded.clone());
        Ok(uploaded)
    }
}

// ============================================================================
// QueryApi Implementation
// ============================================================================

#[async_trait]
impl QueryApi for MockGeminiClient {
    /// Echo the prompt back as the answer.
    async fn generate_content(
        &self,
        _model: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse> {
        self.check_error().await?;
        self.call_count.lock().await.generate_content += 1;

        let parts: Vec<Part> = request
            .contents
            .iter()
            .flat_map(|c| c.parts.iter().cloned())
            .collect();
        Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
                ..Default::default()
            }],
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::ResourceKind;

    #[tokio::test]
    async fn test_mock_client_default_empty() {
        let mock = MockGeminiClient::new();

        assert!(mock.list_stores().await.unwrap().is_empty());
        assert!(mock.list_documents("fileSearchStores/a").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mock_client_error_consumed_once() {
        let mock = MockGeminiClient::new()
            .with_error(ApiError::Network("down".to_string()))
            .await;

        assert!(mock.list_stores().await.is_err());
        assert!(mock.list_stores().await.is_ok());
        assert_eq!(mock.call_counts().await.list_stores, 2);
    }

    #[tokio::test]
    async fn test_mock_documents_grouped_by_store() {
        let mock = MockGeminiClient::new()
            .with_documents(vec![
                document("fileSearchStores/a/documents/1", "one"),
                document("fileSearchStores/b/documents/2", "two"),
            ])
            .await;

        let records = mock
            .list(ResourceKind::Document, Some("fileSearchStores/a"))
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "one");
        assert_eq!(records[0].parent.as_deref(), Some("fileSearchStores/a"));
    }

    #[tokio::test]
    async fn test_listing_documents_without_store_is_rejected() {
        let mock = MockGeminiClient::new();
        let err = mock.list(ResourceKind::Document, None).await.unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert_eq!(mock.call_counts().await.list_documents, 0);
    }

    #[tokio::test]
    async fn test_model_listing_skips_non_generative_models() {
        let embedding = Model {
            name: "models/text-embedding-004".to_string(),
            supported_generation_methods: vec!["embedContent".to_string()],
            ..Default::default()
        };
        let mock = MockGeminiClient::new()
            .with_models(vec![model("models/gemini-2.5-flash"), embedding])
            .await;

        let records = mock.list(ResourceKind::Model, None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_create_and_delete_store() {
        let mock = MockGeminiClient::new();
        let created = mock.create_store("Manuals").await.unwrap();
        assert!(created.name.starts_with("fileSearchStores/"));

        mock.delete_store(&created.name, false).await.unwrap();
        assert!(mock.list_stores().await.unwrap().is_empty());
        assert!(matches!(
            mock.delete_store(&created.name, false).await,
            Err(ApiError::NotFound(_))
        ));
    }
}
