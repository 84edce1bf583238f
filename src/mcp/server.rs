//! MCP tool server over the Gemini file search API

use std::path::Path;
use std::sync::Arc;

use log::debug;
use rmcp::handler::server::{router::tool::ToolRouter, wrapper::Parameters};
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ToolGroup;
use crate::cache::ResolutionCache;
use crate::cli::OutputFormat;
use crate::cli::document::delete_document;
use crate::cli::file::{UploadOptions, upload_and_import};
use crate::cli::query::{ask, model_path};
use crate::cli::store::{create_store, delete_store, import_into_store};
use crate::client::models::ImportFileRequest;
use crate::client::{DirectoryApi, FileApi, GeminiApi};
use crate::directory::ResourceKind;
use crate::error::Result as AppResult;
use crate::models::{DocumentDisplay, FileDisplay, QueryDisplay, StoreDisplay};
use crate::output::Formattable;
use crate::resolve::Resolver;

// ---------------------------------------------------------------------------
// Parameter structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    #[schemars(description = "Question to answer")]
    pub query: String,
    #[schemars(
        description = "Store to ground the answer on: display name or fileSearchStores/... identifier"
    )]
    pub store: Option<String>,
    #[schemars(description = "Model id, e.g. gemini-2.5-flash (default from config)")]
    pub model: Option<String>,
    #[schemars(description = "Metadata filter expression, e.g. author = \"Ada\"")]
    pub metadata_filter: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListDocumentsParams {
    #[schemars(description = "Store display name or identifier")]
    pub store: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ImportFileParams {
    #[schemars(description = "File display name or files/... identifier")]
    pub file: String,
    #[schemars(description = "Target store display name or identifier")]
    pub store: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UploadFileParams {
    #[schemars(description = "Local path of the file to upload")]
    pub path: String,
    #[schemars(description = "Store to import the upload into (display name or identifier)")]
    pub store: Option<String>,
    #[schemars(description = "Display name (default: the file name)")]
    pub display_name: Option<String>,
    #[schemars(description = "MIME type (default: guessed from the extension)")]
    pub mime_type: Option<String>,
    #[schemars(description = "Maximum tokens per chunk when importing")]
    pub chunk_size: Option<u32>,
    #[schemars(description = "Overlapping tokens between chunks when importing")]
    pub chunk_overlap: Option<u32>,
    #[schemars(description = "Custom metadata as KEY=VALUE entries")]
    pub metadata: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateStoreParams {
    #[schemars(description = "Display name for the new store")]
    pub display_name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteStoreParams {
    #[schemars(description = "Store display name or identifier")]
    pub store: String,
    #[schemars(description = "Also delete the store's documents")]
    pub force: Option<bool>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteFileParams {
    #[schemars(description = "File display name or files/... identifier")]
    pub file: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeleteDocumentParams {
    #[schemars(description = "Document display name or full document identifier")]
    pub document: String,
    #[schemars(description = "Owning store, required when the document is given by name")]
    pub store: Option<String>,
    #[schemars(description = "Also delete the document's chunks")]
    pub force: Option<bool>,
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

fn finish(outcome: AppResult<String>) -> std::result::Result<CallToolResult, McpError> {
    Ok(match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => {
            debug!("Tool call failed: {}", err);
            CallToolResult::error(vec![Content::text(err.to_string())])
        }
    })
}

fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

// ---------------------------------------------------------------------------
// MCP Server
// ---------------------------------------------------------------------------

/// Serves the enabled tool groups. Clones share the client and cache.
#[derive(Clone)]
pub struct FileSearchServer {
    client: Arc<dyn GeminiApi>,
    cache: ResolutionCache,
    resolver: Resolver,
    default_model: String,
    groups: Vec<ToolGroup>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FileSearchServer {
    /// Server exposing only the tools of `groups`. `cache` must sit in
    /// front of the same API as `client`.
    pub fn new(
        client: Arc<dyn GeminiApi>,
        cache: ResolutionCache,
        default_model: impl Into<String>,
        groups: &[ToolGroup],
    ) -> Self {
        let mut tool_router = Self::tool_router();
        for group in ToolGroup::ALL {
            if !groups.contains(&group) {
                for name in group.tools() {
                    tool_router.remove_route(name);
                }
            }
        }

        Self {
            client,
            resolver: Resolver::new(cache.clone()),
            cache,
            default_model: default_model.into(),
            groups: groups.to_vec(),
            tool_router,
        }
    }

    async fn resolve(
        &self,
        kind: ResourceKind,
        input: &str,
        parent: Option<&str>,
    ) -> AppResult<String> {
        Ok(self.resolver.resolve(kind, input, parent).await?)
    }

    async fn resolve_optional_store(&self, store: Option<&str>) -> AppResult<Option<String>> {
        match store.filter(|s| !s.is_empty()) {
            Some(store) => Ok(Some(self.resolve(ResourceKind::Store, store, None).await?)),
            None => Ok(None),
        }
    }

    #[tool(
        description = "Ask a question with Gemini, optionally grounded on a File Search store. Returns the answer followed by the titles of the source documents."
    )]
    async fn query(
        &self,
        Parameters(p): Parameters<QueryParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let store = self.resolve_optional_store(p.store.as_deref()).await?;
            let model = p
                .model
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(&self.default_model);
            let response = ask(
                self.client.as_ref(),
                &model_path(model),
                &p.query,
                store,
                p.metadata_filter.as_deref(),
            )
            .await?;
            QueryDisplay::new(&response).format(OutputFormat::Text)
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "List File Search stores as 'Display Name (identifier)' lines")]
    async fn list_stores(&self) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let stores = self.client.list_stores().await?;
            let display: Vec<StoreDisplay> = stores.iter().map(StoreDisplay::from).collect();
            display.format(OutputFormat::Text)
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "List files uploaded to the Files API")]
    async fn list_files(&self) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let files = self.client.list_files().await?;
            let display: Vec<FileDisplay> = files.iter().map(FileDisplay::from).collect();
            display.format(OutputFormat::Text)
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "List the documents in a File Search store")]
    async fn list_documents(
        &self,
        Parameters(p): Parameters<ListDocumentsParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let store = self.resolve(ResourceKind::Store, &p.store, None).await?;
            let documents = self.client.list_documents(&store).await?;
            let display: Vec<DocumentDisplay> =
                documents.iter().map(DocumentDisplay::from).collect();
            display.format(OutputFormat::Text)
        }
        .await;
        finish(outcome)
    }

    #[tool(
        description = "Import an already uploaded file into a File Search store and wait for indexing to finish"
    )]
    async fn import_file(
        &self,
        Parameters(p): Parameters<ImportFileParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let file = self.resolve(ResourceKind::File, &p.file, None).await?;
            let store = self.resolve(ResourceKind::Store, &p.store, None).await?;
            let request = ImportFileRequest {
                file_name: file,
                ..Default::default()
            };
            let status =
                import_into_store(self.client.as_ref(), &self.cache, &store, &request, true)
                    .await?;
            to_json(&status)
        }
        .await;
        finish(outcome)
    }

    #[tool(
        description = "Upload a local file to the Files API, and import it into a store when one is given"
    )]
    async fn upload_file(
        &self,
        Parameters(p): Parameters<UploadFileParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let store = self.resolve_optional_store(p.store.as_deref()).await?;
            let options = UploadOptions {
                display_name: p.display_name,
                mime_type: p.mime_type,
                chunk_size: p.chunk_size.unwrap_or_default(),
                chunk_overlap: p.chunk_overlap.unwrap_or_default(),
                metadata: p.metadata.unwrap_or_default(),
            };
            let uploaded = upload_and_import(
                self.client.as_ref(),
                &self.cache,
                Path::new(&p.path),
                store.as_deref(),
                &options,
                true,
            )
            .await?;
            to_json(&uploaded)
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "Create a File Search store")]
    async fn create_store(
        &self,
        Parameters(p): Parameters<CreateStoreParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let store = create_store(self.client.as_ref(), &self.cache, &p.display_name).await?;
            to_json(&store)
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "Delete a File Search store")]
    async fn delete_store(
        &self,
        Parameters(p): Parameters<DeleteStoreParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let store = self.resolve(ResourceKind::Store, &p.store, None).await?;
            delete_store(
                self.client.as_ref(),
                &self.cache,
                &store,
                p.force.unwrap_or_default(),
            )
            .await?;
            to_json(&serde_json::json!({"status": "deleted", "store": store}))
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "Delete a file from the Files API")]
    async fn delete_file(
        &self,
        Parameters(p): Parameters<DeleteFileParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let file = self.resolve(ResourceKind::File, &p.file, None).await?;
            self.client.delete_file(&file).await?;
            self.cache.invalidate(ResourceKind::File, None);
            to_json(&serde_json::json!({"status": "deleted", "file": file}))
        }
        .await;
        finish(outcome)
    }

    #[tool(description = "Delete a document from a File Search store")]
    async fn delete_document(
        &self,
        Parameters(p): Parameters<DeleteDocumentParams>,
    ) -> std::result::Result<CallToolResult, McpError> {
        let outcome = async {
            let document = self
                .resolve(ResourceKind::Document, &p.document, p.store.as_deref())
                .await?;
            delete_document(
                self.client.as_ref(),
                &self.cache,
                &document,
                p.force.unwrap_or_default(),
            )
            .await?;
            to_json(&serde_json::json!({"status": "deleted", "document": document}))
        }
        .await;
        finish(outcome)
    }
}

#[tool_handler]
impl ServerHandler for FileSearchServer {
    fn get_info(&self) -> ServerInfo {
        let groups: Vec<&str> = self.groups.iter().map(ToolGroup::as_str).collect();
        ServerInfo {
            instructions: Some(format!(
                "Gemini File Search. Stores, files and documents can be named by display \
                 name or by identifier; pass the identifier when a name is reported as \
                 ambiguous. Enabled tool groups: {}.",
                groups.join(", ")
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "file-search".into(),
                title: Some("Gemini File Search".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }
}
