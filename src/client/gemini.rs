//! Gemini REST API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::api::{DirectoryApi, FileApi, QueryApi, StoreApi};
use super::models::{
    CreateStoreRequest, Document, File, FileSearchStore, GenerateContentRequest,
    GenerateContentResponse, ImportFileRequest, Model, Operation,
};
use super::pagination::{
    DocumentList, FILE_PAGE_SIZE, FileList, MAX_PAGES, MODEL_PAGE_SIZE, ModelList, PageRequest,
    Paged, STORE_PAGE_SIZE, StoreList,
};
use super::ApiResult;
use crate::error::ApiError;

/// Gemini API host
pub const DEFAULT_API_HOST: &str = "https://generativelanguage.googleapis.com";

/// REST API version path segment
const API_VERSION: &str = "v1beta";

/// Client-side throttle; well below the per-minute project quota
const RATE_LIMIT_PER_SECOND: NonZeroU32 = NonZeroU32::new(10).unwrap();

/// Default retry delay when a 429 carries no `retry-after`
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Gemini file search API client
pub struct GeminiClient {
    http: HttpClient,
    host: String,
    api_key: Option<String>,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl GeminiClient {
    /// Create a new client. Without an API key every call fails with
    /// [`ApiError::Unauthorized`] before touching the network.
    pub fn new(api_key: Option<String>) -> ApiResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(RATE_LIMIT_PER_SECOND)));

        Ok(Self {
            http,
            host: DEFAULT_API_HOST.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            rate_limiter,
        })
    }

    /// Point the client at a different host (tests, proxies).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into().trim_end_matches('/').to_string();
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.host, API_VERSION, path.trim_start_matches('/'))
    }

    /// Attach credentials, apply rate limiting, send, and map error statuses.
    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let api_key = self.api_key.as_deref().ok_or(ApiError::Unauthorized)?;

        self.rate_limiter.until_ready().await;

        let response = request
            .header("x-goog-api-key", api_key)
            .send()
            .await
            .map_err(ApiError::from)?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> ApiResult<T> {
        debug!("GET {}", path);
        let response = self.send(self.http.get(self.url(path)).query(query)).await?;
        Self::parse(response).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        debug!("POST {}", path);
        let response = self.send(self.http.post(self.url(path)).json(body)).await?;
        Self::parse(response).await
    }

    async fn delete(&self, path: &str, force: bool) -> ApiResult<()> {
        debug!("DELETE {} (force={})", path, force);
        let mut request = self.http.delete(self.url(path));
        if force {
            request = request.query(&[("force", "true")]);
        }
        self.send(request).await?;
        Ok(())
    }

    /// Follow `nextPageToken` until the listing is exhausted.
    async fn list_all<P>(&self, path: &str, page_size: usize) -> ApiResult<Vec<P::Item>>
    where
        P: Paged + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = PageRequest::new().page_size(page_size);

        for _ in 0..MAX_PAGES {
            let response: P = self.get_json(path, &page.to_query_params()).await?;
            let (batch, next) = response.into_page();
            items.extend(batch);

            match next {
                Some(token) => page = page.page_token(token),
                None => return Ok(items),
            }
        }

        Err(ApiError::InvalidResponse(format!(
            "{} did not finish paging after {} pages",
            path, MAX_PAGES
        )))
    }
}

/// Google error envelope: `{"error": {"code", "message", "status"}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
}

async fn error_from_response(response: Response) -> ApiError {
    let status = response.status();
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        if body.trim().is_empty() {
            status.to_string()
        } else {
            body.clone()
        }
    });

    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        // An invalid key comes back as a 400 rather than a 401
        StatusCode::BAD_REQUEST if body.contains("API_KEY_INVALID") => ApiError::Unauthorized,
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimit(Duration::from_secs(retry_after)),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ApiError::BadRequest(message),
        status if status.is_server_error() => ApiError::ServerError(message),
        _ => ApiError::InvalidResponse(format!("Unexpected status code: {}", status)),
    }
}

#[async_trait]
impl DirectoryApi for GeminiClient {
    async fn list_stores(&self) -> ApiResult<Vec<FileSearchStore>> {
        self.list_all::<StoreList>("fileSearchStores", STORE_PAGE_SIZE)
            .await
    }

    async fn list_files(&self) -> ApiResult<Vec<File>> {
        self.list_all::<FileList>("files", FILE_PAGE_SIZE).await
    }

    async fn list_documents(&self, store: &str) -> ApiResult<Vec<Document>> {
        let path = format!("{}/documents", store);
        self.list_all::<DocumentList>(&path, STORE_PAGE_SIZE).await
    }

    async fn list_models(&self) -> ApiResult<Vec<Model>> {
        self.list_all::<ModelList>("models", MODEL_PAGE_SIZE).await
    }
}

#[async_trait]
impl StoreApi for GeminiClient {
    async fn get_store(&self, store: &str) -> ApiResult<FileSearchStore> {
        self.get_json(store, &[]).await
    }

    async fn create_store(&self, display_name: &str) -> ApiResult<FileSearchStore> {
        let request = CreateStoreRequest {
            display_name: display_name.to_string(),
        };
        self.post_json("fileSearchStores", &request).await
    }

    async fn delete_store(&self, store: &str, force: bool) -> ApiResult<()> {
        self.delete(store, force).await
    }

    async fn import_file(&self, store: &str, request: &ImportFileRequest) -> ApiResult<Operation> {
        let path = format!("{}:importFile", store);
        self.post_json(&path, request).await
    }

    async fn get_document(&self, document: &str) -> ApiResult<Document> {
        self.get_json(document, &[]).await
    }

    async fn delete_document(&self, document: &str, force: bool) -> ApiResult<()> {
        self.delete(document, force).await
    }

    async fn get_operation(&self, name: &str) -> ApiResult<Operation> {
        self.get_json(name, &[]).await
    }
}

#[async_trait]
impl FileApi for GeminiClient {
    async fn get_file(&self, file: &str) -> ApiResult<File> {
        self.get_json(file, &[]).await
    }

    async fn delete_file(&self, file: &str) -> ApiResult<()> {
        self.delete(file, false).await
    }

    /// Two-step resumable upload: open a session, then send every byte and
    /// finalize in one request.
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> ApiResult<File> {
        #[derive(Serialize)]
        struct StartMetadata<'a> {
            display_name: &'a str,
        }

        #[derive(Serialize)]
        struct StartRequest<'a> {
            file: StartMetadata<'a>,
        }

        #[derive(Deserialize)]
        struct UploadResponse {
            file: File,
        }

        let start_url = format!("{}/upload/{}/files", self.host, API_VERSION);
        let length = bytes.len().to_string();
        debug!("Starting upload of {} ({} bytes)", display_name, length);

        let start = self
            .http
            .post(&start_url)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", length.as_str())
            .header("X-Goog-Upload-Header-Content-Type", mime_type)
            .json(&StartRequest {
                file: StartMetadata { display_name },
            });
        let response = self.send(start).await?;

        let upload_url = response
            .headers()
            .get("x-goog-upload-url")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ApiError::InvalidResponse("Upload session URL missing from response".to_string())
            })?;

        let upload = self
            .http
            .post(&upload_url)
            .header(CONTENT_LENGTH, length.as_str())
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(bytes);
        let response = self.send(upload).await?;

        let uploaded: UploadResponse = Self::parse(response).await?;
        Ok(uploaded.file)
    }
}

#[async_trait]
impl QueryApi for GeminiClient {
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse> {
        let path = format!("{}:generateContent", model);
        self.post_json(&path, request).await
    }
}
