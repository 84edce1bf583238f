//! Pagination support for Gemini list endpoints
//!
//! List endpoints return one page of items plus an opaque `nextPageToken`.
//! Callers keep requesting with that token until it comes back empty.

use serde::Deserialize;

use crate::client::models::{Document, File, FileSearchStore, Model};

/// Largest page the store and document endpoints accept
pub const STORE_PAGE_SIZE: usize = 20;

/// Largest page the files endpoint accepts
pub const FILE_PAGE_SIZE: usize = 100;

/// Page size for the model catalog
pub const MODEL_PAGE_SIZE: usize = 1000;

/// Safety valve against a server that never stops returning tokens
pub const MAX_PAGES: usize = 500;

/// Query parameters for one page request.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// Number of items per page
    pub page_size: Option<usize>,

    /// Token from the previous page's `nextPageToken`
    pub page_token: Option<String>,
}

impl PageRequest {
    /// Create an empty page request (server defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Continue from a previous page.
    pub fn page_token(mut self, token: impl Into<String>) -> Self {
        self.page_token = Some(token.into());
        self
    }

    /// Convert to query parameters for the API request.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if let Some(size) = self.page_size {
            params.push(("pageSize", size.to_string()));
        }
        if let Some(ref token) = self.page_token {
            params.push(("pageToken", token.clone()));
        }

        params
    }
}

/// One page of a list response.
pub trait Paged {
    type Item;

    /// Split into the page's items and the token for the next page, if any.
    fn into_page(self) -> (Vec<Self::Item>, Option<String>);
}

/// Treat an empty token the same as a missing one.
fn next_token(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreList {
    #[serde(default)]
    pub file_search_stores: Vec<FileSearchStore>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Paged for StoreList {
    type Item = FileSearchStore;

    fn into_page(self) -> (Vec<FileSearchStore>, Option<String>) {
        (self.file_search_stores, next_token(self.next_page_token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Paged for FileList {
    type Item = File;

    fn into_page(self) -> (Vec<File>, Option<String>) {
        (self.files, next_token(self.next_page_token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentList {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Paged for DocumentList {
    type Item = Document;

    fn into_page(self) -> (Vec<Document>, Option<String>) {
        (self.documents, next_token(self.next_page_token))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl Paged for ModelList {
    type Item = Model;

    fn into_page(self) -> (Vec<Model>, Option<String>) {
        (self.models, next_token(self.next_page_token))
    }
}
