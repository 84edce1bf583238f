//! API trait definitions split by responsibility
//!
//! This module organizes the Gemini file search API surface into focused sub-traits:
//! - [`DirectoryApi`] - Collection listing, the only capability name resolution needs
//! - [`StoreApi`] - Store, document and operation management
//! - [`FileApi`] - Uploaded file management
//! - [`QueryApi`] - Retrieval-grounded generation
//!
//! The [`GeminiApi`](super::GeminiApi) super-trait combines all four.

mod directory;
mod file;
mod query;
mod store;

pub use directory::DirectoryApi;
pub use file::FileApi;
pub use query::QueryApi;
pub use store::StoreApi;
