//! Gemini file search API client

pub mod api;
pub mod gemini;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod pagination;

pub use api::{DirectoryApi, FileApi, QueryApi, StoreApi};
pub use gemini::GeminiClient;
#[cfg(test)]
#[allow(unused_imports)]
pub use mock::MockGeminiClient;

use crate::error::ApiError;

/// Result of a single API call
///
/// Kept separate from [`crate::error::Result`] because directory failures are
/// shared between every caller waiting on the same cache refresh.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Full Gemini file search API surface
///
/// Blanket-implemented for anything that implements all the sub-traits.
pub trait GeminiApi: DirectoryApi + StoreApi + FileApi + QueryApi {}

impl<T> GeminiApi for T where T: DirectoryApi + StoreApi + FileApi + QueryApi {}
