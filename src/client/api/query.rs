//! Query API trait

use async_trait::async_trait;

use crate::client::ApiResult;
use crate::client::models::{GenerateContentRequest, GenerateContentResponse};

/// Retrieval-grounded generation
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Run `request` against `model` (a full `models/...` identifier)
    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> ApiResult<GenerateContentResponse>;
}
