//! Files API trait

use async_trait::async_trait;

use crate::client::ApiResult;
use crate::client::models::File;

/// Operations on uploaded files (the Files API, outside any store)
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn get_file(&self, file: &str) -> ApiResult<File>;

    async fn delete_file(&self, file: &str) -> ApiResult<()>;

    /// Upload raw bytes and return the created file
    async fn upload_file(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> ApiResult<File>;
}
