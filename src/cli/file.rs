//! File command implementations

use std::path::Path;

use colored::Colorize;
use log::debug;

use crate::cache::ResolutionCache;
use crate::cli::args::parse_metadata;
use crate::cli::operation::spinner;
use crate::cli::store::import_into_store;
use crate::cli::{CommandContext, GlobalOptions, OptionalStoreArgs, OutputFormat};
use crate::client::models::{ChunkingConfig, File, ImportFileRequest, OperationStatus};
use crate::client::{DirectoryApi, FileApi, StoreApi};
use crate::directory::ResourceKind;
use crate::error::Result;
use crate::models::{FileDisplay, file_fields};
use crate::output::{self, Detail, json};

/// Used when the extension says nothing about the content
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Run the file list command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let files = ctx.client.list_files().await?;
    debug!("Fetched {} files", files.len());

    let display: Vec<FileDisplay> = files.iter().map(FileDisplay::from).collect();
    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&files)?),
        format => output::print(&display, format)?,
    }
    Ok(())
}

/// Run the file get command
pub async fn get(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let id = ctx.resolve(ResourceKind::File, name, None).await?;
    let file = ctx.client.get_file(&id).await?;

    output::print(&Detail::new(&file, file_fields(&file)), ctx.format)
}

/// Run the file delete command
pub async fn delete(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let id = ctx.resolve(ResourceKind::File, name, None).await?;
    ctx.client.delete_file(&id).await?;
    ctx.cache.invalidate(ResourceKind::File, None);

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            json::format_json(&serde_json::json!({"status": "deleted", "file": id}))?
        ),
        _ => println!("{} Deleted file: {}", "✓".green(), name),
    }
    Ok(())
}

/// Options for `file upload` beyond the path
#[derive(Debug, Clone, Default)]
pub struct UploadOptions {
    pub display_name: Option<String>,
    pub mime_type: Option<String>,
    pub chunk_size: u32,
    pub chunk_overlap: u32,
    pub metadata: Vec<String>,
}

/// Result of an upload: the file, plus the import status when a store was given
#[derive(Debug, serde::Serialize)]
pub struct UploadOutcome {
    pub file: File,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import: Option<OperationStatus>,
}

/// Run the file upload command
pub async fn upload(
    opts: &GlobalOptions,
    path: &Path,
    store: &OptionalStoreArgs,
    upload_opts: &UploadOptions,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let store_id = ctx.optional_store(store).await?;

    let outcome = upload_and_import(
        ctx.client.as_ref(),
        &ctx.cache,
        path,
        store_id.as_deref(),
        upload_opts,
        ctx.quiet,
    )
    .await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&outcome)?),
        _ => {
            println!(
                "{} Uploaded file: {} (URI: {})",
                "✓".green(),
                outcome.file.display_name.bold(),
                outcome.file.uri
            );
            if let Some(status) = &outcome.import {
                let target = status.parent.as_deref().unwrap_or_default();
                println!("{} Imported into {}", "✓".green(), target);
            }
        }
    }
    Ok(())
}

/// Upload `path` to the Files API, then import it into `store` if given.
pub async fn upload_and_import<C: FileApi + StoreApi + ?Sized>(
    client: &C,
    cache: &ResolutionCache,
    path: &Path,
    store: Option<&str>,
    opts: &UploadOptions,
    quiet: bool,
) -> Result<UploadOutcome> {
    let bytes = tokio::fs::read(path).await?;
    let display_name = opts
        .display_name
        .clone()
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_display_name(path));
    let mime_type = opts
        .mime_type
        .clone()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| guess_mime_type(path));

    debug!(
        "Uploading {} ({} bytes, {}) as {}",
        path.display(),
        bytes.len(),
        mime_type,
        display_name
    );
    let sp = spinner(&format!("Uploading {}", display_name), quiet);
    let uploaded = client.upload_file(bytes, &display_name, &mime_type).await;
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }
    let file = uploaded?;
    cache.invalidate(ResourceKind::File, None);

    let import = match store {
        Some(store) => {
            let request = ImportFileRequest {
                file_name: file.name.clone(),
                custom_metadata: parse_metadata(&opts.metadata),
                chunking_config: ChunkingConfig::from_limits(opts.chunk_size, opts.chunk_overlap),
            };
            Some(import_into_store(client, cache, store, &request, quiet).await?)
        }
        None => {
            if !opts.metadata.is_empty() || opts.chunk_size > 0 || opts.chunk_overlap > 0 {
                log::warn!("--metadata and --chunk-* only apply when uploading into a store");
            }
            None
        }
    };

    Ok(UploadOutcome { file, import })
}

/// Final path component, or the whole path if there is none.
fn default_display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn guess_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use super::*;
    use crate::cache::CacheSettings;
    use crate::client::MockGeminiClient;
    use crate::error::Error;

    fn temp_file(name: &str, contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        (dir, path)
    }

    fn cache_for(mock: &Arc<MockGeminiClient>) -> ResolutionCache {
        ResolutionCache::new(mock.clone(), CacheSettings::default())
    }

    #[test]
    fn test_mime_type_guess() {
        assert_eq!(guess_mime_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_mime_type(Path::new("guide.pdf")), "application/pdf");
        assert_eq!(guess_mime_type(Path::new("blob")), FALLBACK_MIME_TYPE);
    }

    #[test]
    fn test_default_display_name_is_file_name() {
        assert_eq!(default_display_name(Path::new("/tmp/docs/guide.pdf")), "guide.pdf");
    }

    #[tokio::test]
    async fn test_upload_without_store() {
        let mock = Arc::new(MockGeminiClient::new());
        let cache = cache_for(&mock);
        let (_dir, path) = temp_file("notes.txt", "hello");

        let outcome = upload_and_import(
            mock.as_ref(),
            &cache,
            &path,
            None,
            &UploadOptions::default(),
            true,
        )
        .await
        .unwrap();

        assert_eq!(outcome.file.display_name, "notes.txt");
        assert_eq!(outcome.file.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(outcome.file.size_bytes, 5);
        assert!(outcome.import.is_none());
        assert_eq!(mock.call_counts().await.import_file, 0);
    }

    #[tokio::test]
    async fn test_upload_makes_file_resolvable_by_name() {
        let mock = Arc::new(MockGeminiClient::new());
        let cache = cache_for(&mock);
        let (_dir, path) = temp_file("notes.txt", "hello");

        assert!(cache.get(ResourceKind::File, None).await.unwrap().is_empty());

        let opts = UploadOptions {
            display_name: Some("Team notes".to_string()),
            ..Default::default()
        };
        let outcome = upload_and_import(mock.as_ref(), &cache, &path, None, &opts, true)
            .await
            .unwrap();

        let files = cache.get(ResourceKind::File, None).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].display_name, "Team notes");
        assert_eq!(files[0].identifier, outcome.file.name);
    }

    #[tokio::test(start_paused = true)]
    async fn test_upload_into_store_imports_with_options() {
        let mock = Arc::new(MockGeminiClient::new());
        let cache = cache_for(&mock);
        let (_dir, path) = temp_file("guide.md", "# Guide");

        let opts = UploadOptions {
            chunk_size: 200,
            chunk_overlap: 20,
            metadata: vec!["author=Ada".to_string(), "broken".to_string()],
            ..Default::default()
        };
        let outcome = upload_and_import(
            mock.as_ref(),
            &cache,
            &path,
            Some("fileSearchStores/abc"),
            &opts,
            true,
        )
        .await
        .unwrap();

        let status = outcome.import.unwrap();
        assert!(status.done);
        assert_eq!(status.parent.as_deref(), Some("fileSearchStores/abc"));

        let imports = mock.imports().await;
        assert_eq!(imports.len(), 1);
        let (store, request) = &imports[0];
        assert_eq!(store, "fileSearchStores/abc");
        assert_eq!(request.file_name, outcome.file.name);
        assert_eq!(request.custom_metadata.len(), 1);
        assert_eq!(
            request
                .chunking_config
                .as_ref()
                .unwrap()
                .white_space_config
                .max_tokens_per_chunk,
            Some(200)
        );
    }

    #[tokio::test]
    async fn test_upload_missing_path_fails_before_request() {
        let mock = Arc::new(MockGeminiClient::new());
        let cache = cache_for(&mock);

        let result = upload_and_import(
            mock.as_ref(),
            &cache,
            Path::new("/nonexistent/file.txt"),
            None,
            &UploadOptions::default(),
            true,
        )
        .await;

        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(mock.call_counts().await.upload_file, 0);
    }
}
