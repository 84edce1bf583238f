//! Store command implementations

use colored::Colorize;
use log::debug;

use crate::cache::ResolutionCache;
use crate::cli::operation::{MAX_WAIT, wait_for_operation};
use crate::cli::{CommandContext, GlobalOptions, OutputFormat, StoreArgs};
use crate::client::models::{ImportFileRequest, OperationStatus, OperationType};
use crate::client::{DirectoryApi, StoreApi};
use crate::directory::ResourceKind;
use crate::error::{Error, Result};
use crate::models::{StoreDisplay, store_fields};
use crate::output::{self, Detail, json};

/// Run the store list command
pub async fn list(opts: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let stores = ctx.client.list_stores().await?;
    debug!("Fetched {} stores", stores.len());

    let display: Vec<StoreDisplay> = stores.iter().map(StoreDisplay::from).collect();
    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&stores)?),
        format => output::print(&display, format)?,
    }
    Ok(())
}

/// Run the store get command
pub async fn get(opts: &GlobalOptions, name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let id = ctx.resolve(ResourceKind::Store, name, None).await?;
    let store = ctx.client.get_store(&id).await?;

    output::print(&Detail::new(&store, store_fields(&store)), ctx.format)
}

/// Run the store create command
pub async fn create(opts: &GlobalOptions, display_name: &str) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let store = create_store(ctx.client.as_ref(), &ctx.cache, display_name).await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&store)?),
        _ => println!(
            "{} Created store: {} ({})",
            "✓".green(),
            store.display_name.bold(),
            store.name
        ),
    }
    Ok(())
}

/// Run the store delete command
pub async fn delete(opts: &GlobalOptions, name: &str, force: bool) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let id = ctx.resolve(ResourceKind::Store, name, None).await?;
    delete_store(ctx.client.as_ref(), &ctx.cache, &id, force).await?;

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            json::format_json(&serde_json::json!({"status": "deleted", "store": id}))?
        ),
        _ => println!("{} Deleted store: {}", "✓".green(), name),
    }
    Ok(())
}

/// Run the store import-file command
pub async fn import_file(opts: &GlobalOptions, file: &str, store: &StoreArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;

    let file_id = ctx.resolve(ResourceKind::File, file, None).await?;
    let store_id = ctx.require_store(store).await?;

    let request = ImportFileRequest {
        file_name: file_id.clone(),
        ..Default::default()
    };
    let status = import_into_store(
        ctx.client.as_ref(),
        &ctx.cache,
        &store_id,
        &request,
        ctx.quiet,
    )
    .await?;

    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&status)?),
        _ => println!(
            "{} Imported {} into {}",
            "✓".green(),
            file_id,
            store_id.bold()
        ),
    }
    Ok(())
}

/// Create a store; the store listing is stale afterwards.
pub async fn create_store<C: StoreApi + ?Sized>(
    client: &C,
    cache: &ResolutionCache,
    display_name: &str,
) -> Result<crate::client::models::FileSearchStore> {
    let store = client.create_store(display_name).await?;
    cache.invalidate(ResourceKind::Store, None);
    Ok(store)
}

/// Delete a store along with the cached listing of its documents.
pub async fn delete_store<C: StoreApi + ?Sized>(
    client: &C,
    cache: &ResolutionCache,
    store: &str,
    force: bool,
) -> Result<()> {
    client.delete_store(store, force).await?;
    cache.invalidate(ResourceKind::Store, None);
    cache.invalidate(ResourceKind::Document, Some(store));
    Ok(())
}

/// Import a Files API file into `store` and wait for indexing to finish.
///
/// The store's document listing and the store listing (document counts) are
/// invalidated whether or not the import succeeded, since a failed import
/// may still have created a document.
pub async fn import_into_store<C: StoreApi + ?Sized>(
    client: &C,
    cache: &ResolutionCache,
    store: &str,
    request: &ImportFileRequest,
    quiet: bool,
) -> Result<OperationStatus> {
    debug!("Importing {} into {}", request.file_name, store);
    let op = client.import_file(store, request).await?;

    let status = wait_for_operation(client, op, OperationType::Import, quiet, MAX_WAIT).await;
    cache.invalidate(ResourceKind::Document, Some(store));
    cache.invalidate(ResourceKind::Store, None);

    let status = status?;
    if status.failed {
        return Err(Error::Other(format!(
            "import of {} failed: {}",
            request.file_name,
            status.error_message.as_deref().unwrap_or("unknown error")
        )));
    }
    Ok(status)
}
