//! Document command implementations

use colored::Colorize;
use log::debug;

use crate::cache::ResolutionCache;
use crate::cli::{CommandContext, GlobalOptions, OptionalStoreArgs, OutputFormat, StoreArgs};
use crate::client::{DirectoryApi, StoreApi};
use crate::directory::ResourceKind;
use crate::error::Result;
use crate::models::{DocumentDisplay, document_fields};
use crate::output::{self, Detail, json};

/// Run the document list command
pub async fn list(opts: &GlobalOptions, store: &StoreArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let store_id = ctx.require_store(store).await?;

    let documents = ctx.client.list_documents(&store_id).await?;
    debug!("Fetched {} documents in {}", documents.len(), store_id);

    let display: Vec<DocumentDisplay> = documents.iter().map(DocumentDisplay::from).collect();
    match ctx.format {
        OutputFormat::Json => println!("{}", json::format_json(&documents)?),
        format => output::print(&display, format)?,
    }
    Ok(())
}

/// Run the document get command
pub async fn get(opts: &GlobalOptions, name: &str, store: &OptionalStoreArgs) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let id = resolve_document(&ctx, name, store).await?;

    let document = ctx.client.get_document(&id).await?;
    output::print(&Detail::new(&document, document_fields(&document)), ctx.format)
}

/// Run the document delete command
pub async fn delete(
    opts: &GlobalOptions,
    name: &str,
    store: &OptionalStoreArgs,
    force: bool,
) -> Result<()> {
    let ctx = CommandContext::new(opts)?;
    let id = resolve_document(&ctx, name, store).await?;

    delete_document(ctx.client.as_ref(), &ctx.cache, &id, force).await?;

    match ctx.format {
        OutputFormat::Json => println!(
            "{}",
            json::format_json(&serde_json::json!({"status": "deleted", "document": id}))?
        ),
        _ => println!("{} Deleted document: {}", "✓".green(), name),
    }
    Ok(())
}

/// Document identifier from a name (scoped to the store flags) or an id.
async fn resolve_document(
    ctx: &CommandContext,
    name: &str,
    store: &OptionalStoreArgs,
) -> Result<String> {
    let parent = store.value();
    ctx.resolve(ResourceKind::Document, name, parent).await
}

/// Delete a document; its store's listings are stale afterwards.
pub async fn delete_document<C: StoreApi + ?Sized>(
    client: &C,
    cache: &ResolutionCache,
    document: &str,
    force: bool,
) -> Result<()> {
    client.delete_document(document, force).await?;

    let store = document
        .split_once(crate::directory::DOCUMENT_SEGMENT)
        .map(|(store, _)| store);
    cache.invalidate(ResourceKind::Document, store);
    cache.invalidate(ResourceKind::Store, None);
    Ok(())
}
