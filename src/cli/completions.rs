//! Dynamic shell completions for the file-search CLI
//!
//! Provides TAB completion for store, file, document and model names by
//! reading the resolution cache at completion time.
//!
//! Shell support:
//! - Fish/Zsh: Full support with descriptions
//! - Bash: Values only (no description display)
//!
//! Completion runs as a fresh process per TAB press, so a background refresh
//! would die with the process. Each completer waits up to
//! [`COMPLETION_TIMEOUT`] for the listing and otherwise returns nothing.
//! Errors never reach the shell.

use std::time::Duration;

use clap_complete::engine::CompletionCandidate;

use crate::cli::{CommandContext, GlobalOptions};
use crate::directory::{ResourceKind, ResourceRecord};

/// Longest we keep the shell waiting for a listing
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a blocking runtime for completion API calls.
///
/// Completers are called synchronously by the shell, so we need
/// a runtime to execute async API calls.
fn blocking_runtime() -> Option<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .ok()
}

/// Value of `--flag value` or `--flag=value` on the partial command line.
fn flag_value(args: &[String], flag: &str) -> Option<String> {
    let prefix = format!("{}=", flag);
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter.next().filter(|v| !v.is_empty()).cloned();
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string()).filter(|v| !v.is_empty());
        }
    }
    None
}

/// Build a command context from the global flags already typed.
///
/// Returns None if config cannot be loaded. Without an API key the context
/// still builds, with the cache disabled, and completers return nothing.
fn completion_context(args: &[String]) -> Option<CommandContext> {
    let opts = GlobalOptions {
        api_key: flag_value(args, "--api-key"),
        api_key_env: flag_value(args, "--api-key-env"),
        config: flag_value(args, "--config").or_else(|| std::env::var("FILE_SEARCH_CONFIG").ok()),
        ..Default::default()
    };
    CommandContext::new(&opts).ok()
}

/// Records for `kind`; documents are scoped to the store flags on the line.
fn complete_records(kind: ResourceKind) -> Vec<ResourceRecord> {
    let args: Vec<String> = std::env::args().collect();

    let Some(ctx) = completion_context(&args) else {
        return vec![];
    };
    if !ctx.cache.is_enabled() {
        return vec![];
    }
    let Some(rt) = blocking_runtime() else {
        return vec![];
    };

    rt.block_on(async {
        let parent = if kind.requires_parent() {
            match store_from_args(&ctx, &args).await {
                Some(store) => Some(store),
                None => return vec![],
            }
        } else {
            None
        };
        ctx.completer()
            .records_within(kind, parent.as_deref(), COMPLETION_TIMEOUT)
            .await
    })
}

/// Store identifier for document completion, from `--store-id` or a
/// `--store` name that resolves to exactly one store.
async fn store_from_args(ctx: &CommandContext, args: &[String]) -> Option<String> {
    if let Some(id) = flag_value(args, "--store-id") {
        return Some(id);
    }
    let name = flag_value(args, "--store")?;
    let resolved = tokio::time::timeout(
        COMPLETION_TIMEOUT,
        ctx.resolver.resolve(ResourceKind::Store, &name, None),
    )
    .await;
    match resolved {
        Ok(Ok(id)) => Some(id),
        Ok(Err(err)) => {
            log::debug!("No document completions: {}", err);
            None
        }
        Err(_) => None,
    }
}

/// One candidate per distinct display name, in listing order.
///
/// The help text shows the identifier, or flags a name shared by several
/// resources (resolving it would fail as ambiguous).
fn name_candidates(records: &[ResourceRecord]) -> Vec<CompletionCandidate> {
    let mut names: Vec<(&str, Vec<&str>)> = Vec::new();
    for record in records.iter().filter(|r| !r.display_name.is_empty()) {
        match names.iter_mut().find(|(name, _)| *name == record.display_name) {
            Some((_, ids)) => ids.push(record.identifier.as_str()),
            None => names.push((
                record.display_name.as_str(),
                vec![record.identifier.as_str()],
            )),
        }
    }

    names
        .into_iter()
        .map(|(name, ids)| {
            let help = match ids.as_slice() {
                [id] => id.to_string(),
                _ => format!("ambiguous: {} matches, use the id", ids.len()),
            };
            CompletionCandidate::new(name).help(Some(help.into()))
        })
        .collect()
}

/// One candidate per identifier, with the display name as help.
fn id_candidates(records: &[ResourceRecord]) -> Vec<CompletionCandidate> {
    records
        .iter()
        .map(|record| {
            let candidate = CompletionCandidate::new(record.identifier.clone());
            if record.display_name.is_empty() {
                candidate
            } else {
                candidate.help(Some(record.display_name.clone().into()))
            }
        })
        .collect()
}

/// Complete store display names.
///
/// Note: clap_complete handles prefix filtering - we return all candidates.
pub fn store_name_candidates() -> Vec<CompletionCandidate> {
    name_candidates(&complete_records(ResourceKind::Store))
}

/// Complete store identifiers for `--store-id`.
pub fn store_id_candidates() -> Vec<CompletionCandidate> {
    id_candidates(&complete_records(ResourceKind::Store))
}

/// Complete file display names.
pub fn file_name_candidates() -> Vec<CompletionCandidate> {
    name_candidates(&complete_records(ResourceKind::File))
}

/// Complete document display names in the store given by `--store`/`--store-id`.
///
/// Without a store on the command line there is nothing to offer.
pub fn document_name_candidates() -> Vec<CompletionCandidate> {
    name_candidates(&complete_records(ResourceKind::Document))
}

/// Complete model ids (`gemini-2.5-flash`) that support content generation.
pub fn model_name_candidates() -> Vec<CompletionCandidate> {
    name_candidates(&complete_records(ResourceKind::Model))
}
