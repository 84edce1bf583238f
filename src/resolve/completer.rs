//! Shell completion candidates from the resolution cache
//!
//! Completion never fails and never stalls the shell: reads are non-forcing,
//! and every directory error turns into an empty (or stale) list.

use std::time::Duration;

use log::{debug, warn};

use crate::cache::ResolutionCache;
use crate::cache::resolution::Records;
use crate::directory::{ResourceKind, ResourceRecord};

/// Supplies completion candidates from a shared [`ResolutionCache`].
#[derive(Clone)]
pub struct Completer {
    cache: ResolutionCache,
}

impl Completer {
    pub fn new(cache: ResolutionCache) -> Self {
        Self { cache }
    }

    /// Display names currently cached for `kind`.
    ///
    /// Returns immediately with whatever is cached, possibly stale or empty.
    /// A missing or expired entry starts a refresh that later calls will see.
    pub fn names(&self, kind: ResourceKind, parent: Option<&str>) -> Vec<String> {
        if !self.in_scope(kind, parent) {
            return Vec::new();
        }
        let peek = self.cache.peek(kind, parent);
        display_names(peek.records.as_deref().map(Vec::as_slice))
    }

    /// Like [`names`](Self::names), but waits up to `budget` for the refresh
    /// when the entry is missing or stale.
    ///
    /// Used by one-shot completion processes, where nothing would be around
    /// to read the result of a background refresh.
    pub async fn names_within(
        &self,
        kind: ResourceKind,
        parent: Option<&str>,
        budget: Duration,
    ) -> Vec<String> {
        let records = self.records_within(kind, parent, budget).await;
        display_names(Some(records.as_slice()))
    }

    /// Full records (identifier and display name), with the same
    /// waiting rules as [`names_within`](Self::names_within).
    pub async fn records_within(
        &self,
        kind: ResourceKind,
        parent: Option<&str>,
        budget: Duration,
    ) -> Vec<ResourceRecord> {
        if !self.in_scope(kind, parent) {
            return Vec::new();
        }

        let peek = self.cache.peek(kind, parent);
        let records: Option<Records> = match peek.refresh {
            None => peek.records,
            Some(refresh) => match tokio::time::timeout(budget, refresh.wait()).await {
                Ok(Ok(records)) => Some(records),
                Ok(Err(err)) if err.is_transient() => {
                    debug!("Completion for {}s unavailable for now: {}", kind, err);
                    peek.records
                }
                Ok(Err(err)) => {
                    warn!("Completion for {}s unavailable: {}", kind, err);
                    peek.records
                }
                Err(_) => {
                    debug!("Completion for {}s gave up after {:?}", kind, budget);
                    peek.records
                }
            },
        };

        records.map(|r| r.to_vec()).unwrap_or_default()
    }

    /// Disabled caches and parentless document lookups have nothing to offer.
    fn in_scope(&self, kind: ResourceKind, parent: Option<&str>) -> bool {
        self.cache.is_enabled() && !(kind.requires_parent() && parent.is_none())
    }
}

/// Non-empty display names, first occurrence only.
fn display_names(records: Option<&[ResourceRecord]>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for record in records.unwrap_or_default() {
        if !record.display_name.is_empty() && !names.contains(&record.display_name) {
            names.push(record.display_name.clone());
        }
    }
    names
}
