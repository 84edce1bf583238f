//! Resolution cache with per-key single-flight refresh
//!
//! Each [`CacheKey`] owns a slot holding the last fetched listing and, while
//! one is running, the refresh that will replace it. Concurrent readers of a
//! stale or missing key all await the same refresh. The refresh runs on its
//! own task, so a reader that stops waiting never cancels it for the others.
//!
//! The slot table sits behind a plain mutex that is only held to inspect or
//! swap a slot, never across a network call.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, warn};
use tokio::runtime::Handle;
use tokio::time::Instant;

use super::{CacheKey, CacheSettings, DisabledReason, normalize_ttl};
use crate::client::{ApiResult, DirectoryApi};
use crate::directory::{ResourceKind, ResourceRecord};
use crate::error::ApiError;

/// One listing, shared between every reader of the same entry
pub type Records = Arc<Vec<ResourceRecord>>;

type RefreshFuture = Shared<BoxFuture<'static, ApiResult<Records>>>;

struct CacheEntry {
    records: Records,
    fetched_at: Instant,
}

struct InFlight {
    id: u64,
    future: RefreshFuture,
    /// Set when the key was invalidated after this refresh started; its
    /// result is handed to existing waiters but never stored.
    invalidated: bool,
}

#[derive(Default)]
struct Slot {
    entry: Option<CacheEntry>,
    refresh: Option<InFlight>,
}

struct Inner {
    directory: Arc<dyn DirectoryApi>,
    settings: CacheSettings,
    slots: Mutex<HashMap<CacheKey, Slot>>,
    next_flight: AtomicU64,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Slot>> {
        // A panic while holding the lock cannot leave a slot half-written
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_fresh(&self, entry: &CacheEntry) -> bool {
        entry.fetched_at.elapsed() < self.settings.ttl
    }

    /// Spawn a refresh for `key` and record it as the slot's flight.
    ///
    /// With `after` set, the fetch waits for that earlier flight to settle
    /// first, so one key never has two fetches running at once.
    fn start_refresh(
        self: &Arc<Self>,
        key: &CacheKey,
        slot: &mut Slot,
        after: Option<RefreshFuture>,
    ) -> RefreshFuture {
        let id = self.next_flight.fetch_add(1, Ordering::Relaxed);

        let task_inner = Arc::clone(self);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            if let Some(previous) = after {
                debug!("Waiting for invalidated refresh of {} to settle", task_key);
                let _ = previous.await;
            }
            let outcome = task_inner.fetch(&task_key).await;
            task_inner.complete(&task_key, id, &outcome);
            outcome
        });

        let cleanup_inner = Arc::clone(self);
        let cleanup_key = key.clone();
        let future = async move {
            match handle.await {
                Ok(outcome) => outcome,
                Err(err) => {
                    let outcome = Err(ApiError::Network(format!(
                        "directory refresh aborted: {}",
                        err
                    )));
                    cleanup_inner.complete(&cleanup_key, id, &outcome);
                    outcome
                }
            }
        }
        .boxed()
        .shared();

        slot.refresh = Some(InFlight {
            id,
            future: future.clone(),
            invalidated: false,
        });
        future
    }

    async fn fetch(&self, key: &CacheKey) -> ApiResult<Records> {
        debug!("Refreshing {}", key);
        let timeout = self.settings.refresh_timeout;
        let listing = self.directory.list(key.kind, key.parent.as_deref());

        match tokio::time::timeout(timeout, listing).await {
            Ok(Ok(records)) => Ok(Arc::new(records)),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(ApiError::Timeout(timeout)),
        }
    }

    /// Store the outcome of flight `id`, unless a newer flight replaced it.
    fn complete(&self, key: &CacheKey, id: u64, outcome: &ApiResult<Records>) {
        let mut slots = self.lock();
        let Some(slot) = slots.get_mut(key) else {
            return;
        };
        let Some(flight) = slot.refresh.take_if(|flight| flight.id == id) else {
            return;
        };

        match outcome {
            Ok(records) if !flight.invalidated => {
                debug!("Cached {} {}", records.len(), key);
                slot.entry = Some(CacheEntry {
                    records: Arc::clone(records),
                    fetched_at: Instant::now(),
                });
            }
            Ok(_) => debug!("Dropping refresh of {} invalidated while in flight", key),
            Err(err) => debug!("Refresh of {} failed: {}", key, err),
        }
    }

    /// Join the running refresh for a slot, or start one.
    ///
    /// A flight invalidated while running may predate the mutation that
    /// invalidated it, so it is not joined; the new flight is queued behind it.
    fn refresh_for(self: &Arc<Self>, key: &CacheKey, slot: &mut Slot) -> RefreshFuture {
        match &slot.refresh {
            Some(flight) if !flight.invalidated => {
                debug!("Joining in-flight refresh of {}", key);
                flight.future.clone()
            }
            Some(flight) => {
                let previous = flight.future.clone();
                self.start_refresh(key, slot, Some(previous))
            }
            None => self.start_refresh(key, slot, None),
        }
    }
}

/// A refresh started or joined by a non-forcing read.
pub struct PendingRefresh(RefreshFuture);

impl PendingRefresh {
    /// Wait for the refresh to finish.
    ///
    /// Dropping this future stops waiting without cancelling the refresh.
    pub async fn wait(self) -> ApiResult<Records> {
        self.0.await
    }
}

/// Result of [`ResolutionCache::peek`]
pub struct Peek {
    /// Whatever the entry holds right now, fresh or stale
    pub records: Option<Records>,
    /// Set when the entry was not fresh and a refresh is under way
    pub refresh: Option<PendingRefresh>,
}

/// Process-lifetime cache of directory listings.
///
/// Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct ResolutionCache {
    inner: Option<Arc<Inner>>,
    disabled_reason: Option<DisabledReason>,
}

impl ResolutionCache {
    /// Create a cache over `directory`. Disabled settings (turned off, or
    /// no credentials) produce a cache that never fetches.
    pub fn new(directory: Arc<dyn DirectoryApi>, settings: CacheSettings) -> Self {
        if let Some(reason) = settings.disabled_reason() {
            debug!("Resolution cache disabled ({:?})", reason);
            return Self::disabled(reason);
        }

        let settings = CacheSettings {
            ttl: normalize_ttl(settings.ttl),
            ..settings
        };
        Self {
            inner: Some(Arc::new(Inner {
                directory,
                settings,
                slots: Mutex::new(HashMap::new()),
                next_flight: AtomicU64::new(0),
            })),
            disabled_reason: None,
        }
    }

    /// A cache with no directory behind it.
    pub fn disabled(reason: DisabledReason) -> Self {
        Self {
            inner: None,
            disabled_reason: Some(reason),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Why the cache is off; `None` while it is enabled.
    pub fn disabled_reason(&self) -> Option<DisabledReason> {
        self.disabled_reason
    }

    /// Records for `kind` (and `parent` for documents).
    ///
    /// Fresh entries are returned without a fetch. Otherwise the caller waits
    /// for the key's single in-flight refresh. When that refresh fails and
    /// stale-on-error is enabled, the previous listing is returned instead.
    /// A disabled cache always returns an empty listing.
    pub async fn get(&self, kind: ResourceKind, parent: Option<&str>) -> ApiResult<Records> {
        let Some(inner) = &self.inner else {
            return Ok(Records::default());
        };
        let key = CacheKey::new(kind, parent);

        let (refresh, stale) = {
            let mut slots = inner.lock();
            let slot = slots.entry(key.clone()).or_default();

            if let Some(entry) = &slot.entry
                && inner.is_fresh(entry)
            {
                debug!("Cache hit for {}", key);
                return Ok(Arc::clone(&entry.records));
            }

            let stale = slot.entry.as_ref().map(|e| Arc::clone(&e.records));
            (inner.refresh_for(&key, slot), stale)
        };

        match refresh.await {
            Ok(records) => Ok(records),
            Err(err) => match stale {
                Some(records) if inner.settings.stale_on_error => {
                    warn!("Using stale {} after refresh failed: {}", key, err);
                    Ok(records)
                }
                _ => Err(err),
            },
        }
    }

    /// Non-forcing read: return what is cached now without waiting.
    ///
    /// A missing or stale entry starts a refresh (or joins the running one)
    /// when a Tokio runtime is available; the returned [`Peek::refresh`] lets
    /// the caller decide whether to wait for it.
    pub fn peek(&self, kind: ResourceKind, parent: Option<&str>) -> Peek {
        let Some(inner) = &self.inner else {
            return Peek {
                records: None,
                refresh: None,
            };
        };
        let key = CacheKey::new(kind, parent);

        let mut slots = inner.lock();
        let slot = slots.entry(key.clone()).or_default();
        let records = slot.entry.as_ref().map(|e| Arc::clone(&e.records));

        if slot.entry.as_ref().is_some_and(|e| inner.is_fresh(e)) {
            return Peek {
                records,
                refresh: None,
            };
        }

        let refresh = if Handle::try_current().is_ok() {
            Some(PendingRefresh(inner.refresh_for(&key, slot)))
        } else {
            debug!("No runtime to refresh {}", key);
            None
        };
        Peek { records, refresh }
    }

    /// Drop the entry for `kind`/`parent` so the next read fetches again.
    ///
    /// A refresh already running for the key still answers its current
    /// waiters, but its result is not stored. The next read starts a new
    /// refresh once the running one has finished.
    pub fn invalidate(&self, kind: ResourceKind, parent: Option<&str>) {
        let Some(inner) = &self.inner else {
            return;
        };
        let key = CacheKey::new(kind, parent);

        let mut slots = inner.lock();
        if let Some(slot) = slots.get_mut(&key) {
            slot.entry = None;
            if let Some(flight) = slot.refresh.as_mut() {
                flight.invalidated = true;
            }
            debug!("Invalidated {}", key);
        }
    }
}
