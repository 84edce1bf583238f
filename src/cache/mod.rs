//! Process-lifetime cache of directory listings
//!
//! Holds the most recent display-name → identifier listing per resource kind
//! (and per parent store for documents). Entries expire lazily after the
//! configured TTL and are never written to disk. Designed to keep name
//! resolution and shell completions from hitting the API on every call.

pub mod key;
pub mod resolution;

use std::time::Duration;

/// Cache TTL configuration
pub struct CacheTtl;

impl CacheTtl {
    /// Freshness window used when none (or zero) is configured
    pub const DEFAULT: Duration = Duration::from_secs(5 * 60); // 5 min

    /// Upper bound on a single directory refresh
    pub const REFRESH_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Runtime settings for a [`ResolutionCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    /// How long a fetched listing stays fresh
    pub ttl: Duration,
    /// False disables caching and name lookups entirely
    pub enabled: bool,
    /// Whether an API key is available; without one the cache is off
    pub credentials: bool,
    /// Serve the last known listing when a refresh fails
    pub stale_on_error: bool,
    /// Deadline for one directory refresh
    pub refresh_timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: CacheTtl::DEFAULT,
            enabled: true,
            credentials: true,
            stale_on_error: true,
            refresh_timeout: CacheTtl::REFRESH_TIMEOUT,
        }
    }
}

impl CacheSettings {
    /// Set the freshness window. Zero means "use the default".
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = normalize_ttl(ttl);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn credentials(mut self, credentials: bool) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn stale_on_error(mut self, stale_on_error: bool) -> Self {
        self.stale_on_error = stale_on_error;
        self
    }

    pub fn refresh_timeout(mut self, timeout: Duration) -> Self {
        self.refresh_timeout = if timeout.is_zero() {
            CacheTtl::REFRESH_TIMEOUT
        } else {
            timeout
        };
        self
    }
}

impl CacheSettings {
    /// Why a cache built from these settings would be off, if it would be.
    pub fn disabled_reason(&self) -> Option<DisabledReason> {
        if !self.enabled {
            Some(DisabledReason::TurnedOff)
        } else if !self.credentials {
            Some(DisabledReason::NoCredentials)
        } else {
            None
        }
    }
}

/// Why name lookups are unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    /// `completion_enabled` is false
    TurnedOff,
    /// No API key was found
    NoCredentials,
}

/// A zero TTL would mean either "always stale" (a refresh storm) or
/// "never stale"; both are treated as unset.
pub fn normalize_ttl(ttl: Duration) -> Duration {
    if ttl.is_zero() { CacheTtl::DEFAULT } else { ttl }
}

// Re-export main types
pub use key::CacheKey;
pub use resolution::{Peek, PendingRefresh, Records, ResolutionCache};
