//! Command execution context
//!
//! Provides a unified context for command execution: config loading,
//! credential lookup, the API client, and the per-process resolution cache.

use std::sync::Arc;

use crate::cache::ResolutionCache;
use crate::cli::{GlobalOptions, OptionalStoreArgs, OutputFormat, StoreArgs};
use crate::client::GeminiClient;
use crate::config::Config;
use crate::directory::ResourceKind;
use crate::error::Result;
use crate::resolve::{Completer, Resolver};

/// Context for command execution containing config, client, and runtime options.
///
/// The resolution cache lives here and nowhere else, so every lookup made
/// while one command runs shares the same listings.
pub struct CommandContext {
    /// Loaded configuration with environment overrides applied
    pub config: Config,
    /// API client (Arc-wrapped so the cache can share it)
    pub client: Arc<GeminiClient>,
    /// Display-name listings for this process
    pub cache: ResolutionCache,
    pub resolver: Resolver,
    /// Output format preference
    pub format: OutputFormat,
    /// Suppress spinners
    pub quiet: bool,
}

impl CommandContext {
    /// Create a new command context.
    ///
    /// This handles:
    /// - Loading config from path (or default location) and env overrides
    /// - Finding the API key (flag, custom env var, standard env vars, config)
    /// - Creating the API client, honoring an `api_host` override
    /// - Building the resolution cache, disabled when there is no key
    ///
    /// A missing key is not an error here. Commands given identifiers fail
    /// at the first request; display names fail at resolution.
    pub fn new(opts: &GlobalOptions) -> Result<Self> {
        Self::with_env(opts, |name| std::env::var(name).ok())
    }

    /// Like [`new`](Self::new), reading environment variables through `lookup`.
    pub fn with_env<F>(opts: &GlobalOptions, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::load_at(opts.config_ref())?;
        config.apply_overrides(&lookup)?;

        let api_key = config.resolve_api_key(opts.api_key_ref(), opts.api_key_env_ref(), &lookup);

        let mut client = GeminiClient::new(api_key)?;
        if let Some(host) = config.api_host.as_deref().filter(|h| !h.is_empty()) {
            log::debug!("Using API host {}", host);
            client = client.with_host(host);
        }
        let client = Arc::new(client);

        let settings = config.cache_settings(client.has_credentials())?;
        match settings.disabled_reason() {
            None => log::debug!("Resolution cache enabled (ttl {:?})", settings.ttl),
            Some(reason) => log::debug!("Resolution cache disabled: {:?}", reason),
        }
        let cache = ResolutionCache::new(client.clone(), settings);
        let resolver = Resolver::new(cache.clone());

        Ok(Self {
            config,
            client,
            cache,
            resolver,
            format: opts.format,
            quiet: opts.quiet,
        })
    }

    /// Completion provider over this context's cache.
    pub fn completer(&self) -> Completer {
        Completer::new(self.cache.clone())
    }

    /// Resolve a user-supplied name or id to an identifier.
    pub async fn resolve(
        &self,
        kind: ResourceKind,
        input: &str,
        parent: Option<&str>,
    ) -> Result<String> {
        Ok(self.resolver.resolve(kind, input, parent).await?)
    }

    /// Store identifier from `--store` (resolved) or `--store-id` (used as given).
    pub async fn require_store(&self, args: &StoreArgs) -> Result<String> {
        match &args.store {
            Some(name) => self.resolve(ResourceKind::Store, name, None).await,
            None => Ok(args.value().to_string()),
        }
    }

    /// Like [`require_store`](Self::require_store) for commands where the store is optional.
    pub async fn optional_store(&self, args: &OptionalStoreArgs) -> Result<Option<String>> {
        match (&args.store, &args.store_id) {
            (Some(name), _) => Ok(Some(self.resolve(ResourceKind::Store, name, None).await?)),
            (None, Some(id)) => Ok(Some(id.clone())),
            (None, None) => Ok(None),
        }
    }
}
