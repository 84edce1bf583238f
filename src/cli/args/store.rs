//! Store selection flags
//!
//! Commands that act inside a store accept either `--store` (display name,
//! resolved through the cache) or `--store-id` (identifier, used as is).

use clap::Args;
use clap_complete::engine::ArgValueCandidates;

use crate::cli::completions::{store_id_candidates, store_name_candidates};

/// A store the command cannot run without
#[derive(Debug, Clone, Args)]
#[group(required = true, multiple = false)]
pub struct StoreArgs {
    /// Store display name
    #[arg(long, add = ArgValueCandidates::new(store_name_candidates))]
    pub store: Option<String>,

    /// Store identifier (fileSearchStores/...)
    #[arg(long, add = ArgValueCandidates::new(store_id_candidates))]
    pub store_id: Option<String>,
}

impl StoreArgs {
    /// The value the user typed, whichever flag carried it.
    pub fn value(&self) -> &str {
        self.store
            .as_deref()
            .or(self.store_id.as_deref())
            .unwrap_or_default()
    }
}

/// A store the command can use but does not need
#[derive(Debug, Clone, Default, Args)]
#[group(required = false, multiple = false)]
pub struct OptionalStoreArgs {
    /// Store display name
    #[arg(long, add = ArgValueCandidates::new(store_name_candidates))]
    pub store: Option<String>,

    /// Store identifier (fileSearchStores/...)
    #[arg(long, add = ArgValueCandidates::new(store_id_candidates))]
    pub store_id: Option<String>,
}

impl OptionalStoreArgs {
    pub fn value(&self) -> Option<&str> {
        self.store.as_deref().or(self.store_id.as_deref())
    }
}
