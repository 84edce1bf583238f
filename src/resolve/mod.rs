//! Name resolution: turn what the user typed into a resource identifier
//!
//! Identifiers pass straight through. Anything else is treated as a display
//! name and looked up in the [`ResolutionCache`], matching exactly and
//! case-sensitively. Ambiguity is always reported, never broken by guessing.

pub mod completer;

use log::debug;

use crate::cache::{DisabledReason, ResolutionCache};
use crate::directory::{ResourceKind, ResourceRecord};
use crate::error::ResolveError;

pub use completer::Completer;

/// Maps display names to identifiers through a shared [`ResolutionCache`].
#[derive(Clone)]
pub struct Resolver {
    cache: ResolutionCache,
}

impl Resolver {
    pub fn new(cache: ResolutionCache) -> Self {
        Self { cache }
    }

    /// Resolve `input` to an identifier of `kind`.
    ///
    /// Documents need `parent`, the owning store given as an identifier or a
    /// display name; it is resolved first and the document looked up inside
    /// it. `parent` is ignored for every other kind.
    pub async fn resolve(
        &self,
        kind: ResourceKind,
        input: &str,
        parent: Option<&str>,
    ) -> Result<String, ResolveError> {
        if kind.is_identifier(input) {
            return Ok(input.to_string());
        }
        if let Some(reason) = self.cache.disabled_reason() {
            let value = input.to_string();
            return Err(match reason {
                DisabledReason::TurnedOff => ResolveError::LookupsDisabled { kind, value },
                DisabledReason::NoCredentials => ResolveError::Unauthenticated { kind, value },
            });
        }

        let parent = if kind.requires_parent() {
            let store = parent.ok_or_else(|| ResolveError::MissingParent {
                value: input.to_string(),
            })?;
            Some(self.lookup(ResourceKind::Store, store, None).await?)
        } else {
            None
        };

        self.lookup(kind, input, parent.as_deref()).await
    }

    /// Resolve one name against one listing; `parent` is already an identifier.
    async fn lookup(
        &self,
        kind: ResourceKind,
        input: &str,
        parent: Option<&str>,
    ) -> Result<String, ResolveError> {
        if kind.is_identifier(input) {
            return Ok(input.to_string());
        }

        let records = self.cache.get(kind, parent).await?;
        let identifier = select(kind, input, &records)?;
        debug!("Resolved {} \"{}\" to {}", kind, input, identifier);
        Ok(identifier)
    }
}

/// Pick the single record whose display name is exactly `input`.
fn select(
    kind: ResourceKind,
    input: &str,
    records: &[ResourceRecord],
) -> Result<String, ResolveError> {
    let mut matches = records.iter().filter(|r| r.display_name == input);

    match (matches.next(), matches.next()) {
        (None, _) => Err(ResolveError::NotFound {
            kind,
            value: input.to_string(),
        }),
        (Some(only), None) => Ok(only.identifier.clone()),
        (Some(first), Some(second)) => Err(ResolveError::Ambiguous {
            kind,
            value: input.to_string(),
            candidates: [first, second]
                .into_iter()
                .chain(matches)
                .map(|r| r.identifier.clone())
                .collect(),
        }),
    }
}
