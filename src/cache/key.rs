//! Cache keys: one entry per resource kind, documents additionally per store

use std::fmt;

use crate::directory::ResourceKind;

/// Identifies one cached directory listing.
///
/// The parent only takes part in the key for kinds that are scoped to a
/// parent (documents); for every other kind it is dropped so that callers
/// passing a stray parent still share the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: ResourceKind,
    pub parent: Option<String>,
}

impl CacheKey {
    pub fn new(kind: ResourceKind, parent: Option<&str>) -> Self {
        let parent = if kind.requires_parent() {
            parent.map(str::to_string)
        } else {
            None
        };
        Self { kind, parent }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parent {
            Some(parent) => write!(f, "{}s of {}", self.kind, parent),
            None => write!(f, "{}s", self.kind),
        }
    }
}
