//! Resource kinds and the records the remote directory hands back
//!
//! Every remote resource has an opaque, prefixed identifier (for example
//! `fileSearchStores/abc123`) and a human-chosen display name. Identifiers
//! are unique; display names are not.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of file search store identifiers
pub const STORE_PREFIX: &str = "fileSearchStores/";

/// Prefix of uploaded file identifiers
pub const FILE_PREFIX: &str = "files/";

/// Path segment that marks a document identifier inside its store
pub const DOCUMENT_SEGMENT: &str = "/documents/";

/// Prefix of model identifiers
pub const MODEL_PREFIX: &str = "models/";

/// Path segment that marks a long-running operation
pub const OPERATION_SEGMENT: &str = "/operations/";

/// Category of named remote entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Store,
    File,
    Document,
    Model,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Store,
        ResourceKind::File,
        ResourceKind::Document,
        ResourceKind::Model,
    ];

    /// Whether `input` is already a well-formed identifier of this kind.
    ///
    /// Documents live under their store, so a document identifier is a store
    /// identifier followed by `/documents/<id>`.
    pub fn is_identifier(&self, input: &str) -> bool {
        match self {
            ResourceKind::Store => input
                .strip_prefix(STORE_PREFIX)
                .is_some_and(|rest| !rest.is_empty() && !rest.contains('/')),
            ResourceKind::File => input
                .strip_prefix(FILE_PREFIX)
                .is_some_and(|rest| !rest.is_empty()),
            ResourceKind::Document => {
                input.starts_with(STORE_PREFIX)
                    && input
                        .split_once(DOCUMENT_SEGMENT)
                        .is_some_and(|(_, doc)| !doc.is_empty())
            }
            ResourceKind::Model => input
                .strip_prefix(MODEL_PREFIX)
                .is_some_and(|rest| !rest.is_empty()),
        }
    }

    /// Only documents are scoped to a parent store.
    pub fn requires_parent(&self) -> bool {
        matches!(self, ResourceKind::Document)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Store => "store",
            ResourceKind::File => "file",
            ResourceKind::Document => "document",
            ResourceKind::Model => "model",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a directory listing.
///
/// Records are never patched; a refresh replaces the whole set for its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub display_name: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl ResourceRecord {
    pub fn new(display_name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            identifier: identifier.into(),
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}
