//! Store document display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{NONE, format_optional_timestamp, format_size};
use crate::client::models::Document;
use crate::output::{Fields, Row};

/// Document list row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct DocumentDisplay {
    #[tabled(rename = "NAME")]
    pub display_name: String,

    #[tabled(rename = "DOCUMENT ID")]
    pub id: String,

    #[tabled(rename = "STATE")]
    pub state: String,

    #[tabled(rename = "SIZE")]
    pub size: String,

    #[tabled(skip)]
    pub size_bytes: u64,
}

/// `STATE_ACTIVE` reads better as `ACTIVE`.
fn short_state(state: Option<&str>) -> String {
    state
        .map(|s| s.strip_prefix("STATE_").unwrap_or(s).to_string())
        .unwrap_or_else(|| NONE.to_string())
}

impl From<&Document> for DocumentDisplay {
    fn from(doc: &Document) -> Self {
        Self {
            display_name: doc.display_name.clone(),
            id: doc.name.clone(),
            state: short_state(doc.state.as_deref()),
            size: format_size(doc.size_bytes),
            size_bytes: doc.size_bytes,
        }
    }
}

impl Row for DocumentDisplay {
    fn text_line(&self) -> String {
        format!(
            "{} ({}) - {} - {} bytes",
            self.display_name, self.id, self.state, self.size_bytes
        )
    }
}

/// Labelled detail view of one document, with its custom metadata.
pub fn document_fields(doc: &Document) -> Fields {
    Fields::new()
        .field("Name", &doc.name)
        .field("Display Name", &doc.display_name)
        .field("State", short_state(doc.state.as_deref()))
        .field("Size", format!("{} bytes", doc.size_bytes))
        .field("MIME Type", doc.mime_type.as_deref().unwrap_or(NONE))
        .field(
            "Create Time",
            format_optional_timestamp(doc.create_time.as_deref()),
        )
        .field(
            "Update Time",
            format_optional_timestamp(doc.update_time.as_deref()),
        )
        .section(
            "Custom Metadata",
            doc.custom_metadata
                .iter()
                .map(|meta| (meta.key.clone(), meta.value_text())),
        )
}
