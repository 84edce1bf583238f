//! File search store display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{format_optional_timestamp, format_size};
use crate::client::models::FileSearchStore;
use crate::output::{Fields, Row};

/// Store list row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct StoreDisplay {
    #[tabled(rename = "NAME")]
    pub display_name: String,

    #[tabled(rename = "STORE ID")]
    pub id: String,

    #[tabled(rename = "DOCS")]
    pub documents: u64,

    /// Pending plus failed, so a stuck import is visible at a glance
    #[tabled(rename = "NOT ACTIVE")]
    pub not_active: u64,

    #[tabled(rename = "SIZE")]
    pub size: String,
}

impl From<&FileSearchStore> for StoreDisplay {
    fn from(store: &FileSearchStore) -> Self {
        Self {
            display_name: store.display_name.clone(),
            id: store.name.clone(),
            documents: store.active_documents_count,
            not_active: store.pending_documents_count + store.failed_documents_count,
            size: format_size(store.size_bytes),
        }
    }
}

impl Row for StoreDisplay {
    fn text_line(&self) -> String {
        format!("{} ({})", self.display_name, self.id)
    }
}

/// Labelled detail view of one store.
pub fn store_fields(store: &FileSearchStore) -> Fields {
    Fields::new()
        .field("Name", &store.name)
        .field("Display Name", &store.display_name)
        .field(
            "Create Time",
            format_optional_timestamp(store.create_time.as_deref()),
        )
        .field(
            "Update Time",
            format_optional_timestamp(store.update_time.as_deref()),
        )
        .field("Active Documents", store.active_documents_count)
        .field("Pending Documents", store.pending_documents_count)
        .field("Failed Documents", store.failed_documents_count)
        .field("Total Size", format!("{} bytes", store.size_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manuals() -> FileSearchStore {
        FileSearchStore {
            name: "fileSearchStores/abc".to_string(),
            display_name: "Manuals".to_string(),
            active_documents_count: 3,
            pending_documents_count: 1,
            failed_documents_count: 1,
            size_bytes: 2048,
            ..Default::default()
        }
    }

    #[test]
    fn test_store_display_row() {
        let display = StoreDisplay::from(&manuals());

        assert_eq!(display.documents, 3);
        assert_eq!(display.not_active, 2);
        assert_eq!(display.size, "2.0 KB");
        assert_eq!(display.text_line(), "Manuals (fileSearchStores/abc)");
    }

    #[test]
    fn test_store_fields() {
        let text = store_fields(&manuals()).to_text();

        assert!(text.starts_with("Name: fileSearchStores/abc\nDisplay Name: Manuals"));
        assert!(text.contains("Create Time: --"));
        assert!(text.contains("Pending Documents: 1"));
        assert!(text.ends_with("Total Size: 2048 bytes"));
    }
}
