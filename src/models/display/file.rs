//! Uploaded file display models

use serde::Serialize;
use tabled::Tabled;

use super::common::{NONE, format_optional_timestamp, format_size, truncate_string};
use crate::client::models::File;
use crate::output::{Fields, Row};

/// File list row
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct FileDisplay {
    #[tabled(rename = "NAME")]
    pub display_name: String,

    #[tabled(rename = "FILE ID")]
    pub id: String,

    #[tabled(rename = "TYPE")]
    pub mime_type: String,

    #[tabled(rename = "SIZE")]
    pub size: String,

    #[tabled(rename = "STATE")]
    pub state: String,

    #[tabled(skip)]
    pub uri: String,
}

impl From<&File> for FileDisplay {
    fn from(file: &File) -> Self {
        Self {
            display_name: truncate_string(&file.display_name, 40),
            id: file.name.clone(),
            mime_type: file.mime_type.clone().unwrap_or_else(|| NONE.to_string()),
            size: format_size(file.size_bytes),
            state: file.state.clone().unwrap_or_else(|| NONE.to_string()),
            uri: file.uri.clone(),
        }
    }
}

impl Row for FileDisplay {
    fn text_line(&self) -> String {
        format!("{} ({}) - {}", self.display_name, self.id, self.uri)
    }
}

/// Labelled detail view of one file.
pub fn file_fields(file: &File) -> Fields {
    Fields::new()
        .field("Name", &file.name)
        .field("Display Name", &file.display_name)
        .field("URI", &file.uri)
        .field("MIME Type", file.mime_type.as_deref().unwrap_or(NONE))
        .field("Size", format!("{} bytes", file.size_bytes))
        .field(
            "Create Time",
            format_optional_timestamp(file.create_time.as_deref()),
        )
        .field(
            "Update Time",
            format_optional_timestamp(file.update_time.as_deref()),
        )
        .optional(
            "Expiration Time",
            file.expiration_time.as_deref().map(super::common::format_timestamp),
        )
        .field("State", file.state.as_deref().unwrap_or(NONE))
}
