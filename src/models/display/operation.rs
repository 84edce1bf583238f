//! Long-running operation display

use serde_json::Value;

use crate::client::models::OperationStatus;
use crate::output::Fields;

/// Labelled status of an import or upload operation.
pub fn operation_fields(status: &OperationStatus) -> Fields {
    let fields = Fields::new()
        .field("Operation", &status.name)
        .field("Type", status.op_type);

    let fields = if status.failed {
        fields.field("Status", "FAILED").field(
            "Error",
            status.error_message.as_deref().unwrap_or("unknown error"),
        )
    } else if status.done {
        fields
            .field("Status", "DONE")
            .optional("Store", status.parent.as_deref())
            .optional("Document", status.document_name.as_deref())
    } else {
        fields.field("Status", "PENDING")
    };

    fields.section(
        "Metadata",
        status
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "@type")
            .map(|(key, value)| (key.clone(), value_text(value))),
    )
}

/// Strings without quotes; everything else as compact JSON.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
