//! Long-running operation models

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::directory::OPERATION_SEGMENT;

/// Path segment that distinguishes direct store uploads from imports
const UPLOAD_OPERATION_SEGMENT: &str = "/upload/operations/";

/// Raw long-running operation as returned by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation name (`fileSearchStores/{store}/operations/{id}`)
    pub name: String,

    #[serde(default)]
    pub done: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<BTreeMap<String, Value>>,
}

/// Failure status carried by a finished operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// What kind of work an operation tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Import,
    Upload,
}

impl OperationType {
    /// Infer the type from the operation name.
    pub fn detect(name: &str) -> Self {
        if name.contains(UPLOAD_OPERATION_SEGMENT) {
            OperationType::Upload
        } else {
            OperationType::Import
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Import => f.write_str("import"),
            OperationType::Upload => f.write_str("upload"),
        }
    }
}

impl FromStr for OperationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "import" => Ok(OperationType::Import),
            "upload" => Ok(OperationType::Upload),
            other => Err(format!(
                "invalid operation type: {} (must be 'import' or 'upload')",
                other
            )),
        }
    }
}

/// Flattened operation state for display
#[derive(Debug, Clone, Serialize)]
pub struct OperationStatus {
    pub name: String,
    #[serde(rename = "type")]
    pub op_type: OperationType,
    pub done: bool,
    pub failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

impl OperationStatus {
    /// Summarize an operation; `op_type` overrides name-based detection.
    pub fn from_operation(op: Operation, op_type: Option<OperationType>) -> Self {
        let op_type = op_type.unwrap_or_else(|| OperationType::detect(&op.name));
        let response = op.response.unwrap_or_default();

        let parent = response
            .get("parent")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| parent_of(&op.name).map(str::to_string));
        let document_name = response
            .get("documentName")
            .and_then(Value::as_str)
            .map(str::to_string);

        let failed = op.error.is_some();
        Self {
            name: op.name,
            op_type,
            done: op.done || failed,
            failed,
            error_message: op.error.map(|e| e.message),
            parent,
            document_name,
            metadata: op.metadata.unwrap_or_default(),
        }
    }
}

/// Store that owns an operation, from its name.
fn parent_of(name: &str) -> Option<&str> {
    name.split_once(UPLOAD_OPERATION_SEGMENT)
        .or_else(|| name.split_once(OPERATION_SEGMENT))
        .map(|(parent, _)| parent)
}
