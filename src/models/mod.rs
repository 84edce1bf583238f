//! Display models for CLI output
//!
//! This module converts API response types into CLI-friendly display formats.

pub mod display;

pub use display::{
    DocumentDisplay, FileDisplay, QueryDisplay, StoreDisplay, document_fields, file_fields,
    operation_fields, store_fields,
};
