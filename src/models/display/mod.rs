//! Display model implementations for text, table and JSON output
//!
//! List rows transform API resources into CLI-friendly columns; the
//! `*_fields` functions build the labelled detail view of one resource.

mod common;
mod document;
mod file;
mod operation;
mod query;
mod store;

pub use document::{DocumentDisplay, document_fields};
pub use file::{FileDisplay, file_fields};
pub use operation::operation_fields;
pub use query::QueryDisplay;
pub use store::{StoreDisplay, store_fields};
