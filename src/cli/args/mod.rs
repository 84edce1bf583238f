//! Shared CLI argument types
//!
//! This module contains reusable argument structs that can be flattened
//! into commands using `#[command(flatten)]`.

mod common;
mod global;
mod store;

pub use common::{OutputFormat, parse_metadata};
pub use global::GlobalOptions;
pub use store::{OptionalStoreArgs, StoreArgs};
