//! Common CLI types shared across commands

use crate::client::models::CustomMetadata;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Text format - one line per record, labelled fields for details (default)
    #[default]
    Text,
    /// Table format - rounded tables, one row per entry
    Table,
    /// JSON format - structured for scripts
    Json,
}

/// Turn `key=value` arguments into custom metadata.
///
/// Splits on the first `=`, so values may contain `=` themselves. Entries
/// without `=` or with an empty key are skipped.
pub fn parse_metadata(pairs: &[String]) -> Vec<CustomMetadata> {
    pairs
        .iter()
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                log::warn!("Ignoring metadata entry without a key: {}", pair);
                return None;
            }
            Some(CustomMetadata::string(key, value))
        })
        .collect()
}
