//! Output formatting for CLI results
//!
//! Lists print as one line per record (text), a rounded table, or a JSON
//! envelope. Single records print as labelled fields in the same three
//! formats.

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;
pub mod text;

pub use text::Fields;

/// Trait for types that can be formatted for output
pub trait Formattable {
    /// Format the data according to the specified format
    fn format(&self, format: OutputFormat) -> Result<String>;
}

/// A list row: a table row, a JSON object, and a one-line text summary.
pub trait Row: Tabled + Serialize {
    fn text_line(&self) -> String;
}

impl<D: Row> Formattable for Vec<D> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text if self.is_empty() => Ok(table::EMPTY_MESSAGE.to_string()),
            OutputFormat::Text => Ok(self
                .iter()
                .map(Row::text_line)
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => Ok(table::format_table(self)),
            OutputFormat::Json => Ok(json::format_json(self)?),
        }
    }
}

/// One record shown in detail: the raw record for JSON, labelled fields otherwise.
pub struct Detail<'a, T: Serialize> {
    record: &'a T,
    fields: Fields,
}

impl<'a, T: Serialize> Detail<'a, T> {
    pub fn new(record: &'a T, fields: Fields) -> Self {
        Self { record, fields }
    }
}

impl<T: Serialize> Formattable for Detail<'_, T> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text => Ok(self.fields.to_text()),
            OutputFormat::Table => Ok(table::format_fields(&self.fields)),
            OutputFormat::Json => Ok(json::format_json(self.record)?),
        }
    }
}

/// Format and print data to stdout
pub fn print<T: Formattable + ?Sized>(data: &T, format: OutputFormat) -> Result<()> {
    let output = data.format(format)?;
    println!("{}", output);
    Ok(())
}
