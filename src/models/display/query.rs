//! Query answer display

use crate::cli::OutputFormat;
use crate::client::models::GenerateContentResponse;
use crate::error::Result;
use crate::output::{Formattable, json};

/// Answer text followed by the titles of the documents it was grounded on.
pub struct QueryDisplay<'a> {
    pub response: &'a GenerateContentResponse,
}

impl<'a> QueryDisplay<'a> {
    pub fn new(response: &'a GenerateContentResponse) -> Self {
        Self { response }
    }

    fn to_text(&self) -> String {
        let mut out = self.response.text();
        let sources = self.response.sources();
        if !sources.is_empty() {
            out.push_str("\n\nSources:");
            for title in sources {
                out.push_str("\n  - ");
                out.push_str(&title);
            }
        }
        out
    }
}

impl Formattable for QueryDisplay<'_> {
    fn format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Text | OutputFormat::Table => Ok(self.to_text()),
            OutputFormat::Json => Ok(json::format_json(self.response)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_with_sources() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{
                "candidates": [{
                    "content": {"parts": [{"text": "Hold the button for 5 seconds."}]},
                    "groundingMetadata": {"groundingChunks": [
                        {"retrievedContext": {"title": "guide.pdf"}},
                        {"retrievedContext": {"title": "guide.pdf"}},
                        {"retrievedContext": {"title": "faq.md"}}
                    ]}
                }]
            }"#,
        )
        .unwrap();

        let text = QueryDisplay::new(&response)
            .format(OutputFormat::Text)
            .unwrap();
        assert_eq!(
            text,
            "Hold the button for 5 seconds.\n\nSources:\n  - guide.pdf\n  - faq.md"
        );
    }

    #[test]
    fn test_answer_without_grounding() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "Hi."}]}}]}"#,
        )
        .unwrap();
        let text = QueryDisplay::new(&response)
            .format(OutputFormat::Text)
            .unwrap();
        assert_eq!(text, "Hi.");
    }
}
