//! Model catalog entries

use serde::{Deserialize, Serialize};

use crate::directory::{MODEL_PREFIX, ResourceRecord};

/// Generative model resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Model identifier (`models/{id}`)
    pub name: String,

    #[serde(default)]
    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl Model {
    /// Model id as users type it (`gemini-2.5-flash`).
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix(MODEL_PREFIX).unwrap_or(&self.name)
    }

    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

/// Models resolve by their short id rather than the marketing display name.
impl From<&Model> for ResourceRecord {
    fn from(model: &Model) -> Self {
        ResourceRecord::new(model.short_name(), model.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_record_uses_short_name() {
        let model = Model {
            name: "models/gemini-2.5-flash".to_string(),
            display_name: "Gemini 2.5 Flash".to_string(),
            ..Default::default()
        };
        let record = ResourceRecord::from(&model);
        assert_eq!(record.display_name, "gemini-2.5-flash");
        assert_eq!(record.identifier, "models/gemini-2.5-flash");
    }

    #[test]
    fn test_generate_content_support() {
        let json = r#"{
            "name": "models/text-embedding-004",
            "supportedGenerationMethods": ["embedContent"]
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert!(!model.supports_generate_content());
    }
}
