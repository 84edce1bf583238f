//! Labelled-field text output for single records

/// Ordered `Label: value` pairs, with optional indented sections.
#[derive(Debug, Clone, Default)]
pub struct Fields {
    lines: Vec<Line>,
}

#[derive(Debug, Clone)]
enum Line {
    Field(String, String),
    Blank,
    Heading(String),
    Entry(String, String),
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, label: &str, value: impl ToString) -> Self {
        self.lines
            .push(Line::Field(label.to_string(), value.to_string()));
        self
    }

    /// Add the field only when there is a value.
    pub fn optional(self, label: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.field(label, value),
            None => self,
        }
    }

    /// Add an indented `key: value` section under `heading`, if it has entries.
    pub fn section<K, V>(mut self, heading: &str, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: ToString,
        V: ToString,
    {
        let entries: Vec<Line> = entries
            .into_iter()
            .map(|(k, v)| Line::Entry(k.to_string(), v.to_string()))
            .collect();
        if entries.is_empty() {
            return self;
        }
        self.lines.push(Line::Blank);
        self.lines.push(Line::Heading(heading.to_string()));
        self.lines.extend(entries);
        self
    }

    /// Label/value pairs, flattened for table output.
    pub fn rows(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();
        let mut heading = String::new();
        for line in &self.lines {
            match line {
                Line::Field(label, value) => rows.push((label.clone(), value.clone())),
                Line::Heading(h) => heading = h.clone(),
                Line::Entry(key, value) => {
                    rows.push((format!("{}.{}", heading, key), value.clone()))
                }
                Line::Blank => {}
            }
        }
        rows
    }

    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Field(label, value) => format!("{}: {}", label, value),
                Line::Blank => String::new(),
                Line::Heading(heading) => format!("{}:", heading),
                Line::Entry(key, value) => format!("  {}: {}", key, value),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
