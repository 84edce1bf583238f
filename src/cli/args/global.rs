//! Global CLI options shared across all commands

use crate::cli::{Cli, OutputFormat};

/// Global CLI options passed to all command handlers.
///
/// # Precedence
///
/// For most options, the precedence is: CLI flag > environment variable > config file > default.
/// This struct captures the CLI/env layer; config file values are merged in
/// `CommandContext`.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Output format (text, table, json)
    pub format: OutputFormat,

    /// API key given on the command line
    pub api_key: Option<String>,

    /// Name of an environment variable holding the API key
    pub api_key_env: Option<String>,

    /// Custom config file path (defaults to ~/.file-search.yaml)
    pub config: Option<String>,

    /// Suppress progress spinners and confirmations
    pub quiet: bool,
}

impl GlobalOptions {
    /// Create GlobalOptions from a parsed CLI struct.
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            format: cli.format,
            api_key: cli.api_key.clone(),
            api_key_env: cli.api_key_env.clone(),
            config: cli.config.clone(),
            quiet: cli.quiet,
        }
    }

    pub fn api_key_ref(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn api_key_env_ref(&self) -> Option<&str> {
        self.api_key_env.as_deref()
    }

    /// Get config path as `Option<&str>`.
    pub fn config_ref(&self) -> Option<&str> {
        self.config.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_options_accessors() {
        let opts = GlobalOptions {
            format: OutputFormat::Json,
            api_key: Some("key-123".to_string()),
            api_key_env: Some("MY_KEY".to_string()),
            config: Some("/custom/path".to_string()),
            quiet: true,
        };

        assert_eq!(opts.api_key_ref(), Some("key-123"));
        assert_eq!(opts.api_key_env_ref(), Some("MY_KEY"));
        assert_eq!(opts.config_ref(), Some("/custom/path"));
        assert!(opts.quiet);
    }

    #[test]
    fn test_global_options_none_accessors() {
        let opts = GlobalOptions::default();

        assert_eq!(opts.api_key_ref(), None);
        assert_eq!(opts.api_key_env_ref(), None);
        assert_eq!(opts.config_ref(), None);
        assert_eq!(opts.format, OutputFormat::Text);
    }
}
