//! Configuration management for file-search
//!
//! Settings come from `~/.file-search.yaml` (or `--config`), then a few
//! environment overrides. Credentials are looked up separately because the
//! command-line flags take part in their precedence.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::cache::{CacheSettings, CacheTtl};
use crate::error::{ConfigError, Result};

/// Config file name, looked up in the home directory
pub const CONFIG_FILE_NAME: &str = ".file-search.yaml";

/// Model used by `query` when none is given
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash";

/// Standard credential variables, in lookup order
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Environment overrides for config keys
pub const ENV_COMPLETION_ENABLED: &str = "COMPLETION_ENABLED";
pub const ENV_COMPLETION_CACHE_TTL: &str = "COMPLETION_CACHE_TTL";
pub const ENV_API_HOST: &str = "FILE_SEARCH_API_HOST";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gemini API key (lowest-precedence credential source)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Name of an environment variable holding the API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Custom API host for proxies and testing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_host: Option<String>,

    /// Name lookups and shell completion (default true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_enabled: Option<bool>,

    /// Directory cache freshness window, e.g. `300s` or `5m`
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "duration_text"
    )]
    pub completion_cache_ttl: Option<String>,

    /// Fall back to the last listing when a refresh fails (default true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolve_stale_on_error: Option<bool>,

    /// Model for `query` when `--model` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,

    /// Tool groups served by `mcp`, comma-separated (default `query`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mcp_tools: Option<String>,
}

/// Accept both `ttl: 300s` and a bare `ttl: 300`.
fn duration_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_yaml::Value>::deserialize(deserializer)? {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a duration, found {:?}",
            other
        ))),
    }
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`, or the default location.
    ///
    /// A missing default file just means defaults; a missing file the user
    /// asked for by name is an error.
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.display().to_string()).into());
                }
                Self::load_from(path)
            }
            None => {
                let path = Self::default_path()?;
                if !path.exists() {
                    log::debug!("No config file at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                Self::load_from(&path)
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        log::debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty file is valid and means "all defaults"
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(contents).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` to read variables.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = lookup(ENV_COMPLETION_ENABLED) {
            self.completion_enabled = Some(parse_bool(ENV_COMPLETION_ENABLED, &value)?);
        }
        if let Some(value) = lookup(ENV_COMPLETION_CACHE_TTL) {
            self.completion_cache_ttl = Some(value);
        }
        if let Some(value) = lookup(ENV_API_HOST) {
            self.api_host = Some(value);
        }
        Ok(())
    }

    /// Find the API key.
    ///
    /// Precedence: `--api-key`, then the variable named by `--api-key-env`
    /// (or the config's `api_key_env`), then `GOOGLE_API_KEY`,
    /// `GEMINI_API_KEY`, and finally the config's `api_key`. Empty values
    /// count as unset.
    pub fn resolve_api_key<F>(
        &self,
        flag: Option<&str>,
        flag_env: Option<&str>,
        lookup: F,
    ) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(flag.map(str::to_string)) {
            return Some(key);
        }

        let custom_env = flag_env.or(self.api_key_env.as_deref());
        if let Some(name) = custom_env.filter(|n| !n.is_empty())
            && let Some(key) = non_empty(lookup(name))
        {
            return Some(key);
        }

        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| non_empty(lookup(name)))
            .or_else(|| non_empty(self.api_key.clone()))
    }

    /// Parsed cache TTL; unset or zero means [`CacheTtl::DEFAULT`].
    pub fn cache_ttl(&self) -> Result<Duration> {
        match self.completion_cache_ttl.as_deref() {
            None => Ok(CacheTtl::DEFAULT),
            Some(text) => Ok(crate::cache::normalize_ttl(parse_duration(text)?)),
        }
    }

    /// Cache settings for this run. Without credentials the cache is off.
    pub fn cache_settings(&self, has_credentials: bool) -> Result<CacheSettings> {
        Ok(CacheSettings::default()
            .ttl(self.cache_ttl()?)
            .enabled(self.completion_enabled.unwrap_or(true))
            .credentials(has_credentials)
            .stale_on_error(self.resolve_stale_on_error.unwrap_or(true)))
    }

    pub fn default_model(&self) -> &str {
        self.default_model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL)
    }
}

fn parse_bool(name: &str, value: &str) -> std::result::Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Invalid(format!(
            "{} must be true or false, got '{}'",
            name, other
        ))),
    }
}

/// Parse a duration such as `300`, `90s`, `5m`, `1h30m` or `250ms`.
///
/// A bare number is seconds. Units: `ms`, `s`, `m`, `h`, `d`.
pub fn parse_duration(text: &str) -> std::result::Result<Duration, ConfigError> {
    let invalid = || {
        ConfigError::Invalid(format!(
            "Invalid duration '{}'. Use seconds (300) or units like 90s, 5m, 1h30m",
            text
        ))
    };

    let mut rest = text.trim();
    if rest.is_empty() {
        return Err(invalid());
    }
    if let Ok(secs) = rest.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Err(invalid());
        }
        let value: u64 = rest[..digits].parse().map_err(|_| invalid())?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let (unit, tail) = rest.split_at(unit_len);
        rest = tail;

        let step = match unit {
            "ms" => Some(Duration::from_millis(value)),
            "s" => Some(Duration::from_secs(value)),
            "m" => value.checked_mul(60).map(Duration::from_secs),
            "h" => value.checked_mul(60 * 60).map(Duration::from_secs),
            "d" => value.checked_mul(24 * 60 * 60).map(Duration::from_secs),
            _ => return Err(invalid()),
        };
        total = step
            .and_then(|step| total.checked_add(step))
            .ok_or_else(invalid)?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;
    use crate::cache::DisabledReason;
    use crate::error::Error;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert_eq!(config.cache_ttl().unwrap(), CacheTtl::DEFAULT);
        assert_eq!(config.default_model(), DEFAULT_MODEL);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
api_key: from-file
api_key_env: MY_KEY
completion_enabled: false
completion_cache_ttl: 10m
default_model: models/gemini-2.5-pro
mcp_tools: query, list
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
        assert_eq!(config.api_key_env.as_deref(), Some("MY_KEY"));
        assert_eq!(config.completion_enabled, Some(false));
        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(600));
        assert_eq!(config.default_model(), "models/gemini-2.5-pro");
        assert_eq!(config.mcp_tools.as_deref(), Some("query, list"));
    }

    #[test]
    fn test_numeric_ttl_is_seconds() {
        let config = Config::from_yaml("completion_cache_ttl: 90").unwrap();
        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(90));
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = Config::from_yaml("\n").unwrap();
        assert!(config.completion_enabled.is_none());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("api_key: [unterminated").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key: abc").unwrap();

        let config = Config::load_at(file.path().to_str()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");

        let err = Config::load_at(missing.to_str()).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::from_yaml("completion_enabled: true").unwrap();
        config
            .apply_overrides(env(&[
                ("COMPLETION_ENABLED", "false"),
                ("COMPLETION_CACHE_TTL", "30s"),
                ("FILE_SEARCH_API_HOST", "http://localhost:9000"),
            ]))
            .unwrap();

        assert_eq!(config.completion_enabled, Some(false));
        assert_eq!(config.cache_ttl().unwrap(), Duration::from_secs(30));
        assert_eq!(config.api_host.as_deref(), Some("http://localhost:9000"));
    }

    #[test]
    fn test_invalid_bool_override() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(env(&[("COMPLETION_ENABLED", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_api_key_precedence() {
        let config = Config {
            api_key: Some("config".to_string()),
            api_key_env: Some("CONFIG_VAR".to_string()),
            ..Default::default()
        };
        let all = env(&[
            ("CUSTOM", "custom"),
            ("CONFIG_VAR", "config-var"),
            ("GOOGLE_API_KEY", "google"),
            ("GEMINI_API_KEY", "gemini"),
        ]);

        assert_eq!(
            config.resolve_api_key(Some("flag"), Some("CUSTOM"), &all).as_deref(),
            Some("flag")
        );
        assert_eq!(
            config.resolve_api_key(None, Some("CUSTOM"), &all).as_deref(),
            Some("custom")
        );
        assert_eq!(
            config.resolve_api_key(None, None, &all).as_deref(),
            Some("config-var")
        );

        let standard = env(&[("GOOGLE_API_KEY", "google"), ("GEMINI_API_KEY", "gemini")]);
        assert_eq!(
            config.resolve_api_key(None, None, &standard).as_deref(),
            Some("google")
        );

        let gemini_only = env(&[("GEMINI_API_KEY", "gemini")]);
        assert_eq!(
            config.resolve_api_key(None, None, &gemini_only).as_deref(),
            Some("gemini")
        );

        assert_eq!(
            config.resolve_api_key(Some(""), None, env(&[])).as_deref(),
            Some("config")
        );
        assert!(
            Config::default()
                .resolve_api_key(None, None, env(&[]))
                .is_none()
        );
    }

    #[test]
    fn test_cache_settings_require_credentials() {
        let config = Config::default();
        assert_eq!(config.cache_settings(true).unwrap().disabled_reason(), None);
        assert_eq!(
            config.cache_settings(false).unwrap().disabled_reason(),
            Some(DisabledReason::NoCredentials)
        );

        let disabled = Config {
            completion_enabled: Some(false),
            ..Default::default()
        };
        assert_eq!(
            disabled.cache_settings(true).unwrap().disabled_reason(),
            Some(DisabledReason::TurnedOff)
        );
    }

    #[test]
    fn test_zero_ttl_uses_default() {
        let config = Config::from_yaml("completion_cache_ttl: 0s").unwrap();
        assert_eq!(config.cache_ttl().unwrap(), CacheTtl::DEFAULT);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("300").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration("1d").unwrap(), Duration::from_secs(86400));
        assert_eq!(parse_duration(" 2m ").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        for text in ["", "-5s", "5x", "m5", "1.5h", "s"] {
            assert!(parse_duration(text).is_err(), "accepted {:?}", text);
        }
    }
}
