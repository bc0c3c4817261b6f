//! Environment-derived configuration
//!
//! Resolved once at process start and passed explicitly to the handlers and
//! the terminal agent. Nothing reads the environment after startup.

use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";
pub const DEFAULT_MODEL: &str = "deepseek-chat";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_PORT: u16 = 3000;

/// Provider and server settings
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub port: u16,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            port: DEFAULT_PORT,
        }
    }
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup. Empty API keys count as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("DEEPSEEK_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("DEEPSEEK_API_BASE").unwrap_or(defaults.base_url),
            model: lookup("DEEPSEEK_MODEL").unwrap_or(defaults.model),
            temperature: parse_or(&lookup, "DEEPSEEK_TEMPERATURE", defaults.temperature),
            max_tokens: parse_or(&lookup, "DEEPSEEK_MAX_TOKENS", defaults.max_tokens),
            port: parse_or(&lookup, "DEEPSEEK_CHAT_PORT", defaults.port),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Load a `.env` file into the process environment.
///
/// With no path, searches the working directory and its parents. Variables
/// already set in the environment are not overridden. A missing file is not
/// an error.
pub fn load_env_file(path: Option<&Path>) -> Option<PathBuf> {
    let result = match path {
        Some(p) => dotenvy::from_path(p).map(|()| p.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    match result {
        Ok(loaded) => {
            tracing::debug!(path = %loaded.display(), "Loaded .env file");
            Some(loaded)
        }
        Err(e) => {
            tracing::debug!(error = %e, "No .env file loaded");
            None
        }
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Ignoring unparseable setting, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ChatConfig::from_lookup(lookup_from(&[]));
        assert!(!config.has_api_key());
        assert_eq!(config.base_url, "https://api.deepseek.com/v1");
        assert_eq!(config.model, "deepseek-chat");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 800);
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_overrides() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("DEEPSEEK_API_KEY", "sk-test"),
            ("DEEPSEEK_API_BASE", "http://localhost:9000/v1"),
            ("DEEPSEEK_MODEL", "deepseek-reasoner"),
            ("DEEPSEEK_TEMPERATURE", "0.2"),
            ("DEEPSEEK_MAX_TOKENS", "1024"),
            ("DEEPSEEK_CHAT_PORT", "8080"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.base_url, "http://localhost:9000/v1");
        assert_eq!(config.model, "deepseek-reasoner");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = ChatConfig::from_lookup(lookup_from(&[
            ("DEEPSEEK_TEMPERATURE", "warm"),
            ("DEEPSEEK_MAX_TOKENS", "-5"),
        ]));
        assert!((config.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_env_file_feeds_from_env() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "# local settings\nDEEPSEEK_MAX_TOKENS=4321\n").unwrap();

        assert_eq!(load_env_file(Some(&path)).as_deref(), Some(path.as_path()));
        assert_eq!(ChatConfig::from_env().max_tokens, 4321);
    }

    #[test]
    fn test_missing_env_file_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(Some(&dir.path().join("absent.env"))).is_none());
    }

    #[test]
    fn test_blank_key_is_missing() {
        let config = ChatConfig::from_lookup(lookup_from(&[("DEEPSEEK_API_KEY", "  ")]));
        assert!(!config.has_api_key());
    }
}
