use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "Diagnosa";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Env var overriding the chat-completion base URL.
pub const ENV_LLM_URL: &str = "DIAGNOSA_LLM_URL";
/// Env var overriding the chat-completion model identifier.
pub const ENV_LLM_MODEL: &str = "DIAGNOSA_LLM_MODEL";
/// Env var overriding the request timeout, in whole seconds.
pub const ENV_LLM_TIMEOUT: &str = "DIAGNOSA_LLM_TIMEOUT_SECS";
/// Env var holding the API key for the hosted model.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";

pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

/// Get the application data directory.
/// ~/Diagnosa/ on all platforms, falling back to the working directory
/// when no home directory can be resolved.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the SQLite database holding the disease catalog.
pub fn catalog_db_path() -> PathBuf {
    app_data_dir().join("catalog.db")
}

/// Filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "diagnosa_lib=info,diagnosa=info,warn"
}

/// Connection settings for the hosted chat-completion model.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            api_key: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }
}

impl LlmSettings {
    /// Defaults overridden by the `DIAGNOSA_LLM_*` / `OPENAI_API_KEY` env vars.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (env, config file, tests).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(ENV_LLM_URL).filter(|v| !v.trim().is_empty()) {
            settings.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(ENV_LLM_MODEL).filter(|v| !v.trim().is_empty()) {
            settings.model = model.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_LLM_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => settings.timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %raw, "Ignoring invalid {ENV_LLM_TIMEOUT}"),
            }
        }
        settings.api_key = lookup(ENV_API_KEY).filter(|v| !v.trim().is_empty());

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn app_data_dir_ends_with_app_name() {
        assert!(app_data_dir().ends_with("Diagnosa"));
    }

    #[test]
    fn catalog_db_under_app_data() {
        let db = catalog_db_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("catalog.db"));
    }

    #[test]
    fn app_name_is_diagnosa() {
        assert_eq!(APP_NAME, "Diagnosa");
    }

    #[test]
    fn defaults_without_env() {
        let settings = LlmSettings::from_lookup(|_| None);
        assert_eq!(settings, LlmSettings::default());
        assert_eq!(settings.timeout, Duration::from_secs(30));
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn env_overrides_apply() {
        let settings = LlmSettings::from_lookup(lookup_from(&[
            (ENV_LLM_URL, "http://127.0.0.1:9000/v1/"),
            (ENV_LLM_MODEL, "local-model"),
            (ENV_LLM_TIMEOUT, "5"),
            (ENV_API_KEY, "sk-test"),
        ]));
        assert_eq!(settings.base_url, "http://127.0.0.1:9000/v1");
        assert_eq!(settings.model, "local-model");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn invalid_timeout_keeps_default() {
        let settings = LlmSettings::from_lookup(lookup_from(&[(ENV_LLM_TIMEOUT, "soon")]));
        assert_eq!(settings.timeout, Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS));

        let zero = LlmSettings::from_lookup(lookup_from(&[(ENV_LLM_TIMEOUT, "0")]));
        assert_eq!(zero.timeout, Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS));
    }

    #[test]
    fn blank_api_key_is_none() {
        let settings = LlmSettings::from_lookup(lookup_from(&[(ENV_API_KEY, "  ")]));
        assert!(settings.api_key.is_none());
    }
}
