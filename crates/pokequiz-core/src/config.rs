//! pokequiz configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Language, DEFAULT_QUIZ_LENGTH};

/// Default remote catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://tyradex.vercel.app/api/v1/pokemon";

/// Logical key of the leaderboard document.
pub const SCORES_KEY: &str = "pokemon_quiz_scores.json";

/// Remote catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Collection endpoint; single entries live at `{base_url}/{id}`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout for catalog requests in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for the connectivity probe in seconds.
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Language of the names the player must type.
    #[serde(default)]
    pub language: Language,
    /// Never touch the network; play from the built-in list.
    #[serde(default)]
    pub offline: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            probe_timeout_secs: default_probe_timeout(),
            language: Language::default(),
            offline: false,
        }
    }
}

/// Round settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSettings {
    /// Questions per round.
    #[serde(default = "default_length")]
    pub length: usize,
    /// Entries shown on the leaderboard screen.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            length: default_length(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

/// Score persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory of the primary JSON document (default: platform data dir).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Directory of the fallback key-value file (default: platform cache dir).
    #[serde(default)]
    pub kv_dir: Option<PathBuf>,
    /// File name of the primary document, also the fallback key.
    #[serde(default = "default_file_name")]
    pub file_name: String,
    /// Use native file storage as the primary backend when available.
    #[serde(default = "default_true")]
    pub native_files: bool,
    /// Timeout for each backend call in milliseconds.
    #[serde(default = "default_io_timeout")]
    pub io_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            kv_dir: None,
            file_name: default_file_name(),
            native_files: true,
            io_timeout_ms: default_io_timeout(),
        }
    }
}

/// Top-level pokequiz configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuizConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub quiz: QuizSettings,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_request_timeout() -> u64 {
    10
}
fn default_probe_timeout() -> u64 {
    5
}
fn default_length() -> usize {
    DEFAULT_QUIZ_LENGTH
}
fn default_leaderboard_size() -> usize {
    5
}
fn default_file_name() -> String {
    SCORES_KEY.to_string()
}
fn default_true() -> bool {
    true
}
fn default_io_timeout() -> u64 {
    5000
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `pokequiz.toml` in the current directory
/// 2. `config.toml` in the platform config directory (see [`config_dir`])
///
/// Environment variable overrides: `POKEQUIZ_API_URL`, `POKEQUIZ_DATA_DIR`,
/// `POKEQUIZ_OFFLINE`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("pokequiz.toml");
        if local.exists() {
            Some(local)
        } else {
            config_dir()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizConfig::default(),
    };

    if let Ok(url) = std::env::var("POKEQUIZ_API_URL") {
        config.catalog.base_url = url;
    }
    if let Ok(dir) = std::env::var("POKEQUIZ_DATA_DIR") {
        config.storage.data_dir = Some(PathBuf::from(dir));
    }
    if let Some(offline) = std::env::var("POKEQUIZ_OFFLINE")
        .ok()
        .and_then(|v| parse_bool(&v))
    {
        config.catalog.offline = offline;
    }

    config.catalog.base_url = resolve_env_vars(&config.catalog.base_url)
        .trim_end_matches('/')
        .to_string();
    config.storage.data_dir = config.storage.data_dir.as_deref().map(resolve_path);
    config.storage.kv_dir = config.storage.kv_dir.as_deref().map(resolve_path);

    anyhow::ensure!(config.quiz.length >= 1, "quiz length must be at least 1");
    anyhow::ensure!(
        !config.storage.file_name.trim().is_empty(),
        "storage file name must not be empty"
    );

    Ok(config)
}

/// `pokequiz` under the platform config directory (`~/.config` on Linux).
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pokequiz"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_POKEQUIZ_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_POKEQUIZ_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_POKEQUIZ_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        std::env::remove_var("_POKEQUIZ_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizConfig::default();
        assert_eq!(config.catalog.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.catalog.language, Language::Fr);
        assert_eq!(config.quiz.length, 10);
        assert_eq!(config.quiz.leaderboard_size, 5);
        assert_eq!(config.storage.file_name, SCORES_KEY);
        assert!(config.storage.native_files);
    }

    #[test]
    fn parse_partial_config() {
        let toml_str = r#"
[catalog]
language = "en"
offline = true

[quiz]
length = 5

[storage]
data_dir = "/tmp/pokequiz"
native_files = false
"#;
        let config: QuizConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog.language, Language::En);
        assert!(config.catalog.offline);
        assert_eq!(config.catalog.request_timeout_secs, 10);
        assert_eq!(config.quiz.length, 5);
        assert_eq!(config.quiz.leaderboard_size, 5);
        assert_eq!(
            config.storage.data_dir.as_deref(),
            Some(Path::new("/tmp/pokequiz"))
        );
        assert!(!config.storage.native_files);
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let err = load_config_from(Some(Path::new("/no/such/pokequiz.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn config_dir_follows_platform_dir() {
        assert_eq!(
            config_dir(),
            dirs::config_dir().map(|dir| dir.join("pokequiz"))
        );
        if let Some(dir) = config_dir() {
            assert!(dir.ends_with("pokequiz"));
        }
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
