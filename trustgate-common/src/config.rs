//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a TOML file. Every field has a built-in
//! default, so a missing file only produces a warning.
//!
//! # Resolution priority
//!
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "TRUSTGATE_CONFIG";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV_VAR: &str = "TRUSTGATE_ROOT_FOLDER";

/// Environment variables checked for the language-model API key, in order
pub const API_KEY_ENV_VARS: [&str; 2] = ["TRUSTGATE_LLM_API_KEY", "OPENAI_API_KEY"];

const DEFAULT_DB_FILE: &str = "trustgate.db";

/// Bootstrap configuration loaded from TOML file
///
/// Cannot change while the service is running.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    pub root_folder: Option<PathBuf>,

    /// Explicit SQLite database path; defaults to `<root_folder>/trustgate.db`
    pub database_path: Option<PathBuf>,

    /// HTTP listener
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Decision thresholds for the verification pipeline
    pub verifier: VerifierConfig,

    /// Outbound page fetching
    pub fetch: FetchConfig,

    /// Language-model endpoint used by the judge and the chat
    pub llm: LlmConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Verification pipeline configuration
///
/// Passed explicitly into the pipeline constructor; nothing reads these
/// values from globals.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VerifierConfig {
    /// Every retained match must score at least this much
    pub similarity_threshold: f64,

    /// Number of corpus matches retained per candidate
    pub top_k: usize,

    /// Extracted texts shorter than this (in characters) are rejected
    pub min_text_length: usize,

    /// Maximum characters of a single text submitted to the judge
    pub max_prompt_chars: usize,

    /// Case-insensitive substrings that mark an assessment as affirming trust
    pub affirming_keywords: Vec<String>,

    /// Lowest stored verification level that counts as reference corpus
    pub corpus_min_level: i64,

    /// Send the corpus snapshot to the judge alongside the candidate
    pub include_references_in_prompt: bool,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            top_k: 5,
            min_text_length: 100,
            max_prompt_chars: 4000,
            affirming_keywords: vec!["trustworthy".to_string()],
            corpus_min_level: 1,
            include_references_in_prompt: false,
        }
    }
}

impl VerifierConfig {
    /// Reject values the decision engine cannot work with
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(Error::Config(format!(
                "verifier.similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            )));
        }
        if self.top_k == 0 {
            return Err(Error::Config("verifier.top_k must be at least 1".to_string()));
        }
        if self.max_prompt_chars == 0 {
            return Err(Error::Config(
                "verifier.max_prompt_chars must be at least 1".to_string(),
            ));
        }
        if self
            .affirming_keywords
            .iter()
            .all(|keyword| keyword.trim().is_empty())
        {
            return Err(Error::Config(
                "verifier.affirming_keywords needs at least one non-empty keyword".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outbound page fetch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 5,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
                .to_string(),
        }
    }
}

/// Language-model endpoint configuration (OpenAI-compatible chat completions)
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,

    /// Prefer the environment; see [`resolve_llm_api_key`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-4-turbo".to_string(),
            temperature: 0.7,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Where [`TomlConfig::load_or_default`] found its values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    /// A path was given but no file exists there
    Missing(PathBuf),
    /// No path was given at all
    Defaults,
}

impl TomlConfig {
    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;
        config.verifier.validate()?;
        Ok(config)
    }

    /// Load the config file if one exists, otherwise fall back to defaults
    ///
    /// A missing file is not an error. A file that exists but does not parse is.
    /// Nothing is logged here since this runs before the subscriber exists;
    /// the returned [`ConfigSource`] says where the values came from.
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        match path {
            Some(path) if path.exists() => {
                Ok((Self::load(path)?, ConfigSource::File(path.to_path_buf())))
            }
            Some(path) => Ok((Self::default(), ConfigSource::Missing(path.to_path_buf()))),
            None => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    /// Database file location for the given root folder
    pub fn database_path(&self, root_folder: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| root_folder.join(DEFAULT_DB_FILE))
    }
}

/// Locate the config file: CLI argument, then `TRUSTGATE_CONFIG`, then the
/// per-user config directory. Returns `None` when nothing is configured and
/// no default file exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("trustgate").join("config.toml"))
        .filter(|p| p.exists())
}

/// Root folder resolution following the priority order in the module docs
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("trustgate"))
        .unwrap_or_else(|| PathBuf::from("./trustgate_data"))
}

/// Resolve the language-model API key
///
/// **Priority:** `TRUSTGATE_LLM_API_KEY` → `OPENAI_API_KEY` → TOML `llm.api_key`
pub fn resolve_llm_api_key(toml_config: &TomlConfig) -> Option<String> {
    let mut sources = Vec::new();
    let mut resolved = None;

    for var in API_KEY_ENV_VARS {
        if let Ok(key) = std::env::var(var) {
            if is_valid_key(&key) {
                sources.push(var);
                resolved.get_or_insert(key);
            }
        }
    }

    if let Some(key) = toml_config.llm.api_key.as_ref().filter(|k| is_valid_key(k)) {
        sources.push("TOML");
        resolved.get_or_insert_with(|| key.clone());
    }

    if sources.len() > 1 {
        warn!(
            "LLM API key found in multiple sources: {}. Using {}.",
            sources.join(", "),
            sources[0]
        );
    }

    match sources.first() {
        Some(source) => info!("LLM API key loaded from {}", source),
        None => warn!("No LLM API key configured; judge and chat calls will fail"),
    }

    resolved
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verifier_defaults() {
        let config = VerifierConfig::default();
        assert_eq!(config.similarity_threshold, 0.7);
        assert_eq!(config.top_k, 5);
        assert_eq!(config.min_text_length, 100);
        assert_eq!(config.max_prompt_chars, 4000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [verifier]
            top_k = 3

            [server]
            port = 8080
            "#,
        )
        .unwrap();

        assert_eq!(config.verifier.top_k, 3);
        assert_eq!(config.verifier.similarity_threshold, 0.7);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.llm.model, "gpt-4-turbo");
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let config = VerifierConfig {
            similarity_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let config = VerifierConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_keywords() {
        let config = VerifierConfig {
            affirming_keywords: vec!["  ".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_database_path_defaults_to_root_folder() {
        let config = TomlConfig::default();
        let path = config.database_path(Path::new("/srv/trustgate"));
        assert_eq!(path, PathBuf::from("/srv/trustgate/trustgate.db"));

        let config = TomlConfig {
            database_path: Some(PathBuf::from("/tmp/other.db")),
            ..Default::default()
        };
        assert_eq!(
            config.database_path(Path::new("/srv/trustgate")),
            PathBuf::from("/tmp/other.db")
        );
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("sk-123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }
}
