//! Assistant Configuration - server, knowledge base, matching and provider settings
//!
//! Each section implements `Default` from `defaults.rs`, so a missing file or a
//! partial file behaves exactly like the built-in tuning.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::defaults;
use crate::matching::SuggestPolicy;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "FAQ_ASSIST_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "faq_assist.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration.
///
/// Load with `AssistConfig::load()` which searches:
/// 1. `$FAQ_ASSIST_CONFIG` env var
/// 2. `./faq_assist.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,

    #[serde(default)]
    pub matching: MatchingConfig,

    #[serde(default)]
    pub suggest: SuggestConfig,

    #[serde(default)]
    pub messages: MessagesConfig,

    #[serde(default)]
    pub llm: LlmConfig,
}

impl AssistConfig {
    /// Load configuration using the standard search order.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from {}", CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./faq_assist.toml
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded config from ./{}", LOCAL_CONFIG_FILE);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", LOCAL_CONFIG_FILE);
                }
            }
        }

        // 3. Defaults
        info!("No {} found — using built-in defaults", LOCAL_CONFIG_FILE);
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate TOML text. Unknown keys only produce warnings.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::new(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate ranges and required values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let m = &self.matching;

        check_unit_range("matching.similarity_cutoff", m.similarity_cutoff, &mut errors);
        check_unit_range("matching.rerank_threshold", m.rerank_threshold, &mut errors);
        if m.shortlist_size == 0 {
            errors.push("matching.shortlist_size must be >= 1".to_string());
        }
        if self.suggest.limit == 0 || self.suggest.limit > defaults::SUGGESTION_LIMIT {
            errors.push(format!(
                "suggest.limit = {} must be between 1 and {}",
                self.suggest.limit,
                defaults::SUGGESTION_LIMIT
            ));
        }
        if self.knowledge_base.watch_interval_secs == 0 {
            errors.push("knowledge_base.watch_interval_secs must be >= 1".to_string());
        }
        if self.llm.timeout_secs == 0 {
            errors.push("llm.timeout_secs must be >= 1".to_string());
        }
        if self.messages.not_found.trim().is_empty() {
            errors.push("messages.not_found must not be empty".to_string());
        }
        if self.messages.empty_query.trim().is_empty() {
            errors.push("messages.empty_query must not be empty".to_string());
        }
        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

fn check_unit_range(name: &str, value: f64, errors: &mut Vec<String>) {
    if !(0.0..=1.0).contains(&value) {
        errors.push(format!("{name} = {value:.3} must be within [0, 1]"));
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Sections
// ============================================================================

/// HTTP server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub addr: String,
    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: defaults::SERVER_ADDR.to_string(),
            cors_origins: Vec::new(),
        }
    }
}

/// Knowledge base source and refresh behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KnowledgeBaseConfig {
    /// FAQ records file (JSON array)
    pub faq_path: PathBuf,
    /// Optional flat list of sample questions for suggestions
    pub samples_path: Option<PathBuf>,
    /// Reload before every chat/suggest request
    pub reload_per_request: bool,
    /// Poll the source files and reload on change
    pub watch: bool,
    pub watch_interval_secs: u64,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            faq_path: PathBuf::from(defaults::FAQ_PATH),
            samples_path: None,
            reload_per_request: false,
            watch: true,
            watch_interval_secs: defaults::WATCH_INTERVAL_SECS,
        }
    }
}

/// Cascade tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub shortlist_size: usize,
    pub similarity_cutoff: f64,
    pub rerank_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            shortlist_size: defaults::SHORTLIST_SIZE,
            similarity_cutoff: defaults::SIMILARITY_CUTOFF,
            rerank_threshold: defaults::RERANK_THRESHOLD,
        }
    }
}

/// Autocomplete settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub policy: SuggestPolicy,
    pub limit: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            policy: SuggestPolicy::Prefix,
            limit: defaults::SUGGESTION_LIMIT,
        }
    }
}

/// User-facing fixed texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    pub empty_query: String,
    /// May contain `{contact}`
    pub not_found: String,
    pub provider_apology: String,
    pub support_contact: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            empty_query: defaults::EMPTY_QUERY_MESSAGE.to_string(),
            not_found: defaults::NOT_FOUND_MESSAGE.to_string(),
            provider_apology: defaults::PROVIDER_APOLOGY_MESSAGE.to_string(),
            support_contact: defaults::SUPPORT_CONTACT.to_string(),
        }
    }
}

impl MessagesConfig {
    /// Not-found text with the support contact filled in.
    pub fn not_found_text(&self) -> String {
        self.not_found.replace("{contact}", &self.support_contact)
    }
}

/// Generative provider settings (OpenAI-compatible chat completions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    /// Name of the env var holding the API key; the key itself never lives in the file
    pub api_key_env: String,
    pub timeout_secs: u64,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Use the provider instead of the static not-found text at the end of the cascade
    pub generative_fallback: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: defaults::LLM_BASE_URL.to_string(),
            model: defaults::LLM_MODEL.to_string(),
            api_key_env: defaults::LLM_API_KEY_ENV.to_string(),
            timeout_secs: defaults::LLM_TIMEOUT_SECS,
            temperature: defaults::LLM_TEMPERATURE,
            max_tokens: defaults::LLM_MAX_TOKENS,
            generative_fallback: false,
        }
    }
}
