//! `mockview.toml` configuration and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use mockview_core::scoring::ScoringConfig;
use mockview_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

pub const CONFIG_FILE_NAME: &str = "mockview.toml";

/// Configuration for a single model provider.
///
/// `Debug` masks API keys so configs can be logged.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::OpenAI {
                api_key: _,
                base_url,
                org_id,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    crate::ollama::DEFAULT_BASE_URL.to_string()
}

/// Top-level mockview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockviewConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for scoring and generation; absent means local only.
    #[serde(default)]
    pub model_provider: Option<String>,
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Bound on each model call.
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub use_model_scoring: bool,
    #[serde(default = "default_true")]
    pub use_model_generation: bool,
    /// Question bank file; the bundled bank when absent.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Session store file.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Where reports are written.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    /// Overrides for scoring constants.
    #[serde(default)]
    pub scoring: ScoringConfig,
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}
fn default_model_timeout() -> u64 {
    20
}
fn default_true() -> bool {
    true
}
fn default_store_path() -> PathBuf {
    PathBuf::from("./mockview-data/sessions.json")
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./mockview-reports")
}

impl Default for MockviewConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            model_provider: None,
            model: default_model(),
            model_timeout_secs: default_model_timeout(),
            use_model_scoring: true,
            use_model_generation: true,
            question_bank: None,
            store_path: default_store_path(),
            report_dir: default_report_dir(),
            scoring: ScoringConfig::default(),
        }
    }
}

impl MockviewConfig {
    pub fn model_timeout(&self) -> Duration {
        Duration::from_secs(self.model_timeout_secs)
    }

    /// The configured model provider, if one is selected.
    ///
    /// Naming a provider that has no `[providers.<name>]` table is an error.
    pub fn model_provider(&self) -> Result<Option<Arc<dyn LlmProvider>>> {
        let Some(name) = &self.model_provider else {
            return Ok(None);
        };
        let provider_config = self
            .providers
            .get(name)
            .with_context(|| format!("model_provider '{name}' has no [providers.{name}] table"))?;
        create_provider(name, provider_config).map(Some)
    }
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

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    let opt = |v: &Option<String>| v.as_deref().map(resolve_env_vars);
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: opt(base_url),
            org_id: opt(org_id),
        },
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: opt(base_url),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `mockview.toml` in the current directory
/// 2. `~/.config/mockview/config.toml`
///
/// Environment variable overrides: `MOCKVIEW_OPENAI_KEY`, `MOCKVIEW_GEMINI_KEY`.
pub fn load_config() -> Result<MockviewConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<MockviewConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                global_config_path().filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => MockviewConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

pub fn parse_config_str(content: &str) -> Result<MockviewConfig> {
    Ok(toml::from_str(content)?)
}

fn apply_env_overrides(config: &mut MockviewConfig) {
    if let Ok(key) = std::env::var("MOCKVIEW_OPENAI_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                org_id: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("MOCKVIEW_GEMINI_KEY") {
        let entry = config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Gemini { api_key, .. } = entry {
            *api_key = key;
        }
    }
}

/// `~/.config/mockview/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("mockview")
            .join("config.toml")
    })
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider: Arc<dyn LlmProvider> = match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => Arc::new(OpenAiProvider::new(api_key, base_url.clone(), org_id.clone())?),
        ProviderConfig::Gemini { api_key, base_url } => {
            Arc::new(GeminiProvider::new(api_key, base_url.clone())?)
        }
        ProviderConfig::Ollama { base_url } => Arc::new(OllamaProvider::new(base_url)?),
    };
    tracing::debug!(name, provider = provider.name(), "created provider");
    Ok(provider)
}
