//! Configuration file, provider factory and generator assembly.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examforge_core::allocator::AllocationMode;
use examforge_core::generator::{GenerationSettings, QuestionGenerator};
use examforge_core::prompt::PromptOptions;
use examforge_core::traits::LlmProvider;

use crate::gemini::{self, GeminiProvider};
use crate::ollama::{self, OllamaProvider};

pub const CONFIG_FILE: &str = "examforge.toml";
const KEY_VARS: [&str; 2] = ["EXAMFORGE_GEMINI_KEY", "GEMINI_API_KEY"];

/// Configuration for a single generative text service.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::Ollama { base_url, model } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

impl ProviderConfig {
    /// Configured model, or the service's default.
    pub fn model(&self) -> String {
        match self {
            ProviderConfig::Gemini { model, .. } => model
                .clone()
                .unwrap_or_else(|| gemini::DEFAULT_MODEL.to_string()),
            ProviderConfig::Ollama { model, .. } => {
                model.clone().unwrap_or_else(|| "qwen2.5:7b".to_string())
            }
        }
    }
}

fn default_ollama_url() -> String {
    ollama::DEFAULT_BASE_URL.to_string()
}

/// Exam header defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExamSettings {
    pub title: String,
    pub grade: u8,
    pub time_minutes: u32,
    /// Language the questions are written in.
    pub language: String,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            title: "ĐỀ KIỂM TRA ĐỊNH KÌ".to_string(),
            grade: 5,
            time_minutes: 40,
            language: "Vietnamese".to_string(),
        }
    }
}

/// Point pools for two-block allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationSettings {
    pub block1_points: f64,
    pub block2_points: f64,
}

impl Default for AllocationSettings {
    fn default() -> Self {
        Self {
            block1_points: 2.5,
            block2_points: 7.5,
        }
    }
}

impl AllocationSettings {
    pub fn two_block(&self) -> AllocationMode {
        AllocationMode::TwoBlock {
            block1_points: self.block1_points,
            block2_points: self.block2_points,
        }
    }
}

/// Catalog file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataPaths {
    pub outcomes: PathBuf,
    pub periods: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            outcomes: PathBuf::from("data/outcomes.csv"),
            periods: PathBuf::from("data/periods.csv"),
        }
    }
}

/// Top-level examforge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamforgeConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for generation; none means placeholder content only.
    #[serde(default)]
    pub default_provider: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// HTTP timeout per generation call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub exam: ExamSettings,
    #[serde(default)]
    pub allocation: AllocationSettings,
    #[serde(default)]
    pub data: DataPaths,
}

fn default_temperature() -> f64 {
    0.7
}
fn default_max_output_tokens() -> u32 {
    1024
}
fn default_timeout_secs() -> u64 {
    90
}

impl Default for ExamforgeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: None,
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_timeout_secs(),
            exam: ExamSettings::default(),
            allocation: AllocationSettings::default(),
            data: DataPaths::default(),
        }
    }
}

impl ExamforgeConfig {
    /// Sampling settings for `model`.
    pub fn generation_settings(&self, model: String) -> GenerationSettings {
        GenerationSettings {
            model,
            temperature: self.temperature,
            max_tokens: self.max_output_tokens,
            prompt: PromptOptions {
                grade: self.exam.grade,
                language: self.exam.language.clone(),
            },
        }
    }

    /// Insert or update the `gemini` provider with `key`, making it the
    /// default when no default is set.
    pub fn apply_gemini_key(&mut self, key: String) {
        match self.providers.get_mut("gemini") {
            Some(ProviderConfig::Gemini { api_key, .. }) => *api_key = key,
            _ => {
                self.providers.insert(
                    "gemini".into(),
                    ProviderConfig::Gemini {
                        api_key: key,
                        base_url: None,
                        model: None,
                    },
                );
            }
        }
        if self.default_provider.is_none() {
            self.default_provider = Some("gemini".into());
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(len) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + len]).unwrap_or_default();
        result.replace_range(start..start + len + 1, &value);
    }
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_deref().map(resolve_env_vars),
            model: model.clone(),
        },
        ProviderConfig::Ollama { base_url, model } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
            model: model.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `examforge.toml` in the current directory
/// 2. `~/.config/examforge/config.toml`
///
/// Environment variable override: `EXAMFORGE_GEMINI_KEY` (or `GEMINI_API_KEY`).
pub fn load_config() -> Result<ExamforgeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ExamforgeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE);
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<ExamforgeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => ExamforgeConfig::default(),
    };

    if let Some(key) = KEY_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|k| !k.is_empty()))
    {
        config.apply_gemini_key(key);
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("examforge"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig, timeout_secs: u64) -> Result<Arc<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini {
            api_key, base_url, ..
        } => Ok(Arc::new(GeminiProvider::new(
            api_key,
            base_url.clone(),
            timeout_secs,
        )?)),
        ProviderConfig::Ollama { base_url, .. } => {
            Ok(Arc::new(OllamaProvider::new(base_url, timeout_secs)?))
        }
    }
}

/// Build the question generator the configuration asks for.
///
/// `offline`, no default provider, or a Gemini provider whose key resolves
/// to nothing yields the placeholder-only generator.
pub fn create_generator(config: &ExamforgeConfig, offline: bool) -> Result<QuestionGenerator> {
    let name = match (&config.default_provider, offline) {
        (Some(name), false) => name,
        _ => {
            tracing::info!("no generation service selected, using placeholder content");
            return Ok(QuestionGenerator::offline());
        }
    };
    let provider_config = config
        .providers
        .get(name)
        .with_context(|| format!("default provider '{name}' is not configured"))?;
    if let ProviderConfig::Gemini { api_key, .. } = provider_config {
        if resolve_env_vars(api_key).trim().is_empty() {
            tracing::info!(provider = %name, "no API key set, using placeholder content");
            return Ok(QuestionGenerator::offline());
        }
    }
    let provider = create_provider(provider_config, config.timeout_secs)?;
    let model = provider_config.model();
    tracing::info!(provider = %name, %model, "using generation service");
    Ok(QuestionGenerator::new(
        provider,
        config.generation_settings(model),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_EXAMFORGE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_EXAMFORGE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_EXAMFORGE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unclosed"), "${unclosed");
        std::env::remove_var("_EXAMFORGE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ExamforgeConfig::default();
        assert!(config.default_provider.is_none());
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_output_tokens, 1024);
        assert_eq!(config.timeout_secs, 90);
        assert_eq!(config.exam.grade, 5);
        assert_eq!(config.exam.time_minutes, 40);
        assert_eq!(
            config.allocation.two_block(),
            AllocationMode::TwoBlock {
                block1_points: 2.5,
                block2_points: 7.5
            }
        );
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "local"
temperature = 0.3

[providers.gemini]
type = "gemini"
api_key = "AIza-test"

[providers.local]
type = "ollama"
model = "llama3.1:8b"

[exam]
title = "KIỂM TRA CUỐI KÌ I"

[allocation]
block1_points = 3.0
block2_points = 7.0
"#;
        let config: ExamforgeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.default_provider.as_deref(), Some("local"));
        assert_eq!(config.temperature, 0.3);
        assert_eq!(config.exam.title, "KIỂM TRA CUỐI KÌ I");
        assert_eq!(config.exam.language, "Vietnamese");
        assert_eq!(config.allocation.block1_points, 3.0);
        assert_eq!(config.data.periods, PathBuf::from("data/periods.csv"));
        match config.providers.get("local") {
            Some(p @ ProviderConfig::Ollama { base_url, .. }) => {
                assert_eq!(base_url, "http://localhost:11434");
                assert_eq!(p.model(), "llama3.1:8b");
            }
            other => panic!("unexpected provider: {other:?}"),
        }
        assert_eq!(config.providers["gemini"].model(), "gemini-2.0-flash");
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
            model: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn gemini_key_becomes_default_provider() {
        let mut config = ExamforgeConfig::default();
        config.apply_gemini_key("k1".into());
        assert_eq!(config.default_provider.as_deref(), Some("gemini"));

        let mut config = ExamforgeConfig {
            default_provider: Some("local".into()),
            ..Default::default()
        };
        config.apply_gemini_key("k2".into());
        config.apply_gemini_key("k3".into());
        assert_eq!(config.default_provider.as_deref(), Some("local"));
        match &config.providers["gemini"] {
            ProviderConfig::Gemini { api_key, .. } => assert_eq!(api_key, "k3"),
            other => panic!("unexpected provider: {other:?}"),
        }
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("examforge.toml");
        std::fs::write(&path, "timeout_secs = 15\n[exam]\ngrade = 4\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 15);
        assert_eq!(config.exam.grade, 4);

        let missing = dir.path().join("nope.toml");
        assert!(load_config_from(Some(&missing)).is_err());
    }

    #[test]
    fn generator_selection() {
        let config = ExamforgeConfig::default();
        assert!(create_generator(&config, false).unwrap().is_offline());

        let mut config = ExamforgeConfig::default();
        config.apply_gemini_key("key".into());
        assert!(create_generator(&config, true).unwrap().is_offline());
        assert!(!create_generator(&config, false).unwrap().is_offline());

        let config = ExamforgeConfig {
            default_provider: Some("missing".into()),
            ..Default::default()
        };
        let err = create_generator(&config, false).err().unwrap();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn gemini_without_key_falls_back_to_placeholders() {
        std::env::remove_var("_EXAMFORGE_UNSET_KEY");
        let config: ExamforgeConfig = toml::from_str(
            r#"
default_provider = "gemini"

[providers.gemini]
type = "gemini"
api_key = "${_EXAMFORGE_UNSET_KEY}"
"#,
        )
        .unwrap();
        assert!(create_generator(&config, false).unwrap().is_offline());

        let mut config = ExamforgeConfig::default();
        config.apply_gemini_key("   ".into());
        assert!(create_generator(&config, false).unwrap().is_offline());
    }
}
