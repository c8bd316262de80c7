//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use coniuga_core::reference::{load_reference_data, ReferenceData};
use coniuga_core::traits::LlmProvider;

use crate::anthropic::AnthropicProvider;
use crate::generator::GeneratorConfig;
use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
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
    Anthropic {
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
            ProviderConfig::Anthropic {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Anthropic")
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
    "http://localhost:11434".to_string()
}

/// Top-level coniuga configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConiugaConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used for quizzes and tables.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model requested from that provider.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Sampling temperature. Non-zero so repeated requests vary.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Language the infinitive is translated into.
    #[serde(default = "default_translation_language")]
    pub translation_language: String,
    /// Optional TOML file replacing the built-in reference tables.
    #[serde(default)]
    pub reference: Option<PathBuf>,
}

fn default_provider() -> String {
    "anthropic".to_string()
}
fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_translation_language() -> String {
    "French".to_string()
}

impl Default for ConiugaConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            translation_language: default_translation_language(),
            reference: None,
        }
    }
}

impl ConiugaConfig {
    /// Generator settings derived from this configuration.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.default_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            translation_language: self.translation_language.clone(),
        }
    }

    /// The configured reference tables, or the built-in Italian ones.
    pub fn reference_data(&self) -> Result<ReferenceData> {
        match &self.reference {
            Some(path) => load_reference_data(path),
            None => Ok(ReferenceData::italian()),
        }
    }

    /// Build the default provider.
    pub fn default_llm(&self) -> Result<Box<dyn LlmProvider>> {
        let provider_config = self.providers.get(&self.default_provider).with_context(|| {
            format!(
                "provider '{}' is not configured. Run `coniuga init` or set CONIUGA_ANTHROPIC_KEY",
                self.default_provider
            )
        })?;
        create_provider(&self.default_provider, provider_config)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied as-is and never scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Anthropic { api_key, base_url } => ProviderConfig::Anthropic {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `coniuga.toml` in the current directory
/// 2. `~/.config/coniuga/config.toml`
///
/// Environment variable overrides: `CONIUGA_ANTHROPIC_KEY`, `CONIUGA_OPENAI_KEY`.
pub fn load_config() -> Result<ConiugaConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ConiugaConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("coniuga.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|home| home.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let mut config = parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            // A relative reference path is relative to the config file.
            if let (Some(reference), Some(dir)) = (config.reference.as_mut(), path.parent()) {
                if reference.is_relative() {
                    *reference = dir.join(&*reference);
                }
            }
            config
        }
        None => ConiugaConfig::default(),
    };

    apply_env_overrides(&mut config);

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();

    Ok(config)
}

/// Parse a configuration document without touching the environment.
pub fn parse_config_str(content: &str) -> Result<ConiugaConfig> {
    Ok(toml::from_str(content)?)
}

fn apply_env_overrides(config: &mut ConiugaConfig) {
    if let Ok(key) = std::env::var("CONIUGA_ANTHROPIC_KEY") {
        let entry = config
            .providers
            .entry("anthropic".into())
            .or_insert(ProviderConfig::Anthropic {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Anthropic { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("CONIUGA_OPENAI_KEY") {
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
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("coniuga"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    tracing::debug!(provider = name, "creating provider");
    match config {
        ProviderConfig::Anthropic { api_key, base_url } => {
            anyhow::ensure!(!api_key.is_empty(), "provider '{name}' has an empty api_key");
            Ok(Box::new(AnthropicProvider::new(api_key, base_url.clone())?))
        }
        ProviderConfig::OpenAI {
            api_key,
            base_url,
            org_id,
        } => {
            anyhow::ensure!(!api_key.is_empty(), "provider '{name}' has an empty api_key");
            Ok(Box::new(OpenAiProvider::new(
                api_key,
                base_url.clone(),
                org_id.clone(),
            )?))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CONIUGA_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CONIUGA_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CONIUGA_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_CONIUGA_TEST_VAR");
    }

    #[test]
    fn substituted_values_are_not_expanded_again() {
        std::env::set_var("_CONIUGA_SELF_REF", "${_CONIUGA_SELF_REF}");
        std::env::set_var("_CONIUGA_NESTED", "a${_CONIUGA_SELF_REF}b");
        assert_eq!(
            resolve_env_vars("${_CONIUGA_SELF_REF}"),
            "${_CONIUGA_SELF_REF}"
        );
        assert_eq!(
            resolve_env_vars("x-${_CONIUGA_NESTED}-${_CONIUGA_SELF_REF}"),
            "x-a${_CONIUGA_SELF_REF}b-${_CONIUGA_SELF_REF}"
        );
        std::env::remove_var("_CONIUGA_SELF_REF");
        std::env::remove_var("_CONIUGA_NESTED");
    }

    #[test]
    fn unterminated_reference_is_left_alone() {
        assert_eq!(resolve_env_vars("${OOPS"), "${OOPS");
    }

    #[test]
    fn default_config() {
        let config = ConiugaConfig::default();
        assert_eq!(config.default_provider, "anthropic");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_tokens, 2048);
        assert_eq!(config.translation_language, "French");
        assert!(config.reference.is_none());
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "ollama"
default_model = "llama3.1:8b"
translation_language = "English"

[providers.anthropic]
type = "anthropic"
api_key = "sk-test"

[providers.openai]
type = "openai"
api_key = "sk-openai"

[providers.ollama]
type = "ollama"
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 3);
        assert!(matches!(
            config.providers.get("anthropic"),
            Some(ProviderConfig::Anthropic { .. })
        ));
        assert!(matches!(
            config.providers.get("ollama"),
            Some(ProviderConfig::Ollama { base_url }) if base_url == "http://localhost:11434"
        ));

        let generator = config.generator_config();
        assert_eq!(generator.model, "llama3.1:8b");
        assert_eq!(generator.translation_language, "English");
        assert_eq!(generator.max_tokens, 2048);
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = ProviderConfig::Anthropic {
            api_key: "sk-secret".into(),
            base_url: None,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_with_reference_file() {
        let dir = tempfile::tempdir().unwrap();
        let reference_path = dir.path().join("verbs.toml");
        std::fs::write(
            &reference_path,
            r#"
[[categories]]
name = "Tiny"
verbs = ["essere"]

[[moods]]
mood = "Indicativo"
tenses = ["Presente"]
"#,
        )
        .unwrap();

        let config_path = dir.path().join("coniuga.toml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "reference = {:?}", reference_path.display().to_string()).unwrap();
        writeln!(file, "[providers.local]\ntype = \"ollama\"").unwrap();

        let config = load_config_from(Some(&config_path)).unwrap();
        let reference = config.reference_data().unwrap();
        assert_eq!(reference.all_verbs().collect::<Vec<_>>(), vec!["essere"]);
        assert!(config.providers.contains_key("local"));
    }

    #[test]
    fn relative_reference_resolves_against_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("verbs.toml"),
            r#"
[[categories]]
name = "Tiny"
verbs = ["avere"]

[[moods]]
mood = "Indicativo"
tenses = ["Presente"]
"#,
        )
        .unwrap();
        let config_path = dir.path().join("coniuga.toml");
        std::fs::write(&config_path, "reference = \"verbs.toml\"\n").unwrap();

        // The working directory has no verbs.toml, so only the config dir can satisfy it.
        assert!(!Path::new("verbs.toml").exists());
        let config = load_config_from(Some(&config_path)).unwrap();
        assert_eq!(config.reference, Some(dir.path().join("verbs.toml")));
        let reference = config.reference_data().unwrap();
        assert_eq!(reference.all_verbs().collect::<Vec<_>>(), vec!["avere"]);
    }

    #[test]
    fn default_llm_requires_configured_provider() {
        let config = ConiugaConfig::default();
        let err = config.default_llm().err().unwrap();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn empty_api_key_is_rejected() {
        let config = ProviderConfig::OpenAI {
            api_key: String::new(),
            base_url: None,
            org_id: None,
        };
        assert!(create_provider("openai", &config).is_err());
        assert!(create_provider(
            "ollama",
            &ProviderConfig::Ollama {
                base_url: String::new()
            }
        )
        .is_ok());
    }
}
