//! Advisor configuration

use crate::error::{AdvisorError, Result};
use invest_core::Language;
use invest_llm::LLMProvider;
use invest_llm::providers::{
    OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider, ollama::DEFAULT_OLLAMA_MODEL,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which chat backend answers questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Ollama,
    OpenAI,
}

impl std::str::FromStr for ProviderKind {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" | "lmstudio" => Ok(Self::OpenAI),
            other => Err(AdvisorError::Config(format!("Unknown provider: {other}"))),
        }
    }
}

/// Configuration for [`InvestAdvisor`](crate::InvestAdvisor)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisorConfig {
    pub provider: ProviderKind,

    /// Model identifier sent with every request
    pub model: String,

    /// Server root for Ollama or API base for OpenAI-compatible servers
    pub api_base: Option<String>,

    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub temperature: f32,

    /// Upper bound on generated tokens (`num_predict` for Ollama)
    pub max_tokens: usize,

    pub timeout_secs: u64,

    /// Language of prompts and fallback messages
    pub language: Language,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
            api_base: None,
            api_key: None,
            temperature: 0.3,
            max_tokens: 256,
            timeout_secs: 60,
            language: Language::default(),
        }
    }
}

impl AdvisorConfig {
    pub fn builder() -> AdvisorConfigBuilder {
        AdvisorConfigBuilder::default()
    }

    /// Apply `INVEST_LLM_MODEL` and the provider's endpoint variables
    ///
    /// Ollama reads `OLLAMA_HOST`; OpenAI reads `OPENAI_API_BASE` and
    /// `OPENAI_API_KEY`. Values already set on the config are kept.
    pub fn with_env(mut self) -> Self {
        if let Ok(model) = std::env::var("INVEST_LLM_MODEL") {
            self.model = model;
        }

        match self.provider {
            ProviderKind::Ollama => {
                if self.api_base.is_none() {
                    self.api_base = std::env::var("OLLAMA_HOST").ok();
                }
            }
            ProviderKind::OpenAI => {
                if self.api_base.is_none() {
                    self.api_base = std::env::var("OPENAI_API_BASE").ok();
                }
                if self.api_key.is_none() {
                    self.api_key = std::env::var("OPENAI_API_KEY").ok();
                }
            }
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AdvisorError::Config("model must not be empty".to_string()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AdvisorError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(AdvisorError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(AdvisorError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Construct the configured provider
    pub fn build_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        let provider: Arc<dyn LLMProvider> = match self.provider {
            ProviderKind::Ollama => {
                let mut config = OllamaConfig::new(self.model.clone()).with_timeout(self.timeout_secs);
                if let Some(host) = &self.api_base {
                    config = config.with_host(host.clone());
                }
                Arc::new(OllamaProvider::with_config(config)?)
            }
            ProviderKind::OpenAI => {
                let mut config = OpenAIConfig::new(self.api_key.clone().unwrap_or_default())
                    .with_timeout(self.timeout_secs);
                if let Some(base) = &self.api_base {
                    config = config.with_api_base(base.clone());
                }
                Arc::new(OpenAIProvider::with_config(config)?)
            }
        };
        Ok(provider)
    }
}

/// Builder for AdvisorConfig
#[derive(Debug, Default)]
pub struct AdvisorConfigBuilder {
    provider: Option<ProviderKind>,
    model: Option<String>,
    api_base: Option<String>,
    api_key: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    timeout_secs: Option<u64>,
    language: Option<Language>,
}

impl AdvisorConfigBuilder {
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AdvisorConfig> {
        let defaults = AdvisorConfig::default();

        let config = AdvisorConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            model: self.model.unwrap_or(defaults.model),
            api_base: self.api_base.or(defaults.api_base),
            api_key: self.api_key.or(defaults.api_key),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            timeout_secs: self.timeout_secs.unwrap_or(defaults.timeout_secs),
            language: self.language.unwrap_or(defaults.language),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();
        assert_eq!(config.provider, ProviderKind::Ollama);
        assert_eq!(config.model, "bllossom-3b-kor");
        assert_eq!(config.max_tokens, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = AdvisorConfig::builder()
            .provider(ProviderKind::OpenAI)
            .model("gpt-4o-mini")
            .api_base("http://localhost:1234/v1")
            .language(Language::Korean)
            .build()
            .unwrap();

        assert_eq!(config.provider, ProviderKind::OpenAI);
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:1234/v1"));
        assert_eq!(config.language, Language::Korean);
    }

    #[test]
    fn test_validation() {
        assert!(AdvisorConfig::builder().model(" ").build().is_err());
        assert!(AdvisorConfig::builder().temperature(3.5).build().is_err());
        assert!(AdvisorConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("Ollama".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
        assert_eq!("openai".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAI);
        assert!("bard".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_build_provider() {
        let ollama = AdvisorConfig::default().build_provider().unwrap();
        assert_eq!(ollama.name(), "ollama");

        let openai = AdvisorConfig::builder()
            .provider(ProviderKind::OpenAI)
            .build()
            .unwrap()
            .build_provider()
            .unwrap();
        assert_eq!(openai.name(), "openai");
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = AdvisorConfig::builder().api_key("secret").build().unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
    }
}
