//! Investment advice over an injected language model

use crate::config::AdvisorConfig;
use crate::error::Result;
use crate::prompts::{
    BilingualTemplate, advisor_system, default_recommend_question, empty_question_message,
    model_error_message, recommend_system,
};
use invest_core::{Language, ReconciledSet, format_sentiment_summary, rank, to_compact_json};
use invest_llm::{CompletionRequest, LLMProvider, Message};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Answers investment questions with a language model
///
/// The provider is an owned handle passed in by the caller. Call
/// [`initialize`](Self::initialize) once before the first question and
/// [`shutdown`](Self::shutdown) when the advisor is no longer needed.
///
/// `ask` and `recommend` never fail: model errors come back as a readable
/// message in the configured language.
pub struct InvestAdvisor {
    provider: Arc<dyn LLMProvider>,
    config: AdvisorConfig,
    system: BilingualTemplate,
    recommend: BilingualTemplate,
}

impl InvestAdvisor {
    pub fn new(provider: Arc<dyn LLMProvider>, config: AdvisorConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            config,
            system: advisor_system()?,
            recommend: recommend_system()?,
        })
    }

    /// Create an advisor with the provider described by `config`
    pub fn from_config(config: AdvisorConfig) -> Result<Self> {
        let provider = config.build_provider()?;
        Self::new(provider, config)
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    pub fn language(&self) -> Language {
        self.config.language
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Prepare the model backend
    pub async fn initialize(&self) -> Result<()> {
        self.provider.initialize().await?;
        info!(provider = self.provider.name(), model = %self.config.model, "Advisor initialized");
        Ok(())
    }

    /// Release the model backend
    pub async fn shutdown(&self) -> Result<()> {
        self.provider.shutdown().await?;
        info!(provider = self.provider.name(), "Advisor shut down");
        Ok(())
    }

    /// System instruction followed by the user question
    pub fn build_messages(&self, question: &str, summary: Option<&str>) -> Result<Vec<Message>> {
        let system = self
            .system
            .render(self.language(), &json!({ "summary": summary }))?;

        Ok(vec![Message::system(system), Message::user(question.trim())])
    }

    /// Messages for a recommendation over the top-ranked companies
    pub fn build_recommend_messages(
        &self,
        records: &ReconciledSet,
        top_n: usize,
        min_articles: u64,
        question: &str,
    ) -> Result<Vec<Message>> {
        let ranked = rank(records, top_n, min_articles);
        let companies = to_compact_json(&ranked)?;
        let system = self.recommend.render(
            self.language(),
            &json!({ "companies": companies, "count": ranked.len() }),
        )?;

        let question = match question.trim() {
            "" => default_recommend_question(self.language()),
            q => q,
        };

        Ok(vec![Message::system(system), Message::user(question)])
    }

    /// Answer a question, optionally about one company
    #[instrument(skip(self, question, scores), fields(provider = self.provider.name()))]
    pub async fn ask(&self, question: &str, company: Option<&str>, scores: &ReconciledSet) -> String {
        if question.trim().is_empty() {
            return empty_question_message(self.language()).to_string();
        }

        let summary = company
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .and_then(|name| format_sentiment_summary(name, scores, self.language()));
        debug!(has_summary = summary.is_some(), "Building advisor prompt");

        match self.build_messages(question, summary.as_deref()) {
            Ok(messages) => self.complete(messages).await,
            Err(e) => model_error_message(self.language(), &e.to_string()),
        }
    }

    /// Recommend among the top-ranked companies
    #[instrument(skip(self, records, question), fields(provider = self.provider.name()))]
    pub async fn recommend(
        &self,
        records: &ReconciledSet,
        top_n: usize,
        min_articles: u64,
        question: &str,
    ) -> String {
        match self.build_recommend_messages(records, top_n, min_articles, question) {
            Ok(messages) => self.complete(messages).await,
            Err(e) => model_error_message(self.language(), &e.to_string()),
        }
    }

    fn request(&self, messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest::builder(self.config.model.clone())
            .messages(messages)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
    }

    async fn complete(&self, messages: Vec<Message>) -> String {
        match self.provider.complete(self.request(messages)).await {
            Ok(response) => {
                debug!(tokens = response.usage.total(), "Advisor answer received");
                response.text().to_string()
            }
            Err(e) => {
                warn!(error = %e, "Language model call failed");
                model_error_message(self.language(), &e.to_string())
            }
        }
    }
}
