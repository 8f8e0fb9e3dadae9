//! Assistant service: the single entry point the HTTP layer and the CLI call.
//!
//! Each request takes one knowledge base snapshot and runs to completion on it.
//! Every path ends in a well-formed `Answer`; matcher misses and provider
//! failures are turned into fixed texts here, never into errors.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::AssistConfig;
use crate::knowledge_base::{KnowledgeBase, KnowledgeBaseError, KnowledgeBaseStats, KnowledgeStore};
use crate::llm::{self, prompt, GenerativeBackend};
use crate::matching::{MatchOrchestrator, SuggestionEngine};
use crate::types::{Answer, MatchOutcome, SourceTag};

/// Shared application service.
pub struct AssistService {
    config: AssistConfig,
    store: Arc<KnowledgeStore>,
    backend: Arc<dyn GenerativeBackend>,
    orchestrator: MatchOrchestrator,
    suggester: SuggestionEngine,
    cancel: CancellationToken,
}

impl AssistService {
    pub fn new(
        config: AssistConfig,
        store: Arc<KnowledgeStore>,
        backend: Arc<dyn GenerativeBackend>,
    ) -> Self {
        let orchestrator = MatchOrchestrator::new(&config.matching);
        let suggester = SuggestionEngine {
            policy: config.suggest.policy,
            limit: config.suggest.limit,
            cutoff: config.matching.similarity_cutoff,
        };
        Self {
            config,
            store,
            backend,
            orchestrator,
            suggester,
            cancel: CancellationToken::new(),
        }
    }

    /// Abort in-flight provider calls when `cancel` fires (server shutdown).
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    pub fn generative_enabled(&self) -> bool {
        self.backend.is_enabled()
    }

    /// Answer a chat message through the matching cascade.
    pub async fn chat(&self, message: &str) -> Answer {
        let kb = self.request_snapshot();
        match self.orchestrator.run(message, kb.entries()) {
            MatchOutcome::EmptyQuery => {
                Answer::new(self.config.messages.empty_query.clone(), SourceTag::Generic)
            }
            MatchOutcome::Matched { answer, stage } => {
                debug!(%stage, "Answered from knowledge base");
                Answer::new(answer, SourceTag::Faq)
            }
            MatchOutcome::NotFound => {
                if self.config.llm.generative_fallback && self.backend.is_enabled() {
                    self.generate(message.trim(), &kb).await
                } else {
                    Answer::new(self.config.messages.not_found_text(), SourceTag::Generic)
                }
            }
        }
    }

    /// Ask the generative collaborator directly, skipping the matchers.
    pub async fn chatgpt(&self, question: &str) -> Answer {
        let question = question.trim();
        if question.is_empty() {
            return Answer::new(self.config.messages.empty_query.clone(), SourceTag::Generic);
        }
        let kb = self.store.snapshot();
        self.generate(question, &kb).await
    }

    /// Autocomplete suggestions for a partial question.
    pub fn suggest(&self, prefix: &str) -> Vec<String> {
        let kb = self.request_snapshot();
        self.suggester.suggest(prefix, kb.entries(), kb.samples())
    }

    /// Reload the knowledge base from its source.
    pub fn reload(&self) -> Result<KnowledgeBaseStats, KnowledgeBaseError> {
        self.store.reload().map(|kb| kb.stats())
    }

    pub fn stats(&self) -> KnowledgeBaseStats {
        self.store.snapshot().stats()
    }

    fn request_snapshot(&self) -> Arc<KnowledgeBase> {
        if self.config.knowledge_base.reload_per_request {
            match self.store.reload() {
                Ok(kb) => return kb,
                Err(e) => warn!(error = %e, "Per-request reload failed — using current snapshot"),
            }
        }
        self.store.snapshot()
    }

    async fn generate(&self, question: &str, kb: &KnowledgeBase) -> Answer {
        let context = prompt::system_prompt(kb, &self.config.messages.support_contact);
        let timeout = Duration::from_secs(self.config.llm.timeout_secs);
        match llm::generate_bounded(self.backend.as_ref(), question, &context, timeout, &self.cancel).await {
            Ok(text) => Answer::new(text, SourceTag::Generative),
            Err(e) => {
                warn!(backend = self.backend.backend_name(), error = %e, "Generative provider failed");
                Answer::new(self.config.messages.provider_apology.clone(), SourceTag::Generic)
            }
        }
    }
}
