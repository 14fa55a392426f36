//! Session boundary: the primary dialog engine answers first, the fallback
//! intent pipeline only runs on turns it could not classify.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::config::BotConfig;
use crate::error::PipelineError;
use crate::intent::{IntentContext, IntentPipeline, PipelineServices, Resolution, SyncOutcome};
use crate::services::{
    AssistantDialog, AssistantWorkspaces, DialogEngine, DiscoverySearch, HttpParaphraser,
    HttpZeroShotClassifier, LlmService,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
}

/// Process-level bot: one pipeline and one intent context shared by all its sessions.
pub struct Bot {
    dialog: Arc<dyn DialogEngine>,
    pipeline: IntentPipeline,
    // Held for a whole resolution so lookup-then-store has a single writer.
    context: Mutex<IntentContext>,
}

impl Bot {
    pub fn new(dialog: Arc<dyn DialogEngine>, pipeline: IntentPipeline, context: IntentContext) -> Self {
        Self {
            dialog,
            pipeline,
            context: Mutex::new(context),
        }
    }

    /// Wires every collaborator to its HTTP adapter.
    pub fn from_config(config: &BotConfig) -> Self {
        let s = &config.services;
        let timeout = s.timeout();

        let services = PipelineServices::with_default_validator(
            Arc::new(HttpParaphraser::new(&s.paraphrase_url, timeout)),
            Arc::new(LlmService::new(&s.llm_url, s.llm_temperature, timeout)),
            Arc::new(HttpZeroShotClassifier::new(&s.classifier_url, timeout)),
            Arc::new(DiscoverySearch::new(
                &s.discovery_url,
                &s.discovery_project_id,
                &s.discovery_api_key,
                &s.discovery_version,
                timeout,
            )),
            Arc::new(AssistantWorkspaces::new(
                &s.assistant_url,
                &s.assistant_api_key,
                &s.workspace_version,
                timeout,
            )),
        );
        let dialog = Arc::new(AssistantDialog::new(
            &s.assistant_url,
            &s.assistant_id,
            &s.assistant_api_key,
            &s.assistant_version,
            timeout,
        ));

        Self::new(
            dialog,
            IntentPipeline::new(services, &config.pipeline),
            IntentContext::with_seeds(config.pipeline.seed_intents.iter().cloned()),
        )
    }

    pub async fn create_session(self: &Arc<Self>) -> Result<BotSession, PipelineError> {
        let session_id = self.dialog.create_session().await.map_err(PipelineError::Dialog)?;
        info!(session_id = %session_id, "session created");
        Ok(BotSession {
            bot: Arc::clone(self),
            session_id,
        })
    }

    /// Runs the fallback pipeline for an utterance the dialog engine did not match.
    pub async fn resolve_unknown(&self, text: &str) -> Result<Resolution, PipelineError> {
        let mut ctx = self.context.lock().await;
        self.pipeline.resolve(text, &mut ctx).await
    }

    pub async fn known_labels(&self) -> Vec<String> {
        let ctx = self.context.lock().await;
        ctx.known_labels().map(str::to_string).collect()
    }

    pub async fn cached_action(&self, label: &str) -> Option<String> {
        let ctx = self.context.lock().await;
        ctx.cache.lookup(label).map(str::to_string)
    }

    /// Deletes one label from the registry and forgets it locally.
    pub async fn forget(&self, label: &str) -> SyncOutcome {
        let mut ctx = self.context.lock().await;
        let outcome = self.pipeline.registry().unregister(label).await;
        ctx.forget(label);
        outcome
    }

    /// Deletes every cached label from the registry, then empties the cache.
    pub async fn forget_all(&self) -> Vec<SyncOutcome> {
        let mut ctx = self.context.lock().await;
        let outcomes = self.pipeline.registry().clear_all(ctx.cache.labels()).await;
        ctx.cache.clear();
        outcomes
    }
}

pub struct BotSession {
    bot: Arc<Bot>,
    session_id: String,
}

impl BotSession {
    pub fn id(&self) -> &str {
        &self.session_id
    }

    pub async fn message(&self, text: &str) -> Result<BotReply, PipelineError> {
        let span = info_span!("turn", session_id = %self.session_id, turn_id = %Uuid::new_v4());
        self.handle(text).instrument(span).await
    }

    async fn handle(&self, text: &str) -> Result<BotReply, PipelineError> {
        let turn = self
            .bot
            .dialog
            .message(&self.session_id, text)
            .await
            .map_err(PipelineError::Dialog)?;

        if !turn.intents.is_empty() {
            info!(intents = ?turn.intents, "dialog engine matched the turn");
            return Ok(BotReply {
                text: turn.text.unwrap_or_default(),
            });
        }

        let resolution = self.bot.resolve_unknown(text).await?;
        let reply = match resolution.action() {
            Some(action) => action.to_string(),
            None => turn.text.unwrap_or_default(),
        };
        Ok(BotReply { text: reply })
    }

    pub async fn close(self) -> Result<(), PipelineError> {
        self.bot
            .dialog
            .delete_session(&self.session_id)
            .await
            .map_err(PipelineError::Dialog)?;
        info!(session_id = %self.session_id, "session deleted");
        Ok(())
    }
}
