//! Contracts for the external collaborators, plus their HTTP adapters.
//!
//! The pipeline only ever sees the traits. Every call is awaited to completion
//! before the next stage runs; timeouts live in the adapters' HTTP clients.

use async_trait::async_trait;
use tracing::warn;

use crate::error::ServiceResult;

pub mod assistant;
pub mod classifier;
pub mod llm;
pub mod paraphrase;
pub mod search;

pub use assistant::{AssistantDialog, AssistantWorkspaces};
pub use classifier::HttpZeroShotClassifier;
pub use llm::client::LlmService;
pub use paraphrase::HttpParaphraser;
pub use search::DiscoverySearch;

/// Alternate phrasings of an utterance. Nondeterministic, at most `n` entries.
#[async_trait]
pub trait ParaphraseService: Send + Sync {
    async fn generate(&self, utterance: &str, n: usize) -> ServiceResult<Vec<String>>;
}

/// Sampled text continuation of a prompt.
#[async_trait]
pub trait GenerativeLanguageService: Send + Sync {
    async fn complete(&self, prompt: &str, max_new_tokens: usize) -> ServiceResult<String>;
}

/// Ranks `labels` against `query`, most relevant first.
#[async_trait]
pub trait ZeroShotClassificationService: Send + Sync {
    async fn rank(&self, query: &str, labels: &[String]) -> ServiceResult<Vec<(String, f32)>>;
}

/// Search backend that turns an intent label into the text of an answer.
/// A miss is still an answer (a "not found" message), not an error.
#[async_trait]
pub trait ActionSource: Send + Sync {
    async fn resolve(&self, label: &str) -> ServiceResult<String>;
}

/// External named-intent store, grouped into workspaces.
#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    async fn list_workspaces(&self) -> ServiceResult<Vec<String>>;
    async fn create_workspace(&self) -> ServiceResult<String>;
    async fn list_labels(&self, workspace: &str) -> ServiceResult<Vec<String>>;
    async fn create_label(&self, workspace: &str, label: &str, examples: &[String]) -> ServiceResult<()>;
    async fn delete_label(&self, workspace: &str, label: &str) -> ServiceResult<()>;
}

/// One turn as reported by the primary dialog engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DialogTurn {
    /// Intents the engine matched. Empty means the fallback pipeline takes over.
    pub intents: Vec<String>,
    /// First text response of the turn (the engine's own fallback when nothing matched).
    pub text: Option<String>,
}

#[async_trait]
pub trait DialogEngine: Send + Sync {
    async fn create_session(&self) -> ServiceResult<String>;
    async fn message(&self, session_id: &str, text: &str) -> ServiceResult<DialogTurn>;
    async fn delete_session(&self, session_id: &str) -> ServiceResult<()>;
}

/// Shared status-check for the HTTP adapters.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> ServiceResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::CONFLICT {
        return Err(crate::error::ServiceError::Conflict { service, body });
    }
    Err(crate::error::ServiceError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

pub(crate) fn http_client(timeout: std::time::Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, ?timeout, "http client builder failed, using default client without timeout");
            reqwest::Client::new()
        })
}
