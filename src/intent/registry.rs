use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::services::WorkspaceStore;

pub const LABEL_SEPARATOR: char = '_';

/// Result of one best-effort registry call. Never an error: the caller may log
/// it or drop it, the pipeline carries on either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created { name: String },
    AlreadyPresent { name: String },
    Deleted { name: String },
    Absent { name: String },
    /// The label contains characters the store must never see.
    IllegalLabelCharacters { label: String },
    /// The store rejected the call (or could not be reached).
    Failed { label: String, reason: String },
}

impl SyncOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }
}

/// Store-side name for a label: lowercase words joined by `_`. Only ASCII
/// letters and whitespace are accepted; anything else returns `None`.
pub fn registry_name(label: &str) -> Option<String> {
    if !label.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()) {
        return None;
    }
    let words: Vec<String> = label.split_whitespace().map(str::to_ascii_lowercase).collect();
    if words.is_empty() {
        return None;
    }
    Some(words.join(&LABEL_SEPARATOR.to_string()))
}

/// Keeps discovered labels mirrored in the external intent store.
///
/// Create and delete are idempotent: both list the workspace first and only
/// write when the store disagrees.
pub struct RegistrySynchronizer {
    store: Arc<dyn WorkspaceStore>,
    workspace: OnceCell<String>,
}

impl RegistrySynchronizer {
    pub fn new(store: Arc<dyn WorkspaceStore>) -> Self {
        Self {
            store,
            workspace: OnceCell::new(),
        }
    }

    /// Reuses the first existing workspace, creating one only if there is none.
    /// Memoised once it succeeds.
    pub async fn workspace(&self) -> ServiceResult<&str> {
        let id = self
            .workspace
            .get_or_try_init(|| async {
                let existing = self.store.list_workspaces().await?;
                let id = match existing.into_iter().next() {
                    Some(first) => {
                        debug!(workspace = %first, "reusing workspace");
                        first
                    }
                    None => {
                        let created = self.store.create_workspace().await?;
                        info!(workspace = %created, "created workspace");
                        created
                    }
                };
                Ok::<String, ServiceError>(id)
            })
            .await?;
        Ok(id.as_str())
    }

    pub async fn register(&self, label: &str, examples: &[String]) -> SyncOutcome {
        let Some(name) = registry_name(label) else {
            warn!(label = %label, "label has characters outside the registry alphabet, not registering");
            return SyncOutcome::IllegalLabelCharacters { label: label.to_string() };
        };

        match self.try_register(&name, examples).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(label = %label, error = %e, "intent registration failed");
                SyncOutcome::Failed { label: label.to_string(), reason: e.to_string() }
            }
        }
    }

    async fn try_register(&self, name: &str, examples: &[String]) -> ServiceResult<SyncOutcome> {
        let workspace = self.workspace().await?;
        let existing = self.store.list_labels(workspace).await?;
        if existing.iter().any(|l| l == name) {
            debug!(name = %name, "intent already registered");
            return Ok(SyncOutcome::AlreadyPresent { name: name.to_string() });
        }

        self.store.create_label(workspace, name, examples).await?;
        info!(name = %name, examples = examples.len(), "registered intent");
        Ok(SyncOutcome::Created { name: name.to_string() })
    }

    pub async fn unregister(&self, label: &str) -> SyncOutcome {
        let Some(name) = registry_name(label) else {
            return SyncOutcome::IllegalLabelCharacters { label: label.to_string() };
        };

        match self.try_unregister(&name).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(label = %label, error = %e, "intent deletion failed");
                SyncOutcome::Failed { label: label.to_string(), reason: e.to_string() }
            }
        }
    }

    async fn try_unregister(&self, name: &str) -> ServiceResult<SyncOutcome> {
        let workspace = self.workspace().await?;
        let existing = self.store.list_labels(workspace).await?;
        if !existing.iter().any(|l| l == name) {
            return Ok(SyncOutcome::Absent { name: name.to_string() });
        }

        self.store.delete_label(workspace, name).await?;
        info!(name = %name, "deleted intent");
        Ok(SyncOutcome::Deleted { name: name.to_string() })
    }

    /// Unregisters every given label, one at a time.
    pub async fn clear_all<'a, I>(&self, labels: I) -> Vec<SyncOutcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outcomes = Vec::new();
        for label in labels {
            outcomes.push(self.unregister(label).await);
        }
        outcomes
    }
}
