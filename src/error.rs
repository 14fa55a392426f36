use thiserror::Error;

/// Failure talking to one of the external collaborators.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The store already holds (or is still processing) the resource.
    #[error("{service} conflict: {body}")]
    Conflict { service: &'static str, body: String },

    #[error("{service} returned a malformed response: {reason}")]
    Malformed {
        service: &'static str,
        reason: String,
    },
}

impl ServiceError {
    pub fn malformed(service: &'static str, reason: impl Into<String>) -> Self {
        ServiceError::Malformed {
            service,
            reason: reason.into(),
        }
    }
}

/// Errors that abort a pipeline run or a session turn.
///
/// Registry failures never show up here; they are reported through
/// [`crate::intent::registry::SyncOutcome`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("paraphrase service failed: {0}")]
    Paraphrase(#[source] ServiceError),

    #[error("generation failed: {0}")]
    Generation(#[source] ServiceError),

    #[error("classification failed: {0}")]
    Classification(#[source] ServiceError),

    #[error("action source failed: {0}")]
    Action(#[source] ServiceError),

    #[error("dialog engine failed: {0}")]
    Dialog(#[source] ServiceError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
