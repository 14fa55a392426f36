use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};
use crate::services::{check_status, http_client, ZeroShotClassificationService};

/// Client for an NLI-backed zero-shot classification endpoint.
#[derive(Clone)]
pub struct HttpZeroShotClassifier {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ZeroShotRequest<'a> {
    sequence: &'a str,
    candidate_labels: &'a [String],
}

/// Parallel arrays, sorted by descending score.
#[derive(Deserialize)]
struct ZeroShotResponse {
    labels: Vec<String>,
    scores: Vec<f32>,
}

impl HttpZeroShotClassifier {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ZeroShotClassificationService for HttpZeroShotClassifier {
    async fn rank(&self, query: &str, labels: &[String]) -> ServiceResult<Vec<(String, f32)>> {
        let response = self
            .client
            .post(format!("{}/zero-shot", self.base_url))
            .json(&ZeroShotRequest {
                sequence: query,
                candidate_labels: labels,
            })
            .send()
            .await?;
        let response = check_status("classifier", response).await?;

        let body: ZeroShotResponse = response.json().await?;
        if body.labels.len() != body.scores.len() {
            return Err(ServiceError::malformed(
                "classifier",
                format!("{} labels but {} scores", body.labels.len(), body.scores.len()),
            ));
        }
        Ok(body.labels.into_iter().zip(body.scores).collect())
    }
}
