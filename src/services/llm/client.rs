use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ServiceResult;
use crate::services::{check_status, http_client, GenerativeLanguageService};

/// Completion client for a llama-server style `/completion` endpoint.
#[derive(Clone)]
pub struct LlmService {
    client: Client,
    base_url: String,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    stream: bool,
    n_predict: usize,
    temperature: f32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlmService {
    pub fn new(base_url: impl Into<String>, temperature: f32, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
            temperature,
        }
    }
}

#[async_trait]
impl GenerativeLanguageService for LlmService {
    async fn complete(&self, prompt: &str, max_new_tokens: usize) -> ServiceResult<String> {
        let request_body = CompletionRequest {
            prompt,
            stream: false,
            n_predict: max_new_tokens,
            // Sampling on: repeated calls must be able to produce different labels.
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&request_body)
            .send()
            .await?;
        let response = check_status("llm", response).await?;

        let resp_json: CompletionResponse = response.json().await?;
        Ok(resp_json.content)
    }
}
