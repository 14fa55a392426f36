use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ServiceResult;
use crate::services::{check_status, http_client, ParaphraseService};

/// Client for a seq2seq paraphrasing model served over HTTP.
#[derive(Clone)]
pub struct HttpParaphraser {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct ParaphraseRequest<'a> {
    text: &'a str,
    num_return_sequences: usize,
}

#[derive(Deserialize)]
struct ParaphraseResponse {
    paraphrases: Vec<String>,
}

impl HttpParaphraser {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ParaphraseService for HttpParaphraser {
    async fn generate(&self, utterance: &str, n: usize) -> ServiceResult<Vec<String>> {
        let response = self
            .client
            .post(format!("{}/paraphrase", self.base_url))
            .json(&ParaphraseRequest {
                text: utterance,
                num_return_sequences: n,
            })
            .send()
            .await?;
        let response = check_status("paraphraser", response).await?;

        let mut body: ParaphraseResponse = response.json().await?;
        body.paraphrases.truncate(n);
        Ok(body.paraphrases)
    }
}
