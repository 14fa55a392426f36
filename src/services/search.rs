use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ServiceResult;
use crate::services::{check_status, http_client, ActionSource};

/// Passage retrieval over a Discovery v2 project. The best passage for the
/// label becomes the action text.
#[derive(Clone)]
pub struct DiscoverySearch {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: String,
    version: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    natural_language_query: &'a str,
    count: usize,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matching_results: u64,
    #[serde(default)]
    results: Vec<QueryResult>,
}

#[derive(Deserialize)]
struct QueryResult {
    #[serde(default)]
    document_passages: Vec<Passage>,
}

#[derive(Deserialize)]
struct Passage {
    passage_text: String,
}

pub fn found_message(label: &str, passage: &str) -> String {
    format!("Found relevant information regarding: <b>{}</b>.\n\n{}", label, passage)
}

pub fn not_found_message(label: &str) -> String {
    format!("Could not find relevant information regarding: <b>{}</b>..", label)
}

impl DiscoverySearch {
    pub fn new(
        base_url: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(timeout),
            base_url: base_url.into(),
            project_id: project_id.into(),
            api_key: api_key.into(),
            version: version.into(),
        }
    }
}

#[async_trait]
impl ActionSource for DiscoverySearch {
    async fn resolve(&self, label: &str) -> ServiceResult<String> {
        let url = format!("{}/v2/projects/{}/query", self.base_url, self.project_id);
        let response = self
            .client
            .post(url)
            .query(&[("version", self.version.as_str())])
            .basic_auth("apikey", Some(&self.api_key))
            .json(&QueryRequest {
                natural_language_query: label,
                count: 1,
            })
            .send()
            .await?;
        let response = check_status("discovery", response).await?;

        let body: QueryResponse = response.json().await?;
        let passage = body
            .results
            .into_iter()
            .next()
            .and_then(|r| r.document_passages.into_iter().next())
            .map(|p| p.passage_text);

        Ok(match passage {
            Some(text) if body.matching_results > 0 => found_message(label, &text),
            _ => not_found_message(label),
        })
    }
}
