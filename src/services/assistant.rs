//! Assistant REST adapters: v1 workspaces/intents for the registry and v2
//! sessions/messages for the primary dialog engine.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::error::{ServiceError, ServiceResult};
use crate::services::{check_status, http_client, DialogEngine, DialogTurn, WorkspaceStore};

const WORKSPACE_NAME: &str = "fallback-intents";

#[derive(Clone)]
struct AssistantApi {
    client: Client,
    base_url: String,
    api_key: String,
    version: String,
}

impl AssistantApi {
    fn new(base_url: String, api_key: String, version: String, timeout: Duration) -> Self {
        Self {
            client: http_client(timeout),
            base_url,
            api_key,
            version,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .query(&[("version", self.version.as_str())])
            .basic_auth("apikey", Some(&self.api_key))
    }
}

/// Named-intent store backed by assistant v1 workspaces.
#[derive(Clone)]
pub struct AssistantWorkspaces {
    api: AssistantApi,
}

#[derive(Deserialize)]
struct WorkspaceList {
    #[serde(default)]
    workspaces: Vec<Workspace>,
}

#[derive(Deserialize)]
struct Workspace {
    workspace_id: String,
}

#[derive(Deserialize)]
struct IntentList {
    #[serde(default)]
    intents: Vec<IntentRecord>,
}

#[derive(Deserialize)]
struct IntentRecord {
    intent: String,
}

#[derive(Serialize)]
struct CreateIntent<'a> {
    intent: &'a str,
    examples: Vec<Example<'a>>,
}

#[derive(Serialize)]
struct Example<'a> {
    text: &'a str,
}

impl AssistantWorkspaces {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api: AssistantApi::new(base_url.into(), api_key.into(), version.into(), timeout),
        }
    }
}

#[async_trait]
impl WorkspaceStore for AssistantWorkspaces {
    async fn list_workspaces(&self) -> ServiceResult<Vec<String>> {
        let response = self.api.request(reqwest::Method::GET, "/v1/workspaces").send().await?;
        let body: WorkspaceList = check_status("workspaces", response).await?.json().await?;
        Ok(body.workspaces.into_iter().map(|w| w.workspace_id).collect())
    }

    async fn create_workspace(&self) -> ServiceResult<String> {
        let response = self
            .api
            .request(reqwest::Method::POST, "/v1/workspaces")
            .json(&json!({ "name": WORKSPACE_NAME, "description": "Generated fallback intents" }))
            .send()
            .await?;
        let body: Workspace = check_status("workspaces", response).await?.json().await?;
        Ok(body.workspace_id)
    }

    async fn list_labels(&self, workspace: &str) -> ServiceResult<Vec<String>> {
        let path = format!("/v1/workspaces/{}/intents", workspace);
        let response = self.api.request(reqwest::Method::GET, &path).send().await?;
        let body: IntentList = check_status("workspaces", response).await?.json().await?;
        Ok(body.intents.into_iter().map(|i| i.intent).collect())
    }

    async fn create_label(&self, workspace: &str, label: &str, examples: &[String]) -> ServiceResult<()> {
        let path = format!("/v1/workspaces/{}/intents", workspace);
        let body = CreateIntent {
            intent: label,
            examples: examples.iter().map(|text| Example { text: text.as_str() }).collect(),
        };
        let response = self.api.request(reqwest::Method::POST, &path).json(&body).send().await?;
        check_status("workspaces", response).await?;
        Ok(())
    }

    async fn delete_label(&self, workspace: &str, label: &str) -> ServiceResult<()> {
        let path = format!("/v1/workspaces/{}/intents/{}", workspace, label);
        let response = self.api.request(reqwest::Method::DELETE, &path).send().await?;
        check_status("workspaces", response).await?;
        Ok(())
    }
}

/// Primary dialog engine backed by assistant v2 sessions.
#[derive(Clone)]
pub struct AssistantDialog {
    api: AssistantApi,
    assistant_id: String,
}

#[derive(Deserialize)]
struct SessionCreated {
    session_id: String,
}

#[derive(Deserialize)]
struct MessageResponse {
    output: MessageOutput,
}

#[derive(Deserialize)]
struct MessageOutput {
    #[serde(default)]
    intents: Vec<IntentRecord>,
    #[serde(default)]
    generic: Vec<GenericResponse>,
}

#[derive(Deserialize)]
struct GenericResponse {
    text: Option<String>,
}

impl AssistantDialog {
    pub fn new(
        base_url: impl Into<String>,
        assistant_id: impl Into<String>,
        api_key: impl Into<String>,
        version: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            api: AssistantApi::new(base_url.into(), api_key.into(), version.into(), timeout),
            assistant_id: assistant_id.into(),
        }
    }
}

#[async_trait]
impl DialogEngine for AssistantDialog {
    async fn create_session(&self) -> ServiceResult<String> {
        let path = format!("/v2/assistants/{}/sessions", self.assistant_id);
        let response = self.api.request(reqwest::Method::POST, &path).send().await?;
        let body: SessionCreated = check_status("assistant", response).await?.json().await?;
        Ok(body.session_id)
    }

    async fn message(&self, session_id: &str, text: &str) -> ServiceResult<DialogTurn> {
        let path = format!("/v2/assistants/{}/sessions/{}/message", self.assistant_id, session_id);
        let response = self
            .api
            .request(reqwest::Method::POST, &path)
            .json(&json!({ "input": { "message_type": "text", "text": text } }))
            .send()
            .await?;
        let body: MessageResponse = check_status("assistant", response)
            .await?
            .json()
            .await
            .map_err(|e| ServiceError::malformed("assistant", e.to_string()))?;

        Ok(DialogTurn {
            intents: body.output.intents.into_iter().map(|i| i.intent).collect(),
            text: body.output.generic.into_iter().find_map(|g| g.text),
        })
    }

    async fn delete_session(&self, session_id: &str) -> ServiceResult<()> {
        let path = format!("/v2/assistants/{}/sessions/{}", self.assistant_id, session_id);
        let response = self.api.request(reqwest::Method::DELETE, &path).send().await?;
        check_status("assistant", response).await?;
        Ok(())
    }
}
