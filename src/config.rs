use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "FALLBACK_INTENT_CONFIG";

/// Labels the bot knows before it has answered anything.
pub const DEFAULT_SEED_INTENTS: [&str; 3] = ["play music", "know weather", "get dog"];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// K: accepted candidates per utterance.
    pub num_candidates: usize,
    /// R: generator calls allowed per slot before failing open.
    pub max_attempts_per_slot: usize,
    pub num_paraphrases: usize,
    pub max_new_tokens: usize,
    pub seed_intents: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            num_candidates: 5,
            max_attempts_per_slot: 8,
            num_paraphrases: 5,
            max_new_tokens: 5,
            seed_intents: DEFAULT_SEED_INTENTS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceEndpoints {
    pub llm_url: String,
    pub llm_temperature: f32,
    pub paraphrase_url: String,
    pub classifier_url: String,

    pub assistant_url: String,
    pub assistant_id: String,
    pub assistant_api_key: String,
    pub assistant_version: String,
    pub workspace_version: String,

    pub discovery_url: String,
    pub discovery_project_id: String,
    pub discovery_api_key: String,
    pub discovery_version: String,

    /// Applied to every outbound HTTP client.
    pub timeout_ms: u64,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self {
            llm_url: "http://localhost:8080".to_string(),
            llm_temperature: 0.9,
            paraphrase_url: "http://localhost:8081".to_string(),
            classifier_url: "http://localhost:8082".to_string(),
            assistant_url: "https://api.us-east.assistant.watson.cloud.ibm.com".to_string(),
            assistant_id: String::new(),
            assistant_api_key: String::new(),
            assistant_version: "2021-06-14".to_string(),
            workspace_version: "2021-06-14".to_string(),
            discovery_url: String::new(),
            discovery_project_id: String::new(),
            discovery_api_key: String::new(),
            discovery_version: "2020-08-30".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ServiceEndpoints {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub pipeline: PipelineConfig,
    pub services: ServiceEndpoints,
}

impl BotConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// File named by `FALLBACK_INTENT_CONFIG` (if set), then secrets and ids from the environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overrides from a key lookup. Split out so tests don't have to touch the process env.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let s = &mut self.services;
        let overrides: [(&str, &mut String); 8] = [
            ("LLM_URL", &mut s.llm_url),
            ("PARAPHRASE_URL", &mut s.paraphrase_url),
            ("CLASSIFIER_URL", &mut s.classifier_url),
            ("ASSISTANT_ID", &mut s.assistant_id),
            ("ASSISTANT_API_KEY", &mut s.assistant_api_key),
            ("DISCOVERY_URL", &mut s.discovery_url),
            ("DISCOVERY_PROJECT_ID", &mut s.discovery_project_id),
            ("DISCOVERY_API_KEY", &mut s.discovery_api_key),
        ];
        for (key, slot) in overrides {
            if let Some(value) = lookup(key) {
                *slot = value;
            }
        }
    }
}
