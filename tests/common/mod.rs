#![allow(dead_code)]

use async_trait::async_trait;
use fallback_intent::error::{ServiceError, ServiceResult};
use fallback_intent::intent::{IntentPipeline, PipelineServices};
use fallback_intent::config::PipelineConfig;
use fallback_intent::services::search::{found_message, not_found_message};
use fallback_intent::services::{
    ActionSource, DialogEngine, DialogTurn, GenerativeLanguageService, ParaphraseService,
    WorkspaceStore, ZeroShotClassificationService,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CAKE_UTTERANCE: &str = "What are the ingredients required to bake a perfect cake?";

pub struct FixedParaphraser {
    pub paraphrases: Vec<String>,
    pub calls: AtomicUsize,
}

impl FixedParaphraser {
    pub fn new(paraphrases: &[&str]) -> Self {
        Self {
            paraphrases: paraphrases.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ParaphraseService for FixedParaphraser {
    async fn generate(&self, _utterance: &str, n: usize) -> ServiceResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.paraphrases.iter().take(n).cloned().collect())
    }
}

/// Plays back scripted continuations, then repeats `fallback` forever.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<String>>,
    fallback: String,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new(script: &[&str], fallback: &str) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|s| s.to_string()).collect()),
            fallback: fallback.to_string(),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(continuation: &str) -> Self {
        Self::new(&[], continuation)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeLanguageService for ScriptedLlm {
    async fn complete(&self, prompt: &str, _max_new_tokens: usize) -> ServiceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.script.lock().unwrap().pop_front();
        Ok(next.unwrap_or_else(|| self.fallback.clone()))
    }
}

/// Ranks `preferred` labels first (in that order), then the rest as given.
/// Scores are 1/(rank+2): 0.5, 0.333, 0.25, ...
pub struct PreferRanker {
    preferred: Vec<String>,
    pub seen: Mutex<Vec<Vec<String>>>,
}

impl PreferRanker {
    pub fn new(preferred: &[&str]) -> Self {
        Self {
            preferred: preferred.iter().map(|s| s.to_string()).collect(),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl ZeroShotClassificationService for PreferRanker {
    async fn rank(&self, _query: &str, labels: &[String]) -> ServiceResult<Vec<(String, f32)>> {
        self.seen.lock().unwrap().push(labels.to_vec());
        let mut ordered: Vec<String> = self
            .preferred
            .iter()
            .filter(|p| labels.contains(p))
            .cloned()
            .collect();
        let rest: Vec<String> = labels.iter().filter(|l| !ordered.contains(l)).cloned().collect();
        ordered.extend(rest);
        Ok(ordered
            .into_iter()
            .enumerate()
            .map(|(i, l)| (l, 1.0 / (i as f32 + 2.0)))
            .collect())
    }
}

/// Returns a canned ranking whatever the labels.
pub struct FixedRanking(pub Vec<(String, f32)>);

#[async_trait]
impl ZeroShotClassificationService for FixedRanking {
    async fn rank(&self, _query: &str, _labels: &[String]) -> ServiceResult<Vec<(String, f32)>> {
        Ok(self.0.clone())
    }
}

pub struct PassageSource {
    passages: HashMap<String, String>,
    pub calls: AtomicUsize,
}

impl PassageSource {
    pub fn new(passages: &[(&str, &str)]) -> Self {
        Self {
            passages: passages
                .iter()
                .map(|(l, p)| (l.to_string(), p.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActionSource for PassageSource {
    async fn resolve(&self, label: &str) -> ServiceResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match self.passages.get(label) {
            Some(passage) => found_message(label, passage),
            None => not_found_message(label),
        })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub workspaces: Mutex<Vec<String>>,
    pub labels: Mutex<HashMap<String, Vec<(String, Vec<String>)>>>,
    pub workspace_creates: AtomicUsize,
    pub workspace_lists: AtomicUsize,
    pub label_creates: AtomicUsize,
    pub label_deletes: AtomicUsize,
    pub reject_writes: AtomicBool,
}

impl MemoryStore {
    pub fn with_workspaces(ids: &[&str]) -> Self {
        let store = Self::default();
        *store.workspaces.lock().unwrap() = ids.iter().map(|s| s.to_string()).collect();
        store
    }

    pub fn rejecting() -> Self {
        Self {
            reject_writes: AtomicBool::new(true),
            ..Self::default()
        }
    }

    pub fn names_in(&self, workspace: &str) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .get(workspace)
            .map(|v| v.iter().map(|(n, _)| n.clone()).collect())
            .unwrap_or_default()
    }

    pub fn all_names(&self) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .values()
            .flat_map(|v| v.iter().map(|(n, _)| n.clone()))
            .collect()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceStore for MemoryStore {
    async fn list_workspaces(&self) -> ServiceResult<Vec<String>> {
        self.workspace_lists.fetch_add(1, Ordering::SeqCst);
        Ok(self.workspaces.lock().unwrap().clone())
    }

    async fn create_workspace(&self) -> ServiceResult<String> {
        let n = self.workspace_creates.fetch_add(1, Ordering::SeqCst);
        let id = format!("ws-{}", n + 1);
        self.workspaces.lock().unwrap().push(id.clone());
        Ok(id)
    }

    async fn list_labels(&self, workspace: &str) -> ServiceResult<Vec<String>> {
        Ok(self.names_in(workspace))
    }

    async fn create_label(&self, workspace: &str, label: &str, examples: &[String]) -> ServiceResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Conflict {
                service: "workspaces",
                body: format!("intent {} rejected", label),
            });
        }
        self.label_creates.fetch_add(1, Ordering::SeqCst);
        self.labels
            .lock()
            .unwrap()
            .entry(workspace.to_string())
            .or_default()
            .push((label.to_string(), examples.to_vec()));
        Ok(())
    }

    async fn delete_label(&self, workspace: &str, label: &str) -> ServiceResult<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(ServiceError::Status {
                service: "workspaces",
                status: 400,
                body: "delete rejected".to_string(),
            });
        }
        self.label_deletes.fetch_add(1, Ordering::SeqCst);
        if let Some(entries) = self.labels.lock().unwrap().get_mut(workspace) {
            entries.retain(|(n, _)| n != label);
        }
        Ok(())
    }
}

/// Matches only the texts in `matched`; everything else gets the fallback reply.
pub struct ScriptedDialog {
    matched: HashMap<String, (String, String)>,
    pub fallback: String,
    pub deleted: Mutex<Vec<String>>,
}

impl ScriptedDialog {
    pub fn new(matched: &[(&str, &str, &str)], fallback: &str) -> Self {
        Self {
            matched: matched
                .iter()
                .map(|(text, intent, reply)| (text.to_string(), (intent.to_string(), reply.to_string())))
                .collect(),
            fallback: fallback.to_string(),
            deleted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DialogEngine for ScriptedDialog {
    async fn create_session(&self) -> ServiceResult<String> {
        Ok("session-1".to_string())
    }

    async fn message(&self, _session_id: &str, text: &str) -> ServiceResult<DialogTurn> {
        Ok(match self.matched.get(text) {
            Some((intent, reply)) => DialogTurn {
                intents: vec![intent.clone()],
                text: Some(reply.clone()),
            },
            None => DialogTurn {
                intents: vec![],
                text: Some(self.fallback.clone()),
            },
        })
    }

    async fn delete_session(&self, session_id: &str) -> ServiceResult<()> {
        self.deleted.lock().unwrap().push(session_id.to_string());
        Ok(())
    }
}

/// Handles kept by a test so it can inspect the mocks after a run.
pub struct Harness {
    pub paraphraser: Arc<FixedParaphraser>,
    pub llm: Arc<ScriptedLlm>,
    pub ranker: Arc<PreferRanker>,
    pub actions: Arc<PassageSource>,
    pub store: Arc<MemoryStore>,
}

impl Harness {
    pub fn new(
        paraphrases: &[&str],
        llm: ScriptedLlm,
        preferred: &[&str],
        passages: &[(&str, &str)],
        store: MemoryStore,
    ) -> Self {
        Self {
            paraphraser: Arc::new(FixedParaphraser::new(paraphrases)),
            llm: Arc::new(llm),
            ranker: Arc::new(PreferRanker::new(preferred)),
            actions: Arc::new(PassageSource::new(passages)),
            store: Arc::new(store),
        }
    }

    pub fn pipeline(&self, config: &PipelineConfig) -> IntentPipeline {
        let services = PipelineServices::with_default_validator(
            self.paraphraser.clone(),
            self.llm.clone(),
            self.ranker.clone(),
            self.actions.clone(),
            self.store.clone(),
        );
        IntentPipeline::new(services, config)
    }
}
