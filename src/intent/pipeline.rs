use std::sync::Arc;
use tracing::info;

use super::cache::IntentContext;
use super::disambiguator::Disambiguator;
use super::generator::CandidateGenerator;
use super::paraphrase::normalize;
use super::pool::CandidatePoolBuilder;
use super::registry::{RegistrySynchronizer, SyncOutcome};
use super::types::DisambiguationResult;
use super::validator::{HeuristicValidator, LabelValidator};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::services::{
    ActionSource, GenerativeLanguageService, ParaphraseService, WorkspaceStore,
    ZeroShotClassificationService,
};

/// The collaborators a pipeline is wired to.
#[derive(Clone)]
pub struct PipelineServices {
    pub paraphraser: Arc<dyn ParaphraseService>,
    pub llm: Arc<dyn GenerativeLanguageService>,
    pub classifier: Arc<dyn ZeroShotClassificationService>,
    pub actions: Arc<dyn ActionSource>,
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub validator: Arc<dyn LabelValidator>,
}

impl PipelineServices {
    /// Same services with the default lexicon-based validator.
    pub fn with_default_validator(
        paraphraser: Arc<dyn ParaphraseService>,
        llm: Arc<dyn GenerativeLanguageService>,
        classifier: Arc<dyn ZeroShotClassificationService>,
        actions: Arc<dyn ActionSource>,
        workspaces: Arc<dyn WorkspaceStore>,
    ) -> Self {
        Self {
            paraphraser,
            llm,
            classifier,
            actions,
            workspaces,
            validator: Arc::new(HeuristicValidator::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// No paraphrases and no known intents, or nothing rankable. The caller
    /// falls back to its unrecognized-intent response.
    NoIntent,
    /// The selected label already had an action.
    Cached {
        intent: DisambiguationResult,
        action: String,
        sync: SyncOutcome,
    },
    /// First resolution of this label in the process.
    Discovered {
        intent: DisambiguationResult,
        action: String,
        examples: Vec<String>,
        sync: SyncOutcome,
    },
}

impl Resolution {
    pub fn action(&self) -> Option<&str> {
        match self {
            Resolution::NoIntent => None,
            Resolution::Cached { action, .. } | Resolution::Discovered { action, .. } => Some(action),
        }
    }

    pub fn sync(&self) -> Option<&SyncOutcome> {
        match self {
            Resolution::NoIntent => None,
            Resolution::Cached { sync, .. } | Resolution::Discovered { sync, .. } => Some(sync),
        }
    }

    pub fn intent(&self) -> Option<&DisambiguationResult> {
        match self {
            Resolution::NoIntent => None,
            Resolution::Cached { intent, .. } | Resolution::Discovered { intent, .. } => Some(intent),
        }
    }
}

/// Unrecognized utterance → label → action, start to finish.
pub struct IntentPipeline {
    paraphraser: Arc<dyn ParaphraseService>,
    pool_builder: CandidatePoolBuilder,
    disambiguator: Disambiguator,
    actions: Arc<dyn ActionSource>,
    registry: RegistrySynchronizer,
    num_paraphrases: usize,
}

impl IntentPipeline {
    pub fn new(services: PipelineServices, config: &PipelineConfig) -> Self {
        let generator = CandidateGenerator::new(services.llm, config.max_new_tokens);
        Self {
            paraphraser: services.paraphraser,
            pool_builder: CandidatePoolBuilder::new(
                generator,
                services.validator,
                config.num_candidates,
                config.max_attempts_per_slot,
            ),
            disambiguator: Disambiguator::new(services.classifier),
            actions: services.actions,
            registry: RegistrySynchronizer::new(services.workspaces),
            num_paraphrases: config.num_paraphrases,
        }
    }

    pub fn registry(&self) -> &RegistrySynchronizer {
        &self.registry
    }

    pub async fn resolve(
        &self,
        utterance: &str,
        ctx: &mut IntentContext,
    ) -> Result<Resolution, PipelineError> {
        // 1. Paraphrase
        let raw = self
            .paraphraser
            .generate(utterance, self.num_paraphrases)
            .await
            .map_err(PipelineError::Paraphrase)?;
        let paraphrases = normalize(utterance, &raw);

        if paraphrases.is_empty() && !ctx.has_known_intents() {
            info!("no paraphrases and no known intents, nothing to disambiguate");
            return Ok(Resolution::NoIntent);
        }

        // 2. Candidate pool (an empty set still yields a prompt ending in an `input:` block)
        let pool = self
            .pool_builder
            .build(&paraphrases)
            .await
            .map_err(PipelineError::Generation)?;

        // 3. Disambiguate
        let selected = self
            .disambiguator
            .select(utterance, &pool, ctx.known_labels())
            .await
            .map_err(PipelineError::Classification)?;
        let Some(intent) = selected else {
            info!("classifier returned no usable label");
            return Ok(Resolution::NoIntent);
        };

        let examples: Vec<String> = std::iter::once(utterance.trim().to_string())
            .chain(paraphrases.into_vec())
            .collect();

        // 4. Cache (registration is retried on hits; it is idempotent)
        if let Some(action) = ctx.cache.lookup(&intent.label).map(str::to_string) {
            let sync = self.registry.register(&intent.label, &examples).await;
            info!(label = %intent.label, ?sync, "intent cache hit");
            return Ok(Resolution::Cached {
                intent,
                action,
                sync,
            });
        }

        let action = self
            .actions
            .resolve(&intent.label)
            .await
            .map_err(PipelineError::Action)?;
        ctx.cache.store(intent.label.clone(), action.clone());

        // 5. Registry, best effort
        let sync = self.registry.register(&intent.label, &examples).await;

        info!(
            label = %intent.label,
            top_score = intent.top_score,
            candidates = pool.len(),
            attempts = pool.attempts,
            ?sync,
            "discovered new intent"
        );
        Ok(Resolution::Discovered {
            intent,
            action,
            examples,
            sync,
        })
    }
}
