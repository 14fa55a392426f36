//! Fallback intent discovery: paraphrase, generate, validate, disambiguate,
//! cache and register.

pub mod cache;
pub mod disambiguator;
pub mod generator;
pub mod paraphrase;
pub mod pipeline;
pub mod pool;
pub mod registry;
pub mod types;
pub mod validator;

pub use cache::{IntentCache, IntentContext};
pub use disambiguator::Disambiguator;
pub use generator::CandidateGenerator;
pub use paraphrase::normalize;
pub use pipeline::{IntentPipeline, PipelineServices, Resolution};
pub use pool::CandidatePoolBuilder;
pub use registry::{RegistrySynchronizer, SyncOutcome};
pub use types::{CandidatePool, DisambiguationResult, ParaphraseSet};
pub use validator::{HeuristicValidator, LabelValidator, LexiconTagger, PartOfSpeech, PosTagger};
