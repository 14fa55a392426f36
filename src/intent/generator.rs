use std::sync::Arc;
use tracing::debug;

use super::types::ParaphraseSet;
use crate::error::ServiceResult;
use crate::services::GenerativeLanguageService;

/// Structural marker the model tends to echo back when it runs past the answer.
pub const PROMPT_MARKER: &str = "input";

const FEW_SHOT_PROMPT: &str = "input:
0: What weather will we have tomorrow?
1: What is tomorrow's weather?
2: What is the weather of tomorrow?
3: What will be the weather tomorrow?
4: What are your forecasts for the weather tomorrow?

output: know weather

input:
0: Where can I get dog?
1: Where can I find dogs?
2: Where should I buy a dog?
3: Where and how do I buy a puppy?
4: How can I buy a dog?

output: get dog

input:
0: What are the best 4 tracks for data science?
1: What are the best course choices for starting data science career?
2: What should I learn to do in data science?
3: What kind of courses do you recommend to get started with in data science?
4: What courses should I take to get started in data science?

output: learn data science

input:
";

/// Few-shot prompt ending right where the model should write the label.
pub fn build_prompt(paraphrases: &ParaphraseSet) -> String {
    format!("{}{}\n\noutput:", FEW_SHOT_PROMPT, paraphrases)
}

/// Reduces a raw continuation to a bare label candidate.
pub fn clean_continuation(prompt: &str, raw: &str) -> String {
    let text = raw.strip_prefix(prompt).unwrap_or(raw);
    let first_line = text.split('\n').next().unwrap_or_default();
    let unmarked = first_line.replace(PROMPT_MARKER, "");
    unmarked
        .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
        .to_string()
}

/// Asks the language model for one label candidate per call. Sampling makes
/// repeated calls differ; nothing is cached here.
pub struct CandidateGenerator {
    llm: Arc<dyn GenerativeLanguageService>,
    max_new_tokens: usize,
}

impl CandidateGenerator {
    pub fn new(llm: Arc<dyn GenerativeLanguageService>, max_new_tokens: usize) -> Self {
        Self { llm, max_new_tokens }
    }

    pub async fn generate(&self, paraphrases: &ParaphraseSet) -> ServiceResult<String> {
        let prompt = build_prompt(paraphrases);
        let raw = self.llm.complete(&prompt, self.max_new_tokens).await?;
        let candidate = clean_continuation(&prompt, &raw);
        debug!(raw = %raw.escape_debug(), candidate = %candidate, "generated intent candidate");
        Ok(candidate)
    }
}
