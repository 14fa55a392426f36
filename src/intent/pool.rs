use std::sync::Arc;
use tracing::{debug, warn};

use super::generator::CandidateGenerator;
use super::types::{CandidatePool, ParaphraseSet};
use super::validator::LabelValidator;
use crate::error::ServiceResult;

/// Runs generate → validate for a fixed number of slots.
///
/// Each slot gets at most `max_attempts_per_slot` generator calls. A slot that
/// never passes keeps its last non-empty candidate (fail-open), so a build costs
/// at most `num_candidates * max_attempts_per_slot` calls whatever the model does.
pub struct CandidatePoolBuilder {
    generator: CandidateGenerator,
    validator: Arc<dyn LabelValidator>,
    num_candidates: usize,
    max_attempts_per_slot: usize,
}

impl CandidatePoolBuilder {
    pub fn new(
        generator: CandidateGenerator,
        validator: Arc<dyn LabelValidator>,
        num_candidates: usize,
        max_attempts_per_slot: usize,
    ) -> Self {
        Self {
            generator,
            validator,
            num_candidates,
            max_attempts_per_slot: max_attempts_per_slot.max(1),
        }
    }

    pub async fn build(&self, paraphrases: &ParaphraseSet) -> ServiceResult<CandidatePool> {
        let mut pool = CandidatePool::default();

        for slot in 0..self.num_candidates {
            let mut last_candidate: Option<String> = None;
            let mut accepted = false;

            for attempt in 1..=self.max_attempts_per_slot {
                let candidate = self.generator.generate(paraphrases).await?;
                pool.attempts += 1;

                if self.validator.is_valid(&candidate) {
                    debug!(slot, attempt, candidate = %candidate, "candidate accepted");
                    pool.insert(candidate);
                    accepted = true;
                    break;
                }
                debug!(slot, attempt, candidate = %candidate, "candidate rejected");
                if !candidate.is_empty() {
                    last_candidate = Some(candidate);
                }
            }

            if !accepted {
                pool.failed_open += 1;
                match last_candidate {
                    Some(candidate) => {
                        warn!(
                            slot,
                            attempts = self.max_attempts_per_slot,
                            candidate = %candidate,
                            "generation did not converge, keeping last candidate"
                        );
                        pool.insert(candidate);
                    }
                    None => warn!(slot, "generation did not converge and produced nothing usable"),
                }
            }
        }

        Ok(pool)
    }
}
