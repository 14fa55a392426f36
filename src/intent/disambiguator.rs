use indexmap::IndexSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::types::{CandidatePool, DisambiguationResult};
use crate::error::ServiceResult;
use crate::services::ZeroShotClassificationService;

/// Picks one label for an utterance out of the fresh candidates plus every
/// label the bot already knows, so an equivalent known intent wins over a
/// new spelling of it.
pub struct Disambiguator {
    classifier: Arc<dyn ZeroShotClassificationService>,
}

impl Disambiguator {
    pub fn new(classifier: Arc<dyn ZeroShotClassificationService>) -> Self {
        Self { classifier }
    }

    /// Pool entries first, then known labels, duplicates removed.
    pub fn label_universe<'a, I>(pool: &CandidatePool, known: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut universe: IndexSet<String> = pool.candidates.iter().cloned().collect();
        universe.extend(known.into_iter().map(str::to_string));
        universe.into_iter().collect()
    }

    /// `None` when there is nothing to rank or the service ranked none of our labels.
    pub async fn select<'a, I>(
        &self,
        utterance: &str,
        pool: &CandidatePool,
        known: I,
    ) -> ServiceResult<Option<DisambiguationResult>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let labels = Self::label_universe(pool, known);
        if labels.is_empty() {
            return Ok(None);
        }

        let ranking = self.classifier.rank(utterance, &labels).await?;
        let mut ranked = ranking.into_iter().filter(|(label, _)| {
            let ours = labels.contains(label);
            if !ours {
                warn!(label = %label, "classifier ranked a label it was not given");
            }
            ours
        });

        let Some((label, top_score)) = ranked.next() else {
            return Ok(None);
        };
        let runner_up_score = ranked.next().map(|(_, score)| score);

        debug!(label = %label, top_score, ?runner_up_score, "disambiguated intent");
        Ok(Some(DisambiguationResult {
            label,
            top_score,
            runner_up_score,
        }))
    }
}
