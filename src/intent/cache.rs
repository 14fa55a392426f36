use indexmap::{IndexMap, IndexSet};

/// Label → action text. One entry per label, last write wins, nothing expires.
///
/// Its job is to make sure a label is resolved against the action source at
/// most once per process, not to save memory.
#[derive(Debug, Clone, Default)]
pub struct IntentCache {
    entries: IndexMap<String, String>,
}

impl IntentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries.get(label).map(String::as_str)
    }

    /// Returns the action that was replaced, if any.
    pub fn store(&mut self, label: impl Into<String>, action: impl Into<String>) -> Option<String> {
        self.entries.insert(label.into(), action.into())
    }

    pub fn remove(&mut self, label: &str) -> Option<String> {
        self.entries.shift_remove(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Per-bot state handed to every pipeline run: the cache plus labels that are
/// known up front but have no cached action yet.
#[derive(Debug, Clone, Default)]
pub struct IntentContext {
    pub cache: IntentCache,
    seeds: IndexSet<String>,
}

impl IntentContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seeds<I, S>(seeds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cache: IntentCache::new(),
            seeds: seeds.into_iter().map(Into::into).collect(),
        }
    }

    /// Seeds first, then cached labels, each label once.
    pub fn known_labels(&self) -> impl Iterator<Item = &str> {
        let seeds = &self.seeds;
        seeds
            .iter()
            .map(String::as_str)
            .chain(self.cache.labels().filter(move |l| !seeds.contains(*l)))
    }

    pub fn has_known_intents(&self) -> bool {
        !self.seeds.is_empty() || !self.cache.is_empty()
    }

    /// Drops a label from both the seeds and the cache.
    pub fn forget(&mut self, label: &str) -> bool {
        let seeded = self.seeds.shift_remove(label);
        self.cache.remove(label).is_some() || seeded
    }
}
