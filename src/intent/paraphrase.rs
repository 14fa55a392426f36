use super::types::ParaphraseSet;

/// Drops paraphrases that only echo the utterance or an earlier paraphrase
/// (case-insensitive). First occurrence wins and order is kept, so the
/// generation prompt is reproducible for a given service response.
pub fn normalize<S: AsRef<str>>(utterance: &str, raw: &[S]) -> ParaphraseSet {
    let original = utterance.trim().to_lowercase();
    let mut seen: Vec<String> = Vec::with_capacity(raw.len());
    let mut entries = Vec::with_capacity(raw.len());

    for candidate in raw {
        let text = candidate.as_ref().trim();
        if text.is_empty() {
            continue;
        }
        let lower = text.to_lowercase();
        if lower == original || seen.contains(&lower) {
            continue;
        }
        seen.push(lower);
        entries.push(text.to_string());
    }

    ParaphraseSet { entries }
}
