//! Heuristic acceptance test for generated labels.
//!
//! A label should read as a short verb-led action ("know weather", "get dog"),
//! never as a question. The tagging backend is behind [`PosTagger`] so the
//! retry loop does not care which one is in use.

/// Question words and auxiliaries that mark a candidate as a question.
pub const QUESTION_WORDS: [&str; 16] = [
    "who", "what", "when", "where", "why", "which", "whom", "whose", "how", "am", "is", "are",
    "will", "ever", "was", "were",
];

pub trait LabelValidator: Send + Sync {
    fn is_valid(&self, candidate: &str) -> bool;
}

/// Universal part-of-speech tags, the subset the lexicon tagger can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartOfSpeech {
    Verb,
    Aux,
    ProperNoun,
    Noun,
    Adjective,
    Adverb,
    Pronoun,
    Determiner,
    Adposition,
    Conjunction,
    Particle,
    Interjection,
    Numeral,
    Punctuation,
}

pub trait PosTagger: Send + Sync {
    /// One tag per token, same order.
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech>;
}

/// Contractions split off as their own token ("what's" -> "what" "'s").
const CLITICS: [&str; 7] = ["n't", "'s", "'re", "'ll", "'ve", "'d", "'m"];

/// Splits on whitespace and emits punctuation as standalone tokens.
/// Hyphens stay inside words ("e-mail"); apostrophes do too unless they
/// start a clitic, which becomes a token of its own.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        let splits = c.is_ascii_punctuation() && c != '\'' && c != '-';
        if c.is_whitespace() || splits {
            if let Some(s) = start.take() {
                push_word(&mut tokens, &text[s..i]);
            }
            if splits {
                tokens.push(&text[i..i + c.len_utf8()]);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        push_word(&mut tokens, &text[s..]);
    }
    tokens
}

fn push_word<'t>(tokens: &mut Vec<&'t str>, word: &'t str) {
    let clitic = CLITICS.iter().find(|c| {
        word.len() > c.len()
            && word.is_char_boundary(word.len() - c.len())
            && word[word.len() - c.len()..].eq_ignore_ascii_case(c)
    });
    match clitic {
        Some(c) => {
            let (stem, tail) = word.split_at(word.len() - c.len());
            tokens.push(stem);
            tokens.push(tail);
        }
        None => tokens.push(word),
    }
}

const AUXILIARIES: &[&str] = &[
    "am", "is", "are", "was", "were", "be", "been", "being", "do", "does", "did", "have", "has",
    "had", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];
const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "every", "each", "no", "all",
];
const PRONOUNS: &[&str] = &[
    "i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them", "who", "what", "whom",
    "whose", "which", "something", "anything", "everything", "nothing",
];
const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "of", "for", "to", "with", "from", "by", "about", "into", "over", "under",
    "after", "before", "between", "through", "during", "without", "near",
];
const CONJUNCTIONS: &[&str] = &[
    "and", "or", "but", "nor", "if", "because", "while", "although", "since", "unless", "whether",
];
const PARTICLES: &[&str] = &["not", "n't", "'s", "'re", "'ll", "'ve", "'d", "'m"];
const INTERJECTIONS: &[&str] = &["hello", "hi", "hey", "please", "thanks", "yes", "ok", "okay"];
const ADVERBS: &[&str] = &["how", "when", "where", "why", "ever", "never", "very", "also", "just", "now"];

/// Base forms of verbs that commonly head an intent label.
const VERBS: &[&str] = &[
    "know", "get", "learn", "bake", "play", "buy", "find", "make", "take", "go", "see", "watch",
    "listen", "book", "order", "cook", "check", "set", "turn", "call", "send", "read", "write",
    "open", "close", "start", "stop", "show", "tell", "ask", "give", "search", "look", "help",
    "plan", "travel", "visit", "pay", "eat", "drink", "fix", "create", "delete", "update",
    "change", "cancel", "schedule", "reserve", "rent", "sell", "move", "build", "study", "teach",
    "improve", "compare", "choose", "pick", "use", "install", "download", "share", "track",
    "locate", "contact", "email", "clean", "wash", "grow", "train", "run", "walk", "drive", "fly",
    "ride", "hire", "apply", "register", "prepare", "brew", "hear", "feel", "add", "remove",
    "lose", "save", "keep", "try", "wake", "remind", "convert", "translate", "measure",
];

/// Dictionary-and-suffix tagger. Crude, but it only has to judge the first
/// word of a two-to-five word label.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    fn tag_one(&self, token: &str) -> PartOfSpeech {
        if token.chars().all(|c| c.is_ascii_punctuation()) {
            return PartOfSpeech::Punctuation;
        }
        if token.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return PartOfSpeech::Numeral;
        }

        let lower = token.to_lowercase();
        let word = lower.as_str();
        let closed_classes: [(&[&str], PartOfSpeech); 8] = [
            (AUXILIARIES, PartOfSpeech::Aux),
            (DETERMINERS, PartOfSpeech::Determiner),
            (PRONOUNS, PartOfSpeech::Pronoun),
            (ADPOSITIONS, PartOfSpeech::Adposition),
            (CONJUNCTIONS, PartOfSpeech::Conjunction),
            (PARTICLES, PartOfSpeech::Particle),
            (INTERJECTIONS, PartOfSpeech::Interjection),
            (ADVERBS, PartOfSpeech::Adverb),
        ];
        for (words, tag) in closed_classes {
            if words.contains(&word) {
                return tag;
            }
        }
        if VERBS.contains(&word) {
            return PartOfSpeech::Verb;
        }
        if token.chars().next().is_some_and(|c| c.is_uppercase()) {
            return PartOfSpeech::ProperNoun;
        }

        Self::tag_by_suffix(word)
    }

    fn tag_by_suffix(word: &str) -> PartOfSpeech {
        let ends = |suffixes: &[&str]| suffixes.iter().any(|s| word.len() > s.len() + 1 && word.ends_with(s));

        if ends(&["ly"]) {
            PartOfSpeech::Adverb
        } else if ends(&["ize", "ise", "ify", "ed", "ing"]) {
            PartOfSpeech::Verb
        } else if ends(&["tion", "sion", "ment", "ness", "ity", "ance", "ence", "ship", "ism", "ist"]) {
            PartOfSpeech::Noun
        } else if ends(&["ful", "ous", "ive", "able", "ible", "less", "ical"]) {
            PartOfSpeech::Adjective
        } else {
            PartOfSpeech::Noun
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[&str]) -> Vec<PartOfSpeech> {
        tokens.iter().map(|t| self.tag_one(t)).collect()
    }
}

/// Rejects candidates that are too short, read as questions, or do not start
/// with a verb, auxiliary or proper noun.
#[derive(Debug, Clone, Default)]
pub struct HeuristicValidator<T: PosTagger = LexiconTagger> {
    tagger: T,
}

impl<T: PosTagger> HeuristicValidator<T> {
    pub fn with_tagger(tagger: T) -> Self {
        Self { tagger }
    }
}

impl HeuristicValidator<LexiconTagger> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: PosTagger> LabelValidator for HeuristicValidator<T> {
    fn is_valid(&self, candidate: &str) -> bool {
        let tokens = tokenize(candidate);
        if tokens.len() < 2 {
            return false;
        }
        if tokens
            .iter()
            .any(|t| QUESTION_WORDS.contains(&t.to_lowercase().as_str()))
        {
            return false;
        }

        matches!(
            self.tagger.tag(&tokens[..1]).first(),
            Some(PartOfSpeech::Verb | PartOfSpeech::Aux | PartOfSpeech::ProperNoun)
        )
    }
}
