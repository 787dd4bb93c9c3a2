//! Language processing capability: tokenization, stopword knowledge, lemmas and coarse
//! part-of-speech tags.
//!
//! The engine only talks to the `LanguageProcessor` trait. `RuleBasedProcessor` is the
//! default backend: deterministic, table-driven, no model files to load.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::scoring::vocabulary::Vocabulary;

/// Coarse tag. Only the distinctions the keyword extractor needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Numeral,
    /// Function words and generic qualifiers ("strong", "preferred", "year").
    Filler,
}

/// One token as produced by a language processor.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Case-folded surface form.
    pub text: String,
    pub lemma: String,
    pub pos: PartOfSpeech,
    pub is_stopword: bool,
    /// Punctuation or a line break separates this token from the previous one.
    pub break_before: bool,
}

/// Tokenize, tag and lemmatize. Implementations must be deterministic and thread-safe.
pub trait LanguageProcessor: Send + Sync {
    fn analyze(&self, text: &str) -> Vec<Token>;

    fn name(&self) -> &str;
}

/// NLTK English stopword list.
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn", "also", "etc", "e.g", "i.e",
    "via", "within", "across", "per", "us", "would", "could", "must", "may", "might",
];

/// Generic qualifiers that never make a useful keyword on their own.
const FILLER_WORDS: &[&str] = &[
    "strong", "excellent", "good", "great", "solid", "proven", "preferred", "required",
    "plus", "familiarity", "knowledge", "ability", "understanding", "proficiency", "related",
    "relevant", "equivalent", "various", "new", "year", "month", "day", "time", "level",
    "field", "similar", "least", "minimum", "like", "using", "well", "highly", "ideal",
];

/// Base forms of verbs common in resumes and job postings. Their regular inflections are
/// generated; irregular ones are listed in `IRREGULAR_VERBS`.
const VERBS: &[&str] = &[
    "require", "develop", "build", "lead", "manage", "use", "work", "implement", "design",
    "deploy", "maintain", "create", "collaborate", "participate", "improve", "integrate",
    "join", "look", "seek", "include", "provide", "support", "ensure", "write", "drive",
    "deliver", "help", "assist", "apply", "prefer", "know", "understand", "communicate",
    "optimize", "mentor", "review", "contribute", "partner", "enable", "ship", "launch",
    "establish", "reduce", "increase", "achieve", "grow", "own", "make", "take",
    "spearhead", "architect", "automate", "migrate", "scale", "refactor",
];

const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("led", "lead"),
    ("built", "build"),
    ("wrote", "write"),
    ("written", "write"),
    ("drove", "drive"),
    ("driven", "drive"),
    ("knew", "know"),
    ("known", "know"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("made", "make"),
    ("took", "take"),
    ("taken", "take"),
    ("shipped", "ship"),
    ("shipping", "ship"),
];

/// Nouns whose singular form the suffix rules would get wrong.
const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("analyses", "analysis"),
    ("bases", "base"),
    ("children", "child"),
    ("criteria", "criterion"),
    ("data", "data"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("services", "service"),
    ("databases", "database"),
    ("responsibilities", "responsibility"),
];

/// Default table-driven processor.
pub struct RuleBasedProcessor {
    token_pattern: Regex,
    possessive_pattern: Regex,
    stopwords: HashSet<&'static str>,
    fillers: HashSet<&'static str>,
    verb_forms: HashMap<String, &'static str>,
    irregular_nouns: HashMap<&'static str, &'static str>,
    protected: HashSet<String>,
}

impl RuleBasedProcessor {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let mut verb_forms: HashMap<String, &'static str> = VERBS
            .iter()
            .flat_map(|base| inflections(base).into_iter().map(move |form| (form, *base)))
            .collect();
        for (form, base) in IRREGULAR_VERBS {
            verb_forms.insert(form.to_string(), base);
        }

        Self {
            token_pattern: Regex::new(r"[\p{L}\p{N}](?:[\p{L}\p{N}]|[./_\-][\p{L}\p{N}])*[+#]*")
                .expect("static token pattern"),
            possessive_pattern: Regex::new(r"['’]s\b").expect("static possessive pattern"),
            stopwords: STOPWORDS.iter().copied().collect(),
            fillers: FILLER_WORDS.iter().copied().collect(),
            verb_forms,
            irregular_nouns: IRREGULAR_NOUNS.iter().copied().collect(),
            protected: vocabulary.protected_words().map(str::to_string).collect(),
        }
    }

    fn tag(&self, word: &str) -> (String, PartOfSpeech) {
        if word.starts_with(|c: char| c.is_ascii_digit()) {
            return (word.to_string(), PartOfSpeech::Numeral);
        }
        if self.protected.contains(word) {
            return (word.to_string(), PartOfSpeech::Noun);
        }
        if let Some(base) = self.verb_forms.get(word) {
            return (base.to_string(), PartOfSpeech::Verb);
        }
        let lemma = self
            .irregular_nouns
            .get(word)
            .map(|l| l.to_string())
            .unwrap_or_else(|| singularize(word));
        let pos = if self.fillers.contains(lemma.as_str()) || self.fillers.contains(word) {
            PartOfSpeech::Filler
        } else {
            PartOfSpeech::Noun
        };
        (lemma, pos)
    }
}

impl LanguageProcessor for RuleBasedProcessor {
    fn analyze(&self, text: &str) -> Vec<Token> {
        let folded = text.to_lowercase();
        let cleaned = self.possessive_pattern.replace_all(&folded, "");

        let mut tokens = Vec::new();
        let mut previous_end = 0;
        for m in self.token_pattern.find_iter(&cleaned) {
            let gap = &cleaned[previous_end..m.start()];
            let break_before = tokens.is_empty()
                || gap.chars().any(|c| c == '\n' || !c.is_whitespace());
            previous_end = m.end();

            let word = m.as_str();
            if self.stopwords.contains(word) {
                tokens.push(Token {
                    text: word.to_string(),
                    lemma: word.to_string(),
                    pos: PartOfSpeech::Filler,
                    is_stopword: true,
                    break_before,
                });
                continue;
            }

            let (lemma, pos) = self.tag(word);
            tokens.push(Token {
                text: word.to_string(),
                lemma,
                pos,
                is_stopword: false,
                break_before,
            });
        }
        tokens
    }

    fn name(&self) -> &str {
        "rule-based"
    }
}

/// Regular inflections of a base verb: -s, -ed, -ing.
fn inflections(base: &str) -> Vec<String> {
    let mut forms = vec![base.to_string()];
    let ends_consonant_y =
        base.ends_with('y') && !base[..base.len() - 1].ends_with(|c: char| "aeiou".contains(c));

    if ends_consonant_y {
        forms.push(format!("{}ies", &base[..base.len() - 1]));
        forms.push(format!("{}ied", &base[..base.len() - 1]));
    } else if base.ends_with(|c: char| c == 's' || c == 'x')
        || base.ends_with("sh")
        || base.ends_with("ch")
    {
        forms.push(format!("{base}es"));
        forms.push(format!("{base}ed"));
    } else {
        forms.push(format!("{base}s"));
        if base.ends_with('e') {
            forms.push(format!("{base}d"));
        } else {
            forms.push(format!("{base}ed"));
        }
    }

    if base.ends_with('e') && !base.ends_with("ee") {
        forms.push(format!("{}ing", &base[..base.len() - 1]));
    } else {
        forms.push(format!("{base}ing"));
    }
    forms
}

/// Suffix-rule noun lemmatizer.
fn singularize(word: &str) -> String {
    let len = word.chars().count();
    if len <= 3 || !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies") {
        if len > 4 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "ches", "shes", "xes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    // "analysis", "basis" keep their "is"; "apis" does not.
    let latin_is = word.ends_with("is") && len >= 5;
    if word.ends_with('s') && !word.ends_with("ss") && !word.ends_with("us") && !latin_is {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}
