//! Keyword Extractor — weighted keyword sets from normalized text.
//!
//! Candidates are vocabulary skills (single or multi-word, matched longest-first) and
//! noun-phrase spans of up to `MAX_PHRASE_LEN` adjacent content tokens. Every token position
//! is claimed by at most one candidate, so a phrase never double counts the shorter phrases
//! it contains.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::scoring::language::PartOfSpeech;
use crate::scoring::normalizer::{NormalizedText, NormalizedToken};
use crate::scoring::vocabulary::Vocabulary;

/// Multiplier applied to vocabulary skills before normalization.
pub const SKILL_BOOST: f64 = 2.0;

/// Longest noun phrase kept as one keyword.
pub const MAX_PHRASE_LEN: usize = 3;

/// Shortest non-vocabulary token that can carry meaning on its own.
const MIN_CONTENT_CHARS: usize = 3;

const JOB_DESCRIPTION_NOISE: &[&str] = &[
    "candidate", "role", "team", "opportunity", "responsibility", "requirement",
    "qualification", "position", "company", "job", "applicant", "benefit", "salary",
    "description", "skill", "nice", "bonus", "etc",
];

const RESUME_NOISE: &[&str] = &[
    "email", "phone", "linkedin", "github.com", "present", "current", "reference", "summary",
    "objective", "page", "resume", "cv", "address", "inc", "llc", "ltd",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentRole {
    Resume,
    JobDescription,
}

impl DocumentRole {
    fn noise(self) -> &'static [&'static str] {
        match self {
            DocumentRole::Resume => RESUME_NOISE,
            DocumentRole::JobDescription => JOB_DESCRIPTION_NOISE,
        }
    }
}

/// A keyword and its importance within one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub term: String,
    pub weight: f64,
    pub is_skill: bool,
}

/// Keyword → weight for one document. Weights sum to 1.0 for a non-empty set; iteration is
/// by descending weight, ties in order of first occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordSet {
    role: DocumentRole,
    keywords: Vec<Keyword>,
}

impl KeywordSet {
    pub fn empty(role: DocumentRole) -> Self {
        Self {
            role,
            keywords: Vec::new(),
        }
    }

    pub fn role(&self) -> DocumentRole {
        self.role
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// The `n` most important keywords.
    pub fn top(&self, n: usize) -> Vec<Keyword> {
        self.keywords.iter().take(n).cloned().collect()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.term.as_str())
    }

    pub fn total_weight(&self) -> f64 {
        self.keywords.iter().map(|k| k.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// One occurrence of a candidate keyword.
struct Candidate {
    position: usize,
    term: String,
    is_skill: bool,
}

/// Derives the weighted keyword set for one document.
pub fn extract_keywords(
    text: &NormalizedText,
    role: DocumentRole,
    vocabulary: &Vocabulary,
) -> KeywordSet {
    if text.is_empty() {
        return KeywordSet::empty(role);
    }

    let tokens = text.tokens();
    let mut claimed = vec![false; tokens.len()];

    let mut candidates = skill_candidates(tokens, vocabulary, &mut claimed);
    candidates.extend(phrase_candidates(tokens, role, vocabulary, &claimed));
    candidates.sort_by_key(|c| c.position);

    weigh(candidates, role)
}

/// Pass 1: vocabulary skills, longest match first, never across a phrase break.
fn skill_candidates(
    tokens: &[NormalizedToken],
    vocabulary: &Vocabulary,
    claimed: &mut [bool],
) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let window = vocabulary.max_skill_words().min(tokens.len() - i);
        let hit = (1..=window).rev().find_map(|len| {
            if tokens[i + 1..i + len].iter().any(|t| t.break_before) {
                return None;
            }
            let term = join_lemmas(&tokens[i..i + len]);
            vocabulary.is_skill(&term).then_some((len, term))
        });

        match hit {
            Some((len, term)) => {
                claimed[i..i + len].iter_mut().for_each(|c| *c = true);
                found.push(Candidate {
                    position: i,
                    term,
                    is_skill: true,
                });
                i += len;
            }
            None => i += 1,
        }
    }
    found
}

/// Pass 2: runs of unclaimed content tokens, cut into spans of at most `MAX_PHRASE_LEN`.
fn phrase_candidates(
    tokens: &[NormalizedToken],
    role: DocumentRole,
    vocabulary: &Vocabulary,
    claimed: &[bool],
) -> Vec<Candidate> {
    let mut found = Vec::new();
    let mut run: Vec<usize> = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        let content = !claimed[i] && is_content(token, role);
        if token.break_before || !content {
            flush_run(tokens, &mut run, vocabulary, &mut found);
        }
        if content {
            run.push(i);
        }
    }
    flush_run(tokens, &mut run, vocabulary, &mut found);
    found
}

fn flush_run(
    tokens: &[NormalizedToken],
    run: &mut Vec<usize>,
    vocabulary: &Vocabulary,
    found: &mut Vec<Candidate>,
) {
    for span in run.chunks(MAX_PHRASE_LEN) {
        let term = span
            .iter()
            .map(|&i| tokens[i].lemma.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        found.push(Candidate {
            position: span[0],
            is_skill: vocabulary.is_skill(&term),
            term,
        });
    }
    run.clear();
}

fn is_content(token: &NormalizedToken, role: DocumentRole) -> bool {
    token.pos == PartOfSpeech::Noun
        && token.lemma.chars().count() >= MIN_CONTENT_CHARS
        && token.lemma.chars().any(char::is_alphabetic)
        && !role.noise().contains(&token.lemma.as_str())
}

fn join_lemmas(tokens: &[NormalizedToken]) -> String {
    tokens
        .iter()
        .map(|t| t.lemma.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Frequency weighting with the skill boost, renormalized to sum to 1.0.
fn weigh(candidates: Vec<Candidate>, role: DocumentRole) -> KeywordSet {
    if candidates.is_empty() {
        return KeywordSet::empty(role);
    }

    let total_occurrences = candidates.len() as f64;
    let mut keywords: Vec<Keyword> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for candidate in candidates {
        match index.get(&candidate.term) {
            Some(&i) => keywords[i].weight += 1.0,
            None => {
                index.insert(candidate.term.clone(), keywords.len());
                keywords.push(Keyword {
                    term: candidate.term,
                    weight: 1.0,
                    is_skill: candidate.is_skill,
                });
            }
        }
    }

    for keyword in &mut keywords {
        let boost = if keyword.is_skill { SKILL_BOOST } else { 1.0 };
        keyword.weight = keyword.weight / total_occurrences * boost;
    }
    let sum: f64 = keywords.iter().map(|k| k.weight).sum();
    for keyword in &mut keywords {
        keyword.weight /= sum;
    }

    // Stable sort keeps first-occurrence order among equal weights.
    keywords.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    KeywordSet { role, keywords }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::language::RuleBasedProcessor;
    use crate::scoring::normalizer::normalize;

    fn has(set: &KeywordSet, term: &str) -> bool {
        set.terms().any(|t| t == term)
    }

    fn weight(set: &KeywordSet, term: &str) -> f64 {
        set.iter().find(|k| k.term == term).unwrap().weight
    }

    fn extract(text: &str, role: DocumentRole) -> KeywordSet {
        let vocab = Vocabulary::builtin();
        let processor = RuleBasedProcessor::new(&vocab);
        extract_keywords(&normalize(text, &processor), role, &vocab)
    }

    #[test]
    fn test_weights_sum_to_one() {
        let set = extract(
            "Python developer with Docker, Kubernetes and machine learning experience",
            DocumentRole::Resume,
        );
        assert!(!set.is_empty());
        assert!((set.total_weight() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_multiword_skill_claims_its_tokens() {
        let set = extract("machine learning engineer", DocumentRole::JobDescription);
        assert!(has(&set, "machine learning"));
        assert!(has(&set, "engineer"));
        assert!(!has(&set, "machine learning engineer"));
        assert!(!has(&set, "learning engineer"));
    }

    #[test]
    fn test_noun_phrase_up_to_three_tokens() {
        let set = extract("Bachelor degree in computer science", DocumentRole::Resume);
        assert!(has(&set, "bachelor degree"));
        assert!(has(&set, "computer science"));
    }

    #[test]
    fn test_long_runs_are_cut_without_overlap() {
        let set = extract("alpha bravo charlie delta echo", DocumentRole::Resume);
        let terms: Vec<&str> = set.terms().collect();
        assert_eq!(terms, vec!["alpha bravo charlie", "delta echo"]);
    }

    #[test]
    fn test_punctuation_separates_list_items() {
        let set = extract("Python, Java, Rust", DocumentRole::Resume);
        let terms: Vec<&str> = set.terms().collect();
        assert_eq!(terms, vec!["python", "java", "rust"]);
    }

    #[test]
    fn test_skills_are_boosted_over_plain_nouns() {
        let set = extract("python. architecture.", DocumentRole::JobDescription);
        let python = weight(&set, "python");
        let architecture = weight(&set, "architecture");
        assert!((python - 2.0 * architecture).abs() < 1e-9);
        assert_eq!(set.iter().next().unwrap().term, "python");
    }

    #[test]
    fn test_frequency_raises_weight() {
        let set = extract("cloud. cloud. budget.", DocumentRole::JobDescription);
        assert!(weight(&set, "cloud") > weight(&set, "budget"));
    }

    #[test]
    fn test_ties_keep_first_occurrence_order() {
        let set = extract("zebra. apple. mango.", DocumentRole::Resume);
        let terms: Vec<&str> = set.terms().collect();
        assert_eq!(terms, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_role_noise_is_dropped() {
        let jd = extract("Candidate. Team. Kafka.", DocumentRole::JobDescription);
        assert_eq!(jd.terms().collect::<Vec<_>>(), vec!["kafka"]);

        let resume = extract("Email. Phone. Kafka.", DocumentRole::Resume);
        assert_eq!(resume.terms().collect::<Vec<_>>(), vec!["kafka"]);
    }

    #[test]
    fn test_verbs_numbers_and_fillers_are_not_keywords() {
        let set = extract("Requires 3+ years strong Python", DocumentRole::JobDescription);
        assert_eq!(set.terms().collect::<Vec<_>>(), vec!["python"]);
    }

    #[test]
    fn test_empty_text_gives_empty_set() {
        let set = extract("", DocumentRole::Resume);
        assert!(set.is_empty());
        assert_eq!(set.role(), DocumentRole::Resume);
        assert_eq!(set.total_weight(), 0.0);
    }
}
