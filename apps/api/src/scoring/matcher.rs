//! Keyword Matcher — checks each job-description keyword against the resume text.
//!
//! A job-description keyword is matched when some contiguous span of the resume's normalized
//! lemmas (no phrase break inside) shares its equivalence key: synonyms resolved, each word
//! Snowball-stemmed. "developing" and "development" meet at "develop". Spans are taken from the
//! token sequence rather than the resume's extracted keywords, so appending text to a resume
//! can only add matches.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

use crate::scoring::keywords::{DocumentRole, Keyword, KeywordSet, MAX_PHRASE_LEN};
use crate::scoring::normalizer::NormalizedText;
use crate::scoring::vocabulary::Vocabulary;

/// Outcome of matching. `matched` and `missing` partition the job-description set and keep
/// its order (descending importance).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub matched: Vec<Keyword>,
    pub missing: Vec<Keyword>,
    /// 0 – 100
    pub score: f64,
}

pub struct KeywordMatcher {
    stemmer: Stemmer,
}

impl KeywordMatcher {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// Synonym-resolved, stemmed form of a keyword.
    pub fn equivalence_key(&self, term: &str, vocabulary: &Vocabulary) -> String {
        vocabulary
            .canonical(term)
            .split(' ')
            .flat_map(|word| vocabulary.canonical(word).split(' '))
            .map(|word| {
                if word.chars().all(char::is_alphabetic) {
                    self.stemmer.stem(word).into_owned()
                } else {
                    word.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Equivalence keys of every unbroken span of the resume, up to the longest keyword length.
    fn span_keys(&self, resume: &NormalizedText, vocabulary: &Vocabulary) -> HashSet<String> {
        let tokens = resume.tokens();
        let max_len = MAX_PHRASE_LEN.max(vocabulary.max_skill_words());
        let mut keys = HashSet::new();

        for start in 0..tokens.len() {
            let mut span: Vec<&str> = Vec::with_capacity(max_len);
            for (offset, token) in tokens[start..].iter().take(max_len).enumerate() {
                if offset > 0 && token.break_before {
                    break;
                }
                span.push(token.lemma.as_str());
                keys.insert(self.equivalence_key(&span.join(" "), vocabulary));
            }
        }
        keys
    }

    pub fn match_sets(
        &self,
        resume: &NormalizedText,
        job_description: &KeywordSet,
        vocabulary: &Vocabulary,
    ) -> KeywordMatch {
        debug_assert_eq!(job_description.role(), DocumentRole::JobDescription);

        if job_description.is_empty() {
            return KeywordMatch {
                matched: vec![],
                missing: vec![],
                score: 100.0,
            };
        }

        let resume_keys = self.span_keys(resume, vocabulary);

        let (matched, missing): (Vec<Keyword>, Vec<Keyword>) = job_description
            .iter()
            .cloned()
            .partition(|kw| resume_keys.contains(&self.equivalence_key(&kw.term, vocabulary)));

        // fold, not sum: an empty f64 sum is -0.0
        let total = job_description.total_weight();
        let covered = matched.iter().fold(0.0, |acc, k| acc + k.weight);
        let score = if total > 0.0 {
            (covered / total * 100.0).clamp(0.0, 100.0)
        } else {
            100.0
        };

        KeywordMatch {
            matched,
            missing,
            score,
        }
    }
}
