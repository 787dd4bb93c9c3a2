//! Normalizer — raw text to the lemma sequence every downstream stage consumes.

use crate::scoring::language::{LanguageProcessor, PartOfSpeech};
use crate::scoring::ScoringError;

/// A lemma that survived stopword and punctuation removal.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedToken {
    pub lemma: String,
    pub pos: PartOfSpeech,
    /// A removed stopword, punctuation mark or line break preceded this token, so it cannot
    /// continue a phrase started by the previous one.
    pub break_before: bool,
}

/// Ordered, case-folded lemma tokens with stopwords removed. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    tokens: Vec<NormalizedToken>,
}

impl NormalizedText {
    pub fn tokens(&self) -> &[NormalizedToken] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Rejects a request only when both documents carry no text at all. A single empty field is
/// scored as zero information for that field.
pub fn ensure_scorable(resume_text: &str, job_description: &str) -> Result<(), ScoringError> {
    if resume_text.trim().is_empty() && job_description.trim().is_empty() {
        return Err(ScoringError::EmptyInput);
    }
    Ok(())
}

/// Tokenize, fold case, strip punctuation, drop stopwords, lemmatize.
pub fn normalize(text: &str, processor: &dyn LanguageProcessor) -> NormalizedText {
    let mut tokens: Vec<NormalizedToken> = Vec::new();
    let mut pending_break = false;

    for token in processor.analyze(text) {
        if token.is_stopword || token.lemma.is_empty() {
            pending_break = true;
            continue;
        }
        tokens.push(NormalizedToken {
            break_before: tokens.is_empty() || token.break_before || pending_break,
            lemma: token.lemma,
            pos: token.pos,
        });
        pending_break = false;
    }

    NormalizedText { tokens }
}
