//! Deterministic local embedding: signed feature hashing of word unigrams and bigrams.
//!
//! No model, no network. Texts sharing vocabulary land close together, which is enough to
//! keep the semantic factor meaningful when no endpoint is configured, and makes scores
//! reproducible in tests.

use async_trait::async_trait;

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// Matches all-MiniLM-L6-v2 so both backends produce vectors of the same shape.
pub const DEFAULT_DIMENSIONS: usize = 384;

const BIGRAM_WEIGHT: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimensions: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let folded = text.to_lowercase();
        let words: Vec<&str> = folded
            .split(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(EmbeddingError::Unavailable("no words to embed".to_string()));
        }

        let mut vector = vec![0.0_f32; self.dimensions];
        for word in &words {
            self.accumulate(&mut vector, word.as_bytes(), 1.0);
        }
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            self.accumulate(&mut vector, bigram.as_bytes(), BIGRAM_WEIGHT);
        }
        Ok(vector)
    }

    fn accumulate(&self, vector: &mut [f32], feature: &[u8], weight: f32) {
        let hash = fnv1a(feature);
        let slot = (hash % self.dimensions as u64) as usize;
        let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[slot] += sign * weight;
    }
}

impl Default for HashingEmbeddingProvider {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }

    fn backend(&self) -> &str {
        "hashing"
    }
}

/// 64-bit FNV-1a. Stable across platforms and releases, unlike `DefaultHasher`.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |hash, &b| (hash ^ u64::from(b)).wrapping_mul(PRIME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_text_same_vector() {
        let provider = HashingEmbeddingProvider::default();
        let a = provider.embed("Senior Python developer").await.unwrap();
        let b = provider.embed("Senior Python developer").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), DEFAULT_DIMENSIONS);
    }

    #[tokio::test]
    async fn test_case_is_folded() {
        let provider = HashingEmbeddingProvider::default();
        let a = provider.embed("RUST Engineer").await.unwrap();
        let b = provider.embed("rust engineer").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_empty_or_punctuation_only_is_unavailable() {
        let provider = HashingEmbeddingProvider::default();
        assert!(matches!(
            provider.embed("").await,
            Err(EmbeddingError::Unavailable(_))
        ));
        assert!(matches!(
            provider.embed(" ... !!! ").await,
            Err(EmbeddingError::Unavailable(_))
        ));
    }

    #[test]
    fn test_zero_dimensions_clamped_to_one() {
        let provider = HashingEmbeddingProvider::new(0);
        assert_eq!(provider.embed_sync("rust").unwrap().len(), 1);
    }

    #[test]
    fn test_fnv1a_known_value() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }
}
