//! Semantic Similarity Scorer — cosine similarity of the two documents' embeddings,
//! mapped linearly from [-1, 1] onto [0, 100].

use std::time::Duration;

use crate::embedding::{EmbeddingError, EmbeddingProvider};

/// Cosine similarity, `None` when the vectors differ in length or either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f64> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

/// `(cosine + 1) / 2 * 100`, with the cosine clamped to [-1, 1] first.
pub fn similarity_to_score(cosine: f64) -> f64 {
    (cosine.clamp(-1.0, 1.0) + 1.0) / 2.0 * 100.0
}

/// Embeds both texts concurrently, each call bounded by `timeout`.
pub async fn semantic_score(
    provider: &dyn EmbeddingProvider,
    resume_text: &str,
    job_description: &str,
    timeout: Duration,
) -> Result<f64, EmbeddingError> {
    let (resume_vec, jd_vec) = tokio::try_join!(
        embed_with_timeout(provider, resume_text, timeout),
        embed_with_timeout(provider, job_description, timeout),
    )?;

    let cosine = cosine_similarity(&resume_vec, &jd_vec).ok_or_else(|| {
        EmbeddingError::Unavailable(format!(
            "incomparable vectors (dimensions {} and {}, or zero norm)",
            resume_vec.len(),
            jd_vec.len()
        ))
    })?;
    Ok(similarity_to_score(cosine))
}

async fn embed_with_timeout(
    provider: &dyn EmbeddingProvider,
    text: &str,
    timeout: Duration,
) -> Result<Vec<f32>, EmbeddingError> {
    if text.trim().is_empty() {
        return Err(EmbeddingError::Unavailable("empty text".to_string()));
    }
    tokio::time::timeout(timeout, provider.embed(text))
        .await
        .map_err(|_| EmbeddingError::Timeout(timeout))?
}
