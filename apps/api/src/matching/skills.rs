//! Skill Matcher: best-match semantic alignment of candidate skills.
//!
//! Greedy per-row argmax over the candidate × requirement similarity matrix.
//! Several candidate skills may pick the same requirement; there is no 1:1
//! assignment.

use tracing::debug;

use crate::matching::embedding::{EmbeddingError, EmbeddingProvider};
use crate::matching::models::SkillMatch;
use crate::matching::normalize::normalize_text;

pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.6;

/// Returns one `SkillMatch` per candidate skill, in candidate order.
///
/// Empty when either side is empty. `is_match` is decided on the unrounded
/// similarity; the reported similarity is rounded to 3 decimals.
pub async fn match_skills(
    embedder: &dyn EmbeddingProvider,
    candidate_skills: &[String],
    requirement_skills: &[String],
    threshold: f32,
) -> Result<Vec<SkillMatch>, EmbeddingError> {
    if candidate_skills.is_empty() || requirement_skills.is_empty() {
        return Ok(Vec::new());
    }

    let candidate_norm: Vec<String> = candidate_skills.iter().map(|s| normalize_text(s)).collect();
    let requirement_norm: Vec<String> =
        requirement_skills.iter().map(|s| normalize_text(s)).collect();

    let (candidate_vecs, requirement_vecs) = tokio::try_join!(
        embed_batch(embedder, &candidate_norm),
        embed_batch(embedder, &requirement_norm),
    )?;

    let matches: Vec<SkillMatch> = candidate_skills
        .iter()
        .zip(&candidate_vecs)
        .map(|(candidate, candidate_vec)| {
            let row: Vec<f32> = requirement_vecs
                .iter()
                .map(|requirement_vec| embedder.similarity(candidate_vec, requirement_vec))
                .collect();
            let (best_idx, best_score) = argmax_first(&row);

            SkillMatch {
                candidate_skill: candidate.clone(),
                requirement_skill: requirement_skills[best_idx].clone(),
                is_match: best_score >= threshold,
                similarity: round_similarity(best_score),
            }
        })
        .collect();

    debug!(
        "Matched {} candidate skills against {} requirements ({} above threshold)",
        candidate_skills.len(),
        requirement_skills.len(),
        matches.iter().filter(|m| m.is_match).count()
    );

    Ok(matches)
}

/// Embeds one batch and holds the provider to its one-vector-per-input contract.
async fn embed_batch(
    embedder: &dyn EmbeddingProvider,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let vectors = embedder.embed(texts).await?;
    if vectors.len() != texts.len() {
        return Err(EmbeddingError::BatchSize {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }
    Ok(vectors)
}

/// Index and value of the maximum; ties keep the earliest index.
/// `row` must be non-empty.
fn argmax_first(row: &[f32]) -> (usize, f32) {
    let mut best_idx = 0;
    let mut best = row[0];
    for (idx, &value) in row.iter().enumerate().skip(1) {
        if value > best {
            best_idx = idx;
            best = value;
        }
    }
    (best_idx, best)
}

fn round_similarity(value: f32) -> f64 {
    (f64::from(value) * 1000.0).round() / 1000.0
}
