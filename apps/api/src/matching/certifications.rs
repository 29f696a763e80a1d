//! Certification Matcher: name alignment via the Skill Matcher plus a score gate.
//!
//! Scores are compared as raw numbers. A TOEIC 850 and an IELTS 7.5 are not
//! rescaled; a letter grade such as "B2" coerces to 0.

use serde_json::Value;

use crate::matching::embedding::{EmbeddingError, EmbeddingProvider};
use crate::matching::models::{Certification, CertificationMatch};
use crate::matching::skills::match_skills;

pub async fn match_certifications(
    embedder: &dyn EmbeddingProvider,
    candidate_certs: &[Certification],
    requirement_certs: &[Certification],
    threshold: f32,
) -> Result<Vec<CertificationMatch>, EmbeddingError> {
    if candidate_certs.is_empty() || requirement_certs.is_empty() {
        return Ok(Vec::new());
    }

    let candidate_names: Vec<String> = candidate_certs.iter().map(|c| c.name.clone()).collect();
    let requirement_names: Vec<String> =
        requirement_certs.iter().map(|c| c.name.clone()).collect();

    let name_matches =
        match_skills(embedder, &candidate_names, &requirement_names, threshold).await?;

    let matches = name_matches
        .into_iter()
        .filter_map(|m| {
            // First occurrence wins when two certifications share a name.
            let candidate = first_named(candidate_certs, &m.candidate_skill)?;
            let requirement = first_named(requirement_certs, &m.requirement_skill)?;

            let candidate_score = parse_score(candidate.score.as_ref());
            let requirement_score = parse_score(requirement.score.as_ref());

            Some(CertificationMatch {
                requirement_cert: m.requirement_skill,
                candidate_cert: m.candidate_skill,
                requirement_score,
                candidate_score,
                is_match: m.is_match && candidate_score >= requirement_score,
            })
        })
        .collect();

    Ok(matches)
}

fn first_named<'a>(certs: &'a [Certification], name: &str) -> Option<&'a Certification> {
    certs.iter().find(|c| c.name == name)
}

/// Numbers pass through; numeric strings are parsed; everything else is 0.
pub fn parse_score(score: Option<&Value>) -> f64 {
    let parsed = match score {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}
