//! Score Aggregator: runs the three category matchers and folds them into one
//! `MatchResult`.
//!
//! Never fails. A category whose matcher errors is settled as an empty match
//! list (logged at warn) and the other categories are scored as usual.

use std::sync::Arc;

use tracing::{info, warn};

use crate::matching::certifications::match_certifications;
use crate::matching::embedding::{EmbeddingError, EmbeddingProvider};
use crate::matching::experience::{match_experience, recognized_levels};
use crate::matching::models::{
    CandidateProfile, CategoryScore, MatchDetails, MatchResult, RequirementProfile,
};
use crate::matching::skills::match_skills;

/// Matches candidate profiles against requirement profiles with one shared,
/// read-only embedding provider.
#[derive(Clone)]
pub struct ProfileMatcher {
    embedder: Arc<dyn EmbeddingProvider>,
    threshold: f32,
}

impl ProfileMatcher {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
        }
    }

    pub fn embedder(&self) -> &dyn EmbeddingProvider {
        self.embedder.as_ref()
    }

    pub async fn match_profiles(
        &self,
        candidate: &CandidateProfile,
        requirement: &RequirementProfile,
    ) -> MatchResult {
        let candidate_skills: Vec<String> = candidate
            .skills
            .iter()
            .map(|s| strip_descriptor(s).to_string())
            .collect();

        let (skills_outcome, certs_outcome) = tokio::join!(
            match_skills(
                self.embedder(),
                &candidate_skills,
                &requirement.skills,
                self.threshold,
            ),
            match_certifications(
                self.embedder(),
                &candidate.certifications,
                &requirement.certifications,
                self.threshold,
            ),
        );
        let skills_detail = settle("skills", skills_outcome);
        let certs_detail = settle("certifications", certs_outcome);
        let exp_detail = match_experience(&candidate.experience_level, &requirement.experience_levels);

        let skill_score = CategoryScore::new(
            skills_detail.iter().filter(|m| m.is_match).count(),
            requirement.skills.len(),
        );
        let cert_score = CategoryScore::new(
            certs_detail.iter().filter(|m| m.is_match).count(),
            requirement.certifications.len(),
        );
        let exp_total = usize::from(!recognized_levels(&requirement.experience_levels).is_empty());
        let exp_score = CategoryScore::new(usize::from(exp_detail.is_match && exp_total > 0), exp_total);

        let overall_score = overall_score(&[skill_score, cert_score, exp_score]);

        info!(
            "Match scored {overall_score}: skills={skill_score} certs={cert_score} exp={exp_score}"
        );

        MatchResult {
            overall_score,
            details: MatchDetails {
                skill_score,
                cert_score,
                exp_score,
                exp_match: exp_detail.is_match,
                exp_detail,
                skills_detail,
                certs_detail,
            },
        }
    }
}

/// `"Python (programming language)"` → `"Python"`. Only the first `" ("` counts.
pub fn strip_descriptor(skill: &str) -> &str {
    skill.split_once(" (").map_or(skill, |(head, _)| head)
}

fn settle<T>(category: &str, outcome: Result<Vec<T>, EmbeddingError>) -> Vec<T> {
    outcome.unwrap_or_else(|e| {
        warn!("{category} matching degraded to empty: {e}");
        Vec::new()
    })
}

/// Unweighted mean of the categories that have requirement items, rounded to
/// 3 decimals. 0.0 when none do.
fn overall_score(categories: &[CategoryScore]) -> f64 {
    let ratios: Vec<f64> = categories.iter().filter_map(CategoryScore::ratio).collect();
    if ratios.is_empty() {
        return 0.0;
    }
    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    (mean * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::embedding::test_support::{FailingEmbedder, FixedEmbedder};
    use crate::matching::embedding::HashedEmbedder;
    use crate::matching::models::Certification;
    use serde_json::json;

    fn hashed_matcher() -> ProfileMatcher {
        ProfileMatcher::new(Arc::new(HashedEmbedder::default()), 0.6)
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_strip_descriptor() {
        assert_eq!(strip_descriptor("Python (language)"), "Python");
        assert_eq!(strip_descriptor("SQL"), "SQL");
        assert_eq!(strip_descriptor("C (C99) (embedded)"), "C");
        assert_eq!(strip_descriptor("Node(js)"), "Node(js)");
    }

    #[test]
    fn test_overall_score_skips_empty_categories() {
        let score = overall_score(&[
            CategoryScore::new(1, 2),
            CategoryScore::new(0, 0),
            CategoryScore::new(1, 1),
        ]);
        assert_eq!(score, 0.75);
    }

    #[test]
    fn test_overall_score_all_empty_is_zero() {
        assert_eq!(overall_score(&[CategoryScore::new(0, 0); 3]), 0.0);
    }

    #[test]
    fn test_overall_score_rounds_to_three_decimals() {
        let score = overall_score(&[CategoryScore::new(1, 3), CategoryScore::new(0, 0)]);
        assert_eq!(score, 0.333);
    }

    #[tokio::test]
    async fn test_skills_only_score_equals_skill_ratio() {
        let cv = CandidateProfile {
            skills: strings(&["Python (language)", "SQL (tool)"]),
            ..Default::default()
        };
        let jd = RequirementProfile {
            skills: strings(&["python", "java"]),
            ..Default::default()
        };

        let result = hashed_matcher().match_profiles(&cv, &jd).await;

        assert_eq!(result.details.skills_detail.len(), 2);
        assert_eq!(result.details.skills_detail[0].candidate_skill, "Python");
        assert_eq!(result.details.skills_detail[0].requirement_skill, "python");
        assert!(result.details.skills_detail[0].is_match);
        assert_eq!(result.details.skills_detail[1].candidate_skill, "SQL");
        assert!(result.details.skill_score.matched >= 1);
        assert_eq!(result.details.skill_score.total, 2);
        assert_eq!(result.details.cert_score.to_string(), "0/0");
        assert_eq!(result.details.exp_score.to_string(), "0/0");
        assert_eq!(
            result.overall_score,
            result.details.skill_score.ratio().unwrap()
        );
    }

    #[tokio::test]
    async fn test_experience_example() {
        let cv = CandidateProfile {
            experience_level: "Associate".to_string(),
            ..Default::default()
        };
        let jd = RequirementProfile {
            experience_levels: strings(&["Entry level", "Mid-Senior level"]),
            ..Default::default()
        };

        let result = hashed_matcher().match_profiles(&cv, &jd).await;

        assert!(result.details.exp_match);
        assert!(result.details.exp_detail.is_match);
        assert_eq!(result.details.exp_score.to_string(), "1/1");
        assert_eq!(result.overall_score, 1.0);
    }

    #[tokio::test]
    async fn test_unrecognized_requirement_levels_are_excluded_from_mean() {
        let cv = CandidateProfile {
            skills: strings(&["rust"]),
            experience_level: "Director".to_string(),
            ..Default::default()
        };
        let jd = RequirementProfile {
            skills: strings(&["rust"]),
            experience_levels: strings(&["Wizard"]),
            ..Default::default()
        };

        let result = hashed_matcher().match_profiles(&cv, &jd).await;

        assert_eq!(result.details.exp_score.to_string(), "0/0");
        assert!(!result.details.exp_match);
        assert_eq!(result.overall_score, 1.0);
    }

    #[tokio::test]
    async fn test_all_categories_combined() {
        let cv = CandidateProfile {
            skills: strings(&["Rust (systems)", "Docker"]),
            certifications: vec![Certification::new("TOEIC", 850)],
            experience_level: "Entry level".to_string(),
        };
        let jd = RequirementProfile {
            skills: strings(&["rust", "docker", "kubernetes", "terraform"]),
            certifications: vec![Certification::new("TOEIC", 900)],
            experience_levels: strings(&["Mid-Senior level"]),
        };

        let result = hashed_matcher().match_profiles(&cv, &jd).await;

        assert_eq!(result.details.skill_score.to_string(), "2/4");
        assert_eq!(result.details.cert_score.to_string(), "0/1");
        assert_eq!(result.details.exp_score.to_string(), "0/1");
        // (0.5 + 0 + 0) / 3
        assert_eq!(result.overall_score, 0.167);
    }

    #[tokio::test]
    async fn test_nothing_required_scores_zero() {
        let cv = CandidateProfile {
            skills: strings(&["rust"]),
            ..Default::default()
        };
        let result = hashed_matcher()
            .match_profiles(&cv, &RequirementProfile::default())
            .await;
        assert_eq!(result.overall_score, 0.0);
        assert!(result.details.skills_detail.is_empty());
    }

    #[tokio::test]
    async fn test_greedy_overcount_keeps_score_within_one() {
        let cv = CandidateProfile {
            skills: strings(&["rust", "Rust (language)", "RUST"]),
            ..Default::default()
        };
        let jd = RequirementProfile {
            skills: strings(&["rust", "haskell"]),
            ..Default::default()
        };

        let result = hashed_matcher().match_profiles(&cv, &jd).await;

        assert_eq!(result.details.skill_score.to_string(), "3/2");
        assert_eq!(result.overall_score, 1.0);
    }

    #[tokio::test]
    async fn test_provider_failure_degrades_per_category() {
        let matcher = ProfileMatcher::new(Arc::new(FailingEmbedder), 0.6);
        let cv = CandidateProfile {
            skills: strings(&["rust"]),
            certifications: vec![Certification::new("TOEIC", 850)],
            experience_level: "Director".to_string(),
        };
        let jd = RequirementProfile {
            skills: strings(&["rust"]),
            certifications: vec![Certification::new("TOEIC", 700)],
            experience_levels: strings(&["Associate"]),
        };

        let result = matcher.match_profiles(&cv, &jd).await;

        assert!(result.details.skills_detail.is_empty());
        assert!(result.details.certs_detail.is_empty());
        assert_eq!(result.details.skill_score.to_string(), "0/1");
        assert_eq!(result.details.cert_score.to_string(), "0/1");
        assert_eq!(result.details.exp_score.to_string(), "1/1");
        // (0 + 0 + 1) / 3
        assert_eq!(result.overall_score, 0.333);
    }

    #[tokio::test]
    async fn test_serialized_shape() {
        let embedder = FixedEmbedder::new(vec![("go", vec![1.0, 0.0]), ("golang", vec![0.8, 0.6])]);
        let matcher = ProfileMatcher::new(Arc::new(embedder), 0.6);
        let cv = CandidateProfile {
            skills: strings(&["Go (language)"]),
            experience_level: "Associate".to_string(),
            ..Default::default()
        };
        let jd = RequirementProfile {
            skills: strings(&["Golang"]),
            experience_levels: strings(&["Internship"]),
            ..Default::default()
        };

        let result = matcher.match_profiles(&cv, &jd).await;

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "score": 1.0,
                "details": {
                    "skill_score": "1/1",
                    "cert_score": "0/0",
                    "exp_score": "1/1",
                    "exp_match": 1,
                    "exp_detail": {
                        "cv_level": "Associate",
                        "jd_required_levels": ["Internship"],
                        "match": 1
                    },
                    "skills_detail": [
                        {"cv_skill": "Go", "jd_skill": "Golang", "match": 1, "score": 0.8}
                    ],
                    "certs_detail": []
                }
            })
        );
    }
}
