//! Experience Matcher: "at least this senior" comparison over a fixed ladder.

use crate::matching::models::ExperienceMatch;

/// Seniority ladder, lowest first. Variant order is the comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ExperienceLevel {
    Internship,
    EntryLevel,
    Associate,
    MidSeniorLevel,
    Executive,
    Director,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 6] = [
        ExperienceLevel::Internship,
        ExperienceLevel::EntryLevel,
        ExperienceLevel::Associate,
        ExperienceLevel::MidSeniorLevel,
        ExperienceLevel::Executive,
        ExperienceLevel::Director,
    ];

    /// Exact label lookup. No normalization: `"entry level"` is not recognized.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.label() == label)
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "Internship",
            ExperienceLevel::EntryLevel => "Entry level",
            ExperienceLevel::Associate => "Associate",
            ExperienceLevel::MidSeniorLevel => "Mid-Senior level",
            ExperienceLevel::Executive => "Executive",
            ExperienceLevel::Director => "Director",
        }
    }
}

/// Recognized requirement levels, in input order. Unknown labels are skipped.
pub fn recognized_levels(labels: &[String]) -> Vec<ExperienceLevel> {
    labels
        .iter()
        .filter_map(|l| ExperienceLevel::from_label(l))
        .collect()
}

/// Matches when the candidate is at least as senior as any recognized
/// requirement level. Empty or unknown candidate levels never match.
pub fn match_experience(candidate_level: &str, requirement_levels: &[String]) -> ExperienceMatch {
    let is_match = match ExperienceLevel::from_label(candidate_level) {
        Some(candidate) => recognized_levels(requirement_levels)
            .into_iter()
            .any(|required| candidate >= required),
        None => false,
    };

    ExperienceMatch {
        candidate_level: candidate_level.to_string(),
        requirement_levels: requirement_levels.to_vec(),
        is_match,
    }
}
