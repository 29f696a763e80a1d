use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Input records
// ────────────────────────────────────────────────────────────────────────────

/// Structured résumé data. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::certifications")]
    pub certifications: Vec<Certification>,
    #[serde(
        default,
        rename = "experienceLevel",
        deserialize_with = "lenient::string"
    )]
    pub experience_level: String,
}

/// Structured job-description requirements. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementProfile {
    #[serde(default, deserialize_with = "lenient::strings")]
    pub skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient::certifications")]
    pub certifications: Vec<Certification>,
    #[serde(
        default,
        rename = "experienceLevels",
        deserialize_with = "lenient::strings"
    )]
    pub experience_levels: Vec<String>,
}

/// A named certification with its raw score (`850`, `"7.5"`, `"B2"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Value>,
    /// Carried through résumé extraction; not used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
}

#[cfg(test)]
impl Certification {
    pub fn new(name: impl Into<String>, score: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            score: Some(score.into()),
            issuer: None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Match records (field names are the public response contract)
// ────────────────────────────────────────────────────────────────────────────

/// Best requirement match for one candidate skill.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    #[serde(rename = "cv_skill")]
    pub candidate_skill: String,
    #[serde(rename = "jd_skill")]
    pub requirement_skill: String,
    #[serde(rename = "match", serialize_with = "as_flag")]
    pub is_match: bool,
    /// Cosine similarity, rounded to 3 decimals.
    #[serde(rename = "score")]
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CertificationMatch {
    #[serde(rename = "jd_cert")]
    pub requirement_cert: String,
    #[serde(rename = "cv_cert")]
    pub candidate_cert: String,
    #[serde(rename = "jd_score", serialize_with = "as_decimal_string")]
    pub requirement_score: f64,
    #[serde(rename = "cv_score", serialize_with = "as_decimal_string")]
    pub candidate_score: f64,
    #[serde(rename = "match", serialize_with = "as_flag")]
    pub is_match: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExperienceMatch {
    #[serde(rename = "cv_level")]
    pub candidate_level: String,
    #[serde(rename = "jd_required_levels")]
    pub requirement_levels: Vec<String>,
    #[serde(rename = "match", serialize_with = "as_flag")]
    pub is_match: bool,
}

/// `matched / total` for one category, rendered as `"n/m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryScore {
    pub matched: usize,
    pub total: usize,
}

impl CategoryScore {
    pub fn new(matched: usize, total: usize) -> Self {
        Self { matched, total }
    }

    /// `None` for a category with no requirement items. Greedy matching can
    /// push `matched` above `total`, so the ratio is capped at 1.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| (self.matched as f64 / self.total as f64).min(1.0))
    }
}

impl fmt::Display for CategoryScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.matched, self.total)
    }
}

impl Serialize for CategoryScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchDetails {
    pub skill_score: CategoryScore,
    pub cert_score: CategoryScore,
    pub exp_score: CategoryScore,
    #[serde(serialize_with = "as_flag")]
    pub exp_match: bool,
    pub exp_detail: ExperienceMatch,
    pub skills_detail: Vec<SkillMatch>,
    pub certs_detail: Vec<CertificationMatch>,
}

/// Full outcome of one candidate/requirement comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Mean of the non-empty category ratios, rounded to 3 decimals.
    #[serde(rename = "score")]
    pub overall_score: f64,
    pub details: MatchDetails,
}

fn as_flag<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*value))
}

/// `850.0 -> "850.0"`, `7.5 -> "7.5"`: always at least one fractional digit.
fn as_decimal_string<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&format_args!("{value:?}"))
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient decoding for LLM-produced JSON
// ────────────────────────────────────────────────────────────────────────────

pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::Certification;

    /// Any non-string (including `null`) becomes `""`.
    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s,
            _ => String::new(),
        })
    }

    /// `null` or a non-array becomes empty; non-string items are dropped.
    pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
    }

    /// `null` or a non-array becomes empty; items are kept as they are.
    pub fn values<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            _ => Vec::new(),
        })
    }

    /// Objects decode field by field; a bare string is taken as a name with no
    /// score; anything else is dropped.
    pub fn certifications<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Certification>, D::Error> {
        let items = match Value::deserialize(deserializer)? {
            Value::Array(items) => items,
            _ => return Ok(Vec::new()),
        };

        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(mut map) => Some(Certification {
                    name: match map.remove("name") {
                        Some(Value::String(s)) => s,
                        _ => String::new(),
                    },
                    score: map.remove("score").filter(|v| !v.is_null()),
                    issuer: match map.remove("issuer") {
                        Some(Value::String(s)) => Some(s),
                        _ => None,
                    },
                }),
                Value::String(name) => Some(Certification {
                    name,
                    ..Default::default()
                }),
                _ => None,
            })
            .collect())
    }
}
