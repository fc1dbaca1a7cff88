use crate::error::{AnalogyError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest value on the star scale.
pub const MAX_STARS: u8 = 5;

/// Request body for `POST /generate_analogy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub question: String,
}

impl GenerateRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }
}

/// An analogy returned by the generation service.
///
/// Decoding accepts both the canonical shape and the legacy three-agent shape
/// (`Concept Extractor` / `Analogy Generator` / `Mapping Explainer`); the
/// legacy one is normalized here so nothing downstream sees it. Missing or
/// `null` string fields decode as empty text, and an absent runtime is
/// written back out as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnalogyWire")]
pub struct AnalogyResult {
    pub final_analogy: String,
    pub source_domain: String,
    pub target_domain: String,
    pub explanation: String,
    #[serde(serialize_with = "serialize_runtime")]
    pub runtime_seconds: Option<f64>,
}

impl AnalogyResult {
    /// Runtime reported by the service, 0 when it reported none.
    pub fn runtime_or_zero(&self) -> f64 {
        self.runtime_seconds.unwrap_or(0.0)
    }
}

fn serialize_runtime<S>(
    runtime: &Option<f64>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(runtime.unwrap_or(0.0))
}

/// Every key either shape may carry. Canonical keys win; each one falls back
/// to its legacy counterpart, so a partial legacy body keeps what it has.
#[derive(Deserialize)]
#[serde(rename = "analogy object")]
struct AnalogyWire {
    #[serde(default)]
    final_analogy: Option<String>,
    #[serde(default)]
    source_domain: Option<String>,
    #[serde(default)]
    target_domain: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    runtime_seconds: Option<f64>,
    #[serde(default, rename = "Concept Extractor")]
    concept_extractor: Option<String>,
    #[serde(default, rename = "Analogy Generator")]
    analogy_generator: Option<String>,
    #[serde(default, rename = "Mapping Explainer")]
    mapping_explainer: Option<String>,
}

impl From<AnalogyWire> for AnalogyResult {
    fn from(wire: AnalogyWire) -> Self {
        Self {
            final_analogy: wire
                .final_analogy
                .or(wire.analogy_generator)
                .unwrap_or_default(),
            source_domain: wire.source_domain.unwrap_or_default(),
            target_domain: wire
                .target_domain
                .or(wire.concept_extractor)
                .unwrap_or_default(),
            explanation: wire
                .explanation
                .or(wire.mapping_explainer)
                .unwrap_or_default(),
            runtime_seconds: wire.runtime_seconds,
        }
    }
}

/// One of the four feedback questions shown under an analogy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingDimension {
    Clarity,
    Relational,
    Familiarity,
    Overall,
}

impl RatingDimension {
    pub const ALL: [RatingDimension; 4] = [
        RatingDimension::Clarity,
        RatingDimension::Relational,
        RatingDimension::Familiarity,
        RatingDimension::Overall,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingDimension::Clarity => "clarity",
            RatingDimension::Relational => "relational",
            RatingDimension::Familiarity => "familiarity",
            RatingDimension::Overall => "overall",
        }
    }

    /// Question shown next to the star row.
    pub fn label(&self) -> &'static str {
        match self {
            RatingDimension::Clarity => "How clear was this analogy?",
            RatingDimension::Relational => {
                "Does the analogy accurately reflect relational similarities (not just surface-level)?"
            }
            RatingDimension::Familiarity => {
                "Was the chosen base domain familiar and helpful in understanding the concept?"
            }
            RatingDimension::Overall => {
                "Overall, how effective was this analogy in helping you understand the concept?"
            }
        }
    }
}

impl fmt::Display for RatingDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RatingDimension {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "clarity" => Ok(RatingDimension::Clarity),
            "relational" => Ok(RatingDimension::Relational),
            "familiarity" => Ok(RatingDimension::Familiarity),
            "overall" => Ok(RatingDimension::Overall),
            other => Err(format!(
                "Unknown rating dimension: {}. Must be one of: clarity, relational, familiarity, overall",
                other
            )),
        }
    }
}

/// A star value from the closed set 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Stars(u8);

impl Stars {
    pub fn new(value: u8) -> Result<Self> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AnalogyError::InvalidRating(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Stars {
    type Error = AnalogyError;

    fn try_from(value: u8) -> Result<Self> {
        Stars::new(value)
    }
}

/// Ratings in 0..=5 (0 = unrated) plus a free-text comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRatings {
    pub clarity: u8,
    pub relational: u8,
    pub familiarity: u8,
    pub overall: u8,
    pub comment: String,
}

impl FeedbackRatings {
    pub fn get(&self, dimension: RatingDimension) -> u8 {
        match dimension {
            RatingDimension::Clarity => self.clarity,
            RatingDimension::Relational => self.relational,
            RatingDimension::Familiarity => self.familiarity,
            RatingDimension::Overall => self.overall,
        }
    }

    pub fn set(&mut self, dimension: RatingDimension, stars: Stars) {
        let slot = match dimension {
            RatingDimension::Clarity => &mut self.clarity,
            RatingDimension::Relational => &mut self.relational,
            RatingDimension::Familiarity => &mut self.familiarity,
            RatingDimension::Overall => &mut self.overall,
        };
        *slot = stars.value();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::default()
    }
}

/// Request body for `POST /submit_feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSubmission {
    pub target_domain: String,
    pub final_analogy: String,
    pub source_domain: String,
    pub explanation: String,
    pub rating_clarity: u8,
    pub rating_relational: u8,
    pub rating_familiarity: u8,
    pub rating_overall: u8,
    pub comment: String,
    pub runtime_seconds: f64,
}

impl FeedbackSubmission {
    /// Echo the analogy fields alongside the current ratings.
    pub fn compose(result: &AnalogyResult, ratings: &FeedbackRatings) -> Self {
        Self {
            target_domain: result.target_domain.clone(),
            final_analogy: result.final_analogy.clone(),
            source_domain: result.source_domain.clone(),
            explanation: result.explanation.clone(),
            rating_clarity: ratings.clarity,
            rating_relational: ratings.relational,
            rating_familiarity: ratings.familiarity,
            rating_overall: ratings.overall,
            comment: ratings.comment.clone(),
            runtime_seconds: result.runtime_or_zero(),
        }
    }
}

/// Response body of `POST /submit_feedback`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackReceipt {
    #[serde(default)]
    pub message: String,
}

/// Message shown under the feedback form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum FeedbackMessage {
    /// Confirmation text supplied by the service
    Confirmation(String),
    /// Client-side error text
    Error(String),
}

impl FeedbackMessage {
    pub fn text(&self) -> &str {
        match self {
            FeedbackMessage::Confirmation(text) | FeedbackMessage::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FeedbackMessage::Error(_))
    }
}

impl fmt::Display for FeedbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_analogy_decodes() {
        let result: AnalogyResult = serde_json::from_value(json!({
            "final_analogy": "A is to B as C is to D",
            "source_domain": "B",
            "target_domain": "D",
            "explanation": "...",
            "runtime_seconds": 12.5
        }))
        .unwrap();

        assert_eq!(result.final_analogy, "A is to B as C is to D");
        assert_eq!(result.source_domain, "B");
        assert_eq!(result.target_domain, "D");
        assert_eq!(result.explanation, "...");
        assert_eq!(result.runtime_seconds, Some(12.5));
    }

    #[test]
    fn test_missing_fields_decode_as_empty() {
        let result: AnalogyResult =
            serde_json::from_value(json!({ "final_analogy": "only this" })).unwrap();
        assert_eq!(result.final_analogy, "only this");
        assert_eq!(result.source_domain, "");
        assert_eq!(result.explanation, "");
        assert_eq!(result.runtime_seconds, None);
        assert_eq!(result.runtime_or_zero(), 0.0);
    }

    #[test]
    fn test_legacy_analogy_is_normalized() {
        let result: AnalogyResult = serde_json::from_value(json!({
            "Concept Extractor": "photosynthesis",
            "Analogy Generator": "A leaf is a solar kitchen",
            "Mapping Explainer": "Light is the stove"
        }))
        .unwrap();

        assert_eq!(result.final_analogy, "A leaf is a solar kitchen");
        assert_eq!(result.target_domain, "photosynthesis");
        assert_eq!(result.explanation, "Light is the stove");
        assert_eq!(result.source_domain, "");
        assert_eq!(result.runtime_seconds, None);

        // Serializes back in the canonical shape only
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("Analogy Generator").is_none());
        assert_eq!(value["runtime_seconds"], json!(0.0));
    }

    #[test]
    fn test_absent_runtime_serializes_as_zero() {
        let result: AnalogyResult =
            serde_json::from_value(json!({ "final_analogy": "x" })).unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["runtime_seconds"], json!(0.0));
        assert_eq!(value["source_domain"], json!(""));
    }

    #[test]
    fn test_partial_legacy_body_keeps_present_fields() {
        let result: AnalogyResult = serde_json::from_value(json!({
            "Concept Extractor": "photosynthesis",
            "Analogy Generator": "A leaf is a kitchen"
        }))
        .unwrap();

        assert_eq!(result.final_analogy, "A leaf is a kitchen");
        assert_eq!(result.target_domain, "photosynthesis");
        assert_eq!(result.explanation, "");
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let result: AnalogyResult = serde_json::from_value(json!({
            "final_analogy": "x",
            "source_domain": null,
            "target_domain": null,
            "explanation": null,
            "runtime_seconds": null
        }))
        .unwrap();

        assert_eq!(result.final_analogy, "x");
        assert_eq!(result.source_domain, "");
        assert_eq!(result.target_domain, "");
        assert_eq!(result.explanation, "");
        assert_eq!(result.runtime_seconds, None);
    }

    #[test]
    fn test_wrong_field_type_names_the_problem() {
        let err = serde_json::from_value::<AnalogyResult>(json!({ "final_analogy": 7 }))
            .unwrap_err()
            .to_string();
        assert!(err.contains("invalid type"), "{}", err);
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(serde_json::from_str::<AnalogyResult>("\"oops\"").is_err());
    }

    #[test]
    fn test_stars_closed_set() {
        for v in 1..=5 {
            assert_eq!(Stars::new(v).unwrap().value(), v);
        }
        assert!(matches!(Stars::new(0), Err(AnalogyError::InvalidRating(0))));
        assert!(matches!(Stars::new(6), Err(AnalogyError::InvalidRating(6))));
    }

    #[test]
    fn test_dimension_parsing() {
        assert_eq!(
            "Clarity".parse::<RatingDimension>().unwrap(),
            RatingDimension::Clarity
        );
        assert_eq!(
            " overall ".parse::<RatingDimension>().unwrap(),
            RatingDimension::Overall
        );
        assert!("depth".parse::<RatingDimension>().is_err());
    }

    #[test]
    fn test_feedback_submission_wire_names() {
        let result = AnalogyResult {
            final_analogy: "f".into(),
            source_domain: "s".into(),
            target_domain: "t".into(),
            explanation: "e".into(),
            runtime_seconds: None,
        };
        let ratings = FeedbackRatings {
            clarity: 4,
            relational: 0,
            familiarity: 2,
            overall: 5,
            comment: "good".into(),
        };

        let value = serde_json::to_value(FeedbackSubmission::compose(&result, &ratings)).unwrap();
        assert_eq!(
            value,
            json!({
                "target_domain": "t",
                "final_analogy": "f",
                "source_domain": "s",
                "explanation": "e",
                "rating_clarity": 4,
                "rating_relational": 0,
                "rating_familiarity": 2,
                "rating_overall": 5,
                "comment": "good",
                "runtime_seconds": 0.0
            })
        );
    }

    #[test]
    fn test_ratings_reset() {
        let mut ratings = FeedbackRatings::default();
        ratings.set(RatingDimension::Familiarity, Stars::new(3).unwrap());
        ratings.comment = "meh".into();
        assert!(!ratings.is_blank());

        ratings.reset();
        assert!(ratings.is_blank());
    }
}
