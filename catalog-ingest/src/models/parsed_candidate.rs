//! Parsed folder-name candidates
//!
//! A `ParsedCandidate` is the result of running a folder name through the parser.
//! Identity fields may be empty or wrong; the verbatim folder name is always kept
//! alongside so the source can be recovered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-field confidence, each 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfidence {
    pub studio: u8,
    pub model: u8,
    pub overall: u8,
}

impl FieldConfidence {
    /// Build from studio/model confidence, deriving overall as their rounded mean
    pub fn from_fields(studio: u8, model: u8) -> Self {
        Self {
            studio,
            model,
            overall: mean_confidence(studio, model),
        }
    }
}

/// round((studio + model) / 2), half rounds up
pub fn mean_confidence(studio: u8, model: u8) -> u8 {
    ((u16::from(studio) + u16::from(model) + 1) / 2) as u8
}

/// Which parsing branch produced the final field values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseMethod {
    /// Exact `[Studio][Model]Title` form
    Bracket,
    /// Bracket groups collected from anywhere in the name
    BracketHarvest,
    /// `Model @ Studio`
    SeparatorAt,
    /// `Studio - Model - ...`
    SeparatorHyphen,
    /// Name pulled out of residual text after the studio
    TextExtraction,
    /// More than one heuristic branch contributed
    SmartAnalysis,
    /// Nothing recognised
    None,
}

impl ParseMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMethod::Bracket => "bracket",
            ParseMethod::BracketHarvest => "bracket-harvest",
            ParseMethod::SeparatorAt => "separator-at",
            ParseMethod::SeparatorHyphen => "separator-hyphen",
            ParseMethod::TextExtraction => "text-extraction",
            ParseMethod::SmartAnalysis => "smart-analysis",
            ParseMethod::None => "none",
        }
    }
}

impl fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse confidence bucket driving bulk review actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "high" => Ok(ConfidenceTier::High),
            "medium" => Ok(ConfidenceTier::Medium),
            "low" => Ok(ConfidenceTier::Low),
            other => Err(format!("Unknown confidence tier: {}", other)),
        }
    }
}

/// Structured guess for one folder name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCandidate {
    /// Verbatim input folder name
    pub folder_name: String,
    pub studio: String,
    pub model: String,
    /// Explicit title suffix of the `[S][M]T` form, otherwise the folder name
    pub title: String,
    pub confidence: FieldConfidence,
    pub method: ParseMethod,
    pub tier: ConfidenceTier,
    /// False only for format errors (exact form with an empty studio, or not the exact form)
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ParsedCandidate {
    /// Format error result: nothing extracted, title kept verbatim
    pub fn invalid(folder_name: &str, error: impl Into<String>) -> Self {
        Self {
            folder_name: folder_name.to_string(),
            studio: String::new(),
            model: String::new(),
            title: folder_name.to_string(),
            confidence: FieldConfidence::default(),
            method: ParseMethod::None,
            tier: ConfidenceTier::Low,
            valid: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_confidence_rounds_half_up() {
        assert_eq!(mean_confidence(90, 85), 88);
        assert_eq!(mean_confidence(90, 0), 45);
        assert_eq!(mean_confidence(70, 70), 70);
        assert_eq!(mean_confidence(60, 0), 30);
        assert_eq!(mean_confidence(100, 100), 100);
    }

    #[test]
    fn test_method_serializes_kebab_case() {
        let json = serde_json::to_string(&ParseMethod::SeparatorAt).unwrap();
        assert_eq!(json, "\"separator-at\"");
        assert_eq!(ParseMethod::TextExtraction.to_string(), "text-extraction");
    }

    #[test]
    fn test_tier_from_str() {
        assert_eq!("HIGH".parse::<ConfidenceTier>().unwrap(), ConfidenceTier::High);
        assert_eq!("low".parse::<ConfidenceTier>().unwrap(), ConfidenceTier::Low);
        assert!("extreme".parse::<ConfidenceTier>().is_err());
    }

    #[test]
    fn test_invalid_candidate_keeps_title() {
        let candidate = ParsedCandidate::invalid("[][Emma]Set", "empty studio");
        assert!(!candidate.valid);
        assert_eq!(candidate.title, "[][Emma]Set");
        assert_eq!(candidate.method, ParseMethod::None);
        assert_eq!(candidate.error.as_deref(), Some("empty studio"));
    }
}
