//! Folder-name parser
//!
//! Two entry points:
//! - [`FolderNameParser::parse_folder_name`]: exact `[Studio][Model]Title` form only
//! - [`FolderNameParser::smart_parse`]: exact form first, then the heuristic chain
//!
//! Both are pure: the same name always yields the same candidate.

pub mod confidence;
pub mod strategies;
pub mod tokenizer;

pub use confidence::{classify, ConfidenceAggregator};
pub use tokenizer::{extract_candidate_names, is_identity_token};

use crate::config::{HeuristicsConfig, TierThresholds};
use crate::models::{FieldConfidence, ParseMethod, ParsedCandidate};
use once_cell::sync::Lazy;
use regex::Regex;
use strategies::{run_chain, Draft};

static RE_EXACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[([^\]]*)\]\[([^\]]*)\](.*)$").expect("valid exact form regex"));

pub const ERR_NOT_EXACT_FORM: &str = "folder name does not follow [Studio][Model]Title";
pub const ERR_EMPTY_STUDIO: &str = "studio is empty in [Studio][Model]Title folder name";

/// Parser with injectable confidence constants and tier thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderNameParser {
    heuristics: HeuristicsConfig,
    aggregator: ConfidenceAggregator,
}

impl FolderNameParser {
    pub fn new(heuristics: HeuristicsConfig, tiers: TierThresholds) -> Self {
        Self {
            heuristics,
            aggregator: ConfidenceAggregator::new(tiers),
        }
    }

    pub fn heuristics(&self) -> &HeuristicsConfig {
        &self.heuristics
    }

    pub fn aggregator(&self) -> &ConfidenceAggregator {
        &self.aggregator
    }

    /// Exact-form parse; anything else is a format error
    pub fn parse_folder_name(&self, folder_name: &str) -> ParsedCandidate {
        self.parse_exact(folder_name)
            .unwrap_or_else(|| ParsedCandidate::invalid(folder_name, ERR_NOT_EXACT_FORM))
    }

    /// Exact form first; otherwise the heuristic chain, which never fails
    pub fn smart_parse(&self, folder_name: &str) -> ParsedCandidate {
        if let Some(candidate) = self.parse_exact(folder_name) {
            if !candidate.valid {
                return candidate;
            }
            return self.guard_exact(candidate);
        }

        let outcome = run_chain(folder_name, &self.heuristics);
        self.finish(folder_name, folder_name.to_string(), outcome.draft, outcome.method)
    }

    /// None when the name is not in the exact form at all
    fn parse_exact(&self, folder_name: &str) -> Option<ParsedCandidate> {
        let caps = RE_EXACT.captures(folder_name)?;

        let studio = caps[1].trim();
        if studio.is_empty() {
            return Some(ParsedCandidate::invalid(folder_name, ERR_EMPTY_STUDIO));
        }

        let model = caps[2].trim();
        let suffix = caps[3].trim();
        let title = if suffix.is_empty() {
            folder_name.to_string()
        } else {
            suffix.to_string()
        };

        let confidence = FieldConfidence {
            studio: self.heuristics.exact_studio,
            model: self.heuristics.exact_model,
            overall: self.heuristics.exact_overall,
        };

        Some(ParsedCandidate {
            folder_name: folder_name.to_string(),
            studio: studio.to_string(),
            model: model.to_string(),
            title,
            confidence,
            method: ParseMethod::Bracket,
            tier: self.aggregator.classify(confidence.overall),
            valid: true,
            error: None,
        })
    }

    /// Collision guard on an exact-form result
    fn guard_exact(&self, candidate: ParsedCandidate) -> ParsedCandidate {
        if candidate.model.is_empty() || candidate.model != candidate.studio {
            return candidate;
        }

        let mut draft = Draft {
            studio: candidate.studio,
            studio_confidence: candidate.confidence.studio,
            model: candidate.model,
            model_confidence: candidate.confidence.model,
        };
        draft.apply_collision_guard();
        self.finish(&candidate.folder_name, candidate.title, draft, candidate.method)
    }

    fn finish(
        &self,
        folder_name: &str,
        title: String,
        draft: Draft,
        method: ParseMethod,
    ) -> ParsedCandidate {
        let confidence = self
            .aggregator
            .aggregate(draft.studio_confidence, draft.model_confidence);

        ParsedCandidate {
            folder_name: folder_name.to_string(),
            studio: draft.studio,
            model: draft.model,
            title,
            confidence,
            method,
            tier: self.aggregator.classify(confidence.overall),
            valid: true,
            error: None,
        }
    }
}

/// Exact-form parse with default constants
pub fn parse_folder_name(folder_name: &str) -> ParsedCandidate {
    FolderNameParser::default().parse_folder_name(folder_name)
}

/// Full heuristic parse with default constants
pub fn smart_parse_folder_name(folder_name: &str) -> ParsedCandidate {
    FolderNameParser::default().smart_parse(folder_name)
}
