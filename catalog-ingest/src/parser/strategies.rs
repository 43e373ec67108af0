//! Heuristic strategy chain
//!
//! Each strategy inspects the folder name and the partially-filled draft and
//! may return a [`Patch`]. Patches only ever fill fields that are still empty,
//! so an earlier strategy always wins over a later one.
//!
//! Order:
//! 1. bracket harvesting
//! 2. `@` separator
//! 3. ` - ` separator (only when the name has no `@`)
//! 4. residual text extraction (studio known, model missing)

use super::tokenizer::{
    bracket_groups, extract_candidate_names, is_date, is_identity_token, strip_bracket_groups,
    strip_leading_noise,
};
use crate::config::HeuristicsConfig;
use crate::models::ParseMethod;

/// Field value with the confidence the producing strategy assigns to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGuess {
    pub value: String,
    pub confidence: u8,
}

impl FieldGuess {
    fn new(value: impl Into<String>, confidence: u8) -> Self {
        Self {
            value: value.into(),
            confidence,
        }
    }
}

/// Proposed values from one strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    pub studio: Option<FieldGuess>,
    pub model: Option<FieldGuess>,
}

impl Patch {
    fn is_empty(&self) -> bool {
        self.studio.is_none() && self.model.is_none()
    }
}

/// Candidate under construction
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub studio: String,
    pub studio_confidence: u8,
    pub model: String,
    pub model_confidence: u8,
}

impl Draft {
    /// Apply a patch to still-empty fields; true when anything was written
    pub fn apply(&mut self, patch: Patch) -> bool {
        let mut changed = false;

        if let Some(guess) = patch.studio {
            if self.studio.is_empty() && !guess.value.is_empty() {
                self.studio = guess.value;
                self.studio_confidence = guess.confidence;
                changed = true;
            }
        }

        if let Some(guess) = patch.model {
            if self.model.is_empty() && !guess.value.is_empty() {
                self.model = guess.value;
                self.model_confidence = guess.confidence;
                changed = true;
            }
        }

        changed
    }

    /// A model identical to the studio is never kept
    pub fn apply_collision_guard(&mut self) -> bool {
        if !self.model.is_empty() && self.model == self.studio {
            self.model.clear();
            self.model_confidence = 0;
            return true;
        }
        false
    }

    fn is_complete(&self) -> bool {
        !self.studio.is_empty() && !self.model.is_empty()
    }
}

pub type StrategyFn = fn(&str, &Draft, &HeuristicsConfig) -> Option<Patch>;

/// One entry of the chain
pub struct Strategy {
    pub method: ParseMethod,
    pub run: StrategyFn,
}

/// The heuristic chain, in priority order
pub const STRATEGIES: &[Strategy] = &[
    Strategy {
        method: ParseMethod::BracketHarvest,
        run: harvest_brackets,
    },
    Strategy {
        method: ParseMethod::SeparatorAt,
        run: split_at_sign,
    },
    Strategy {
        method: ParseMethod::SeparatorHyphen,
        run: split_hyphen,
    },
    Strategy {
        method: ParseMethod::TextExtraction,
        run: extract_residual_name,
    },
];

/// Result of running the chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainOutcome {
    pub draft: Draft,
    pub method: ParseMethod,
}

/// Run every strategy in order and record which ones contributed
pub fn run_chain(name: &str, heuristics: &HeuristicsConfig) -> ChainOutcome {
    let mut draft = Draft::default();
    let mut contributors: Vec<ParseMethod> = Vec::new();

    for strategy in STRATEGIES {
        if draft.is_complete() {
            break;
        }
        if let Some(patch) = (strategy.run)(name, &draft, heuristics) {
            if !patch.is_empty() && draft.apply(patch) {
                contributors.push(strategy.method);
            }
        }
    }

    draft.apply_collision_guard();

    let method = match contributors.as_slice() {
        [] => ParseMethod::None,
        [single] => *single,
        _ => ParseMethod::SmartAnalysis,
    };

    ChainOutcome { draft, method }
}

/// First valid `[...]` group → studio, second → model
pub fn harvest_brackets(
    name: &str,
    _draft: &Draft,
    heuristics: &HeuristicsConfig,
) -> Option<Patch> {
    let mut groups = bracket_groups(name)
        .into_iter()
        .map(str::trim)
        .filter(|g| is_identity_token(g));

    let studio = groups.next()?;
    let model = groups.next();

    Some(Patch {
        studio: Some(FieldGuess::new(studio, heuristics.bracket_studio)),
        model: model.map(|m| FieldGuess::new(m, heuristics.bracket_model)),
    })
}

/// `Model @ Studio`
pub fn split_at_sign(name: &str, _draft: &Draft, heuristics: &HeuristicsConfig) -> Option<Patch> {
    let (left, right) = name.split_once('@')?;
    let left = left.trim();
    let right = right.trim();

    let patch = Patch {
        studio: is_identity_token(right).then(|| FieldGuess::new(right, heuristics.separator_at)),
        model: is_identity_token(left).then(|| FieldGuess::new(left, heuristics.separator_at)),
    };

    (!patch.is_empty()).then_some(patch)
}

/// `Studio - Model - ...`, date segments dropped
pub fn split_hyphen(name: &str, _draft: &Draft, heuristics: &HeuristicsConfig) -> Option<Patch> {
    if name.contains('@') || !name.contains(" - ") {
        return None;
    }

    let segments: Vec<&str> = name
        .split(" - ")
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_date(s) && is_identity_token(s))
        .collect();

    let patch = Patch {
        studio: segments
            .first()
            .map(|s| FieldGuess::new(*s, heuristics.separator_hyphen)),
        model: segments
            .get(1)
            .map(|s| FieldGuess::new(*s, heuristics.separator_hyphen)),
    };

    (!patch.is_empty()).then_some(patch)
}

/// Model from whatever text remains once the studio and noise are removed
pub fn extract_residual_name(
    name: &str,
    draft: &Draft,
    heuristics: &HeuristicsConfig,
) -> Option<Patch> {
    if draft.studio.is_empty() || !draft.model.is_empty() {
        return None;
    }

    let studio = draft.studio.as_str();
    let residual = name
        .replace(&format!("[{}]", studio), " ")
        .replace(studio, " ");
    let residual = strip_bracket_groups(&residual);
    let residual = strip_leading_noise(&residual);

    let candidate = extract_candidate_names(&residual).into_iter().next()?;
    if candidate.to_lowercase() == studio.to_lowercase() {
        return None;
    }

    Some(Patch {
        studio: None,
        model: Some(FieldGuess::new(candidate, heuristics.text_extraction)),
    })
}
