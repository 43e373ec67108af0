//! Confidence Aggregator
//!
//! Merges per-field confidence into an overall score and buckets it into a tier.
//!
//! **Default Thresholds:**
//! - High: overall ≥ 80
//! - Medium: 50 ≤ overall < 80
//! - Low: overall < 50
//!
//! The defaults line up with the parser constants: an exact `[S][M]T` match (88)
//! is always high, a lone residual-text guess (30) is always low.

use crate::config::TierThresholds;
use crate::models::{ConfidenceTier, FieldConfidence};

/// Tier classification with injectable thresholds
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfidenceAggregator {
    thresholds: TierThresholds,
}

impl ConfidenceAggregator {
    pub fn new(thresholds: TierThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> TierThresholds {
        self.thresholds
    }

    /// Overall score from the two field confidences
    pub fn aggregate(&self, studio: u8, model: u8) -> FieldConfidence {
        FieldConfidence::from_fields(studio, model)
    }

    pub fn classify(&self, overall: u8) -> ConfidenceTier {
        if overall >= self.thresholds.high {
            ConfidenceTier::High
        } else if overall >= self.thresholds.medium {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }
}

/// Classify with the default thresholds
pub fn classify(overall: u8) -> ConfidenceTier {
    ConfidenceAggregator::default().classify(overall)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify(79), ConfidenceTier::Medium);
        assert_eq!(classify(80), ConfidenceTier::High);
        assert_eq!(classify(49), ConfidenceTier::Low);
        assert_eq!(classify(50), ConfidenceTier::Medium);
        assert_eq!(classify(0), ConfidenceTier::Low);
        assert_eq!(classify(100), ConfidenceTier::High);
    }

    #[test]
    fn test_custom_thresholds() {
        let aggregator = ConfidenceAggregator::new(TierThresholds { high: 90, medium: 70 });
        assert_eq!(aggregator.classify(88), ConfidenceTier::Medium);
        assert_eq!(aggregator.classify(90), ConfidenceTier::High);
        assert_eq!(aggregator.classify(69), ConfidenceTier::Low);
    }

    #[test]
    fn test_aggregate_rounds_overall() {
        let aggregator = ConfidenceAggregator::default();
        assert_eq!(aggregator.aggregate(90, 85).overall, 88);
        assert_eq!(aggregator.aggregate(60, 0).overall, 30);
        assert_eq!(aggregator.aggregate(95, 95).overall, 95);
        assert_eq!(
            aggregator.aggregate(70, 60),
            FieldConfidence { studio: 70, model: 60, overall: 65 }
        );
    }
}
