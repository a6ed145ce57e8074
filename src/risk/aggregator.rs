//! Weighted aggregation of factors into a score, category and confidence

use super::factors::FactorBreakdown;
use super::indicator::{RiskCategory, RiskIndicator};
use crate::graph::NodeId;
use serde::{Deserialize, Serialize};

/// Fixed factor weights. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskWeights {
    pub shared_directors: f64,
    pub win_pattern: f64,
    pub centrality: f64,
    pub shell_similarity: f64,
}

pub const WEIGHTS: RiskWeights = RiskWeights {
    shared_directors: 0.25,
    win_pattern: 0.30,
    centrality: 0.20,
    shell_similarity: 0.25,
};

impl RiskWeights {
    pub fn total(&self) -> f64 {
        self.shared_directors + self.win_pattern + self.centrality + self.shell_similarity
    }
}

/// Confidence for entities without graph presence
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Weighted factor sum clamped to [0, 1]
pub fn aggregate(factors: &FactorBreakdown) -> f64 {
    let w = WEIGHTS;
    let score = w.shared_directors * factors.shared_directors
        + w.win_pattern * factors.win_pattern
        + w.centrality * factors.centrality
        + w.shell_similarity * factors.shell_similarity;
    score.clamp(0.0, 1.0)
}

/// `0.5 + degree / 20` capped at 1.0, or the fallback without a graph presence
pub fn confidence(degree: Option<usize>) -> f64 {
    match degree {
        Some(degree) => (0.5 + degree as f64 / 20.0).clamp(0.0, 1.0),
        None => FALLBACK_CONFIDENCE,
    }
}

/// Full risk assessment of one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRiskScore {
    pub company_id: NodeId,
    pub risk_score: f64,
    pub confidence: f64,
    pub category: RiskCategory,
    pub indicators: Vec<RiskIndicator>,
    pub factors: FactorBreakdown,
}
