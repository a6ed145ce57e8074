//! Risk categories and human-readable risk indicators

use super::factors::FactorBreakdown;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score at or above which a company is High risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;
/// Score at or above which a company is Medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

pub const SHARED_DIRECTORS_THRESHOLD: f64 = 0.3;
pub const SHARED_DIRECTORS_HIGH: f64 = 0.6;
pub const WIN_PATTERN_THRESHOLD: f64 = 0.4;
pub const WIN_PATTERN_HIGH: f64 = 0.7;
pub const CENTRALITY_THRESHOLD: f64 = 0.5;
pub const SHELL_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Overall risk category of a scored entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    /// Category for a score. Monotonic: a higher score never maps to a lower category.
    pub fn from_score(score: f64) -> Self {
        if score >= HIGH_RISK_THRESHOLD {
            RiskCategory::High
        } else if score >= MEDIUM_RISK_THRESHOLD {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a single indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        write!(f, "{}", s)
    }
}

/// A flag raised when one factor crosses its display threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskIndicator {
    pub indicator: String,
    pub severity: Severity,
    pub description: String,
}

impl RiskIndicator {
    fn new(indicator: &str, severity: Severity, description: impl Into<String>) -> Self {
        RiskIndicator {
            indicator: indicator.to_string(),
            severity,
            description: description.into(),
        }
    }
}

/// Indicators for every factor above its display threshold, in factor order
pub fn indicators_for(factors: &FactorBreakdown) -> Vec<RiskIndicator> {
    let mut indicators = Vec::new();

    if factors.shared_directors > SHARED_DIRECTORS_THRESHOLD {
        let severity = if factors.shared_directors > SHARED_DIRECTORS_HIGH {
            Severity::High
        } else {
            Severity::Medium
        };
        let others = (factors.shared_directors * 10.0).round() as usize;
        let description = if others >= 10 {
            "Shares directors with 10 or more other companies".to_string()
        } else {
            format!("Shares directors with {} other companies", others)
        };
        indicators.push(RiskIndicator::new("Shared Directors", severity, description));
    }

    if factors.win_pattern > WIN_PATTERN_THRESHOLD {
        let severity = if factors.win_pattern > WIN_PATTERN_HIGH {
            Severity::High
        } else {
            Severity::Medium
        };
        indicators.push(RiskIndicator::new(
            "Suspicious Win Pattern",
            severity,
            "Wins high-value tenders well above the network average",
        ));
    }

    if factors.centrality > CENTRALITY_THRESHOLD {
        indicators.push(RiskIndicator::new(
            "High Network Centrality",
            Severity::Medium,
            "Unusually dense connections, consistent with a collusion hub",
        ));
    }

    if factors.shell_similarity > SHELL_SIMILARITY_THRESHOLD {
        indicators.push(RiskIndicator::new(
            "Shell Company Indicators",
            Severity::High,
            "Shares its address or registration year with multiple other companies",
        ));
    }

    indicators
}
