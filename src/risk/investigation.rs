//! Investigation summary for a single company

use super::factors::won_tenders;
use super::indicator::{RiskCategory, RiskIndicator};
use super::{RiskEngine, RiskResult};
use crate::graph::{NodeId, NodeKind};
use crate::snapshot::ProcurementSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Maximum number of connected high-risk companies listed
pub const MAX_CONNECTED_HIGH_RISK: usize = 10;

/// A tender won by the investigated company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderWin {
    pub tender_id: NodeId,
    pub contract_value: f64,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestigationSummary {
    pub company_id: NodeId,
    pub company_name: String,
    pub risk_score: f64,
    pub confidence: f64,
    pub category: RiskCategory,
    pub indicators: Vec<RiskIndicator>,
    pub key_findings: Vec<String>,
    /// Sorted by year, then tender id
    pub tender_history: Vec<TenderWin>,
    /// High-risk companies sharing a director or tender, sorted by id
    pub connected_high_risk: Vec<NodeId>,
    pub recommendation: String,
}

/// Recommended follow-up for a category
pub fn recommendation(category: RiskCategory) -> &'static str {
    match category {
        RiskCategory::High => {
            "IMMEDIATE INVESTIGATION RECOMMENDED: High-risk indicators detected. \
             Recommend full audit and cross-reference with procurement records."
        }
        RiskCategory::Medium => {
            "MONITORING REQUIRED: Medium-risk indicators present. \
             Recommend enhanced due diligence and periodic review."
        }
        RiskCategory::Low => "STANDARD MONITORING: Low-risk profile. Continue routine oversight.",
    }
}

impl<'a, S: ProcurementSource + ?Sized> RiskEngine<'a, S> {
    /// Score a company and gather the context an investigator needs
    pub fn investigate(&self, company_id: &NodeId) -> RiskResult<InvestigationSummary> {
        let company = self.resolve_company(company_id)?;
        let score = self.assess(company);

        let key_findings = score
            .indicators
            .iter()
            .map(|i| format!("{}: {}", i.indicator, i.description))
            .collect();

        let mut tender_history: Vec<TenderWin> = won_tenders(self.source, company_id)
            .into_iter()
            .map(|t| TenderWin {
                tender_id: t.tender_id.clone(),
                contract_value: t.contract_value,
                year: t.year,
            })
            .collect();
        tender_history.sort_by(|a, b| (a.year, &a.tender_id).cmp(&(b.year, &b.tender_id)));

        let connected_high_risk = self
            .two_hop_companies(company_id)
            .into_iter()
            .filter_map(|id| self.source.company(id))
            .filter(|c| self.assess(c).category == RiskCategory::High)
            .map(|c| c.company_id.clone())
            .take(MAX_CONNECTED_HIGH_RISK)
            .collect();

        Ok(InvestigationSummary {
            company_id: company.company_id.clone(),
            company_name: company.name.clone(),
            risk_score: score.risk_score,
            confidence: score.confidence,
            category: score.category,
            indicators: score.indicators,
            key_findings,
            tender_history,
            connected_high_risk,
            recommendation: recommendation(score.category).to_string(),
        })
    }

    /// Companies reached through a shared director or tender
    fn two_hop_companies(&self, company_id: &NodeId) -> BTreeSet<&'a NodeId> {
        let mut found = BTreeSet::new();
        for (middle, _) in self.source.neighbors(company_id, None) {
            if !matches!(middle.kind(), Some(NodeKind::Director | NodeKind::Tender)) {
                continue;
            }
            for (other, _) in self.source.neighbors(middle, None) {
                if other.is_company() && other != company_id {
                    found.insert(other);
                }
            }
        }
        found
    }
}
