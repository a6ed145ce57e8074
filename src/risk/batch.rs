//! Batch scoring of every company and the portfolio summary built from it

use super::clusters::FraudCluster;
use super::indicator::RiskCategory;
use super::{RiskEngine, RiskError, RiskResult};
use crate::graph::{Company, NodeId};
use crate::snapshot::ProcurementSource;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{info, warn};

/// One row of the batch score table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreRecord {
    pub entity_id: NodeId,
    pub risk_score: f64,
    pub confidence: f64,
    pub category: RiskCategory,
    pub indicator_count: usize,
}

impl<'a, S: ProcurementSource + ?Sized> RiskEngine<'a, S> {
    /// Score every company, in the source's company order
    pub fn score_all_companies(&self) -> Vec<RiskScoreRecord> {
        let start = Instant::now();
        let companies = self.source.companies();

        let records: Vec<RiskScoreRecord> = if self.config.scoring.parallel {
            companies.par_iter().map(|c| self.record(c)).collect()
        } else {
            companies.iter().map(|c| self.record(c)).collect()
        };

        info!(
            "Scored {} companies in {:?}",
            records.len(),
            start.elapsed()
        );
        records
    }

    /// Like [`score_all_companies`](Self::score_all_companies), but abandons the
    /// whole batch once `cancel` is raised. No partial records are returned.
    pub fn score_all_companies_cancellable(
        &self,
        cancel: &AtomicBool,
    ) -> RiskResult<Vec<RiskScoreRecord>> {
        let companies = self.source.companies();
        let score = |company: &&Company| {
            if cancel.load(Ordering::Relaxed) {
                None
            } else {
                Some(self.record(company))
            }
        };

        let records: Option<Vec<RiskScoreRecord>> = if self.config.scoring.parallel {
            companies.par_iter().map(score).collect()
        } else {
            companies.iter().map(score).collect()
        };

        match records {
            Some(records) if !cancel.load(Ordering::Relaxed) => {
                info!("Scored {} companies", records.len());
                Ok(records)
            }
            _ => {
                warn!("Batch scoring cancelled");
                Err(RiskError::Cancelled)
            }
        }
    }

    fn record(&self, company: &Company) -> RiskScoreRecord {
        let score = self.assess(company);
        RiskScoreRecord {
            entity_id: score.company_id,
            risk_score: score.risk_score,
            confidence: score.confidence,
            category: score.category,
            indicator_count: score.indicators.len(),
        }
    }
}

/// Dashboard-level totals over one snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_companies: usize,
    pub total_directors: usize,
    pub total_tenders: usize,
    pub total_contract_value: f64,
    pub high_risk_count: usize,
    pub fraud_cluster_count: usize,
    /// Company count per category; every category is present
    pub risk_distribution: BTreeMap<RiskCategory, usize>,
}

impl RiskSummary {
    pub fn build<S: ProcurementSource + ?Sized>(
        source: &S,
        records: &[RiskScoreRecord],
        clusters: &[FraudCluster],
    ) -> Self {
        let mut risk_distribution: BTreeMap<RiskCategory, usize> = [
            (RiskCategory::Low, 0),
            (RiskCategory::Medium, 0),
            (RiskCategory::High, 0),
        ]
        .into_iter()
        .collect();
        for record in records {
            *risk_distribution.entry(record.category).or_insert(0) += 1;
        }

        let tenders = source.tenders();

        RiskSummary {
            total_companies: source.companies().len(),
            total_directors: source.directors().len(),
            total_tenders: tenders.len(),
            total_contract_value: tenders.iter().map(|t| t.contract_value).sum(),
            high_risk_count: risk_distribution[&RiskCategory::High],
            fraud_cluster_count: clusters.len(),
            risk_distribution,
        }
    }
}
