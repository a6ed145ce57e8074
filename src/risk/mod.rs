//! Risk scoring engine
//!
//! A [`RiskEngine`] borrows one [`ProcurementSource`], precomputes the
//! [`GlobalAggregates`] once, and then answers single-company scores, batch
//! scores, fraud-cluster detection and investigation summaries. It holds no
//! mutable state, so one engine can be shared across threads.

pub mod aggregator;
pub mod batch;
pub mod clusters;
pub mod factors;
pub mod indicator;
pub mod investigation;

pub use aggregator::{aggregate, confidence, CompanyRiskScore, RiskWeights, WEIGHTS};
pub use batch::{RiskScoreRecord, RiskSummary};
pub use clusters::FraudCluster;
pub use factors::{FactorBreakdown, GlobalAggregates};
pub use indicator::{indicators_for, RiskCategory, RiskIndicator, Severity};
pub use investigation::{InvestigationSummary, TenderWin};

use crate::algo::CommunityError;
use crate::config::EngineConfig;
use crate::graph::{Company, NodeId};
use crate::snapshot::ProcurementSource;
use thiserror::Error;

/// Errors surfaced to callers of the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskError {
    #[error("Entity not found: {0}")]
    NotFound(NodeId),

    #[error("Entity {0} is not a company")]
    NotACompany(NodeId),

    #[error("Batch scoring cancelled")]
    Cancelled,

    #[error("Cluster detection failed: {0}")]
    Clustering(#[from] CommunityError),
}

pub type RiskResult<T> = Result<T, RiskError>;

/// Scoring and clustering over one immutable source
pub struct RiskEngine<'a, S: ProcurementSource + ?Sized> {
    source: &'a S,
    globals: GlobalAggregates,
    config: EngineConfig,
}

impl<'a, S: ProcurementSource + ?Sized> RiskEngine<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: &'a S, config: EngineConfig) -> Self {
        let globals = GlobalAggregates::compute(source);
        RiskEngine {
            source,
            globals,
            config,
        }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn globals(&self) -> &GlobalAggregates {
        &self.globals
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Score one company.
    ///
    /// Fails with `NotFound` for an unknown id and `NotACompany` for a director,
    /// tender or department id.
    pub fn score_company(&self, company_id: &NodeId) -> RiskResult<CompanyRiskScore> {
        let company = self.resolve_company(company_id)?;
        Ok(self.assess(company))
    }

    /// Category for a score produced by the aggregator
    pub fn category_for(risk_score: f64) -> RiskCategory {
        RiskCategory::from_score(risk_score)
    }

    fn resolve_company(&self, id: &NodeId) -> RiskResult<&'a Company> {
        if let Some(company) = self.source.company(id) {
            return Ok(company);
        }
        match self.source.get_node(id) {
            Ok(_) => Err(RiskError::NotACompany(id.clone())),
            Err(_) => Err(RiskError::NotFound(id.clone())),
        }
    }

    pub(crate) fn assess(&self, company: &Company) -> CompanyRiskScore {
        let factors = FactorBreakdown::compute(self.source, &self.globals, company);
        let risk_score = aggregate(&factors);

        CompanyRiskScore {
            company_id: company.company_id.clone(),
            risk_score,
            confidence: confidence(self.source.degree(&company.company_id)),
            category: RiskCategory::from_score(risk_score),
            indicators: indicators_for(&factors),
            factors,
        }
    }
}
