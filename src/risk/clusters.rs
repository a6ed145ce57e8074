//! Fraud cluster detection
//!
//! Louvain partitions the whole graph, every node kind included. Each community
//! is then reduced to its company members and kept only when it is large enough
//! and mostly made of fraud-labelled companies.

use super::{RiskEngine, RiskResult};
use crate::algo::{build_view, louvain, LouvainConfig};
use crate::graph::{Company, NodeId};
use crate::snapshot::ProcurementSource;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Communities with fewer company members are ignored
pub const MIN_CLUSTER_COMPANIES: usize = 3;
/// A cluster's fraud concentration must be strictly above this
pub const MIN_FRAUD_CONCENTRATION: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudCluster {
    pub community_id: usize,
    /// Company members, sorted by id
    pub members: Vec<NodeId>,
    pub fraud_count: usize,
    pub fraud_concentration: f64,
}

impl FraudCluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

/// Apply the size and concentration filter to raw communities.
///
/// `communities[i]` lists the member ids of community `i`; non-company members
/// and ids unknown to the source are skipped. Clusters come back largest first,
/// ties broken by first member.
pub fn fraud_clusters_from_communities<S: ProcurementSource + ?Sized>(
    source: &S,
    communities: &[Vec<&NodeId>],
) -> Vec<FraudCluster> {
    let mut clusters = Vec::new();

    for (community_id, members) in communities.iter().enumerate() {
        let mut companies: Vec<&Company> = members
            .iter()
            .filter(|id| id.is_company())
            .filter_map(|id| source.company(id))
            .collect();
        companies.sort_by(|a, b| a.company_id.cmp(&b.company_id));
        companies.dedup_by(|a, b| a.company_id == b.company_id);

        let fraud_count = companies.iter().filter(|c| c.is_fraudulent()).count();
        let fraud_concentration = fraud_count as f64 / companies.len() as f64;
        if companies.len() < MIN_CLUSTER_COMPANIES
            || fraud_concentration <= MIN_FRAUD_CONCENTRATION
        {
            continue;
        }

        clusters.push(FraudCluster {
            community_id,
            members: companies.iter().map(|c| c.company_id.clone()).collect(),
            fraud_count,
            fraud_concentration,
        });
    }

    clusters.sort_by(|a, b| {
        (Reverse(a.size()), a.members.first()).cmp(&(Reverse(b.size()), b.members.first()))
    });
    clusters
}

impl<'a, S: ProcurementSource + ?Sized> RiskEngine<'a, S> {
    /// Detect fraud clusters, honouring the configured timeout if any
    pub fn detect_fraud_clusters(&self) -> RiskResult<Vec<FraudCluster>> {
        let deadline = self
            .config
            .clustering
            .timeout()
            .map(|timeout| Instant::now() + timeout);
        self.detect_with_deadline(deadline)
    }

    /// Detect fraud clusters, failing the whole call if it runs past `timeout`
    pub fn detect_fraud_clusters_within(&self, timeout: Duration) -> RiskResult<Vec<FraudCluster>> {
        self.detect_with_deadline(Some(Instant::now() + timeout))
    }

    fn detect_with_deadline(&self, deadline: Option<Instant>) -> RiskResult<Vec<FraudCluster>> {
        let start = Instant::now();
        let projection = build_view(self.source);

        let settings = &self.config.clustering;
        let config = LouvainConfig {
            seed: settings.seed,
            resolution: settings.resolution,
            max_passes: settings.max_passes,
            min_modularity_gain: settings.min_modularity_gain,
            deadline,
            ..LouvainConfig::default()
        };

        let result = louvain(&projection.view, &config).map_err(|e| {
            warn!("Cluster detection aborted: {}", e);
            e
        })?;

        let communities: Vec<Vec<&NodeId>> = result
            .communities
            .iter()
            .map(|members| {
                members
                    .iter()
                    .filter_map(|&node| projection.entity_id(node))
                    .collect()
            })
            .collect();
        let clusters = fraud_clusters_from_communities(self.source, &communities);

        info!(
            "Detected {} fraud clusters among {} communities (modularity {:.4}) in {:?}",
            clusters.len(),
            communities.len(),
            result.modularity,
            start.elapsed()
        );
        Ok(clusters)
    }
}
