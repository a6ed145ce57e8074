//! Community detection algorithms
//!
//! Louvain modularity optimisation (Blondel et al. 2008). The node visiting order is
//! drawn from a seeded RNG and candidate communities are evaluated in ascending
//! neighbour order with strict-improvement tie-breaking, so a fixed seed always
//! yields the same partition.

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

/// Gains smaller than this are treated as ties
const GAIN_EPSILON: f64 = 1e-12;

/// Errors raised by community detection
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommunityError {
    #[error("community detection exceeded its deadline after {passes} completed passes")]
    DeadlineExceeded { passes: usize },

    #[error("resolution must be a positive finite number, got {0}")]
    InvalidResolution(f64),
}

pub type CommunityResult<T> = Result<T, CommunityError>;

/// Louvain configuration
#[derive(Debug, Clone)]
pub struct LouvainConfig {
    /// Seed for the node visiting order
    pub seed: u64,
    /// Modularity resolution (1.0 = standard modularity)
    pub resolution: f64,
    /// Maximum number of move/aggregate passes
    pub max_passes: usize,
    /// Maximum local-moving sweeps within one pass
    pub max_sweeps: usize,
    /// Stop once a pass improves modularity by less than this
    pub min_modularity_gain: f64,
    /// Abort with [`CommunityError::DeadlineExceeded`] once this instant has passed
    pub deadline: Option<Instant>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            max_passes: 32,
            max_sweeps: 100,
            min_modularity_gain: 1e-7,
            deadline: None,
        }
    }
}

/// Result of the Louvain algorithm
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LouvainResult {
    /// Map of NodeId -> Community ID
    pub node_community: HashMap<NodeId, usize>,
    /// Members of each community, indexed by Community ID
    pub communities: Vec<Vec<NodeId>>,
    /// Modularity of the returned partition
    pub modularity: f64,
    /// Number of completed move/aggregate passes
    pub passes: usize,
}

/// One level of the Louvain hierarchy: a weighted graph whose nodes are the
/// communities of the level below.
struct Level {
    /// Neighbour rows without self entries, ascending by neighbour
    adjacency: Vec<Vec<(usize, f64)>>,
    /// Internal weight folded into each node by aggregation
    self_loops: Vec<f64>,
}

impl Level {
    fn from_view(view: &GraphView) -> Self {
        let adjacency = (0..view.node_count)
            .map(|i| {
                view.neighbors(i)
                    .iter()
                    .copied()
                    .zip(view.edge_weights(i).iter().copied())
                    .collect()
            })
            .collect();

        Level {
            adjacency,
            self_loops: vec![0.0; view.node_count],
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    fn strength(&self, node: usize) -> f64 {
        self.adjacency[node].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[node]
    }

    fn modularity(&self, community: &[usize], count: usize, resolution: f64, m2: f64) -> f64 {
        if m2 <= 0.0 {
            return 0.0;
        }

        let mut internal = vec![0.0; count];
        let mut totals = vec![0.0; count];

        for node in 0..self.len() {
            let c = community[node];
            totals[c] += self.strength(node);
            internal[c] += 2.0 * self.self_loops[node];
            for &(nbr, w) in &self.adjacency[node] {
                if community[nbr] == c {
                    internal[c] += w;
                }
            }
        }

        internal
            .iter()
            .zip(&totals)
            .map(|(&inside, &total)| inside / m2 - resolution * (total / m2).powi(2))
            .sum()
    }

    /// Collapse each community into a single node
    fn aggregate(&self, community: &[usize], count: usize) -> Level {
        let mut rows: Vec<FxHashMap<usize, f64>> = vec![FxHashMap::default(); count];
        let mut self_loops = vec![0.0; count];

        for node in 0..self.len() {
            let cu = community[node];
            self_loops[cu] += self.self_loops[node];
            for &(nbr, w) in &self.adjacency[node] {
                let cv = community[nbr];
                if cu == cv {
                    // Each internal edge is visited from both ends
                    self_loops[cu] += w / 2.0;
                } else {
                    *rows[cu].entry(cv).or_insert(0.0) += w;
                }
            }
        }

        let adjacency = rows
            .into_iter()
            .map(|row| {
                let mut row: Vec<(usize, f64)> = row.into_iter().collect();
                row.sort_by_key(|&(c, _)| c);
                row
            })
            .collect();

        Level {
            adjacency,
            self_loops,
        }
    }
}

/// Greedy local moving phase. Returns the community of every level node and
/// whether any node changed community.
fn local_moving(
    level: &Level,
    config: &LouvainConfig,
    rng: &mut StdRng,
    m2: f64,
    passes: usize,
) -> CommunityResult<(Vec<usize>, bool)> {
    let n = level.len();
    let strength: Vec<f64> = (0..n).map(|i| level.strength(i)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut totals = strength.clone();

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut neighbor_weight = vec![0.0; n];
    let mut seen = vec![false; n];
    let mut touched: Vec<usize> = Vec::new();
    let mut moved_any = false;

    for _ in 0..config.max_sweeps {
        if let Some(deadline) = config.deadline {
            if Instant::now() >= deadline {
                return Err(CommunityError::DeadlineExceeded { passes });
            }
        }

        let mut moves = 0usize;
        for &node in &order {
            for &c in &touched {
                neighbor_weight[c] = 0.0;
                seen[c] = false;
            }
            touched.clear();

            for &(nbr, w) in &level.adjacency[node] {
                let c = community[nbr];
                if !seen[c] {
                    seen[c] = true;
                    touched.push(c);
                }
                neighbor_weight[c] += w;
            }

            let current = community[node];
            let k = strength[node];
            totals[current] -= k;

            let mut best = current;
            let mut best_gain =
                neighbor_weight[current] - config.resolution * totals[current] * k / m2;
            for &c in &touched {
                if c == current {
                    continue;
                }
                let gain = neighbor_weight[c] - config.resolution * totals[c] * k / m2;
                if gain > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = gain;
                }
            }

            totals[best] += k;
            if best != current {
                community[node] = best;
                moves += 1;
            }
        }

        if moves == 0 {
            break;
        }
        moved_any = true;
    }

    Ok((community, moved_any))
}

/// Relabel communities 0..count in order of first appearance
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut mapping = vec![usize::MAX; community.len()];
    let mut next = 0;
    let relabelled = community
        .iter()
        .map(|&c| {
            if mapping[c] == usize::MAX {
                mapping[c] = next;
                next += 1;
            }
            mapping[c]
        })
        .collect();
    (relabelled, next)
}

/// Louvain community detection
///
/// Partitions every node of the view into communities by greedy modularity
/// optimisation. Community IDs are assigned in order of the lowest member index.
pub fn louvain(view: &GraphView, config: &LouvainConfig) -> CommunityResult<LouvainResult> {
    if !(config.resolution.is_finite() && config.resolution > 0.0) {
        return Err(CommunityError::InvalidResolution(config.resolution));
    }

    let n = view.node_count;
    let m2 = view.total_weight();
    let mut membership: Vec<usize> = (0..n).collect();
    let mut level = Level::from_view(view);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut modularity = level.modularity(&membership, n, config.resolution, m2);
    let mut passes = 0;

    if m2 > 0.0 {
        while passes < config.max_passes {
            let (community, moved) = local_moving(&level, config, &mut rng, m2, passes)?;
            if !moved {
                break;
            }

            let (community, count) = renumber(&community);
            let next_modularity = level.modularity(&community, count, config.resolution, m2);
            for m in membership.iter_mut() {
                *m = community[*m];
            }
            level = level.aggregate(&community, count);
            passes += 1;

            let gain = next_modularity - modularity;
            modularity = next_modularity;
            debug!(pass = passes, communities = count, modularity, "louvain pass complete");

            if gain < config.min_modularity_gain {
                break;
            }
        }
    }

    let (membership, count) = renumber(&membership);
    let mut communities = vec![Vec::new(); count];
    let mut node_community = HashMap::with_capacity(n);
    for (idx, &c) in membership.iter().enumerate() {
        let node_id = view.index_to_node[idx];
        communities[c].push(node_id);
        node_community.insert(node_id, c);
    }

    Ok(LouvainResult {
        node_community,
        communities,
        modularity,
        passes,
    })
}
