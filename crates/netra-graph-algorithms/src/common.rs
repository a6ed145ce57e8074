//! Shared utilities for graph algorithms
//!
//! Provides a read-only, dense view of an undirected graph for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph in Compressed Sparse Row (CSR) format.
///
/// Every undirected edge `{u, v}` is stored twice, once in the row of `u` and once in the
/// row of `v`, so `neighbors(i)` is the complete neighbourhood of `i`.
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbour indices
    pub targets: Vec<usize>,
    /// Edge weights, aligned with `targets`
    pub weights: Vec<f64>,
}

impl GraphView {
    /// Build a view from undirected edges given as dense index pairs.
    ///
    /// Duplicate pairs are accumulated into a single weighted edge. Self-loops are ignored.
    pub fn from_undirected_edges(
        index_to_node: Vec<NodeId>,
        edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Self {
        let node_count = index_to_node.len();
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];

        for (u, v, w) in edges {
            if u == v || u >= node_count || v >= node_count {
                continue;
            }
            rows[u].push((v, w));
            rows[v].push((u, w));
        }

        Self::from_adjacency_list(index_to_node, rows)
    }

    /// Build a view from per-node adjacency rows.
    ///
    /// Rows are sorted by neighbour index and duplicate neighbours are merged by summing
    /// their weights, so the resulting layout does not depend on input order.
    pub fn from_adjacency_list(index_to_node: Vec<NodeId>, adjacency: Vec<Vec<(usize, f64)>>) -> Self {
        let node_count = index_to_node.len();
        let node_to_index = index_to_node
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();

        offsets.push(0);
        for mut row in adjacency.into_iter().take(node_count) {
            row.sort_by_key(|&(v, _)| v);
            let mut last: Option<usize> = None;
            for (v, w) in row {
                if last == Some(v) {
                    if let Some(acc) = weights.last_mut() {
                        *acc += w;
                    }
                    continue;
                }
                targets.push(v);
                weights.push(w);
                last = Some(v);
            }
            offsets.push(targets.len());
        }
        // Pad rows for nodes that had no adjacency entry
        while offsets.len() < node_count + 1 {
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights,
        }
    }

    /// Number of distinct neighbours of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Neighbours of a node, ascending by index
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        &self.targets[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Weights of the edges to `neighbors(idx)`
    pub fn edge_weights(&self, idx: usize) -> &[f64] {
        &self.weights[self.offsets[idx]..self.offsets[idx + 1]]
    }

    /// Sum of incident edge weights
    pub fn weighted_degree(&self, idx: usize) -> f64 {
        self.edge_weights(idx).iter().sum()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Twice the total edge weight (the `2m` of the modularity formula)
    pub fn total_weight(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Highest degree over all nodes, 0 for an empty view
    pub fn max_degree(&self) -> usize {
        (0..self.node_count).map(|i| self.degree(i)).max().unwrap_or(0)
    }
}
