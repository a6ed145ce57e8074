//! Graph algorithms module
//!
//! Algorithms are implemented in the `netra-graph-algorithms` crate.
//! This module provides the integration/adapter layer.

use crate::graph::NodeId;
use crate::snapshot::ProcurementSource;
use netra_graph_algorithms::{GraphView, NodeId as AlgoNodeId};
use std::collections::HashMap;

// Re-export algorithms
pub use netra_graph_algorithms::{
    louvain, CommunityError, CommunityResult, LouvainConfig, LouvainResult,
};

/// A [`GraphView`] over a source, with the entity id behind every view node
pub struct Projection<'a> {
    pub view: GraphView,
    /// Entity id of view node `i` (view NodeIds are positions in this list)
    pub ids: Vec<&'a NodeId>,
}

impl<'a> Projection<'a> {
    pub fn entity_id(&self, node: AlgoNodeId) -> Option<&'a NodeId> {
        usize::try_from(node).ok().and_then(|i| self.ids.get(i).copied())
    }
}

/// Project the whole source graph, all node kinds, into an undirected view.
///
/// Nodes are ordered by id so the view does not depend on backend enumeration
/// order. Each distinct neighbour pair becomes one edge of weight 1, however many
/// relationship types connect it.
pub fn build_view<S: ProcurementSource + ?Sized>(source: &S) -> Projection<'_> {
    // 1. Collect and order nodes
    let mut ids = source.node_ids();
    ids.sort();
    ids.dedup();

    // 2. Build index mappings
    let index: HashMap<&NodeId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let index_to_node: Vec<AlgoNodeId> = (0..ids.len() as AlgoNodeId).collect();

    // 3. Build adjacency lists
    let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); ids.len()];
    for (u, id) in ids.iter().enumerate() {
        let mut row: Vec<usize> = source
            .neighbors(id, None)
            .into_iter()
            .filter_map(|(neighbor, _)| index.get(neighbor).copied())
            .filter(|&v| v != u)
            .collect();
        row.sort_unstable();
        row.dedup();
        adjacency[u] = row.into_iter().map(|v| (v, 1.0)).collect();
    }

    Projection {
        view: GraphView::from_adjacency_list(index_to_node, adjacency),
        ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Company, Relationship, RelationshipType, Tender};
    use crate::snapshot::{Snapshot, Tables};

    #[test]
    fn test_projection_folds_parallel_relationships() {
        let tables = Tables {
            companies: vec![Company {
                company_id: NodeId::new("COMP_B"),
                name: "B".to_string(),
                registration_year: 2000,
                industry_type: "IT Services".to_string(),
                address: "2 Park St".to_string(),
                fraud_label: 0,
            }],
            tenders: vec![Tender {
                tender_id: NodeId::new("TEND_A"),
                department_id: NodeId::new("DEPT_00"),
                contract_value: 1.0,
                year: 2019,
                winning_company_id: NodeId::new("COMP_B"),
                fraud_label: 0,
            }],
            relationships: vec![
                Relationship::new("COMP_B", "TEND_A", RelationshipType::BiddedFor),
                Relationship::new("COMP_B", "TEND_A", RelationshipType::Won),
            ],
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let projection = build_view(&snapshot);

        assert_eq!(projection.view.node_count, 2);
        assert_eq!(projection.view.edge_count(), 1);
        // Sorted by id: COMP_B before TEND_A
        assert_eq!(projection.entity_id(0).unwrap().as_str(), "COMP_B");
        assert_eq!(projection.view.edge_weights(0), &[1.0]);
    }
}
