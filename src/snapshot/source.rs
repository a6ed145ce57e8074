//! Narrow read interface the risk engine queries
//!
//! The engine never touches storage directly. Any backend that can answer these
//! queries (the in-memory [`Snapshot`](super::Snapshot), or a persistent graph
//! database adapter) can be scored and clustered.

use crate::graph::{
    Company, Director, GraphResult, Node, NodeId, NodeKind, RelationshipType, Tender,
};

pub trait ProcurementSource: Sync {
    /// Attributes of a node, or `NodeNotFound`
    fn get_node(&self, id: &NodeId) -> GraphResult<&Node>;

    /// (neighbour id, relationship type) pairs, optionally filtered by type.
    /// Empty for nodes without graph presence.
    fn neighbors(
        &self,
        id: &NodeId,
        relationship: Option<RelationshipType>,
    ) -> Vec<(&NodeId, RelationshipType)>;

    /// Number of distinct neighbours, `None` when the entity has no graph presence
    fn degree(&self, id: &NodeId) -> Option<usize>;

    /// Every node id in the graph
    fn node_ids(&self) -> Vec<&NodeId>;

    fn companies(&self) -> Vec<&Company>;

    fn directors(&self) -> Vec<&Director>;

    fn tenders(&self) -> Vec<&Tender>;

    /// Highest degree over all nodes, 0 for an empty graph
    fn max_degree(&self) -> usize {
        self.node_ids()
            .into_iter()
            .filter_map(|id| self.degree(id))
            .max()
            .unwrap_or(0)
    }

    /// Company record by id, `None` if the id is unknown or not a company
    fn company(&self, id: &NodeId) -> Option<&Company> {
        self.get_node(id).ok().and_then(Node::as_company)
    }

    /// Distinct neighbours of one kind reached through one relationship type,
    /// in first-seen order
    fn linked(&self, id: &NodeId, relationship: RelationshipType, kind: NodeKind) -> Vec<&NodeId> {
        let mut result: Vec<&NodeId> = Vec::new();
        for (neighbor, _) in self.neighbors(id, Some(relationship)) {
            if neighbor.kind() == Some(kind) && !result.contains(&neighbor) {
                result.push(neighbor);
            }
        }
        result
    }
}
