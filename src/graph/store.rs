//! In-memory graph storage
//!
//! An undirected, multi-relational graph over typed entity nodes. Nodes live in a
//! dense arena addressed by index, with a hash index from [`NodeId`] for O(1) lookup.
//! The store is built once from the entity tables and then only read.

use super::edge::{Adjacency, Relationship};
use super::node::Node;
use super::types::{NodeId, NodeKind, RelationshipType};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors that can occur while building or querying the graph
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Node {0} not found")]
    NodeNotFound(NodeId),

    #[error("Node {0} already exists")]
    NodeAlreadyExists(NodeId),

    #[error("Invalid edge: source node {0} does not exist")]
    InvalidEdgeSource(NodeId),

    #[error("Invalid edge: target node {0} does not exist")]
    InvalidEdgeTarget(NodeId),

    #[error("Node id {id} does not carry the {expected} prefix")]
    InvalidIdPrefix { id: NodeId, expected: NodeKind },

    #[error("Invalid edge: {relationship} cannot connect {from} to {to}")]
    EndpointKindMismatch {
        relationship: RelationshipType,
        from: NodeId,
        to: NodeId,
    },

    #[error("Invalid edge: self-loop on {0}")]
    SelfLoop(NodeId),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Summary counts of a built graph
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub nodes_by_kind: BTreeMap<NodeKind, usize>,
    pub node_count: usize,
    /// Distinct undirected node pairs
    pub edge_count: usize,
    /// Distinct (pair, relationship type) combinations
    pub relationship_count: usize,
    pub max_degree: usize,
}

/// In-memory graph storage
///
/// - nodes: dense arena of entity nodes
/// - index: NodeId -> arena position
/// - adjacency: arena position -> distinct neighbours with their relationship types
/// - kind_index: NodeKind -> arena positions, in insertion order
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
    adjacency: Vec<Vec<Adjacency>>,
    kind_index: HashMap<NodeKind, Vec<usize>>,
    edge_count: usize,
    relationship_count: usize,
}

impl GraphStore {
    /// Create a new empty graph store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, returning its arena position
    pub fn add_node(&mut self, node: impl Into<Node>) -> GraphResult<usize> {
        let node = node.into();
        let id = node.id().clone();

        if id.kind() != Some(node.kind()) {
            return Err(GraphError::InvalidIdPrefix {
                id,
                expected: node.kind(),
            });
        }
        if self.index.contains_key(&id) {
            return Err(GraphError::NodeAlreadyExists(id));
        }

        let idx = self.nodes.len();
        self.kind_index.entry(node.kind()).or_default().push(idx);
        self.index.insert(id, idx);
        self.nodes.push(node);
        self.adjacency.push(Vec::new());
        Ok(idx)
    }

    /// Add a typed relationship between two existing nodes.
    ///
    /// A relationship parallel to an existing edge is folded into that edge's
    /// relationship set. Returns `false` if the exact relationship was already present.
    pub fn add_relationship(&mut self, rel: &Relationship) -> GraphResult<bool> {
        let source = *self
            .index
            .get(&rel.source_id)
            .ok_or_else(|| GraphError::InvalidEdgeSource(rel.source_id.clone()))?;
        let target = *self
            .index
            .get(&rel.target_id)
            .ok_or_else(|| GraphError::InvalidEdgeTarget(rel.target_id.clone()))?;

        if source == target {
            return Err(GraphError::SelfLoop(rel.source_id.clone()));
        }

        let (source_kind, target_kind) = rel.relationship_type.endpoints();
        if self.nodes[source].kind() != source_kind || self.nodes[target].kind() != target_kind {
            return Err(GraphError::EndpointKindMismatch {
                relationship: rel.relationship_type,
                from: rel.source_id.clone(),
                to: rel.target_id.clone(),
            });
        }

        let existing = self.adjacency[source]
            .iter()
            .position(|adj| adj.neighbor == target);
        let Some(pos) = existing else {
            self.adjacency[source].push(Adjacency::new(target, rel.relationship_type));
            self.adjacency[target].push(Adjacency::new(source, rel.relationship_type));
            self.edge_count += 1;
            self.relationship_count += 1;
            return Ok(true);
        };

        let added = self.adjacency[source][pos]
            .relationships
            .insert(rel.relationship_type);
        if added {
            if let Some(mirror) = self.adjacency[target]
                .iter_mut()
                .find(|adj| adj.neighbor == source)
            {
                mirror.relationships.insert(rel.relationship_type);
            }
            self.relationship_count += 1;
        }
        Ok(added)
    }

    /// Get a node by id
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Get a node by id, or [`GraphError::NodeNotFound`]
    pub fn node(&self, id: &NodeId) -> GraphResult<&Node> {
        self.get_node(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.clone()))
    }

    /// Check if a node exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Arena position of a node
    pub fn index_of(&self, id: &NodeId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Node at an arena position
    pub fn node_at(&self, idx: usize) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// Distinct neighbours of the node at an arena position
    pub fn adjacency(&self, idx: usize) -> &[Adjacency] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Neighbours of a node as (neighbour id, relationship type) pairs.
    ///
    /// A neighbour connected by several relationship types appears once per type.
    /// With a filter, only pairs of that type are returned. Unknown ids have no neighbours.
    pub fn neighbors(
        &self,
        id: &NodeId,
        relationship: Option<RelationshipType>,
    ) -> Vec<(&NodeId, RelationshipType)> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };

        let mut result = Vec::new();
        for adj in &self.adjacency[idx] {
            let neighbor = self.nodes[adj.neighbor].id();
            for rel in adj.relationships.iter() {
                if relationship.map_or(true, |wanted| wanted == rel) {
                    result.push((neighbor, rel));
                }
            }
        }
        result
    }

    /// Number of distinct neighbours, `None` if the node is absent
    pub fn degree(&self, id: &NodeId) -> Option<usize> {
        self.index_of(id).map(|idx| self.adjacency[idx].len())
    }

    /// Highest degree over all nodes, 0 for an empty graph
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Get all nodes of a kind, in insertion order
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.kind_index
            .get(&kind)
            .map(|positions| positions.iter().map(|&idx| &self.nodes[idx]).collect())
            .unwrap_or_default()
    }

    /// Get all nodes, in insertion order
    pub fn all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get total number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get number of distinct undirected node pairs
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Get number of distinct typed relationships
    pub fn relationship_count(&self) -> usize {
        self.relationship_count
    }

    pub fn statistics(&self) -> GraphStatistics {
        GraphStatistics {
            nodes_by_kind: self
                .kind_index
                .iter()
                .map(|(kind, positions)| (*kind, positions.len()))
                .collect(),
            node_count: self.node_count(),
            edge_count: self.edge_count,
            relationship_count: self.relationship_count,
            max_degree: self.max_degree(),
        }
    }
}
