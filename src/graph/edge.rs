//! Relationship rows and undirected adjacency entries
//!
//! Relationship rows are directed as they appear in the source table
//! (e.g. director -> company). The graph itself is undirected: each row becomes
//! an [`Adjacency`] entry on both endpoints, and parallel rows between the same
//! pair fold into one entry carrying a [`RelationshipSet`].

use super::types::{NodeId, RelationshipSet, RelationshipType};
use serde::{Deserialize, Serialize};

/// One row of the relationships table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub source_id: NodeId,
    pub target_id: NodeId,
    pub relationship_type: RelationshipType,
}

impl Relationship {
    pub fn new(
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
        relationship_type: RelationshipType,
    ) -> Self {
        Relationship {
            source_id: source.into(),
            target_id: target.into(),
            relationship_type,
        }
    }
}

/// Edge from a node to one distinct neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency {
    /// Dense index of the neighbour in the store
    pub neighbor: usize,
    /// Every relationship type connecting the pair
    pub relationships: RelationshipSet,
}

impl Adjacency {
    pub fn new(neighbor: usize, rel: RelationshipType) -> Self {
        Adjacency {
            neighbor,
            relationships: RelationshipSet::single(rel),
        }
    }
}
