//! Core type definitions for the procurement graph

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity a node represents, encoded in the id prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum NodeKind {
    Company,
    Director,
    Tender,
    Department,
}

impl NodeKind {
    pub const ALL: [NodeKind; 4] = [
        NodeKind::Company,
        NodeKind::Director,
        NodeKind::Tender,
        NodeKind::Department,
    ];

    /// Id prefix carried by every node of this kind
    pub fn prefix(&self) -> &'static str {
        match self {
            NodeKind::Company => "COMP_",
            NodeKind::Director => "DIR_",
            NodeKind::Tender => "TEND_",
            NodeKind::Department => "DEPT_",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Company => "Company",
            NodeKind::Director => "Director",
            NodeKind::Tender => "Tender",
            NodeKind::Department => "Department",
        }
    }

    /// Classify a bare id by its prefix
    pub fn from_id(id: &str) -> Option<NodeKind> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| id.len() > kind.prefix().len() && id.starts_with(kind.prefix()))
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique identifier for a node, e.g. `COMP_0042`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Kind implied by the id prefix, `None` for an unprefixed id
    pub fn kind(&self) -> Option<NodeKind> {
        NodeKind::from_id(&self.0)
    }

    pub fn is_company(&self) -> bool {
        self.kind() == Some(NodeKind::Company)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl AsRef<str> for NodeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Relationship type of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum RelationshipType {
    #[serde(rename = "DIRECTOR_OF")]
    DirectorOf,
    #[serde(rename = "BIDDED_FOR")]
    BiddedFor,
    #[serde(rename = "WON")]
    Won,
    #[serde(rename = "ISSUED_BY")]
    IssuedBy,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::DirectorOf,
        RelationshipType::BiddedFor,
        RelationshipType::Won,
        RelationshipType::IssuedBy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::DirectorOf => "DIRECTOR_OF",
            RelationshipType::BiddedFor => "BIDDED_FOR",
            RelationshipType::Won => "WON",
            RelationshipType::IssuedBy => "ISSUED_BY",
        }
    }

    /// Expected (source, target) kinds of a relationship row
    pub fn endpoints(&self) -> (NodeKind, NodeKind) {
        match self {
            RelationshipType::DirectorOf => (NodeKind::Director, NodeKind::Company),
            RelationshipType::BiddedFor | RelationshipType::Won => {
                (NodeKind::Company, NodeKind::Tender)
            }
            RelationshipType::IssuedBy => (NodeKind::Tender, NodeKind::Department),
        }
    }

    fn bit(&self) -> u8 {
        match self {
            RelationshipType::DirectorOf => 0b0001,
            RelationshipType::BiddedFor => 0b0010,
            RelationshipType::Won => 0b0100,
            RelationshipType::IssuedBy => 0b1000,
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .into_iter()
            .find(|rel| rel.as_str() == s)
            .ok_or_else(|| format!("unknown relationship type '{}'", s))
    }
}

/// Set of relationship types folded onto one undirected edge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RelationshipSet(u8);

impl RelationshipSet {
    pub fn single(rel: RelationshipType) -> Self {
        RelationshipSet(rel.bit())
    }

    pub fn insert(&mut self, rel: RelationshipType) -> bool {
        let added = !self.contains(rel);
        self.0 |= rel.bit();
        added
    }

    pub fn contains(&self, rel: RelationshipType) -> bool {
        self.0 & rel.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Members in declaration order
    pub fn iter(&self) -> impl Iterator<Item = RelationshipType> + '_ {
        RelationshipType::ALL
            .into_iter()
            .filter(move |rel| self.contains(*rel))
    }
}
