//! Procurement relationship graph
//!
//! This module implements the undirected, multi-relational graph the risk engine runs on:
//! - Typed entity nodes (companies, directors, tenders, departments) identified by prefixed ids
//! - Typed relationships, with parallel relationships folded into one edge
//! - An in-memory, read-only store built from the entity tables

pub mod builder;
pub mod edge;
pub mod node;
pub mod store;
pub mod types;

// Re-export main types
pub use edge::{Adjacency, Relationship};
pub use node::{Company, Department, Director, Entity, Node, Tender};
pub use store::{GraphError, GraphResult, GraphStatistics, GraphStore};
pub use types::{NodeId, NodeKind, RelationshipSet, RelationshipType};
