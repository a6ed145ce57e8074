//! Graph algorithms for the Netra risk engine
//!
//! Algorithms run over a [`GraphView`], a dense CSR projection of an undirected graph,
//! so they stay independent of how the caller stores its entities.

pub mod common;
pub mod community;

pub use common::{GraphView, NodeId};
pub use community::{louvain, CommunityError, CommunityResult, LouvainConfig, LouvainResult};
