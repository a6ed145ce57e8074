//! Immutable data snapshot
//!
//! A [`Snapshot`] is the fully loaded graph one scoring or clustering run reads.
//! It is never mutated; a reload builds a new snapshot and swaps it in whole
//! through a [`SnapshotHandle`].

pub mod loader;
pub mod source;
pub mod tables;

pub use loader::{LoadError, LoadResult, TableLoader};
pub use source::ProcurementSource;
pub use tables::Tables;

use crate::graph::{
    Company, Director, GraphResult, GraphStatistics, GraphStore, Node, NodeId, NodeKind,
    RelationshipType, Tender,
};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// The in-memory procurement graph
#[derive(Debug)]
pub struct Snapshot {
    graph: GraphStore,
}

impl Snapshot {
    /// Validate the tables and build the graph
    pub fn from_tables(tables: Tables) -> LoadResult<Self> {
        tables.validate()?;
        let graph = GraphStore::from_tables(&tables)?;

        info!(
            "Snapshot ready: {} nodes, {} edges, max degree {}",
            graph.node_count(),
            graph.edge_count(),
            graph.max_degree()
        );

        Ok(Snapshot { graph })
    }

    /// Load the CSV tables in `dir` and build the graph
    pub fn load(dir: impl AsRef<Path>) -> LoadResult<Self> {
        let tables = TableLoader::new(dir).load()?;
        Self::from_tables(tables)
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn statistics(&self) -> GraphStatistics {
        self.graph.statistics()
    }

    fn records<'a, T>(&'a self, kind: NodeKind, pick: fn(&'a Node) -> Option<&'a T>) -> Vec<&'a T> {
        self.graph
            .nodes_by_kind(kind)
            .into_iter()
            .filter_map(pick)
            .collect()
    }
}

impl ProcurementSource for Snapshot {
    fn get_node(&self, id: &NodeId) -> GraphResult<&Node> {
        self.graph.node(id)
    }

    fn neighbors(
        &self,
        id: &NodeId,
        relationship: Option<RelationshipType>,
    ) -> Vec<(&NodeId, RelationshipType)> {
        self.graph.neighbors(id, relationship)
    }

    fn degree(&self, id: &NodeId) -> Option<usize> {
        self.graph.degree(id)
    }

    fn node_ids(&self) -> Vec<&NodeId> {
        self.graph.all_nodes().iter().map(Node::id).collect()
    }

    fn companies(&self) -> Vec<&Company> {
        self.records(NodeKind::Company, Node::as_company)
    }

    fn directors(&self) -> Vec<&Director> {
        self.records(NodeKind::Director, Node::as_director)
    }

    fn tenders(&self) -> Vec<&Tender> {
        self.records(NodeKind::Tender, Node::as_tender)
    }

    fn max_degree(&self) -> usize {
        self.graph.max_degree()
    }
}

/// Shared pointer to the current snapshot, replaced atomically on reload
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: Snapshot) -> Self {
        SnapshotHandle {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The snapshot in effect now. Runs holding it are unaffected by later reloads.
    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Swap in a new snapshot, returning the previous one
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }

    /// Load `dir` into a new snapshot and swap it in. On failure the current
    /// snapshot stays in place.
    pub fn reload(&self, dir: impl AsRef<Path>) -> LoadResult<Arc<Snapshot>> {
        let snapshot = Snapshot::load(dir)?;
        self.replace(snapshot);
        Ok(self.current())
    }
}
