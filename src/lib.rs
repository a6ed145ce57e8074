//! Netra Procurement Risk Engine
//!
//! Scores companies in a public-procurement network for fraud risk and flags
//! clusters of companies whose collective behaviour suggests collusion.
//!
//! # Architecture
//!
//! - `graph`: typed entity records and the undirected multi-relational graph
//!   built from the five input tables
//! - `snapshot`: CSV loading, validation and the immutable [`Snapshot`] every run
//!   reads through the [`ProcurementSource`] interface
//! - `algo`: projection of a source into a CSR view for the algorithms crate
//! - `risk`: the four factors, weighted aggregation, batch scoring, fraud
//!   clusters and investigation summaries
//! - `config`: YAML engine configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use netra::graph::{Company, Director, NodeId, Relationship, RelationshipType};
//! use netra::snapshot::{Snapshot, Tables};
//! use netra::risk::{RiskCategory, RiskEngine};
//!
//! let company = |id: &str| Company {
//!     company_id: NodeId::new(id),
//!     name: id.to_string(),
//!     registration_year: 2018,
//!     industry_type: "Construction".to_string(),
//!     address: format!("{} Main St", id),
//!     fraud_label: 0,
//! };
//! let tables = Tables {
//!     companies: vec![company("COMP_A"), company("COMP_B")],
//!     directors: vec![Director {
//!         director_id: NodeId::new("DIR_X"),
//!         name: "Jane Roe".to_string(),
//!         age: 51,
//!         fraud_label: 0,
//!     }],
//!     relationships: vec![
//!         Relationship::new("DIR_X", "COMP_A", RelationshipType::DirectorOf),
//!         Relationship::new("DIR_X", "COMP_B", RelationshipType::DirectorOf),
//!     ],
//!     ..Tables::default()
//! };
//!
//! let snapshot = Snapshot::from_tables(tables).unwrap();
//! let engine = RiskEngine::new(&snapshot);
//!
//! let score = engine.score_company(&NodeId::new("COMP_A")).unwrap();
//! assert!(score.risk_score >= 0.0 && score.risk_score <= 1.0);
//! assert_eq!(score.category, RiskCategory::Low);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod graph;
pub mod risk;
pub mod snapshot;

// Re-export main types for convenience
pub use graph::{
    Company, Department, Director, GraphError, GraphResult, GraphStore, Node, NodeId, NodeKind,
    Relationship, RelationshipType, Tender,
};

pub use snapshot::{
    LoadError, LoadResult, ProcurementSource, Snapshot, SnapshotHandle, TableLoader, Tables,
};

pub use risk::{
    CompanyRiskScore, FraudCluster, InvestigationSummary, RiskCategory, RiskEngine, RiskError,
    RiskIndicator, RiskResult, RiskScoreRecord, RiskSummary, Severity,
};

pub use config::{ConfigError, ConfigResult, EngineConfig};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
