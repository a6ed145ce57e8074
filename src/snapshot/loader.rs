//! CSV loading of the entity and relationship tables

use super::tables::{row_counts, Tables};
use crate::graph::GraphError;
use csv::ReaderBuilder;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort loading a snapshot
#[derive(Error, Debug)]
pub enum LoadError {
    /// A table file could not be opened
    #[error("Failed to open {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A row is missing a column or a value failed to parse
    #[error("Malformed CSV in {path:?}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    /// A row parsed but violates a table invariant
    #[error("Invalid row {row} in {table}: {reason}")]
    InvalidRow {
        table: &'static str,
        row: usize,
        reason: String,
    },

    /// The relationships do not form a valid graph over the entities
    #[error("Graph construction failed: {0}")]
    Graph(#[from] GraphError),
}

pub type LoadResult<T> = Result<T, LoadError>;

/// Reads the five tables from a directory of CSV files
#[derive(Debug, Clone)]
pub struct TableLoader {
    dir: PathBuf,
}

impl TableLoader {
    pub const COMPANIES: &'static str = "companies.csv";
    pub const DIRECTORS: &'static str = "directors.csv";
    pub const TENDERS: &'static str = "tenders.csv";
    pub const DEPARTMENTS: &'static str = "departments.csv";
    pub const RELATIONSHIPS: &'static str = "relationships.csv";

    pub fn new(dir: impl AsRef<Path>) -> Self {
        TableLoader {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load and validate all tables
    pub fn load(&self) -> LoadResult<Tables> {
        info!("Loading tables from {:?}", self.dir);

        let tables = Tables {
            companies: self.read_table(Self::COMPANIES)?,
            directors: self.read_table(Self::DIRECTORS)?,
            tenders: self.read_table(Self::TENDERS)?,
            departments: self.read_table(Self::DEPARTMENTS)?,
            relationships: self.read_table(Self::RELATIONSHIPS)?,
        };
        tables.validate()?;

        for (kind, count) in row_counts(&tables) {
            debug!("Loaded {} {} rows", count, kind);
        }
        info!(
            "Loaded {} entities and {} relationships",
            tables.entity_count(),
            tables.relationships.len()
        );

        Ok(tables)
    }

    fn read_table<T: DeserializeOwned>(&self, file_name: &str) -> LoadResult<Vec<T>> {
        let path = self.dir.join(file_name);
        let file = File::open(&path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;

        let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
        let mut rows = Vec::new();
        for result in reader.deserialize() {
            let row: T = result.map_err(|source| LoadError::Csv {
                path: path.clone(),
                source,
            })?;
            rows.push(row);
        }

        Ok(rows)
    }
}
