//! The five input tables, as typed records

use super::loader::{LoadError, LoadResult};
use crate::graph::{Company, Department, Director, Entity, NodeKind, Relationship, Tender};
use std::collections::HashSet;

/// Fully materialised entity and relationship tables
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub companies: Vec<Company>,
    pub directors: Vec<Director>,
    pub tenders: Vec<Tender>,
    pub departments: Vec<Department>,
    pub relationships: Vec<Relationship>,
}

impl Tables {
    /// Row-level validation run before the graph is built.
    ///
    /// Checks id prefixes, global id uniqueness, fraud labels and contract values.
    /// Row numbers in errors are 1-based and exclude the header line.
    pub fn validate(&self) -> LoadResult<()> {
        let mut seen = HashSet::new();

        check_entities("companies", &self.companies, &mut seen)?;
        check_entities("directors", &self.directors, &mut seen)?;
        check_entities("tenders", &self.tenders, &mut seen)?;
        check_entities("departments", &self.departments, &mut seen)?;

        for (i, tender) in self.tenders.iter().enumerate() {
            if !tender.contract_value.is_finite() || tender.contract_value < 0.0 {
                return Err(LoadError::InvalidRow {
                    table: "tenders",
                    row: i + 1,
                    reason: format!(
                        "contract_value must be a non-negative number, got {}",
                        tender.contract_value
                    ),
                });
            }
        }

        Ok(())
    }

    /// Total number of entity rows (excluding relationships)
    pub fn entity_count(&self) -> usize {
        self.companies.len() + self.directors.len() + self.tenders.len() + self.departments.len()
    }
}

fn check_entities<'a, T: Entity>(
    table: &'static str,
    rows: &'a [T],
    seen: &mut HashSet<&'a str>,
) -> LoadResult<()> {
    for (i, row) in rows.iter().enumerate() {
        let id = row.id();
        let invalid = |reason: String| LoadError::InvalidRow {
            table,
            row: i + 1,
            reason,
        };

        if id.kind() != Some(T::KIND) {
            return Err(invalid(format!(
                "id '{}' must start with {}",
                id,
                T::KIND.prefix()
            )));
        }
        if !seen.insert(id.as_str()) {
            return Err(invalid(format!("duplicate id '{}'", id)));
        }
        if let Some(label) = row.fraud_label() {
            if label > 1 {
                return Err(invalid(format!("fraud_label must be 0 or 1, got {}", label)));
            }
        }
    }
    Ok(())
}

/// Kind-wise row counts, for logging
pub(crate) fn row_counts(tables: &Tables) -> [(NodeKind, usize); 4] {
    [
        (NodeKind::Company, tables.companies.len()),
        (NodeKind::Director, tables.directors.len()),
        (NodeKind::Tender, tables.tenders.len()),
        (NodeKind::Department, tables.departments.len()),
    ]
}
