//! Graph Builder: turns the five entity/relationship tables into a [`GraphStore`]

use super::store::{GraphResult, GraphStore};
use crate::snapshot::Tables;
use tracing::debug;

impl GraphStore {
    /// Build the undirected procurement graph from loaded tables.
    ///
    /// Every company, director, tender and department row becomes a node and every
    /// relationship row becomes a typed edge. The first row that names a missing
    /// node, repeats an id or connects the wrong kinds of entity aborts the build.
    pub fn from_tables(tables: &Tables) -> GraphResult<Self> {
        let mut store = GraphStore::new();

        for company in &tables.companies {
            store.add_node(company.clone())?;
        }
        for director in &tables.directors {
            store.add_node(director.clone())?;
        }
        for tender in &tables.tenders {
            store.add_node(tender.clone())?;
        }
        for department in &tables.departments {
            store.add_node(department.clone())?;
        }

        let mut folded = 0usize;
        for rel in &tables.relationships {
            if !store.add_relationship(rel)? {
                folded += 1;
            }
        }

        debug!(
            nodes = store.node_count(),
            edges = store.edge_count(),
            relationships = store.relationship_count(),
            duplicate_rows = folded,
            "graph built"
        );

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{
        Company, Department, Director, GraphError, GraphStore, NodeId, Relationship,
        RelationshipType, Tender,
    };
    use crate::snapshot::Tables;

    fn tables() -> Tables {
        Tables {
            companies: vec![Company {
                company_id: NodeId::new("COMP_0001"),
                name: "Apex Ltd.".to_string(),
                registration_year: 2015,
                industry_type: "Energy".to_string(),
                address: "9 Elm St".to_string(),
                fraud_label: 0,
            }],
            directors: vec![Director {
                director_id: NodeId::new("DIR_0001"),
                name: "Heer Doshi".to_string(),
                age: 44,
                fraud_label: 0,
            }],
            tenders: vec![Tender {
                tender_id: NodeId::new("TEND_0001"),
                department_id: NodeId::new("DEPT_01"),
                contract_value: 250_000.0,
                year: 2021,
                winning_company_id: NodeId::new("COMP_0001"),
                fraud_label: 0,
            }],
            departments: vec![Department {
                department_id: NodeId::new("DEPT_01"),
                name: "Department of Health".to_string(),
                location: "North".to_string(),
            }],
            relationships: vec![
                Relationship::new("DIR_0001", "COMP_0001", RelationshipType::DirectorOf),
                Relationship::new("COMP_0001", "TEND_0001", RelationshipType::BiddedFor),
                Relationship::new("COMP_0001", "TEND_0001", RelationshipType::Won),
                Relationship::new("TEND_0001", "DEPT_01", RelationshipType::IssuedBy),
            ],
        }
    }

    #[test]
    fn test_build_from_tables() {
        let store = GraphStore::from_tables(&tables()).unwrap();

        assert_eq!(store.node_count(), 4);
        assert_eq!(store.edge_count(), 3);
        assert_eq!(store.relationship_count(), 4);
        assert_eq!(store.degree(&NodeId::new("COMP_0001")), Some(2));
        assert_eq!(store.degree(&NodeId::new("TEND_0001")), Some(2));
    }

    #[test]
    fn test_dangling_relationship_aborts_build() {
        let mut tables = tables();
        tables.relationships.push(Relationship::new(
            "TEND_0001",
            "DEPT_99",
            RelationshipType::IssuedBy,
        ));

        let err = GraphStore::from_tables(&tables).unwrap_err();
        assert_eq!(err, GraphError::InvalidEdgeTarget(NodeId::new("DEPT_99")));
    }
}
