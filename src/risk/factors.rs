//! The four risk factors
//!
//! Every factor is a pure function of the source plus the precomputed
//! [`GlobalAggregates`]. Missing relationships degrade a factor to 0.0, never
//! to an error.

use crate::graph::{Company, NodeId, NodeKind, RelationshipType, Tender};
use crate::snapshot::ProcurementSource;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Network-wide values shared read-only by every per-company computation
#[derive(Debug, Clone, Default)]
pub struct GlobalAggregates {
    pub tender_count: usize,
    /// Mean contract value over all tenders, 0.0 without tenders
    pub mean_contract_value: f64,
    pub max_degree: usize,
    address_counts: FxHashMap<String, usize>,
    year_counts: FxHashMap<i32, usize>,
}

impl GlobalAggregates {
    pub fn compute<S: ProcurementSource + ?Sized>(source: &S) -> Self {
        let tenders = source.tenders();
        let tender_count = tenders.len();
        let mean_contract_value = if tender_count == 0 {
            0.0
        } else {
            tenders.iter().map(|t| t.contract_value).sum::<f64>() / tender_count as f64
        };

        let mut address_counts: FxHashMap<String, usize> = FxHashMap::default();
        let mut year_counts: FxHashMap<i32, usize> = FxHashMap::default();
        for company in source.companies() {
            *address_counts.entry(company.address.clone()).or_insert(0) += 1;
            *year_counts.entry(company.registration_year).or_insert(0) += 1;
        }

        let max_degree = source.max_degree();

        info!(
            "Global aggregates: {} tenders, mean contract value {:.2}, max degree {}",
            tender_count, mean_contract_value, max_degree
        );

        GlobalAggregates {
            tender_count,
            mean_contract_value,
            max_degree,
            address_counts,
            year_counts,
        }
    }

    /// Companies registered at this exact address, including the asking company
    pub fn companies_at_address(&self, address: &str) -> usize {
        self.address_counts.get(address).copied().unwrap_or(0)
    }

    /// Companies registered in this year, including the asking company
    pub fn companies_registered_in(&self, year: i32) -> usize {
        self.year_counts.get(&year).copied().unwrap_or(0)
    }
}

/// The four factor values of one company
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorBreakdown {
    pub shared_directors: f64,
    pub win_pattern: f64,
    pub centrality: f64,
    pub shell_similarity: f64,
}

impl FactorBreakdown {
    pub fn compute<S: ProcurementSource + ?Sized>(
        source: &S,
        globals: &GlobalAggregates,
        company: &Company,
    ) -> Self {
        FactorBreakdown {
            shared_directors: shared_directors(source, &company.company_id),
            win_pattern: win_pattern(source, globals, &company.company_id),
            centrality: centrality(source, globals, &company.company_id),
            shell_similarity: shell_similarity(globals, company),
        }
    }
}

/// Other companies reachable through any director of `company`
pub fn director_linked_companies<'s, S: ProcurementSource + ?Sized>(
    source: &'s S,
    company: &NodeId,
) -> BTreeSet<&'s NodeId> {
    let mut others = BTreeSet::new();
    for director in source.linked(company, RelationshipType::DirectorOf, NodeKind::Director) {
        for other in source.linked(director, RelationshipType::DirectorOf, NodeKind::Company) {
            if other != company {
                others.insert(other);
            }
        }
    }
    others
}

/// Distinct other companies sharing a director, over 10, capped at 1.0
pub fn shared_directors<S: ProcurementSource + ?Sized>(source: &S, company: &NodeId) -> f64 {
    let others = director_linked_companies(source, company).len();
    (others as f64 / 10.0).min(1.0)
}

/// Distinct tenders the company won, in first-seen order
pub fn won_tenders<'s, S: ProcurementSource + ?Sized>(
    source: &'s S,
    company: &NodeId,
) -> Vec<&'s Tender> {
    source
        .linked(company, RelationshipType::Won, NodeKind::Tender)
        .into_iter()
        .filter_map(|id| source.get_node(id).ok().and_then(|node| node.as_tender()))
        .collect()
}

/// Win-pattern anomaly: value ratio of won tenders against the network mean,
/// plus win frequency
pub fn win_pattern<S: ProcurementSource + ?Sized>(
    source: &S,
    globals: &GlobalAggregates,
    company: &NodeId,
) -> f64 {
    let won = won_tenders(source, company);
    if won.is_empty() || globals.tender_count == 0 {
        return 0.0;
    }

    let avg_won = won.iter().map(|t| t.contract_value).sum::<f64>() / won.len() as f64;
    let value_ratio = if globals.mean_contract_value > 0.0 {
        avg_won / globals.mean_contract_value
    } else {
        1.0
    };
    let win_frequency = won.len() as f64 / globals.tender_count as f64;

    ((value_ratio - 1.0) * 0.5 + win_frequency * 2.0).clamp(0.0, 1.0)
}

/// Degree over the maximum degree in the graph
pub fn centrality<S: ProcurementSource + ?Sized>(
    source: &S,
    globals: &GlobalAggregates,
    company: &NodeId,
) -> f64 {
    match source.degree(company) {
        Some(degree) if globals.max_degree > 0 => {
            (degree as f64 / globals.max_degree as f64).min(1.0)
        }
        _ => 0.0,
    }
}

/// Shared address (up to 1.0) plus shared registration year (up to 0.5).
/// The sum may exceed 1.0; the aggregator clamps the total.
pub fn shell_similarity(globals: &GlobalAggregates, company: &Company) -> f64 {
    let same_address = globals
        .companies_at_address(&company.address)
        .saturating_sub(1);
    let same_year = globals
        .companies_registered_in(company.registration_year)
        .saturating_sub(1);

    (same_address as f64 / 5.0).min(1.0) + (same_year as f64 / 10.0).min(0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Department, Director, Relationship};
    use crate::snapshot::{Snapshot, Tables};

    fn company(id: &str, address: &str, year: i32) -> Company {
        Company {
            company_id: NodeId::new(id),
            name: format!("{} Ltd.", id),
            registration_year: year,
            industry_type: "Construction".to_string(),
            address: address.to_string(),
            fraud_label: 0,
        }
    }

    fn director(id: &str) -> Director {
        Director {
            director_id: NodeId::new(id),
            name: id.to_string(),
            age: 50,
            fraud_label: 0,
        }
    }

    fn tender(id: &str, value: f64, winner: &str) -> Tender {
        Tender {
            tender_id: NodeId::new(id),
            department_id: NodeId::new("DEPT_01"),
            contract_value: value,
            year: 2020,
            winning_company_id: NodeId::new(winner),
            fraud_label: 0,
        }
    }

    fn department() -> Department {
        Department {
            department_id: NodeId::new("DEPT_01"),
            name: "Ministry of Works".to_string(),
            location: "Capital".to_string(),
        }
    }

    #[test]
    fn test_shared_directors_excludes_self() {
        let tables = Tables {
            companies: vec![
                company("COMP_A", "1 A St", 2001),
                company("COMP_B", "2 B St", 2002),
                company("COMP_C", "3 C St", 2003),
            ],
            directors: vec![director("DIR_X")],
            relationships: vec![
                Relationship::new("DIR_X", "COMP_A", RelationshipType::DirectorOf),
                Relationship::new("DIR_X", "COMP_B", RelationshipType::DirectorOf),
                Relationship::new("DIR_X", "COMP_C", RelationshipType::DirectorOf),
            ],
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let id = NodeId::new("COMP_A");

        let others: Vec<&str> = director_linked_companies(&snapshot, &id)
            .into_iter()
            .map(NodeId::as_str)
            .collect();
        assert_eq!(others, vec!["COMP_B", "COMP_C"]);
        assert!((shared_directors(&snapshot, &id) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_shared_directors_union_and_cap() {
        let mut companies = vec![company("COMP_00", "0 Main St", 2000)];
        let mut relationships = Vec::new();
        for d in ["DIR_1", "DIR_2"] {
            relationships.push(Relationship::new(d, "COMP_00", RelationshipType::DirectorOf));
        }
        for i in 1..=12 {
            let id = format!("COMP_{:02}", i);
            companies.push(company(&id, &format!("{} Main St", i), 2000 + i));
            // Company 1 is shared by both directors and counted once
            let d = if i % 2 == 0 { "DIR_1" } else { "DIR_2" };
            relationships.push(Relationship::new(d, id.as_str(), RelationshipType::DirectorOf));
        }
        relationships.push(Relationship::new("DIR_1", "COMP_01", RelationshipType::DirectorOf));

        let tables = Tables {
            companies,
            directors: vec![director("DIR_1"), director("DIR_2")],
            relationships,
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let id = NodeId::new("COMP_00");

        assert_eq!(director_linked_companies(&snapshot, &id).len(), 12);
        assert_eq!(shared_directors(&snapshot, &id), 1.0);
    }

    #[test]
    fn test_win_pattern() {
        // Mean contract value 200; COMP_A won TEND_1 (300) out of 2 tenders
        let tables = Tables {
            companies: vec![
                company("COMP_A", "1 A St", 2001),
                company("COMP_B", "2 B St", 2002),
            ],
            tenders: vec![
                tender("TEND_1", 300.0, "COMP_A"),
                tender("TEND_2", 100.0, "COMP_B"),
            ],
            departments: vec![department()],
            relationships: vec![
                Relationship::new("COMP_A", "TEND_1", RelationshipType::BiddedFor),
                Relationship::new("COMP_A", "TEND_1", RelationshipType::Won),
                Relationship::new("COMP_B", "TEND_2", RelationshipType::Won),
                Relationship::new("TEND_1", "DEPT_01", RelationshipType::IssuedBy),
                Relationship::new("TEND_2", "DEPT_01", RelationshipType::IssuedBy),
            ],
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let globals = GlobalAggregates::compute(&snapshot);
        assert_eq!(globals.tender_count, 2);
        assert!((globals.mean_contract_value - 200.0).abs() < 1e-9);

        // (1.5 - 1) * 0.5 + 0.5 * 2 = 1.25, clamped
        assert_eq!(win_pattern(&snapshot, &globals, &NodeId::new("COMP_A")), 1.0);
        // (0.5 - 1) * 0.5 + 1.0 = 0.75
        let b = win_pattern(&snapshot, &globals, &NodeId::new("COMP_B"));
        assert!((b - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_win_pattern_without_wins_or_value() {
        let tables = Tables {
            companies: vec![company("COMP_A", "1 A St", 2001), company("COMP_Z", "9 Z St", 2009)],
            tenders: vec![tender("TEND_1", 0.0, "COMP_A")],
            relationships: vec![Relationship::new("COMP_A", "TEND_1", RelationshipType::Won)],
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let globals = GlobalAggregates::compute(&snapshot);

        assert_eq!(win_pattern(&snapshot, &globals, &NodeId::new("COMP_Z")), 0.0);
        // Zero mean value falls back to a ratio of 1.0: 0 * 0.5 + 1.0 * 2 = 2.0, clamped
        assert_eq!(win_pattern(&snapshot, &globals, &NodeId::new("COMP_A")), 1.0);
    }

    #[test]
    fn test_centrality() {
        let tables = Tables {
            companies: vec![
                company("COMP_A", "1 A St", 2001),
                company("COMP_B", "2 B St", 2002),
                company("COMP_C", "3 C St", 2003),
            ],
            directors: vec![director("DIR_X")],
            relationships: vec![
                Relationship::new("DIR_X", "COMP_A", RelationshipType::DirectorOf),
                Relationship::new("DIR_X", "COMP_B", RelationshipType::DirectorOf),
            ],
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let globals = GlobalAggregates::compute(&snapshot);
        assert_eq!(globals.max_degree, 2);

        assert_eq!(centrality(&snapshot, &globals, &NodeId::new("COMP_A")), 0.5);
        assert_eq!(centrality(&snapshot, &globals, &NodeId::new("COMP_C")), 0.0);
        assert_eq!(centrality(&snapshot, &globals, &NodeId::new("COMP_NONE")), 0.0);
    }

    #[test]
    fn test_shell_similarity() {
        let mut companies: Vec<Company> = (0..5)
            .map(|i| company(&format!("COMP_{}", i), "7 Shared Rd", 2000 + i))
            .collect();
        companies.push(company("COMP_9", "9 Lone Rd", 2000));
        let tables = Tables {
            companies: companies.clone(),
            ..Tables::default()
        };
        let snapshot = Snapshot::from_tables(tables).unwrap();
        let globals = GlobalAggregates::compute(&snapshot);

        // Four others at the address, nobody else registered in 2001
        assert!((shell_similarity(&globals, &companies[1]) - 0.8).abs() < 1e-12);
        // COMP_0 also shares 2000 with COMP_9
        assert!((shell_similarity(&globals, &companies[0]) - 0.9).abs() < 1e-12);
        assert!((shell_similarity(&globals, &companies[5]) - 0.1).abs() < 1e-12);
    }
}
