//! Shared fixtures for the integration tests

#![allow(dead_code)]

use netra::graph::{Company, Department, Director, NodeId, Relationship, RelationshipType, Tender};
use netra::snapshot::{Snapshot, Tables};

pub fn company(id: &str, address: &str, year: i32, fraud_label: u8) -> Company {
    Company {
        company_id: NodeId::new(id),
        name: format!("{} Holdings", id),
        registration_year: year,
        industry_type: "Construction".to_string(),
        address: address.to_string(),
        fraud_label,
    }
}

pub fn director(id: &str) -> Director {
    Director {
        director_id: NodeId::new(id),
        name: format!("Director {}", id),
        age: 48,
        fraud_label: 0,
    }
}

pub fn tender(id: &str, value: f64, year: i32, winner: &str) -> Tender {
    Tender {
        tender_id: NodeId::new(id),
        department_id: NodeId::new("DEPT_01"),
        contract_value: value,
        year,
        winning_company_id: NodeId::new(winner),
        fraud_label: 0,
    }
}

pub fn department(id: &str) -> Department {
    Department {
        department_id: NodeId::new(id),
        name: "Ministry of Public Works".to_string(),
        location: "Capital".to_string(),
    }
}

pub fn rel(source: &str, target: &str, rel: RelationshipType) -> Relationship {
    Relationship::new(source, target, rel)
}

/// Eleven companies at one address, registered the same year, all run by
/// `DIR_R`, each winning one equal-value tender. Every ring member scores High.
/// `COMP_OUT` is an unconnected outsider.
pub fn collusion_ring() -> Tables {
    let mut tables = Tables {
        directors: vec![director("DIR_R")],
        departments: vec![department("DEPT_01")],
        ..Tables::default()
    };

    for i in 0..11 {
        let id = format!("COMP_R{:02}", i);
        let tender_id = format!("TEND_R{:02}", i);
        tables.companies.push(company(&id, "1 Shell Ave", 2017, u8::from(i < 8)));
        tables.tenders.push(tender(&tender_id, 5000.0, 2018 + (i % 3), &id));
        tables.relationships.push(rel("DIR_R", &id, RelationshipType::DirectorOf));
        tables.relationships.push(rel(&id, &tender_id, RelationshipType::BiddedFor));
        tables.relationships.push(rel(&id, &tender_id, RelationshipType::Won));
        tables.relationships.push(rel(&tender_id, "DEPT_01", RelationshipType::IssuedBy));
    }
    tables.companies.push(company("COMP_OUT", "99 Far Rd", 1999, 0));

    tables
}

/// Two dense blocks of five companies, each block sharing two directors and one
/// tender, joined by a single bid. Block A is mostly fraud-labelled, block B clean.
pub fn two_blocks() -> Tables {
    let mut tables = Tables::default();

    for (block, fraud_labels) in [("A", [1u8, 1, 1, 1, 0]), ("B", [0u8, 0, 0, 0, 0])] {
        let hubs = [
            format!("DIR_{}1", block),
            format!("DIR_{}2", block),
            format!("TEND_{}1", block),
        ];
        tables.directors.push(director(&hubs[0]));
        tables.directors.push(director(&hubs[1]));
        tables
            .tenders
            .push(tender(&hubs[2], 1200.0, 2020, &format!("COMP_{}1", block)));

        for (i, fraud_label) in fraud_labels.into_iter().enumerate() {
            let id = format!("COMP_{}{}", block, i + 1);
            let address = format!("{} {} St", i + 1, block);
            tables
                .companies
                .push(company(&id, &address, 2000 + i as i32, fraud_label));
            tables.relationships.push(rel(&hubs[0], &id, RelationshipType::DirectorOf));
            tables.relationships.push(rel(&hubs[1], &id, RelationshipType::DirectorOf));
            tables.relationships.push(rel(&id, &hubs[2], RelationshipType::BiddedFor));
        }
        tables.relationships.push(rel(
            &format!("COMP_{}1", block),
            &hubs[2],
            RelationshipType::Won,
        ));
    }
    tables
        .relationships
        .push(rel("COMP_A5", "TEND_B1", RelationshipType::BiddedFor));

    tables
}

pub fn snapshot(tables: Tables) -> Snapshot {
    Snapshot::from_tables(tables).unwrap()
}
