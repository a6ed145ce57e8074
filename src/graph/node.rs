//! Typed entity records and the graph node wrapping them
//!
//! Each table row deserialises into one of the record structs below; the graph
//! stores them unchanged as [`Node`] payloads.

use super::types::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// Common accessors shared by every entity record
pub trait Entity {
    /// Kind every record of this type must carry in its id prefix
    const KIND: NodeKind;

    fn id(&self) -> &NodeId;

    /// Fraud label, for entity types that carry one
    fn fraud_label(&self) -> Option<u8> {
        None
    }
}

/// A bidding company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub company_id: NodeId,
    pub name: String,
    pub registration_year: i32,
    pub industry_type: String,
    pub address: String,
    pub fraud_label: u8,
}

impl Company {
    pub fn is_fraudulent(&self) -> bool {
        self.fraud_label == 1
    }
}

impl Entity for Company {
    const KIND: NodeKind = NodeKind::Company;

    fn id(&self) -> &NodeId {
        &self.company_id
    }

    fn fraud_label(&self) -> Option<u8> {
        Some(self.fraud_label)
    }
}

/// A company director
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Director {
    pub director_id: NodeId,
    pub name: String,
    pub age: u32,
    pub fraud_label: u8,
}

impl Entity for Director {
    const KIND: NodeKind = NodeKind::Director;

    fn id(&self) -> &NodeId {
        &self.director_id
    }

    fn fraud_label(&self) -> Option<u8> {
        Some(self.fraud_label)
    }
}

/// A public tender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tender {
    pub tender_id: NodeId,
    pub department_id: NodeId,
    pub contract_value: f64,
    pub year: i32,
    pub winning_company_id: NodeId,
    pub fraud_label: u8,
}

impl Entity for Tender {
    const KIND: NodeKind = NodeKind::Tender;

    fn id(&self) -> &NodeId {
        &self.tender_id
    }

    fn fraud_label(&self) -> Option<u8> {
        Some(self.fraud_label)
    }
}

/// An issuing government department. Never scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: NodeId,
    pub name: String,
    pub location: String,
}

impl Entity for Department {
    const KIND: NodeKind = NodeKind::Department;

    fn id(&self) -> &NodeId {
        &self.department_id
    }
}

/// A node in the procurement graph, carrying the full record of its entity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Node {
    Company(Company),
    Director(Director),
    Tender(Tender),
    Department(Department),
}

impl Node {
    pub fn id(&self) -> &NodeId {
        match self {
            Node::Company(c) => c.id(),
            Node::Director(d) => d.id(),
            Node::Tender(t) => t.id(),
            Node::Department(d) => d.id(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Company(_) => NodeKind::Company,
            Node::Director(_) => NodeKind::Director,
            Node::Tender(_) => NodeKind::Tender,
            Node::Department(_) => NodeKind::Department,
        }
    }

    pub fn fraud_label(&self) -> Option<u8> {
        match self {
            Node::Company(c) => c.fraud_label(),
            Node::Director(d) => d.fraud_label(),
            Node::Tender(t) => t.fraud_label(),
            Node::Department(d) => d.fraud_label(),
        }
    }

    /// Human readable label: the entity name where one exists, else the id
    pub fn display_name(&self) -> &str {
        match self {
            Node::Company(c) => &c.name,
            Node::Director(d) => &d.name,
            Node::Department(d) => &d.name,
            Node::Tender(t) => t.tender_id.as_str(),
        }
    }

    pub fn as_company(&self) -> Option<&Company> {
        match self {
            Node::Company(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_director(&self) -> Option<&Director> {
        match self {
            Node::Director(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_tender(&self) -> Option<&Tender> {
        match self {
            Node::Tender(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Company> for Node {
    fn from(c: Company) -> Self {
        Node::Company(c)
    }
}

impl From<Director> for Node {
    fn from(d: Director) -> Self {
        Node::Director(d)
    }
}

impl From<Tender> for Node {
    fn from(t: Tender) -> Self {
        Node::Tender(t)
    }
}

impl From<Department> for Node {
    fn from(d: Department) -> Self {
        Node::Department(d)
    }
}
