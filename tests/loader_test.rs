use netra::graph::{GraphError, NodeId, NodeKind, RelationshipType};
use netra::risk::RiskEngine;
use netra::snapshot::{LoadError, ProcurementSource, Snapshot, SnapshotHandle, TableLoader};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMPANIES: &str = "\
company_id,name,registration_year,industry_type,address,fraud_label
COMP_0001,Apex Builders Ltd.,2011,Construction,\"12 Oak St, City 40012\",1
COMP_0002,Blue River Supplies,2011,Medical Supplies,\"12 Oak St, City 40012\",1
COMP_0003,Cedar Consulting,2015,Consulting,\"7 Elm Rd, City 40020\",0
";

const DIRECTORS: &str = "\
director_id,name,age,fraud_label
DIR_0001,Maria Lopez,52,1
DIR_0002,Ken Obi,38,0
";

const TENDERS: &str = "\
tender_id,department_id,contract_value,year,winning_company_id,fraud_label
TEND_0001,DEPT_01,250000.0,2020,COMP_0001,1
TEND_0002,DEPT_01,90000.5,2021,COMP_0003,0
";

const DEPARTMENTS: &str = "\
department_id,name,location
DEPT_01,Ministry of Health,Capital
";

const RELATIONSHIPS: &str = "\
source_id,target_id,relationship_type
DIR_0001,COMP_0001,DIRECTOR_OF
DIR_0001,COMP_0002,DIRECTOR_OF
DIR_0002,COMP_0003,DIRECTOR_OF
COMP_0001,TEND_0001,BIDDED_FOR
COMP_0002,TEND_0001,BIDDED_FOR
COMP_0001,TEND_0001,WON
COMP_0003,TEND_0002,BIDDED_FOR
COMP_0003,TEND_0002,WON
TEND_0001,DEPT_01,ISSUED_BY
TEND_0002,DEPT_01,ISSUED_BY
";

fn write_tables(dir: &Path, relationships: &str) {
    fs::write(dir.join(TableLoader::COMPANIES), COMPANIES).unwrap();
    fs::write(dir.join(TableLoader::DIRECTORS), DIRECTORS).unwrap();
    fs::write(dir.join(TableLoader::TENDERS), TENDERS).unwrap();
    fs::write(dir.join(TableLoader::DEPARTMENTS), DEPARTMENTS).unwrap();
    fs::write(dir.join(TableLoader::RELATIONSHIPS), relationships).unwrap();
}

fn data_dir(relationships: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_tables(dir.path(), relationships);
    dir
}

#[test]
fn test_load_tables_from_csv() {
    let dir = data_dir(RELATIONSHIPS);
    let tables = TableLoader::new(dir.path()).load().unwrap();

    assert_eq!(tables.companies.len(), 3);
    assert_eq!(tables.directors.len(), 2);
    assert_eq!(tables.tenders.len(), 2);
    assert_eq!(tables.departments.len(), 1);
    assert_eq!(tables.relationships.len(), 10);

    let apex = &tables.companies[0];
    assert_eq!(apex.address, "12 Oak St, City 40012");
    assert!(apex.is_fraudulent());
    assert_eq!(tables.tenders[1].contract_value, 90000.5);
    assert_eq!(
        tables.relationships[5].relationship_type,
        RelationshipType::Won
    );
}

#[test]
fn test_snapshot_from_csv_scores() {
    let dir = data_dir(RELATIONSHIPS);
    let snapshot = Snapshot::load(dir.path()).unwrap();

    let stats = snapshot.statistics();
    assert_eq!(stats.node_count, 8);
    // BIDDED_FOR and WON between the same pair fold into one edge
    assert_eq!(stats.edge_count, 8);
    assert_eq!(stats.nodes_by_kind[&NodeKind::Department], 1);

    assert_eq!(snapshot.degree(&NodeId::new("COMP_0001")), Some(2));
    // TEND_0001 links two bidders and its department
    assert_eq!(snapshot.max_degree(), 3);

    let engine = RiskEngine::new(&snapshot);
    let score = engine.score_company(&NodeId::new("COMP_0001")).unwrap();
    assert!((score.factors.shared_directors - 0.1).abs() < 1e-12);
    // Shares an address with one company and a registration year with one
    assert!((score.factors.shell_similarity - 0.3).abs() < 1e-12);
    assert!((score.factors.centrality - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_dangling_relationship_aborts_load() {
    let broken = format!("{}COMP_0003,TEND_9999,BIDDED_FOR\n", RELATIONSHIPS);
    let dir = data_dir(&broken);

    match Snapshot::load(dir.path()) {
        Err(LoadError::Graph(GraphError::InvalidEdgeTarget(id))) => {
            assert_eq!(id.as_str(), "TEND_9999");
        }
        other => panic!("expected dangling edge error, got {:?}", other),
    }
}

#[test]
fn test_unknown_relationship_type_is_malformed() {
    let broken = format!("{}DIR_0002,COMP_0001,KNOWS\n", RELATIONSHIPS);
    let dir = data_dir(&broken);

    assert!(matches!(
        TableLoader::new(dir.path()).load(),
        Err(LoadError::Csv { .. })
    ));
}

#[test]
fn test_non_numeric_column_is_malformed() {
    let dir = data_dir(RELATIONSHIPS);
    fs::write(
        dir.path().join(TableLoader::DIRECTORS),
        "director_id,name,age,fraud_label\nDIR_0001,Maria Lopez,fifty,1\n",
    )
    .unwrap();

    let err = TableLoader::new(dir.path()).load().unwrap_err();
    assert!(matches!(err, LoadError::Csv { .. }));
    assert!(err.to_string().contains("directors.csv"));
}

#[test]
fn test_missing_table_is_io_error() {
    let dir = data_dir(RELATIONSHIPS);
    fs::remove_file(dir.path().join(TableLoader::DEPARTMENTS)).unwrap();

    assert!(matches!(
        TableLoader::new(dir.path()).load(),
        Err(LoadError::Io { .. })
    ));
}

#[test]
fn test_invalid_fraud_label_is_rejected() {
    let dir = data_dir(RELATIONSHIPS);
    fs::write(
        dir.path().join(TableLoader::DIRECTORS),
        "director_id,name,age,fraud_label\nDIR_0001,Maria Lopez,52,2\nDIR_0002,Ken Obi,38,0\n",
    )
    .unwrap();

    match TableLoader::new(dir.path()).load() {
        Err(LoadError::InvalidRow { table, row, .. }) => {
            assert_eq!(table, "directors");
            assert_eq!(row, 1);
        }
        other => panic!("expected invalid row, got {:?}", other),
    }
}

#[test]
fn test_snapshot_handle_reload() {
    let dir = data_dir(RELATIONSHIPS);
    let handle = SnapshotHandle::new(Snapshot::load(dir.path()).unwrap());
    let before = handle.current();

    // A failed reload keeps the current snapshot
    let broken = data_dir("source_id,target_id,relationship_type\nDIR_0001,COMP_9999,DIRECTOR_OF\n");
    assert!(handle.reload(broken.path()).is_err());
    assert_eq!(handle.current().statistics(), before.statistics());

    let trimmed = data_dir("source_id,target_id,relationship_type\nDIR_0001,COMP_0001,DIRECTOR_OF\n");
    let after = handle.reload(trimmed.path()).unwrap();
    assert_eq!(after.statistics().edge_count, 1);
    // Holders of the old snapshot are unaffected
    assert_eq!(before.statistics().edge_count, 8);
}
