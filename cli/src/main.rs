//! Netra CLI: score, cluster and investigate a procurement snapshot
//!
//! Loads the five CSV tables from a data directory, builds the snapshot once and
//! runs one engine operation against it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use netra::risk::RiskCategory;
use netra::{EngineConfig, NodeId, RiskEngine, RiskSummary, Snapshot};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

#[derive(Parser)]
#[command(name = "netra", version, about = "Procurement fraud risk engine")]
struct Cli {
    /// YAML engine configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding companies.csv, directors.csv, tenders.csv,
    /// departments.csv and relationships.csv
    #[arg(long, global = true, env = "NETRA_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single company
    Score {
        /// Company id, e.g. COMP_0042
        company_id: String,
    },
    /// Score every company
    Scores {
        /// Only list companies in this category
        #[arg(long)]
        category: Option<CategoryArg>,

        /// Sort by descending score and keep the first N
        #[arg(long)]
        top: Option<usize>,
    },
    /// Detect fraud clusters
    Clusters {
        /// Fail if detection takes longer than this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Investigation summary for a company
    Investigate {
        company_id: String,
    },
    /// Portfolio-level totals
    Summary,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum CategoryArg {
    Low,
    Medium,
    High,
}

impl From<CategoryArg> for RiskCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Low => RiskCategory::Low,
            CategoryArg::Medium => RiskCategory::Medium,
            CategoryArg::High => RiskCategory::High,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    let snapshot = Snapshot::load(&config.data_dir)
        .with_context(|| format!("loading tables from {}", config.data_dir.display()))?;
    let engine = RiskEngine::with_config(&snapshot, config);

    match cli.command {
        Commands::Score { company_id } => run_score(&engine, &company_id, &cli.format),
        Commands::Scores { category, top } => run_scores(&engine, category, top, &cli.format),
        Commands::Clusters { timeout_ms } => run_clusters(&engine, timeout_ms, &cli.format),
        Commands::Investigate { company_id } => {
            run_investigate(&engine, &company_id, &cli.format)
        }
        Commands::Summary => run_summary(&engine, &cli.format),
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn run_score(
    engine: &RiskEngine<'_, Snapshot>,
    company_id: &str,
    format: &OutputFormat,
) -> Result<()> {
    let score = engine.score_company(&NodeId::new(company_id))?;

    match format {
        OutputFormat::Json => print_json(&score)?,
        _ => {
            println!("Company:    {}", score.company_id);
            println!("Risk score: {:.4}", score.risk_score);
            println!("Category:   {}", score.category);
            println!("Confidence: {:.2}", score.confidence);

            let f = &score.factors;
            let mut factors = new_table(vec!["Factor", "Value"]);
            for (name, value) in [
                ("Shared directors", f.shared_directors),
                ("Win pattern", f.win_pattern),
                ("Centrality", f.centrality),
                ("Shell similarity", f.shell_similarity),
            ] {
                factors.add_row(vec![name.to_string(), format!("{:.4}", value)]);
            }
            println!("{}", factors);

            if score.indicators.is_empty() {
                println!("(no indicators)");
            } else {
                let mut table = new_table(vec!["Indicator", "Severity", "Description"]);
                for i in &score.indicators {
                    table.add_row(vec![
                        i.indicator.clone(),
                        i.severity.to_string(),
                        i.description.clone(),
                    ]);
                }
                println!("{}", table);
            }
        }
    }

    Ok(())
}

fn run_scores(
    engine: &RiskEngine<'_, Snapshot>,
    category: Option<CategoryArg>,
    top: Option<usize>,
    format: &OutputFormat,
) -> Result<()> {
    let mut records = engine.score_all_companies();
    if let Some(category) = category {
        let category = RiskCategory::from(category);
        records.retain(|r| r.category == category);
    }
    if let Some(top) = top {
        records.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
        records.truncate(top);
    }

    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Csv => print_csv(&records)?,
        OutputFormat::Table => {
            let mut table =
                new_table(vec!["Company", "Score", "Confidence", "Category", "Indicators"]);
            for r in &records {
                table.add_row(vec![
                    r.entity_id.to_string(),
                    format!("{:.4}", r.risk_score),
                    format!("{:.2}", r.confidence),
                    r.category.to_string(),
                    r.indicator_count.to_string(),
                ]);
            }
            println!("{}", table);
            println!("{} row(s)", records.len());
        }
    }

    Ok(())
}

fn run_clusters(
    engine: &RiskEngine<'_, Snapshot>,
    timeout_ms: Option<u64>,
    format: &OutputFormat,
) -> Result<()> {
    let clusters = match timeout_ms {
        Some(ms) => engine.detect_fraud_clusters_within(Duration::from_millis(ms))?,
        None => engine.detect_fraud_clusters()?,
    };

    match format {
        OutputFormat::Json => print_json(&clusters)?,
        _ => {
            if clusters.is_empty() {
                println!("(no fraud clusters)");
                return Ok(());
            }
            let mut table =
                new_table(vec!["Community", "Size", "Fraud", "Concentration", "Members"]);
            for c in &clusters {
                let members: Vec<&str> = c.members.iter().map(NodeId::as_str).collect();
                table.add_row(vec![
                    c.community_id.to_string(),
                    c.size().to_string(),
                    c.fraud_count.to_string(),
                    format!("{:.2}", c.fraud_concentration),
                    members.join(" "),
                ]);
            }
            println!("{}", table);
        }
    }

    Ok(())
}

fn run_investigate(
    engine: &RiskEngine<'_, Snapshot>,
    company_id: &str,
    format: &OutputFormat,
) -> Result<()> {
    let summary = engine.investigate(&NodeId::new(company_id))?;

    match format {
        OutputFormat::Json => print_json(&summary)?,
        _ => {
            println!("{} ({})", summary.company_name, summary.company_id);
            println!(
                "Risk score {:.4}, {} risk, confidence {:.2}",
                summary.risk_score, summary.category, summary.confidence
            );
            println!();
            println!("Key findings:");
            if summary.key_findings.is_empty() {
                println!("  none");
            }
            for finding in &summary.key_findings {
                println!("  - {}", finding);
            }

            if !summary.tender_history.is_empty() {
                let mut table = new_table(vec!["Tender", "Year", "Contract value"]);
                for t in &summary.tender_history {
                    table.add_row(vec![
                        t.tender_id.to_string(),
                        t.year.to_string(),
                        format!("{:.2}", t.contract_value),
                    ]);
                }
                println!("{}", table);
            }

            if !summary.connected_high_risk.is_empty() {
                let connected: Vec<&str> =
                    summary.connected_high_risk.iter().map(NodeId::as_str).collect();
                println!("Connected high-risk companies: {}", connected.join(", "));
            }
            println!();
            println!("{}", summary.recommendation);
        }
    }

    Ok(())
}

fn run_summary(engine: &RiskEngine<'_, Snapshot>, format: &OutputFormat) -> Result<()> {
    let records = engine.score_all_companies();
    let clusters = engine.detect_fraud_clusters()?;
    let summary = RiskSummary::build(engine.source(), &records, &clusters);

    match format {
        OutputFormat::Json => print_json(&summary)?,
        _ => {
            println!("Companies:            {}", summary.total_companies);
            println!("Directors:            {}", summary.total_directors);
            println!("Tenders:              {}", summary.total_tenders);
            println!("Total contract value: {:.2}", summary.total_contract_value);
            println!("High-risk companies:  {}", summary.high_risk_count);
            println!("Fraud clusters:       {}", summary.fraud_cluster_count);
            for (category, count) in &summary.risk_distribution {
                println!("  {:<8}{}", category.as_str(), count);
            }
        }
    }

    Ok(())
}
