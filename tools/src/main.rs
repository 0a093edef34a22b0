//! migration-runner: CLI for the provision workbench.
//!
//! Usage:
//!   migration-runner setup
//!   migration-runner calculate [--agents 1,2|all] [--stored-proc]
//!   migration-runner translate [--out-dir translated_procedures]
//!
//! Connection parameters come from the environment (or a .env file):
//! DB_NAME, DB_USER, DB_PASSWORD, DB_HOST, DB_PORT, and for `translate`
//! OPENAI_API_KEY.

use anyhow::Result;
use provision_core::{
    config::{DbConfig, TranslatorConfig},
    engine::ProvisionEngine,
    pipeline::TranslationPipeline,
    store::{PolicyStore, ProvisionReportRow},
    translator::Translator,
};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Single boundary: errors are presented here and decide the exit
    // status; nothing below catches-and-prints.
    if let Err(e) = run().await {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("");

    match command {
        "setup" => setup().await,
        "calculate" => calculate(&args).await,
        "translate" => translate(&args).await,
        _ => {
            eprintln!("usage: migration-runner <setup|calculate|translate> [flags]");
            eprintln!("  setup                          create schema, procedure, and sample data");
            eprintln!("  calculate [--agents 1,2|all]   run the provision engine and print a report");
            eprintln!("            [--stored-proc]      run the legacy procedure instead");
            eprintln!("  translate [--out-dir DIR]      translate catalog procedures to Rust files");
            anyhow::bail!("unknown command '{command}'");
        }
    }
}

async fn setup() -> Result<()> {
    let cfg = DbConfig::from_env()?;
    let store = PolicyStore::connect(&cfg).await?;
    println!("Connected to the database.");

    println!("Creating tables and stored procedure...");
    store.migrate().await?;

    println!("Inserting sample data...");
    store.seed_sample_data().await?;

    println!("Database setup completed.");
    Ok(())
}

async fn calculate(args: &[String]) -> Result<()> {
    let use_stored_proc = args.iter().any(|a| a == "--stored-proc");

    let cfg = DbConfig::from_env()?;
    let store = PolicyStore::connect(&cfg).await?;
    println!("Connected to the database.");

    let agent_ids = match parse_agents(args)? {
        Some(ids) => ids,
        // `--agents all`: every agent currently on file.
        None => store.agents().await?.into_iter().map(|a| a.agent_id).collect(),
    };

    let engine = ProvisionEngine::new(store.clone());

    for agent_id in agent_ids {
        println!("\nCalculating provisions for agent {agent_id}...");
        if use_stored_proc {
            store.call_calculate_provisions(agent_id).await?;
        } else {
            let stored = engine.calculate_for(agent_id).await?;
            println!("Stored {} new provisions.", stored.len());
        }
        print_report(&store.provision_report(agent_id).await?);
    }
    Ok(())
}

async fn translate(args: &[String]) -> Result<()> {
    let out_dir = args
        .windows(2)
        .find(|w| w[0] == "--out-dir")
        .map(|w| w[1].clone())
        .or_else(|| env::var("TRANSLATED_OUT_DIR").ok())
        .unwrap_or_else(|| "translated_procedures".to_string());

    let db_cfg = DbConfig::from_env()?;
    let translator_cfg = TranslatorConfig::from_env()?;

    let store = PolicyStore::connect(&db_cfg).await?;
    println!("Connected to the database.");

    let translator = Translator::new(translator_cfg)?;
    let pipeline = TranslationPipeline::new(&store, &translator, PathBuf::from(&out_dir));

    println!("Starting stored procedure translation...");
    let report = pipeline.run().await?;

    for emitted in &report.emitted {
        let proc = &emitted.procedure;
        println!("\nSaved procedure to: {}", emitted.path.display());
        println!("{}", "=".repeat(80));
        println!("Schema: {}", proc.schema);
        println!("Procedure: {}", proc.name);
        println!("Arguments: {}", proc.arguments);
        println!("Return Type: {}", proc.return_type);
        println!("{}", "-".repeat(80));
    }
    for failure in &report.failures {
        println!("\nFailed: {} ({})", failure.procedure, failure.reason);
    }
    println!(
        "\nTranslation completed: {} saved, {} failed.",
        report.emitted.len(),
        report.failures.len()
    );
    Ok(())
}

/// `--agents 1,2` parsed to ids; `--agents all` returns None so the
/// caller can look the ids up. Defaults to the two sample agents.
fn parse_agents(args: &[String]) -> Result<Option<Vec<i32>>> {
    let raw = args
        .windows(2)
        .find(|w| w[0] == "--agents")
        .map(|w| w[1].as_str())
        .unwrap_or("1,2");
    if raw == "all" {
        return Ok(None);
    }
    raw.split(',')
        .map(|part| {
            part.trim()
                .parse::<i32>()
                .map_err(|_| anyhow::anyhow!("invalid agent id '{part}' in --agents"))
        })
        .collect::<Result<Vec<i32>>>()
        .map(Some)
}

fn print_report(rows: &[ProvisionReportRow]) {
    println!("\nProvision Calculation Results:");
    println!("{}", "-".repeat(80));
    println!(
        "{:<15} {:<15} {:>12} {:>12} {}",
        "Agent", "Policy Type", "Premium", "Provision", "Date"
    );
    println!("{}", "-".repeat(80));
    for row in rows {
        println!(
            "{:<15} {:<15} {:>12} {:>12} {}",
            row.agent_name,
            row.policy_type,
            format!("${}", row.premium_amount),
            format!("${}", row.provision_amount),
            row.calculation_date
        );
    }
}
