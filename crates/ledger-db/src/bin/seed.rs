//! # Seed Data Generator
//!
//! Configures Auto-mode numbering for every document type of a branch, for
//! development.
//!
//! ## Usage
//! ```bash
//! # Seed branch "dev-branch" in ./ledger_dev.db (defaults)
//! cargo run -p ledger-db --bin seed
//!
//! # Pick branch and database
//! cargo run -p ledger-db --bin seed -- --branch main-street --db ./data/ledger.db
//! ```
//!
//! Each document type gets its default prefix and counter `00001`, so the
//! first invoice becomes `INV-00001`. Types that already have a setting are
//! left alone.

use std::env;

use ledger_core::{DocType, DEFAULT_NEXT_NUMBER_RAW};
use ledger_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ledger_dev.db");
    let mut branch_id = String::from("dev-branch");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--branch" | "-b" => {
                if i + 1 < args.len() {
                    branch_id = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ledgerline Numbering Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -b, --branch <ID>  Branch to configure (default: dev-branch)");
                println!("  -d, --db <PATH>    Database file path (default: ./ledger_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Ledgerline Numbering Seed");
    println!("===========================");
    println!("Database: {}", db_path);
    println!("Branch:   {}", branch_id);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    let settings = db.number_settings();
    let numbering = db.numbering();
    let mut configured = 0;

    for doc_type in DocType::ALL {
        if let Some(existing) = settings.find(&branch_id, doc_type).await? {
            println!(
                "  ⚠ {:<15} already configured ({}, prefix {})",
                doc_type.as_str(),
                existing.mode,
                existing.prefix
            );
            continue;
        }

        let setting = numbering
            .upsert_setting(
                &branch_id,
                doc_type,
                Some("Auto"),
                None,
                Some(DEFAULT_NEXT_NUMBER_RAW),
            )
            .await?;
        configured += 1;

        let preview = numbering.preview(&branch_id, doc_type).await?;
        println!(
            "  ✓ {:<15} {} → next {}",
            doc_type.as_str(),
            setting.mode,
            preview.generated_id
        );
    }

    println!();
    println!("✓ Seed complete! Configured {} document types.", configured);

    db.close().await;
    Ok(())
}
