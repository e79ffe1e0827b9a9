use crate::{Config, Database};
use anyhow::Result;
use std::path::Path;

const DESCRIPTIONS: [&str; 2] = [
    "Users, sessions, categories and blog posts",
    "Contact messages",
];

pub async fn run(config_path: &Path, status: bool) -> Result<()> {
    let config = Config::load(config_path)?;
    let db = Database::open(&config.database.path)?;

    if status {
        return show_status(&db);
    }

    db.migrate()?;
    tracing::info!("Migrations complete (schema version {})", db.schema_version()?);
    Ok(())
}

fn show_status(db: &Database) -> Result<()> {
    let statuses = db.migration_status()?;

    println!("\n  Migration Status\n");
    println!("  {:<10} {:<45} Applied", "Version", "Description");
    println!("  {}", "-".repeat(80));

    for (version, applied_at) in &statuses {
        let desc = DESCRIPTIONS
            .get((*version as usize).saturating_sub(1))
            .unwrap_or(&"Unknown migration");
        let applied = applied_at.as_deref().unwrap_or("pending");
        println!("  {:<10} {:<45} {}", format!("{:03}", version), desc, applied);
    }

    let pending = statuses.iter().filter(|(_, ts)| ts.is_none()).count();
    println!();
    if pending > 0 {
        println!("  {} pending. Run `folio migrate` to apply.", pending);
    } else {
        println!("  All {} migrations applied.", statuses.len());
    }
    println!();

    Ok(())
}
