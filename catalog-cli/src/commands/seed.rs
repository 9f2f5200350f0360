//! Fixture loading command

use anyhow::{Context, Result};
use clap::Parser;

use super::{connect, settings, DatabaseArgs};
use catalog_server::db::{migrations, seed};

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Truncate every catalog table first and restart ids at 1
    #[arg(long)]
    pub reset: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Load the development fixture.
pub async fn run_seed(args: SeedArgs) -> Result<()> {
    let settings = settings(&args.database.overrides())?;
    let pool = connect(&settings).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    let report = seed::run(&pool, args.reset)
        .await
        .context("Failed to seed catalog")?;

    println!(
        "Seeded {} categories, {} products, {} roles, {} users",
        report.categories, report.products, report.roles, report.users
    );
    println!("Seeded users log in with password '{}'", seed::SEED_PASSWORD);
    Ok(())
}
