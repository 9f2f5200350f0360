//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use super::{connect, settings, DatabaseArgs};
use catalog_server::db::migrations;

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Create any missing tables and indexes.
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let settings = settings(&args.database.overrides())?;
    let pool = connect(&settings).await?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Schema is up to date");
    Ok(())
}
