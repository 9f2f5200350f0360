//! Command implementations for the catalog CLI

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::{Context, Result};
use clap::Args;
use sqlx::PgPool;

use crate::config::{CatalogConfig, Overrides, Settings};
use catalog_server::db::create_pool_with_options;

pub use migrate::run_migrate;
pub use seed::run_seed;
pub use serve::run_serve;

/// Database flags shared by every command that connects
#[derive(Args, Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database URL (overrides DATABASE_URL and config files)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum pool connections (default: 5)
    #[arg(long)]
    pub max_connections: Option<u32>,
}

impl DatabaseArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            database_url: self.database_url.clone(),
            max_connections: self.max_connections,
            ..Overrides::default()
        }
    }
}

/// Resolve settings from config files, environment and `flags`.
fn settings(flags: &Overrides) -> Result<Settings> {
    CatalogConfig::load().resolve(flags)
}

/// Open a pool using resolved settings.
async fn connect(settings: &Settings) -> Result<PgPool> {
    let url = settings.require_database_url()?;
    create_pool_with_options(url, settings.max_connections)
        .await
        .context("Failed to create database pool")
}
