//! HTTP server command

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;

use super::{connect, settings, DatabaseArgs};
use crate::config::{mask_password, Overrides};
use catalog_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 127.0.0.1:3030)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run migrations, then serve until Ctrl+C/SIGTERM.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let settings = settings(&Overrides {
        bind: args.bind,
        cors_permissive: args.cors_permissive,
        ..args.database.overrides()
    })?;

    tracing::info!(
        bind = %settings.bind,
        database = %mask_password(settings.require_database_url()?),
        max_connections = settings.max_connections,
        "Starting catalog server"
    );

    let pool = connect(&settings).await?;

    let config = ServerConfig {
        bind_addr: settings.bind,
        cors_permissive: settings.cors_permissive,
    };

    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
