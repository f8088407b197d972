use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::connection::DbConnection;

pub(crate) mod config;
pub(crate) mod database;
pub(crate) mod error;
pub(crate) mod models;
pub(crate) mod server;

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "parley-server", version, about = "Group messaging REST backend")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Create missing tables and serve the HTTP API (default)
    Serve,
    /// Create missing database types and tables, then exit
    InitSchema,
    /// Drop every table and type owned by the service, then exit
    DropSchema,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_yaml_file(&cli.config)?;
    config.logging.init()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::run_all(&config).await?,
        Command::InitSchema => {
            let db = DbConnection::connect(&config.database)
                .await
                .context("connecting to database")?;
            db.init_schema().await?;
        }
        Command::DropSchema => {
            let db = DbConnection::connect(&config.database)
                .await
                .context("connecting to database")?;
            db.drop_schema().await?;
        }
    }

    Ok(())
}
