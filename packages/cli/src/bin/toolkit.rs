use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::*;
use tracing_subscriber::EnvFilter;

use toolkit_cli::Config;

#[derive(Parser)]
#[command(name = "toolkit")]
#[command(about = "Toolkit agent service - agent and tool metadata API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        #[arg(long, help = "Port to listen on (overrides PORT)")]
        port: Option<u16>,
        #[arg(long, help = "SQLite database file (overrides DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
    /// Apply database migrations and exit
    Migrate {
        #[arg(long, help = "SQLite database file (overrides DATABASE_PATH)")]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> anyhow::Result<()> {
    let config = Config::from_env()?;

    match command {
        Commands::Serve { port, database } => {
            let config = config.with_port(port).with_database_path(database);
            println!(
                "{} Starting server on {}",
                "▶".green(),
                config.socket_addr().to_string().bold()
            );
            toolkit_cli::run_server(config).await
        }
        Commands::Migrate { database } => {
            let config = config.with_database_path(database);
            toolkit_cli::run_migrations(&config).await?;
            println!("{} Migrations applied", "✓".green());
            Ok(())
        }
    }
}
