//! Officer account administration.
//!
//! Accounts are provisioned out of band; the HTTP API never creates them.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use domain::models::NewOfficer;
use persistence::db::{create_pool, run_migrations, DatabaseConfig};
use report_assistant_api::services::{CredentialError, CredentialService};

#[derive(Parser)]
#[command(name = "officer-admin")]
#[command(about = "Manage officer accounts for the report assistant")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL
    #[arg(
        long,
        env = "RA__DATABASE__URL",
        default_value = "sqlite://report_assistant.db",
        global = true
    )]
    database_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the schema
    Migrate,

    /// Provision a new officer
    Add {
        #[arg(long)]
        badge: String,

        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Initial password. Prefer the environment variable over the flag.
        #[arg(long, env = "RA_OFFICER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// List provisioned officers
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let pool = create_pool(&DatabaseConfig {
        url: cli.database_url.clone(),
        max_connections: 1,
        min_connections: 1,
        connect_timeout_secs: 10,
        idle_timeout_secs: 60,
        busy_timeout_secs: 5,
    })
    .await
    .with_context(|| format!("Failed to open database {}", cli.database_url))?;

    run_migrations(&pool)
        .await
        .context("Failed to apply migrations")?;

    let credentials = CredentialService::new(pool);

    match cli.command {
        Commands::Migrate => println!("Schema is up to date"),
        Commands::Add {
            badge,
            name,
            email,
            password,
        } => {
            let Some(password) = password else {
                bail!("A password is required (--password or RA_OFFICER_PASSWORD)");
            };

            let input = NewOfficer {
                badge_number: badge,
                full_name: name,
                email,
                password,
            };
            match credentials.provision(input).await {
                Ok(officer) => println!(
                    "Provisioned officer {} ({})",
                    officer.badge_number, officer.full_name
                ),
                Err(CredentialError::AlreadyExists(badge)) => {
                    bail!("Badge {} is already provisioned", badge)
                }
                Err(e) => return Err(e.into()),
            }
        }
        Commands::List => {
            let officers = credentials.list().await?;
            if officers.is_empty() {
                println!("No officers provisioned");
            }
            for officer in officers {
                println!(
                    "{:<12} {:<32} {}",
                    officer.badge_number, officer.full_name, officer.email
                );
            }
        }
    }

    Ok(())
}
