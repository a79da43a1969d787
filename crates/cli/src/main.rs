//! Clover CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! clover-cli migrate
//!
//! # Grant the admin role to an account
//! clover-cli admin grant -e admin@example.com
//!
//! # Revoke the admin role
//! clover-cli admin revoke -e admin@example.com
//!
//! # Seed development data (categories and products)
//! clover-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin grant` / `admin revoke` - Manage admin role membership
//! - `seed` - Seed the catalog with development data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "clover-cli")]
#[command(author, version, about = "Clover Market CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin role membership
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed development data
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Grant the admin role to an existing or new account
    Grant {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin role from an account
    Revoke {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Grant { email } => commands::admin::grant(&email).await?,
            AdminAction::Revoke { email } => commands::admin::revoke(&email).await?,
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
