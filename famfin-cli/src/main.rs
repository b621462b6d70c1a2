//! famfin CLI - shared family finances in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, config, dashboard, family, logs, profile, status, tx};

/// famfin - shared family finances in your terminal
#[derive(Parser)]
#[command(name = "ff", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show session and connection status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign in (password from FAMFIN_PASSWORD or a prompt)
    Login {
        /// Account email
        #[arg(long, short)]
        email: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(long, short)]
        name: Option<String>,
        /// Account email
        #[arg(long, short)]
        email: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and forget the stored session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change your password
    Password {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Family totals, monthly chart and recent transactions
    Dashboard {
        /// Chart period in months (1, 3, 6 or 12)
        #[arg(long, short)]
        months: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage transactions
    Tx {
        #[command(subcommand)]
        command: tx::TxCommands,
    },

    /// Manage your family group
    Family {
        #[command(subcommand)]
        command: family::FamilyCommands,
    },

    /// Show your profile
    Profile {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage diagnostic logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// View and change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli).await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json).await,
        Commands::Login { email, json } => auth::login(email, json).await,
        Commands::Register { name, email, json } => auth::register(name, email, json).await,
        Commands::Logout { json } => auth::logout(json).await,
        Commands::Password { json } => auth::change_password(json).await,
        Commands::Dashboard { months, json } => dashboard::run(months, json).await,
        Commands::Tx { command } => tx::run(command).await,
        Commands::Family { command } => family::run(command).await,
        Commands::Profile { json } => profile::run(json).await,
        Commands::Logs { command } => logs::run(command),
        Commands::Config { command } => config::run(command),
    }
}
