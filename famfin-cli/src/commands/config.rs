//! Config commands - show settings and point the client at an API host

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use famfin_core::config::Config;

use super::get_data_dir;
use crate::output;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the API base URL (e.g. http://192.168.1.10:5000/api)
    SetApi {
        url: String,
    },
}

pub fn run(command: ConfigCommands) -> Result<()> {
    let data_dir = get_data_dir()?;

    match command {
        ConfigCommands::Show { json } => {
            let config = Config::load(&data_dir).context("Failed to load settings")?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "apiBaseUrl": config.api_base_url,
                        "apiUrlFromEnv": config.api_url_from_env,
                        "timeoutSecs": config.request_timeout.as_secs(),
                        "defaultPeriodMonths": config.default_period.months(),
                        "dataDir": data_dir.to_string_lossy(),
                        "issues": config.issues,
                    }))?
                );
                return Ok(());
            }

            println!("{}", "Configuration".bold());
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.add_row(vec!["API base URL", config.api_base_url.as_str()]);
            let timeout = format!("{}s", config.request_timeout.as_secs());
            table.add_row(vec!["Request timeout", timeout.as_str()]);
            let period = config.default_period.to_string();
            table.add_row(vec!["Dashboard period", period.as_str()]);
            let dir = data_dir.display().to_string();
            table.add_row(vec!["Data directory", dir.as_str()]);
            println!("{}", table);

            if config.api_url_from_env {
                output::warning("API base URL comes from FAMFIN_API_URL");
            }
            for issue in &config.issues {
                output::warning(&format!("{} (default used)", issue));
            }
        }
        ConfigCommands::SetApi { url } => {
            let stored = Config::store_api_base_url(&data_dir, &url)?;
            output::success(&format!("API base URL set to {}", stored));
            if std::env::var("FAMFIN_API_URL").is_ok() {
                output::warning("FAMFIN_API_URL is set and still takes precedence");
            }
        }
    }

    Ok(())
}
