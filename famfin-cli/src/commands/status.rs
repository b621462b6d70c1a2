//! Status command - show session and connection settings

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use famfin_core::services::NavState;

use super::get_context;

pub async fn run(json: bool) -> Result<()> {
    let ctx = get_context("status").await?;
    let guard = ctx.navigation();
    let state = guard.state();
    let flow = guard.mounted_flow();
    guard.unsubscribe();

    let user = ctx.session.user();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "state": state.to_string(),
                "initialScreen": flow.map(|f| format!("{:?}", f.initial)),
                "user": user,
                "apiBaseUrl": ctx.config.api_base_url,
                "dataDir": ctx.data_dir.to_string_lossy(),
            }))?
        );
        return Ok(());
    }

    println!("{}", "famfin Status".bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let session = match state {
        NavState::Authenticated => "signed in".green().to_string(),
        other => other.to_string().yellow().to_string(),
    };
    table.add_row(vec!["Session", &session]);
    if let Some(user) = &user {
        table.add_row(vec!["User", &format!("{} <{}>", user.name, user.email)]);
        table.add_row(vec!["Household", user.household_name()]);
    }
    let api = if ctx.config.api_url_from_env {
        format!("{} (FAMFIN_API_URL)", ctx.config.api_base_url)
    } else {
        ctx.config.api_base_url.clone()
    };
    table.add_row(vec!["API", &api]);
    table.add_row(vec!["Data directory", &ctx.data_dir.display().to_string()]);

    println!("{}", table);

    if state == NavState::Unauthenticated {
        println!();
        println!("Run `ff login` or `ff register` to get started.");
    }

    Ok(())
}
