//! CLI command implementations

pub mod auth;
pub mod config;
pub mod dashboard;
pub mod family;
pub mod logs;
pub mod profile;
pub mod status;
pub mod tx;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use famfin_core::services::{Diagnostics, EntryPoint, LoggingService, NavState, Screen};
use famfin_core::FamfinContext;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<Arc<LoggingService>> {
    let data_dir = get_data_dir().ok()?;
    std::fs::create_dir_all(&data_dir).ok()?;
    LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))
        .ok()
        .map(Arc::new)
}

/// Record the command, ignoring any errors (logging should never break the app)
fn log_command(ctx: &FamfinContext, command: &str) {
    if let Some(service) = ctx.diagnostics().service() {
        let _ = service.log_command(command);
    }
}

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("FAMFIN_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".famfin"))
        .ok_or_else(|| anyhow!("Could not find home directory; set FAMFIN_DIR"))
}

/// Build the context and restore the persisted session
pub async fn get_context(command: &str) -> Result<FamfinContext> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    let diagnostics = get_logger().map(Diagnostics::new).unwrap_or_default();
    let ctx = FamfinContext::new(&data_dir, diagnostics)
        .context("Failed to initialize famfin context")?;

    log_command(&ctx, command);
    ctx.session.restore().await;
    Ok(ctx)
}

/// Context for a command that belongs to the signed-in flow.
///
/// Refuses to run unless the navigation guard has mounted the flow that
/// contains `screen`.
pub async fn signed_in_context(command: &str, screen: Screen) -> Result<FamfinContext> {
    let ctx = get_context(command).await?;
    let mut guard = ctx.navigation();
    let state = guard.settled().await;
    let allowed = guard.require(screen);
    guard.unsubscribe();

    match (state, allowed) {
        (_, Ok(())) => Ok(ctx),
        (NavState::Unauthenticated, Err(_)) => {
            Err(anyhow!("Not signed in. Run `ff login` first."))
        }
        (_, Err(e)) => Err(e.into()),
    }
}
