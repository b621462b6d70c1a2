//! Family commands - view, create, join and leave a family group

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;
use dialoguer::{Confirm, Input};
use famfin_core::format::initials;
use famfin_core::services::Screen;

use super::signed_in_context;
use crate::output;

#[derive(Subcommand)]
pub enum FamilyCommands {
    /// Show your family and its members
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new family
    Create {
        /// Family name
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Join a family with an invite code
    Join {
        /// Invite code
        code: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Leave your family
    Leave {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(command: FamilyCommands) -> Result<()> {
    let ctx = signed_in_context("family", Screen::Family).await?;
    let service = &ctx.family_service;

    match command {
        FamilyCommands::Show { json } => {
            let pb = output::spinner("Loading family...");
            let result = service.my_family().await;
            pb.finish_and_clear();

            if json {
                output::print_result(&result)?;
                return Ok(());
            }
            if !result.success {
                bail!("{}", result.error_message());
            }

            let Some(family) = result.data.flatten() else {
                println!("{}", "Selamat Datang di Keluarga".bold());
                println!("Bergabung dengan keluarga untuk mengelola keuangan bersama.");
                println!();
                println!("  ff family create <nama>   Buat Keluarga");
                println!("  ff family join <kode>     Gabung Keluarga");
                return Ok(());
            };

            let user_id = ctx.session.user().and_then(|u| u.id);
            println!("{}", family.name.bold());
            println!("Kode invite: {}", family.invite_code.cyan());
            if family.is_owned_by(user_id.as_deref()) {
                println!("{}", "Anda adalah pemilik keluarga ini".dimmed());
            }
            println!();

            let mut table = output::create_table();
            table.set_header(vec!["", "Nama", "Peran"]);
            for member in &family.members {
                table.add_row(vec![initials(&member.name), member.name.clone(), member.role.label().to_string()]);
            }
            println!("{}", table);
            println!("{} anggota", family.member_count());
        }
        FamilyCommands::Create { name, json } => {
            let name = match name {
                Some(n) => n,
                None => Input::new().with_prompt("Nama keluarga").interact_text()?,
            };
            let result = service.create(&name).await;
            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Keluarga berhasil dibuat");
            } else {
                bail!("{}", result.error_message());
            }
        }
        FamilyCommands::Join { code, json } => {
            let code = match code {
                Some(c) => c,
                None => Input::new()
                    .with_prompt("Kode invite")
                    .allow_empty(true)
                    .interact_text()?,
            };
            let result = service.join(&code).await;
            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Berhasil bergabung dengan keluarga");
            } else {
                bail!("{}", result.error_message());
            }
        }
        FamilyCommands::Leave { force, json } => {
            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt("Keluar dari keluarga?")
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }
            let result = service.leave().await;
            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Anda telah keluar dari keluarga");
            } else {
                bail!("{}", result.error_message());
            }
        }
    }

    Ok(())
}
