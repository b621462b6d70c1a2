//! Profile command - show the signed-in user and their family membership

use anyhow::{anyhow, Result};
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use famfin_core::domain::Family;
use famfin_core::format::{format_date_long, initials};
use famfin_core::services::Screen;
use famfin_core::OperationResult;

use super::signed_in_context;
use crate::output;

fn family_rows(result: &OperationResult<Option<Family>>, user_id: Option<&str>) -> Vec<(String, String)> {
    if !result.success {
        return vec![("Status".to_string(), result.error_message().to_string())];
    }
    match result.data.as_ref().and_then(Option::as_ref) {
        None => vec![("Status".to_string(), "Belum bergabung".to_string())],
        Some(family) => {
            let role = if family.is_owned_by(user_id) {
                "Pemilik"
            } else {
                "Anggota"
            };
            vec![
                ("Status".to_string(), role.to_string()),
                ("Nama Keluarga".to_string(), family.name.clone()),
                ("Kode Invite".to_string(), family.invite_code.clone()),
                ("Jumlah Anggota".to_string(), format!("{} orang", family.member_count())),
            ]
        }
    }
}

pub async fn run(json: bool) -> Result<()> {
    let ctx = signed_in_context("profile", Screen::Profile).await?;
    let user = ctx.session.user().ok_or_else(|| anyhow!("Not signed in"))?;

    let pb = output::spinner("Loading family...");
    let family = ctx.family_service.my_family().await;
    pb.finish_and_clear();

    if json {
        output::print_json(&serde_json::json!({
            "user": user,
            "family": family,
        }))?;
        return Ok(());
    }

    println!("{}  {}", initials(&user.name).bold().cyan(), user.name.bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec!["Email", user.email.as_str()]);
    let joined = format_date_long(user.created_at.as_deref());
    table.add_row(vec!["Bergabung", joined.as_str()]);
    println!("{}", table);
    println!();

    println!("{}", "Keluarga".bold());
    let mut family_table = Table::new();
    family_table.set_content_arrangement(ContentArrangement::Dynamic);
    for (label, value) in family_rows(&family, user.id.as_deref()) {
        family_table.add_row(vec![label, value]);
    }
    println!("{}", family_table);

    Ok(())
}
