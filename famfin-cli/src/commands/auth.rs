//! Auth commands - login, register, logout and password change

use std::env;

use anyhow::{bail, Result};
use dialoguer::{Input, Password};
use famfin_core::domain::{PasswordChangeForm, RegistrationForm};
use famfin_core::services::Screen;

use super::{get_context, signed_in_context};
use crate::output;

/// Get password from the FAMFIN_PASSWORD env var, or prompt
fn password_or_prompt(prompt: &str) -> Result<String> {
    if let Ok(p) = env::var("FAMFIN_PASSWORD") {
        return Ok(p);
    }
    let p = Password::new().with_prompt(prompt).interact()?;
    Ok(p)
}

fn text_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

pub async fn login(email: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context("login").await?;
    if let Some(user) = ctx.session.user() {
        if !json {
            output::info(&format!("Already signed in as {}. Run `ff logout` first.", user.email));
        }
        return Ok(());
    }

    let email = text_or_prompt(email, "Email")?;
    let password = password_or_prompt("Password")?;
    if email.trim().is_empty() || password.is_empty() {
        bail!("Email dan password harus diisi");
    }

    let pb = output::spinner("Signing in...");
    let result = ctx.session.login(email.trim(), &password).await;
    pb.finish_and_clear();

    if json {
        output::print_result(&result)?;
        return Ok(());
    }

    if !result.success {
        bail!("{}", result.error_message());
    }
    let name = result.data.map(|user| user.name).unwrap_or_default();
    output::success(&format!("Welcome, {}!", name));
    Ok(())
}

pub async fn register(name: Option<String>, email: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context("register").await?;

    let form = RegistrationForm {
        name: text_or_prompt(name, "Name")?,
        email: text_or_prompt(email, "Email")?,
        password: password_or_prompt("Password")?,
        confirm_password: match env::var("FAMFIN_PASSWORD") {
            Ok(p) => p,
            Err(_) => Password::new().with_prompt("Confirm password").interact()?,
        },
    };
    if form.name.trim().is_empty() || form.email.trim().is_empty() {
        bail!("Semua field harus diisi");
    }
    if let Err(e) = form.validate() {
        bail!("{}", e.user_message("Data tidak valid"));
    }

    let pb = output::spinner("Creating account...");
    let result = ctx
        .session
        .register(form.name.trim(), form.email.trim(), &form.password)
        .await;
    pb.finish_and_clear();

    if json {
        output::print_result(&result)?;
        return Ok(());
    }
    if !result.success {
        bail!("{}", result.error_message());
    }
    output::success("Account created. Sign in with `ff login`.");
    Ok(())
}

pub async fn logout(json: bool) -> Result<()> {
    let ctx = get_context("logout").await?;
    let was_signed_in = ctx.session.state().is_authenticated();
    ctx.session.logout().await;

    if json {
        output::print_json(&serde_json::json!({ "signedOut": was_signed_in }))?;
    } else if was_signed_in {
        output::success("Signed out.");
    } else {
        output::info("Not signed in.");
    }
    Ok(())
}

pub async fn change_password(json: bool) -> Result<()> {
    let ctx = signed_in_context("password", Screen::Settings).await?;

    let form = PasswordChangeForm {
        old_password: Password::new().with_prompt("Current password").interact()?,
        new_password: Password::new().with_prompt("New password").interact()?,
        confirm_password: Password::new().with_prompt("Confirm new password").interact()?,
    };

    let pb = output::spinner("Updating password...");
    let result = ctx.account_service.change_password(&form).await;
    pb.finish_and_clear();

    if json {
        output::print_result(&result)?;
        return Ok(());
    }
    if !result.success {
        bail!("{}", result.error_message());
    }
    output::success("Password berhasil diubah");
    Ok(())
}
