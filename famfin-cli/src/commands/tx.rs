//! Transaction commands - list, add, edit, delete

use std::io;

use anyhow::{bail, Result};
use chrono::Local;
use clap::Subcommand;
use comfy_table::Cell;
use dialoguer::{Confirm, Input, Select};
use famfin_core::domain::transaction::Category;
use famfin_core::format::{format_date_short, mask_date_input};
use famfin_core::services::Screen;
use famfin_core::{Transaction, TransactionDraft, TransactionFilter, TransactionType};

use super::signed_in_context;
use crate::output;

#[derive(Subcommand)]
pub enum TxCommands {
    /// List family transactions
    List {
        /// Search text
        #[arg(short, long, default_value = "")]
        search: String,
        /// Filter by type (income, expense); all when omitted
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        /// Output format (table, csv, json)
        #[arg(long, default_value = "table")]
        format: String,
        /// Output as JSON (shorthand for --format json)
        #[arg(long)]
        json: bool,
    },
    /// Add a transaction
    Add {
        #[command(flatten)]
        fields: DraftArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit one of your transactions
    Edit {
        /// Transaction ID
        id: String,
        #[command(flatten)]
        fields: DraftArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one of your transactions
    Delete {
        /// Transaction ID
        id: String,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the categories for each type
    Categories {
        /// Only this type
        #[arg(long = "type")]
        kind: Option<TransactionType>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
pub struct DraftArgs {
    /// Transaction type (income, expense)
    #[arg(long = "type")]
    kind: Option<TransactionType>,
    /// Amount in rupiah
    #[arg(long)]
    amount: Option<String>,
    /// Description
    #[arg(long)]
    description: Option<String>,
    /// Category name
    #[arg(long)]
    category: Option<String>,
    /// Date (YYYY-MM-DD; digits only also work, e.g. 20240315)
    #[arg(long)]
    date: Option<String>,
}

impl DraftArgs {
    fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.amount.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }

    /// Overlay the given flags on `base`
    fn apply(self, mut base: TransactionDraft) -> TransactionDraft {
        if let Some(kind) = self.kind {
            base.kind = kind;
        }
        if let Some(amount) = self.amount {
            base.amount = amount;
        }
        if let Some(description) = self.description {
            base.description = description;
        }
        if let Some(category) = self.category {
            base.category = category;
        }
        if let Some(date) = self.date {
            base.date = normalize_date(&date);
        }
        base
    }
}

/// Run typed or pasted date text through the input mask
fn normalize_date(raw: &str) -> String {
    mask_date_input(raw)
        .map(|d| d.trim_end_matches('-').to_string())
        .unwrap_or_else(|| raw.to_string())
}

fn prompt_draft(args: DraftArgs) -> Result<TransactionDraft> {
    let kind = match args.kind {
        Some(kind) => kind,
        None => {
            let labels = [TransactionType::Expense.label(), TransactionType::Income.label()];
            let picked = Select::new()
                .with_prompt("Jenis")
                .items(&labels)
                .default(0)
                .interact()?;
            if picked == 0 {
                TransactionType::Expense
            } else {
                TransactionType::Income
            }
        }
    };

    let amount = match args.amount {
        Some(a) => a,
        None => Input::new().with_prompt("Jumlah").interact_text()?,
    };
    let description = match args.description {
        Some(d) => d,
        None => Input::new().with_prompt("Deskripsi").interact_text()?,
    };
    let category = match args.category {
        Some(c) => c,
        None => {
            let names: Vec<&str> = kind.categories().iter().map(Category::as_str).collect();
            let picked = Select::new()
                .with_prompt("Kategori")
                .items(&names)
                .default(0)
                .interact()?;
            names[picked].to_string()
        }
    };
    let date = match args.date {
        Some(d) => d,
        None => Input::new()
            .with_prompt("Tanggal (YYYY-MM-DD)")
            .default(Local::now().format("%Y-%m-%d").to_string())
            .interact_text()?,
    };

    Ok(TransactionDraft {
        kind,
        amount,
        description,
        category,
        date: normalize_date(&date),
    })
}

fn print_table(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("Belum ada transaksi");
        return;
    }
    let mut table = output::create_table();
    table.set_header(vec!["ID", "Tanggal", "Deskripsi", "Kategori", "Oleh", "Jumlah"]);
    for t in transactions {
        table.add_row(vec![
            Cell::new(&t.id),
            Cell::new(format_date_short(&t.date)),
            Cell::new(&t.description),
            Cell::new(&t.category),
            Cell::new(t.creator_name()),
            output::amount_cell(t),
        ]);
    }
    println!("{}", table);
}

fn write_csv(transactions: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["id", "date", "type", "amount", "description", "category", "created_by"])?;
    for t in transactions {
        let amount = t.amount.normalize().to_string();
        writer.write_record([
            t.id.as_str(),
            t.date_only(),
            t.kind.as_str(),
            amount.as_str(),
            t.description.as_str(),
            t.category.as_str(),
            t.creator_name(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub async fn run(command: TxCommands) -> Result<()> {
    match command {
        TxCommands::List {
            search,
            kind,
            format,
            json,
        } => {
            let ctx = signed_in_context("tx list", Screen::Transactions).await?;
            let filter = TransactionFilter { search, kind };

            let pb = output::spinner("Loading transactions...");
            let transactions = ctx.transaction_service.list(&filter).await;
            pb.finish_and_clear();
            let transactions = transactions?;

            let format = if json { "json" } else { format.as_str() };
            match format {
                "json" => output::print_json(&transactions)?,
                "csv" => write_csv(&transactions)?,
                "table" => print_table(&transactions),
                other => bail!("Unknown format '{}' (use table, csv or json)", other),
            }
        }
        TxCommands::Add { fields, json } => {
            let ctx = signed_in_context("tx add", Screen::AddTransaction).await?;
            let draft = prompt_draft(fields)?;

            let pb = output::spinner("Saving...");
            let result = ctx.transaction_service.submit(&draft, None).await;
            pb.finish_and_clear();

            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Transaksi berhasil ditambahkan");
            } else {
                bail!("{}", result.error_message());
            }
        }
        TxCommands::Edit { id, fields, json } => {
            let ctx = signed_in_context("tx edit", Screen::AddTransaction).await?;
            let existing = ctx.transaction_service.find(&id).await?;
            let owned = ctx
                .session
                .user()
                .map(|u| existing.is_owned_by(&u))
                .unwrap_or(false);
            if !owned {
                bail!("Anda tidak memiliki izin untuk melakukan ini");
            }

            let draft = if fields.is_empty() {
                let base = existing.to_draft();
                prompt_draft(DraftArgs {
                    kind: Some(base.kind),
                    amount: Some(Input::new().with_prompt("Jumlah").with_initial_text(base.amount).interact_text()?),
                    description: Some(
                        Input::new()
                            .with_prompt("Deskripsi")
                            .with_initial_text(base.description)
                            .interact_text()?,
                    ),
                    category: None,
                    date: Some(
                        Input::new()
                            .with_prompt("Tanggal (YYYY-MM-DD)")
                            .with_initial_text(base.date)
                            .interact_text()?,
                    ),
                })?
            } else {
                fields.apply(existing.to_draft())
            };

            let pb = output::spinner("Saving...");
            let result = ctx.transaction_service.submit(&draft, Some(&existing)).await;
            pb.finish_and_clear();

            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Transaksi berhasil diperbarui");
            } else {
                bail!("{}", result.error_message());
            }
        }
        TxCommands::Delete { id, force, json } => {
            let ctx = signed_in_context("tx delete", Screen::Transactions).await?;
            let existing = ctx.transaction_service.find(&id).await?;

            if !force && !json {
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "Hapus transaksi \"{}\" ({})?",
                        existing.description,
                        format_date_short(&existing.date)
                    ))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let result = ctx.transaction_service.delete(&existing).await;
            if json {
                output::print_result(&result)?;
            } else if result.success {
                output::success("Transaksi dihapus");
            } else {
                bail!("{}", result.error_message());
            }
        }
        TxCommands::Categories { kind, json } => {
            let kinds = match kind {
                Some(k) => vec![k],
                None => vec![TransactionType::Income, TransactionType::Expense],
            };

            if json {
                let map: serde_json::Map<String, serde_json::Value> = kinds
                    .iter()
                    .map(|k| {
                        let names: Vec<&str> = k.categories().iter().map(Category::as_str).collect();
                        (k.as_str().to_string(), serde_json::json!(names))
                    })
                    .collect();
                output::print_json(&map)?;
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Jenis", "Kategori", "Ikon"]);
            for k in kinds {
                for c in k.categories() {
                    table.add_row(vec![k.label(), c.as_str(), c.icon()]);
                }
            }
            println!("{}", table);
        }
    }

    Ok(())
}
