//! Output formatting utilities

use std::time::Duration;

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Color, ContentArrangement, Table};
use famfin_core::format::format_currency;
use famfin_core::{OperationResult, Transaction, TransactionType};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an operation envelope as JSON; a failed operation still becomes
/// an error so the exit code reflects it
pub fn print_result<T: Serialize>(result: &OperationResult<T>) -> anyhow::Result<()> {
    print_json(result)?;
    if !result.success {
        anyhow::bail!("{}", result.error_message());
    }
    Ok(())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Spinner shown while waiting on the API; hidden when stdout is not a tty
pub fn spinner(msg: &str) -> ProgressBar {
    if atty::isnt(atty::Stream::Stdout) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Amount cell: green for income, red with a minus for expenses
pub fn amount_cell(transaction: &Transaction) -> Cell {
    match transaction.kind {
        TransactionType::Income => {
            Cell::new(format!("+{}", format_currency(transaction.amount.abs()))).fg(Color::Green)
        }
        TransactionType::Expense => {
            Cell::new(format!("-{}", format_currency(transaction.amount.abs()))).fg(Color::Red)
        }
    }
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transaction(kind: &str, amount: &str) -> Transaction {
        serde_json::from_value(json!({
            "_id": "t1",
            "type": kind,
            "amount": amount,
            "description": "Belanja",
            "category": "Belanja",
            "date": "2024-03-15"
        }))
        .unwrap()
    }

    #[test]
    fn test_amount_cell_sign() {
        assert_eq!(amount_cell(&transaction("income", "1500")).content(), "+Rp 1.500,00");
        assert_eq!(amount_cell(&transaction("expense", "1500")).content(), "-Rp 1.500,00");
        assert_eq!(amount_cell(&transaction("expense", "-1500")).content(), "-Rp 1.500,00");
    }

    #[test]
    fn test_failed_result_is_an_error() {
        assert!(print_result(&OperationResult::ok(())).is_ok());

        let err = print_result(&OperationResult::<()>::fail("Gagal membuat keluarga")).unwrap_err();
        assert_eq!(err.to_string(), "Gagal membuat keluarga");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
    }
}
