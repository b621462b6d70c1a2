//! Dashboard command - family totals, monthly chart and recent activity

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color};
use famfin_core::domain::ChartData;
use famfin_core::format::{compact_axis_label, format_currency, format_day_month};
use famfin_core::services::Screen;
use famfin_core::DashboardPeriod;

use super::signed_in_context;
use crate::output;

const BAR_WIDTH: usize = 30;

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.min(BAR_WIDTH))
}

fn print_chart(chart: &ChartData) {
    let max = chart.max_value();
    println!("{}", "Statistik Bulanan".bold());
    for ((label, income), expense) in chart
        .labels
        .iter()
        .zip(&chart.income)
        .zip(&chart.expense)
    {
        println!(
            "  {:<5} {} {}",
            label,
            bar(*income, max).green(),
            compact_axis_label(*income).dimmed()
        );
        println!(
            "  {:<5} {} {}",
            "",
            bar(*expense, max).red(),
            compact_axis_label(*expense).dimmed()
        );
    }
}

fn print_period_figures(chart: &ChartData) {
    let totals = chart.totals();
    let average = chart.monthly_average();
    println!(
        "  {} {}   {} {}",
        "Pemasukan".green(),
        format_currency(totals.income),
        "Pengeluaran".red(),
        format_currency(totals.expense)
    );
    println!(
        "  Rata-rata Pemasukan {} per bulan",
        format_currency(average.income).green()
    );
    println!(
        "  Rata-rata Pengeluaran {} per bulan",
        format_currency(average.expense).red()
    );
}

pub async fn run(months: Option<u32>, json: bool) -> Result<()> {
    let ctx = signed_in_context("dashboard", Screen::Dashboard).await?;
    let period = match months {
        Some(m) => DashboardPeriod::from_months(m)?,
        None => ctx.config.default_period,
    };

    let pb = output::spinner("Loading dashboard...");
    let data = ctx.dashboard_service.load(period).await;
    pb.finish_and_clear();
    let data = data?;
    let chart = data.chart();

    if json {
        output::print_json(&serde_json::json!({
            "period": period.months(),
            "summary": data.summary,
            "recent": data.recent,
            "chart": chart,
            "chartTotals": chart.totals(),
            "monthlyAverage": chart.monthly_average(),
        }))?;
        return Ok(());
    }

    let household = ctx
        .session
        .user()
        .map(|u| u.household_name().to_string())
        .unwrap_or_default();
    println!("{} {}", "Dashboard".bold(), household.dimmed());
    println!();

    let mut table = output::create_table();
    table.add_row(vec![
        Cell::new("Saldo"),
        Cell::new(format_currency(data.summary.balance)),
    ]);
    table.add_row(vec![
        Cell::new("Pemasukan"),
        Cell::new(format_currency(data.summary.total_income)).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Pengeluaran"),
        Cell::new(format_currency(data.summary.total_expense)).fg(Color::Red),
    ]);
    println!("{}", table);

    if let Some((income, expense)) = data.summary.split() {
        println!(
            "  {} {:.0}%   {} {:.0}%",
            "Pemasukan".green(),
            income * 100.0,
            "Pengeluaran".red(),
            expense * 100.0
        );
    }
    println!();

    print_chart(&chart);
    println!("  ({})", period);
    print_period_figures(&chart);
    println!();

    println!("{}", "Transaksi Terbaru".bold());
    if data.recent.is_empty() {
        println!("  Belum ada transaksi");
        return Ok(());
    }
    let mut recent = output::create_table();
    recent.set_header(vec!["Tanggal", "Deskripsi", "Kategori", "Oleh", "Jumlah"]);
    for t in &data.recent {
        recent.add_row(vec![
            Cell::new(format_day_month(&t.date)),
            Cell::new(&t.description),
            Cell::new(&t.category),
            Cell::new(t.creator_name()),
            output::amount_cell(t),
        ]);
    }
    println!("{}", recent);

    Ok(())
}
