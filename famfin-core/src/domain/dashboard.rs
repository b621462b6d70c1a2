//! Dashboard aggregates and chart data

use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use super::result::{Error, Result};
use super::transaction::{deserialize_amount, serialize_amount};
use super::Transaction;

/// Family-wide totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default, deserialize_with = "deserialize_amount", serialize_with = "serialize_amount")]
    pub total_income: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount", serialize_with = "serialize_amount")]
    pub total_expense: Decimal,
    #[serde(default, deserialize_with = "deserialize_amount", serialize_with = "serialize_amount")]
    pub balance: Decimal,
}

impl Summary {
    /// Income/expense split for the pie chart, as fractions of the total.
    /// `None` when there is nothing to show.
    pub fn split(&self) -> Option<(f64, f64)> {
        let income = self.total_income.max(Decimal::ZERO);
        let expense = self.total_expense.max(Decimal::ZERO);
        let total = income + expense;
        if total.is_zero() {
            return None;
        }
        Some((
            (income / total).to_f64().unwrap_or(0.0),
            (expense / total).to_f64().unwrap_or(0.0),
        ))
    }
}

/// Raw monthly statistics. Values are kept untyped because the server may
/// send nulls or strings inside the series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    #[serde(default)]
    pub months: Option<Vec<String>>,
    #[serde(default)]
    pub income: Option<Vec<JsonValue>>,
    #[serde(default)]
    pub expense: Option<Vec<JsonValue>>,
}

/// Income and expense figures derived from the chart series
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTotals {
    #[serde(serialize_with = "serialize_amount")]
    pub income: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub expense: Decimal,
}

fn series_sum(values: &[f64]) -> Decimal {
    values.iter().filter_map(|v| Decimal::from_f64(*v)).sum()
}

/// Chart series ready for plotting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
}

impl ChartData {
    fn empty() -> Self {
        Self {
            labels: vec!["Jan".to_string()],
            income: vec![0.0],
            expense: vec![0.0],
        }
    }

    /// Largest value across both series, for axis scaling
    pub fn max_value(&self) -> f64 {
        self.income
            .iter()
            .chain(self.expense.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    /// Sum of each series over the period
    pub fn totals(&self) -> SeriesTotals {
        SeriesTotals {
            income: series_sum(&self.income),
            expense: series_sum(&self.expense),
        }
    }

    /// Per-month average of each series
    pub fn monthly_average(&self) -> SeriesTotals {
        let average = |values: &[f64]| {
            if values.is_empty() {
                Decimal::ZERO
            } else {
                series_sum(values) / Decimal::from(values.len())
            }
        };
        SeriesTotals {
            income: average(&self.income),
            expense: average(&self.expense),
        }
    }
}

/// Coerce one chart value: non-numbers and non-finite numbers become 0,
/// negatives clamp to 0
fn sanitize_value(value: &JsonValue) -> f64 {
    let n = match value {
        JsonValue::Number(n) => n.as_f64().unwrap_or(0.0),
        JsonValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        JsonValue::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    };
    if n.is_finite() {
        n.max(0.0)
    } else {
        0.0
    }
}

/// Sanitize a whole series; a missing or empty series becomes `[0]`
pub fn sanitize_series(values: Option<&[JsonValue]>) -> Vec<f64> {
    match values {
        Some(values) if !values.is_empty() => values.iter().map(sanitize_value).collect(),
        _ => vec![0.0],
    }
}

impl MonthlyStats {
    /// Build plot-ready chart data. Labels are cut to the shorter series;
    /// missing data yields a single zero point labelled `Jan`.
    pub fn chart_data(&self) -> ChartData {
        let (Some(months), Some(income), Some(expense)) =
            (&self.months, &self.income, &self.expense)
        else {
            return ChartData::empty();
        };

        let income = sanitize_series(Some(income.as_slice()));
        let expense = sanitize_series(Some(expense.as_slice()));
        let len = months.len().min(income.len()).min(expense.len());
        if len == 0 {
            return ChartData::empty();
        }

        ChartData {
            labels: months[..len].to_vec(),
            income: income[..len].to_vec(),
            expense: expense[..len].to_vec(),
        }
    }
}

/// Reporting window for the monthly chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DashboardPeriod {
    OneMonth,
    ThreeMonths,
    #[default]
    SixMonths,
    TwelveMonths,
}

impl DashboardPeriod {
    pub const ALL: [DashboardPeriod; 4] = [
        DashboardPeriod::OneMonth,
        DashboardPeriod::ThreeMonths,
        DashboardPeriod::SixMonths,
        DashboardPeriod::TwelveMonths,
    ];

    pub fn months(&self) -> u32 {
        match self {
            DashboardPeriod::OneMonth => 1,
            DashboardPeriod::ThreeMonths => 3,
            DashboardPeriod::SixMonths => 6,
            DashboardPeriod::TwelveMonths => 12,
        }
    }

    pub fn from_months(months: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|p| p.months() == months)
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unsupported period: {} months (choose 1, 3, 6 or 12)",
                    months
                ))
            })
    }
}

impl fmt::Display for DashboardPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Bulan", self.months())
    }
}

/// Everything the dashboard shows, fetched in one go
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub period: DashboardPeriod,
    pub summary: Summary,
    pub recent: Vec<Transaction>,
    pub monthly: MonthlyStats,
}

impl DashboardData {
    pub fn chart(&self) -> ChartData {
        self.monthly.chart_data()
    }
}
