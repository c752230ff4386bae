use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A cleaned cell value. `None` means "not reported", never zero.
pub type NormalizedValue = Option<f64>;

// ── Long-form record ──────────────────────────────────────────────────────────

/// One (company, period, metric) cell as read off a statement table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LongRecord {
    pub company: String,
    pub period: String,
    pub metric: String,
    pub value: NormalizedValue,
}

impl LongRecord {
    pub fn new(
        company: impl Into<String>,
        period: impl Into<String>,
        metric: impl Into<String>,
        value: NormalizedValue,
    ) -> Self {
        Self {
            company: company.into(),
            period: period.into(),
            metric: metric.into(),
            value,
        }
    }
}

// ── Period ────────────────────────────────────────────────────────────────────

/// Row key of a statement: the raw header label until the year has been
/// extracted, then the fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Period {
    Year(i32),
    Label(String),
}

impl Period {
    pub fn year(&self) -> Option<i32> {
        match self {
            Period::Year(y) => Some(*y),
            Period::Label(_) => None,
        }
    }

    /// Quarter labels look like "Dec 2023".
    pub fn quarter_date(&self) -> Option<NaiveDate> {
        match self {
            Period::Year(_) => None,
            Period::Label(label) => {
                NaiveDate::parse_from_str(&format!("1 {}", label.trim()), "%d %b %Y").ok()
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Year(y) => write!(f, "{}", y),
            Period::Label(label) => f.write_str(label),
        }
    }
}

// ── Wide statement ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WideRow {
    pub company: String,
    pub period: Period,
    /// Aligned with `WideStatement::columns`.
    pub values: Vec<NormalizedValue>,
}

/// One statement in wide form: a row per (company, period), a column per metric.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct WideStatement {
    pub columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideStatement {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[cfg(test)]
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// First column whose name satisfies `pred`.
    pub fn find_column(&self, pred: impl Fn(&str) -> bool) -> Option<&str> {
        self.columns.iter().map(String::as_str).find(|c| pred(c))
    }

    /// All values of a column in row order, or `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<NormalizedValue>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|r| r.values.get(idx).copied().flatten())
                .collect(),
        )
    }

    #[cfg(test)]
    pub fn value(&self, company: &str, period: &Period, metric: &str) -> NormalizedValue {
        let idx = self.column_index(metric)?;
        self.rows
            .iter()
            .find(|r| r.company == company && &r.period == period)
            .and_then(|r| r.values.get(idx).copied().flatten())
    }

    /// Years present after period normalization.
    pub fn years(&self) -> Vec<i32> {
        self.rows.iter().filter_map(|r| r.period.year()).collect()
    }

    /// Sort rows chronologically: years ascending, then quarter labels by month.
    pub fn sort_by_period(&mut self) {
        self.rows.sort_by_key(|r| (r.period.year(), r.period.quarter_date()));
    }
}

// ── Ratios ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatioEntry {
    pub company: String,
    pub metric: String,
    pub value: NormalizedValue,
}

/// The flat "top ratios" block of a company page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RatioTable {
    pub entries: Vec<RatioEntry>,
}

impl RatioTable {
    pub fn push(&mut self, company: &str, metric: impl Into<String>, value: NormalizedValue) {
        self.entries.push(RatioEntry {
            company: company.to_string(),
            metric: metric.into(),
            value,
        });
    }

    /// Value of the first entry named `metric`. Absent names and null values
    /// both come back as `None`.
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.metric == metric)
            .and_then(|e| e.value)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Sector ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SectorInfo {
    pub broad_sector: Option<String>,
    pub sector: Option<String>,
    pub broad_industry: Option<String>,
    pub industry: Option<String>,
}

// ── Statements ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    QuarterlyPnl,
    YearlyPnl,
    BalanceSheet,
    CashFlow,
    Shareholding,
}

impl StatementKind {
    pub const ALL: [StatementKind; 5] = [
        StatementKind::QuarterlyPnl,
        StatementKind::YearlyPnl,
        StatementKind::BalanceSheet,
        StatementKind::CashFlow,
        StatementKind::Shareholding,
    ];

    /// `id` of the `<section>` holding this statement on a company page.
    pub const fn section_id(self) -> &'static str {
        match self {
            StatementKind::QuarterlyPnl => "quarters",
            StatementKind::YearlyPnl => "profit-loss",
            StatementKind::BalanceSheet => "balance-sheet",
            StatementKind::CashFlow => "cash-flow",
            StatementKind::Shareholding => "shareholding",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            StatementKind::QuarterlyPnl => "Profit & Loss Quarterly",
            StatementKind::YearlyPnl => "Profit & Loss Yearly",
            StatementKind::BalanceSheet => "Yearly Balance Sheet",
            StatementKind::CashFlow => "Yearly Cashflow",
            StatementKind::Shareholding => "Yearly Shareholding",
        }
    }
}

/// Everything scraped for one company in one load.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyData {
    pub company: String,
    pub url: String,
    pub fetched_at: NaiveDateTime,
    pub sector: SectorInfo,
    pub ratios: RatioTable,
    pub quarterly_pnl: WideStatement,
    pub yearly_pnl: WideStatement,
    pub balance_sheet: WideStatement,
    pub cash_flow: WideStatement,
    pub shareholding: WideStatement,
}

impl CompanyData {
    pub fn statement(&self, kind: StatementKind) -> &WideStatement {
        match kind {
            StatementKind::QuarterlyPnl => &self.quarterly_pnl,
            StatementKind::YearlyPnl => &self.yearly_pnl,
            StatementKind::BalanceSheet => &self.balance_sheet,
            StatementKind::CashFlow => &self.cash_flow,
            StatementKind::Shareholding => &self.shareholding,
        }
    }
}

// ── Display hints ─────────────────────────────────────────────────────────────

/// How a scalar should be formatted for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Base units, shown in crore.
    Currency,
    Price,
    Percent,
    Ratio,
}
