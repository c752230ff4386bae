use crate::models::{Period, WideStatement};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("valid year regex"));

/// First four-digit run in a period label.
/// "2016\n18m" → 2016 | "Mar 2024" → 2024 | "TTM" → None
pub fn extract_year(label: &str) -> Option<i32> {
    YEAR_RE.find(label.trim())?.as_str().parse().ok()
}

/// Replace raw period labels with years, dropping rows that have none.
pub fn normalize_years(stmt: WideStatement) -> WideStatement {
    let before = stmt.rows.len();
    let rows: Vec<_> = stmt
        .rows
        .into_iter()
        .filter_map(|mut row| {
            let year = extract_year(&row.period.to_string())?;
            row.period = Period::Year(year);
            Some(row)
        })
        .collect();

    if rows.len() != before {
        debug!("Dropped {} rows without a year", before - rows.len());
    }

    WideStatement {
        columns: stmt.columns,
        rows,
    }
}

pub fn max_year(stmt: &WideStatement) -> Option<i32> {
    stmt.years().into_iter().max()
}

/// Keep rows whose year is at least `start_year`. Rows without a year go too.
pub fn retain_from(stmt: WideStatement, start_year: i32) -> WideStatement {
    WideStatement {
        columns: stmt.columns,
        rows: stmt
            .rows
            .into_iter()
            .filter(|r| r.period.year().is_some_and(|y| y >= start_year))
            .collect(),
    }
}

// ── Analysis window ───────────────────────────────────────────────────────────

/// Trailing window of fiscal years the dashboard looks at.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
pub enum AnalysisWindow {
    #[default]
    #[serde(rename = "last-decade")]
    #[value(name = "last-decade")]
    LastDecade,
    #[serde(rename = "last-3-years")]
    #[value(name = "last-3-years")]
    Last3Years,
    #[serde(rename = "last-5-years")]
    #[value(name = "last-5-years")]
    Last5Years,
    #[serde(rename = "last-7-years")]
    #[value(name = "last-7-years")]
    Last7Years,
}

impl AnalysisWindow {
    pub const ALL: [AnalysisWindow; 4] = [
        AnalysisWindow::LastDecade,
        AnalysisWindow::Last3Years,
        AnalysisWindow::Last5Years,
        AnalysisWindow::Last7Years,
    ];

    pub const fn years(self) -> i32 {
        match self {
            AnalysisWindow::LastDecade => 10,
            AnalysisWindow::Last3Years => 3,
            AnalysisWindow::Last5Years => 5,
            AnalysisWindow::Last7Years => 7,
        }
    }

    /// First year inside the window ending at `max_year`.
    pub const fn start_year(self, max_year: i32) -> i32 {
        max_year - (self.years() - 1)
    }

    pub const fn label(self) -> &'static str {
        match self {
            AnalysisWindow::LastDecade => "Last Decade",
            AnalysisWindow::Last3Years => "Last 3 Years",
            AnalysisWindow::Last5Years => "Last 5 Years",
            AnalysisWindow::Last7Years => "Last 7 Years",
        }
    }
}

impl fmt::Display for AnalysisWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
