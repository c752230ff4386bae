//! Rule-based commentary over the reshaped statements.
//!
//! ## Layout
//!
//! * [`rules`]: declarative catalog of per-section rules. Each rule names the
//!   statement it reads and the columns (or ratios) it needs; the evaluator
//!   skips rules whose inputs are absent, so no rule checks presence itself.
//! * [`score`]: the composite confidence score, expressed as a table of
//!   `{category, group, predicate, effect, message}` records.
//! * [`metrics`]: derived headline scalars (gaps, averages, free cash flow).
//!
//! All inputs are period-sorted before evaluation; series keep one slot per
//! statement row so two columns of the same statement stay aligned.

pub mod metrics;
pub mod rules;
pub mod score;

use crate::models::{RatioTable, WideStatement};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── Classification ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Favorable,
    Neutral,
    Unfavorable,
}

impl Polarity {
    pub const fn marker(self) -> char {
        match self {
            Polarity::Favorable => '+',
            Polarity::Neutral => '~',
            Polarity::Unfavorable => '-',
        }
    }
}

/// Dashboard section an output belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Overview,
    Growth,
    Profitability,
    FinancialPosition,
    CashFlow,
    Shareholding,
    Executive,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Overview,
        Section::Growth,
        Section::Profitability,
        Section::FinancialPosition,
        Section::CashFlow,
        Section::Shareholding,
        Section::Executive,
    ];

    pub const fn title(self) -> &'static str {
        match self {
            Section::Overview => "Company Overview",
            Section::Growth => "Performance & Growth",
            Section::Profitability => "Profitability & Efficiency",
            Section::FinancialPosition => "Financial Position",
            Section::CashFlow => "Cash Flow Quality",
            Section::Shareholding => "Shareholding Pattern",
            Section::Executive => "Executive Financial Summary",
        }
    }
}

/// What a rule reads its named inputs from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Ratios,
    QuarterlyPnl,
    YearlyPnl,
    BalanceSheet,
    CashFlow,
    Shareholding,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub section: Section,
    pub polarity: Polarity,
    pub message: String,
}

/// A rule's verdict before it is tagged with a section.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    pub polarity: Polarity,
    pub message: String,
}

impl Finding {
    pub fn favorable(message: impl Into<String>) -> Self {
        Self { polarity: Polarity::Favorable, message: message.into() }
    }

    pub fn neutral(message: impl Into<String>) -> Self {
        Self { polarity: Polarity::Neutral, message: message.into() }
    }

    pub fn unfavorable(message: impl Into<String>) -> Self {
        Self { polarity: Polarity::Unfavorable, message: message.into() }
    }
}

// ── Series ────────────────────────────────────────────────────────────────────

/// One column of a statement in period order; `None` marks a missing year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    points: Vec<Option<f64>>,
}

impl Series {
    pub fn new(points: Vec<Option<f64>>) -> Self {
        Self { points }
    }

    #[cfg(test)]
    pub fn from_values(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Some).collect())
    }

    #[cfg(test)]
    pub fn points(&self) -> &[Option<f64>] {
        &self.points
    }

    /// Reported values only.
    pub fn present(&self) -> Vec<f64> {
        self.points.iter().flatten().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.points.iter().flatten().count()
    }

    pub fn first(&self) -> Option<f64> {
        self.points.iter().flatten().next().copied()
    }

    pub fn last(&self) -> Option<f64> {
        self.points.iter().flatten().next_back().copied()
    }

    pub fn max(&self) -> Option<f64> {
        self.points.iter().flatten().copied().reduce(f64::max)
    }

    pub fn mean(&self) -> Option<f64> {
        mean(&self.present())
    }

    pub fn std_dev(&self) -> Option<f64> {
        std_dev(&self.present())
    }

    /// Fractional change between consecutive reported values.
    /// Changes from a zero base are dropped.
    pub fn pct_change(&self) -> Vec<f64> {
        self.present()
            .windows(2)
            .map(|w| w[1] / w[0] - 1.0)
            .filter(|v| v.is_finite())
            .collect()
    }

    /// Absolute change between consecutive reported values.
    pub fn diff(&self) -> Vec<f64> {
        self.present().windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Combine two aligned series slot by slot; a slot is `None` unless both
    /// sides are reported and the result is finite.
    pub fn zip_with(&self, other: &Series, f: impl Fn(f64, f64) -> f64) -> Series {
        Series::new(
            self.points
                .iter()
                .zip(&other.points)
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => Some(f(*a, *b)).filter(|v| v.is_finite()),
                    _ => None,
                })
                .collect(),
        )
    }

    /// Pairs reported on both sides.
    pub fn paired(&self, other: &Series) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .zip(&other.points)
            .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
            .collect()
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1). Needs two values.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Period-sorted statements and ratios for one analysis window.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisInputs<'a> {
    pub ratios: &'a RatioTable,
    pub quarterly_pnl: &'a WideStatement,
    pub yearly_pnl: &'a WideStatement,
    pub balance_sheet: &'a WideStatement,
    pub cash_flow: &'a WideStatement,
    pub shareholding: &'a WideStatement,
}

impl<'a> AnalysisInputs<'a> {
    pub fn statement(&self, source: Source) -> Option<&'a WideStatement> {
        match source {
            Source::Ratios => None,
            Source::QuarterlyPnl => Some(self.quarterly_pnl),
            Source::YearlyPnl => Some(self.yearly_pnl),
            Source::BalanceSheet => Some(self.balance_sheet),
            Source::CashFlow => Some(self.cash_flow),
            Source::Shareholding => Some(self.shareholding),
        }
    }

    /// A named column, or a ratio as a one-point series. `None` when the
    /// column is absent or the ratio is not reported.
    pub fn series(&self, source: Source, name: &str) -> Option<Series> {
        match self.statement(source) {
            Some(stmt) => stmt.column(name).map(Series::new),
            None => self.ratios.get(name).map(|v| Series::new(vec![Some(v)])),
        }
    }

    pub fn ratio(&self, name: &str) -> Option<f64> {
        self.ratios.get(name)
    }
}

// ── Evaluation ────────────────────────────────────────────────────────────────

/// A declarative section rule.
#[derive(Debug, Clone, Copy)]
pub struct InsightRule {
    pub name: &'static str,
    pub section: Section,
    pub source: Source,
    /// Columns (or ratio names) passed to `evaluate`, in this order.
    pub requires: &'static [&'static str],
    pub evaluate: fn(&[Series]) -> Option<Finding>,
}

/// Run every rule whose inputs are present, in catalog order.
pub fn evaluate(rules: &[InsightRule], inputs: &AnalysisInputs<'_>) -> Vec<Insight> {
    let mut out = Vec::new();

    for rule in rules {
        let series: Option<Vec<Series>> = rule
            .requires
            .iter()
            .map(|name| inputs.series(rule.source, name))
            .collect();

        let Some(series) = series else {
            debug!("Skipping rule {}: inputs {:?} not available", rule.name, rule.requires);
            continue;
        };

        if let Some(finding) = (rule.evaluate)(&series) {
            out.push(Insight {
                section: rule.section,
                polarity: finding.polarity,
                message: finding.message,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Period, WideRow};

    #[test]
    fn test_series_stats() {
        let s = Series::new(vec![Some(100.0), None, Some(120.0), Some(150.0)]);
        assert_eq!(s.count(), 3);
        assert_eq!(s.first(), Some(100.0));
        assert_eq!(s.last(), Some(150.0));
        assert_eq!(s.max(), Some(150.0));
        assert_eq!(s.diff(), vec![20.0, 30.0]);
        let pct = s.pct_change();
        assert!((pct[0] - 0.20).abs() < 1e-12);
        assert!((pct[1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_pct_change_skips_zero_base() {
        let s = Series::from_values(&[0.0, 5.0, 10.0]);
        assert_eq!(s.pct_change(), vec![1.0]);
    }

    #[test]
    fn test_std_dev_is_sample() {
        assert_eq!(std_dev(&[1.0]), None);
        let sd = std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((sd - 2.138_089_935).abs() < 1e-6);
        assert_eq!(mean(&[]), None);
    }

    #[test]
    fn test_zip_with_aligns_slots() {
        let a = Series::new(vec![Some(10.0), None, Some(30.0)]);
        let b = Series::new(vec![Some(5.0), Some(5.0), Some(0.0)]);
        let ratio = a.zip_with(&b, |x, y| x / y);
        assert_eq!(ratio.points(), &[Some(2.0), None, None]);
        assert_eq!(a.paired(&b), vec![(10.0, 5.0), (30.0, 0.0)]);
    }

    #[test]
    fn test_evaluate_skips_rules_with_missing_columns() {
        fn always(_: &[Series]) -> Option<Finding> {
            Some(Finding::neutral("ran"))
        }
        let rules = [
            InsightRule {
                name: "has_sales",
                section: Section::Growth,
                source: Source::YearlyPnl,
                requires: &["Sales"],
                evaluate: always,
            },
            InsightRule {
                name: "needs_eps",
                section: Section::Growth,
                source: Source::YearlyPnl,
                requires: &["Sales", "EPS in Rs"],
                evaluate: always,
            },
            InsightRule {
                name: "needs_roe",
                section: Section::Overview,
                source: Source::Ratios,
                requires: &["ROE"],
                evaluate: always,
            },
        ];

        let yearly = WideStatement {
            columns: vec!["Sales".into()],
            rows: vec![WideRow {
                company: "A".into(),
                period: Period::Year(2024),
                values: vec![Some(1.0)],
            }],
        };
        let empty = WideStatement::default();
        let ratios = RatioTable::default();
        let inputs = AnalysisInputs {
            ratios: &ratios,
            quarterly_pnl: &empty,
            yearly_pnl: &yearly,
            balance_sheet: &empty,
            cash_flow: &empty,
            shareholding: &empty,
        };

        let out = evaluate(&rules, &inputs);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].section, Section::Growth);
        assert_eq!(out[0].message, "ran");
    }
}
