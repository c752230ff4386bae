//! Derived headline scalars shown next to the commentary.

use super::score::{Category, ConfidenceScore};
use super::{AnalysisInputs, Section, Series, Source};
use crate::models::ValueKind;
use serde::{Deserialize, Serialize};

pub const OPERATING_CASH: &str = "Cash from Operating Activity";
pub const INVESTING_CASH: &str = "Cash from Investing Activity";
pub const FINANCING_CASH: &str = "Cash from Financing Activity";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub section: Section,
    pub label: String,
    pub value: Option<f64>,
    pub kind: ValueKind,
}

impl Metric {
    fn new(section: Section, label: &str, value: Option<f64>, kind: ValueKind) -> Self {
        Self { section, label: label.to_string(), value, kind }
    }
}

/// Overview ratios in display order: (ratio name, label, kind).
const OVERVIEW: [(&str, &str, ValueKind); 4] = [
    ("Market Cap", "Market Cap", ValueKind::Currency),
    ("Current Price", "Current Price", ValueKind::Price),
    ("Stock P/E", "P/E Ratio", ValueKind::Ratio),
    ("Book Value", "Book Value", ValueKind::Price),
];

const OVERVIEW_TAIL: [(&str, &str, ValueKind); 3] = [
    ("52W High", "52W High", ValueKind::Price),
    ("52W Low", "52W Low", ValueKind::Price),
    ("Face Value", "Face Value", ValueKind::Price),
];

/// Headline figures for every section except the executive summary.
pub fn headline(inputs: &AnalysisInputs<'_>) -> Vec<Metric> {
    let mut out: Vec<Metric> = OVERVIEW
        .iter()
        .map(|(name, label, kind)| Metric::new(Section::Overview, label, inputs.ratio(name), *kind))
        .collect();

    let roe = inputs.ratio("ROE");
    let roce = inputs.ratio("ROCE");
    let pe = inputs.ratio("Stock P/E");

    out.push(Metric::new(Section::Overview, "ROCE (%)", roce, ValueKind::Percent));
    out.push(Metric::new(
        Section::Overview,
        "Dividend Yield (%)",
        inputs.ratio("Dividend Yield"),
        ValueKind::Percent,
    ));
    out.push(Metric::new(Section::Overview, "ROE (%)", roe, ValueKind::Percent));
    out.push(Metric::new(
        Section::Overview,
        "ROE-ROCE Gap",
        roe.zip(roce).map(|(e, c)| e - c),
        ValueKind::Ratio,
    ));
    out.extend(
        OVERVIEW_TAIL
            .iter()
            .map(|(name, label, kind)| Metric::new(Section::Overview, label, inputs.ratio(name), *kind)),
    );
    out.push(Metric::new(
        Section::Overview,
        "Valuation Density",
        pe.zip(roe).map(|(p, e)| p / e).filter(|v| v.is_finite()),
        ValueKind::Ratio,
    ));

    for name in ["Borrowings", "Reserves"] {
        out.push(Metric::new(
            Section::FinancialPosition,
            &format!("{} Growth (avg %)", name),
            average_growth(inputs.series(Source::BalanceSheet, name).as_ref()),
            ValueKind::Percent,
        ));
    }

    let ocf = inputs.series(Source::CashFlow, OPERATING_CASH);
    let icf = inputs.series(Source::CashFlow, INVESTING_CASH);
    let fcf = ocf.as_ref().zip(icf.as_ref()).map(|(o, i)| free_cash_flow(o, i));
    out.push(Metric::new(
        Section::CashFlow,
        "Average Free Cash Flow",
        fcf.and_then(|s| s.mean()),
        ValueKind::Currency,
    ));
    for (name, label) in [
        (OPERATING_CASH, "Average Operating Cash Flow"),
        (INVESTING_CASH, "Average Investing Cash Flow"),
        (FINANCING_CASH, "Average Financing Cash Flow"),
    ] {
        out.push(Metric::new(
            Section::CashFlow,
            label,
            inputs.series(Source::CashFlow, name).and_then(|s| s.mean()),
            ValueKind::Currency,
        ));
    }

    out
}

/// Category scores and the total as executive metrics.
pub fn executive(score: &ConfidenceScore) -> Vec<Metric> {
    let mut out: Vec<Metric> = Category::ALL
        .iter()
        .map(|&c| {
            Metric::new(Section::Executive, c.label(), Some(score.score(c) as f64), ValueKind::Ratio)
        })
        .collect();
    out.push(Metric::new(
        Section::Executive,
        "Financial Confidence Score",
        Some(score.total as f64),
        ValueKind::Ratio,
    ));
    out
}

/// Mean period-over-period growth in percent.
pub fn average_growth(series: Option<&Series>) -> Option<f64> {
    let rates = series?.pct_change();
    super::mean(&rates).map(|m| m * 100.0)
}

/// Operating plus investing cash flow, per year.
pub fn free_cash_flow(operating: &Series, investing: &Series) -> Series {
    operating.zip_with(investing, |o, i| o + i)
}
