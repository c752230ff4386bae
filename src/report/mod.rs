//! Output side: the analysed snapshot, its text rendering and CSV export.

use crate::insights::metrics::Metric;
use crate::insights::score::{Category, ConfidenceScore};
use crate::insights::{Insight, Polarity, Section};
use crate::models::{CompanyData, RatioTable, StatementKind, WideStatement};
use crate::reshape::period::AnalysisWindow;
use crate::utils::format_value;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

const PLACEHOLDER: &str = "Insufficient data to generate insights for this section.";
const OVERVIEW_PLACEHOLDER: &str = "Insufficient ratio data to generate summary insights.";

/// Everything shown for one company under one analysis window.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub window: AnalysisWindow,
    /// First fiscal year inside the window; `None` when no year was found.
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Snapshot with the window applied and rows in period order.
    pub data: CompanyData,
    pub metrics: Vec<Metric>,
    pub insights: Vec<Insight>,
    pub score: ConfidenceScore,
}

impl Report {
    pub fn metrics_for(&self, section: Section) -> impl Iterator<Item = &Metric> {
        self.metrics.iter().filter(move |m| m.section == section)
    }

    pub fn insights_for(&self, section: Section) -> impl Iterator<Item = &Insight> {
        self.insights.iter().filter(move |i| i.section == section)
    }
}

// ── Text ──────────────────────────────────────────────────────────────────────

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let data = &report.data;
    let rule = "─".repeat(60);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "  {}", data.company);
    let _ = writeln!(out, "  {}", data.url);
    let sector: Vec<&str> = [
        &data.sector.broad_sector,
        &data.sector.sector,
        &data.sector.broad_industry,
        &data.sector.industry,
    ]
    .into_iter()
    .filter_map(|s| s.as_deref())
    .collect();
    if !sector.is_empty() {
        let _ = writeln!(out, "  {}", sector.join(" › "));
    }
    let span = match (report.start_year, report.end_year) {
        (Some(s), Some(e)) => format!("{}–{}", s, e),
        _ => "all periods".to_string(),
    };
    let _ = writeln!(out, "  Window   : {} ({})", report.window, span);
    let _ = writeln!(out, "  Fetched  : {}", data.fetched_at.format("%Y-%m-%d %H:%M"));
    let _ = writeln!(out, "{}", rule);

    for section in Section::ALL {
        let _ = writeln!(out, "\n## {}", section.title());

        let metrics: Vec<&Metric> = report.metrics_for(section).collect();
        for m in &metrics {
            let _ = writeln!(out, "  {:<32} {}", m.label, format_value(m.value, m.kind));
        }

        let insights: Vec<&Insight> = report.insights_for(section).collect();
        // overview metrics always render; its placeholder keys off commentary
        if section == Section::Overview && insights.is_empty() {
            if !metrics.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "  {}", OVERVIEW_PLACEHOLDER);
            continue;
        }
        if insights.is_empty() && metrics.is_empty() {
            let _ = writeln!(out, "  {}", PLACEHOLDER);
            continue;
        }
        if !metrics.is_empty() && !insights.is_empty() {
            out.push('\n');
        }
        for i in insights {
            let _ = writeln!(out, "  [{}] {}", i.polarity.marker(), i.message);
        }
    }

    let _ = writeln!(out, "\n{}", rule);
    let _ = writeln!(out, "  {}", score_line(&report.score));
    let _ = writeln!(out, "{}", rule);
    out
}

fn score_line(score: &ConfidenceScore) -> String {
    let parts: Vec<String> = Category::ALL
        .iter()
        .map(|&c| format!("{} {}", c.label(), score.score(c)))
        .collect();
    let verdict = score.verdict();
    let tag = match verdict.polarity {
        Polarity::Favorable => "STRONG",
        Polarity::Neutral => "MODERATE",
        Polarity::Unfavorable => "WEAK",
    };
    format!("Confidence {}/100 [{}] · {}", score.total, tag, parts.join(" · "))
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// `company,period,<metric>...` with empty cells for missing values.
pub fn write_statement_csv<W: io::Write>(stmt: &WideStatement, out: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);

    let mut header = vec!["company".to_string(), "period".to_string()];
    header.extend(stmt.columns.iter().cloned());
    w.write_record(&header)?;

    for row in &stmt.rows {
        let mut record = vec![row.company.clone(), row.period.to_string()];
        record.extend(
            row.values
                .iter()
                .map(|v| v.map(|v| v.to_string()).unwrap_or_default()),
        );
        w.write_record(&record)?;
    }

    w.flush()?;
    Ok(())
}

pub fn write_ratios_csv<W: io::Write>(ratios: &RatioTable, out: W) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["company", "metric", "value"])?;
    for e in &ratios.entries {
        let value = e.value.map(|v| v.to_string()).unwrap_or_default();
        w.write_record([e.company.as_str(), e.metric.as_str(), value.as_str()])?;
    }
    w.flush()?;
    Ok(())
}

fn file_stem(kind: StatementKind) -> &'static str {
    match kind {
        StatementKind::QuarterlyPnl => "quarterly_pnl",
        StatementKind::YearlyPnl => "yearly_pnl",
        StatementKind::BalanceSheet => "balance_sheet",
        StatementKind::CashFlow => "cash_flow",
        StatementKind::Shareholding => "shareholding",
    }
}

/// Write the six tables of a snapshot into `dir`, one CSV each.
pub fn export_dataset(data: &CompanyData, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Cannot create {:?}", dir))?;
    let mut written = Vec::with_capacity(StatementKind::ALL.len() + 1);

    let path = dir.join("ratios.csv");
    let file = std::fs::File::create(&path).with_context(|| format!("Cannot create {:?}", path))?;
    write_ratios_csv(&data.ratios, file)?;
    written.push(path);

    for kind in StatementKind::ALL {
        let path = dir.join(format!("{}.csv", file_stem(kind)));
        let file =
            std::fs::File::create(&path).with_context(|| format!("Cannot create {:?}", path))?;
        write_statement_csv(data.statement(kind), file)
            .with_context(|| format!("Writing {}", kind.title()))?;
        written.push(path);
    }

    info!("Wrote {} CSV files to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::score::ScoreFacts;
    use crate::models::{Period, SectorInfo, ValueKind, WideRow};
    use chrono::NaiveDate;

    fn statement() -> WideStatement {
        WideStatement {
            columns: vec!["Sales".into(), "Borrowings".into()],
            rows: vec![
                WideRow {
                    company: "A".into(),
                    period: Period::Year(2022),
                    values: vec![Some(100.0), Some(1e9)],
                },
                WideRow {
                    company: "A".into(),
                    period: Period::Year(2023),
                    values: vec![Some(120.5), None],
                },
            ],
        }
    }

    fn report() -> Report {
        let fetched_at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        Report {
            window: AnalysisWindow::Last5Years,
            start_year: Some(2020),
            end_year: Some(2024),
            data: CompanyData {
                company: "Acme".into(),
                url: "https://example.com/company/ACME/".into(),
                fetched_at,
                sector: SectorInfo {
                    sector: Some("Capital Goods".into()),
                    ..Default::default()
                },
                ratios: RatioTable::default(),
                quarterly_pnl: WideStatement::default(),
                yearly_pnl: statement(),
                balance_sheet: WideStatement::default(),
                cash_flow: WideStatement::default(),
                shareholding: WideStatement::default(),
            },
            metrics: vec![Metric {
                section: Section::Overview,
                label: "Market Cap".into(),
                value: Some(1.25e11),
                kind: ValueKind::Currency,
            }],
            insights: vec![Insight {
                section: Section::Growth,
                polarity: Polarity::Favorable,
                message: "Revenue rose.".into(),
            }],
            score: ConfidenceScore::from_facts(&ScoreFacts::default()),
        }
    }

    #[test]
    fn test_statement_csv() {
        let mut buf = Vec::new();
        write_statement_csv(&statement(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "company,period,Sales,Borrowings\nA,2022,100,1000000000\nA,2023,120.5,\n"
        );
    }

    #[test]
    fn test_ratios_csv_blank_for_missing() {
        let mut ratios = RatioTable::default();
        ratios.push("A", "ROE", Some(18.5));
        ratios.push("A", "Stock P/E", None);
        let mut buf = Vec::new();
        write_ratios_csv(&ratios, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "company,metric,value\nA,ROE,18.5\nA,Stock P/E,\n");
    }

    #[test]
    fn test_render_text_sections_and_placeholders() {
        let text = render_text(&report());
        assert!(text.contains("Acme"));
        assert!(text.contains("Capital Goods"));
        assert!(text.contains("Last 5 Years (2020–2024)"));
        assert!(text.contains("12500.00 Crore"));
        assert!(text.contains("[+] Revenue rose."));
        // profitability has neither metrics nor commentary
        let profitability = text.split("## Profitability & Efficiency").nth(1).unwrap();
        assert!(profitability.trim_start().starts_with(PLACEHOLDER));
        assert!(text.contains("Confidence 71/100 [MODERATE]"));
    }

    #[test]
    fn test_overview_placeholder_despite_headline_metrics() {
        let mut r = report();
        r.metrics[0].value = None;
        let text = render_text(&r);
        let overview = text.split("## Company Overview").nth(1).unwrap();
        let overview = overview.split("\n## ").next().unwrap();
        assert!(overview.contains("Market Cap"));
        assert!(overview.contains("NA"));
        assert!(overview.contains(OVERVIEW_PLACEHOLDER));
        assert!(!overview.contains(PLACEHOLDER));

        r.insights.push(Insight {
            section: Section::Overview,
            polarity: Polarity::Neutral,
            message: "Valuation looks fair.".into(),
        });
        let text = render_text(&r);
        assert!(!text.contains(OVERVIEW_PLACEHOLDER));
        assert!(text.contains("[~] Valuation looks fair."));
    }

    #[test]
    fn test_export_dataset_writes_every_table() {
        let dir = std::env::temp_dir().join(format!("dataset_{}", std::process::id()));
        let written = export_dataset(&report().data, &dir).unwrap();
        assert_eq!(written.len(), 6);
        let yearly = std::fs::read_to_string(dir.join("yearly_pnl.csv")).unwrap();
        assert!(yearly.starts_with("company,period,Sales"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_follows_window() {
        use crate::config::AnalysisConfig;
        use crate::pipeline::{Pipeline, analyze};
        use crate::scraper::ScreenerScraper;
        use crate::scraper::testing::MockFetcher;

        const URL: &str = "https://www.screener.in/company/ACME/";
        let pipeline = Pipeline::with_source(
            ScreenerScraper::new(
                MockFetcher::with_page(URL, include_str!("../scraper/testdata/company.html")),
                "https://www.screener.in",
            ),
            AnalysisConfig::default(),
        );
        let data = tokio_test::block_on(pipeline.fetch(URL)).unwrap();
        let report = analyze(&data, AnalysisWindow::Last3Years, 5);

        let dir = std::env::temp_dir().join(format!("dataset_window_{}", std::process::id()));
        export_dataset(&report.data, &dir).unwrap();
        let yearly = std::fs::read_to_string(dir.join("yearly_pnl.csv")).unwrap();
        let periods: Vec<&str> = yearly
            .lines()
            .skip(1)
            .filter_map(|l| l.split(',').nth(1))
            .collect();
        assert_eq!(periods, vec!["2022", "2023", "2024"]);
        assert!(!yearly.contains("TTM"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(report()).unwrap();
        assert_eq!(json["window"], "last-5-years");
        assert_eq!(json["data"]["yearly_pnl"]["rows"][0]["period"], 2022);
        assert_eq!(json["score"]["total"], 71);
    }
}
