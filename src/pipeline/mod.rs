//! Pipeline orchestrator: ties scraper → reshaping → insights together.
//!
//! ## Stages
//!
//! `fetch()`: one load of a company page, sequential:
//!   1. Company name, sector classification, top ratios
//!   2. Quarterly P&L, yearly P&L, balance sheet, cash flow, yearly shareholding
//!   Each statement is pivoted to wide form as it arrives. Period labels stay raw.
//!
//! `analyze()`: pure, re-run whenever the analysis window changes:
//!   1. Period labels → fiscal years (rows without a year dropped)
//!   2. Window anchored on the latest yearly P&L year, applied to every
//!      yearly statement
//!   3. Headline metrics, section commentary, confidence score

use crate::config::{AnalysisConfig, AppConfig};
use crate::insights::metrics::{executive, headline};
use crate::insights::rules::CATALOG;
use crate::insights::score::ConfidenceScore;
use crate::insights::{AnalysisInputs, evaluate};
use crate::models::{CompanyData, StatementKind, WideStatement};
use crate::report::Report;
use crate::reshape::period::{AnalysisWindow, max_year, normalize_years, retain_from};
use crate::scraper::http_client::HttpClient;
use crate::scraper::{FinancialDataSource, ScreenerScraper};
use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, info, warn};

pub struct Pipeline<S> {
    source: S,
    config: AnalysisConfig,
}

impl Pipeline<ScreenerScraper<HttpClient>> {
    /// Live pipeline against the configured site.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::new(&config.scraper).context("Failed to build HTTP client")?;
        Ok(Self::with_source(
            ScreenerScraper::new(client, &config.scraper.base_url),
            config.analysis.clone(),
        ))
    }
}

impl<S: FinancialDataSource> Pipeline<S> {
    pub fn with_source(source: S, config: AnalysisConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn fetch(&self, input: &str) -> Result<CompanyData> {
        let url = self
            .source
            .company_url(input)
            .context("Could not resolve company page")?;

        // ── 1. Page header ─────────────────────────────────────────────────────
        info!("=== Step 1: Company profile ({}) ===", url);
        let company = self
            .source
            .fetch_company_name(&url)
            .await
            .context("Company name fetch failed")?;
        let sector = self.source.fetch_sector(&url).await.context("Sector fetch failed")?;
        let ratios = self
            .source
            .fetch_ratios(&url, &company)
            .await
            .context("Ratio fetch failed")?;
        if ratios.is_empty() {
            warn!("{}: no top ratios on the page", company);
        }
        info!("{}: {} ratios, sector={:?}", company, ratios.entries.len(), sector.sector);

        // ── 2. Statements ──────────────────────────────────────────────────────
        info!("=== Step 2: Financial statements ===");
        let mut statements = Vec::with_capacity(StatementKind::ALL.len());
        for kind in StatementKind::ALL {
            let stmt = self
                .source
                .fetch_statement(&url, &company, kind)
                .await
                .with_context(|| format!("{} fetch failed", kind.title()))?;
            if stmt.is_empty() {
                debug!("  {}: no rows", kind.title());
            } else {
                info!("  {}: {} periods × {} metrics", kind.title(), stmt.len(), stmt.columns.len());
            }
            statements.push(stmt);
        }

        let [quarterly_pnl, yearly_pnl, balance_sheet, cash_flow, shareholding]: [WideStatement; 5] =
            statements
                .try_into()
                .map_err(|_| anyhow::anyhow!("Statement count mismatch"))?;

        Ok(CompanyData {
            company,
            url,
            fetched_at: Local::now().naive_local(),
            sector,
            ratios,
            quarterly_pnl,
            yearly_pnl,
            balance_sheet,
            cash_flow,
            shareholding,
        })
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Apply the window to a loaded snapshot and derive everything shown.
pub fn analyze(data: &CompanyData, window: AnalysisWindow, max_highlights: usize) -> Report {
    let mut yearly_pnl = normalize_years(data.yearly_pnl.clone());
    let mut balance_sheet = normalize_years(data.balance_sheet.clone());
    let mut cash_flow = normalize_years(data.cash_flow.clone());
    let mut shareholding = normalize_years(data.shareholding.clone());
    let mut quarterly_pnl = data.quarterly_pnl.clone();

    let latest = max_year(&yearly_pnl);
    let start_year = latest.map(|max| window.start_year(max));

    match start_year {
        Some(start) => {
            info!("Window {}: {}..={}", window, start, latest.unwrap_or(start));
            yearly_pnl = retain_from(yearly_pnl, start);
            balance_sheet = retain_from(balance_sheet, start);
            cash_flow = retain_from(cash_flow, start);
            shareholding = retain_from(shareholding, start);
        }
        None => warn!("{}: no fiscal year in the yearly P&L, window not applied", data.company),
    }

    for stmt in [
        &mut quarterly_pnl,
        &mut yearly_pnl,
        &mut balance_sheet,
        &mut cash_flow,
        &mut shareholding,
    ] {
        stmt.sort_by_period();
    }

    let windowed = CompanyData {
        quarterly_pnl,
        yearly_pnl,
        balance_sheet,
        cash_flow,
        shareholding,
        ..data.clone()
    };

    let inputs = AnalysisInputs {
        ratios: &windowed.ratios,
        quarterly_pnl: &windowed.quarterly_pnl,
        yearly_pnl: &windowed.yearly_pnl,
        balance_sheet: &windowed.balance_sheet,
        cash_flow: &windowed.cash_flow,
        shareholding: &windowed.shareholding,
    };

    let mut metrics = headline(&inputs);
    let mut insights = evaluate(CATALOG, &inputs);
    let score = ConfidenceScore::compute(&inputs);
    metrics.extend(executive(&score));
    insights.extend(score.insights(max_highlights));

    debug!("{} metrics, {} insights, score {}", metrics.len(), insights.len(), score.total);

    Report {
        window,
        start_year,
        end_year: latest,
        data: windowed,
        metrics,
        insights,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Period;
    use crate::scraper::testing::MockFetcher;

    const URL: &str = "https://www.screener.in/company/ACME/";
    const PAGE: &str = include_str!("../scraper/testdata/company.html");

    fn pipeline(page: &str) -> Pipeline<ScreenerScraper<MockFetcher>> {
        Pipeline::with_source(
            ScreenerScraper::new(MockFetcher::with_page(URL, page), "https://www.screener.in"),
            AnalysisConfig::default(),
        )
    }

    /// Smallest page with every section the loader requires.
    fn minimal_page(balance_rows: &str) -> String {
        format!(
            r#"<html><body>
<h1 class="shrink-text">Mini Ltd</h1>
<ul id="top-ratios"><li><span class="name">ROE</span><span class="value">12 %</span></li></ul>
<section id="profit-loss"><table><thead><tr><th></th><th>Mar 2022</th><th>Mar 2023</th></tr></thead>
<tbody><tr><td>Sales</td><td>10</td><td>12</td></tr></tbody></table></section>
<section id="balance-sheet"><table><thead><tr><th></th><th>Mar 2022</th><th>Mar 2023</th></tr></thead>
<tbody>{}</tbody></table></section>
<section id="cash-flow"><table><thead><tr><th></th><th>Mar 2022</th></tr></thead>
<tbody><tr><td>Net Cash Flow</td><td>1</td></tr></tbody></table></section>
<section id="shareholding"><div id="yearly-shp"><table class="data-table">
<thead><tr><th></th><th>Mar 2023</th></tr></thead>
<tbody><tr><td>Promoters +</td><td>50%</td></tr></tbody></table></div></section>
</body></html>"#,
            balance_rows
        )
    }

    #[test]
    fn test_borrowings_end_to_end() {
        let page = minimal_page("<tr><td>Borrowings</td><td>100 Cr</td><td>-</td></tr>");
        let p = pipeline(&page);
        let data = tokio_test::block_on(p.fetch(URL)).unwrap();

        assert_eq!(data.company, "Mini Ltd");
        assert!(data.quarterly_pnl.is_empty());

        let report = analyze(&data, AnalysisWindow::LastDecade, 5);
        let bs = &report.data.balance_sheet;
        assert_eq!(bs.value("Mini Ltd", &Period::Year(2022), "Borrowings"), Some(1_000_000_000.0));
        assert_eq!(bs.value("Mini Ltd", &Period::Year(2023), "Borrowings"), None);
    }

    #[test]
    fn test_one_fetch_per_step() {
        let p = pipeline(PAGE);
        tokio_test::block_on(p.fetch(URL)).unwrap();
        // name, sector, ratios + five statements
        assert_eq!(*p.source().fetcher().calls.lock().unwrap(), 8);
    }

    #[test]
    fn test_missing_required_section_is_an_error() {
        let page = minimal_page("").replace("balance-sheet", "balance");
        let err = tokio_test::block_on(pipeline(&page).fetch(URL)).unwrap_err();
        assert!(format!("{:#}", err).contains("balance-sheet"));
    }

    #[test]
    fn test_full_page_report() {
        let data = tokio_test::block_on(pipeline(PAGE).fetch("acme")).unwrap();
        assert_eq!(data.url, URL);
        assert_eq!(data.sector.industry.as_deref(), Some("Industrial Machinery"));

        let report = analyze(&data, AnalysisWindow::LastDecade, 5);
        // TTM has no year and is dropped
        assert_eq!(report.data.yearly_pnl.years(), vec![2020, 2021, 2022, 2023, 2024]);
        assert_eq!(report.end_year, Some(2024));
        assert_eq!(report.data.quarterly_pnl.len(), 4);
        // 16 growth, 18 profitability, 18 balance, 15 cash flow, 16 governance, +10
        assert_eq!(report.score.total, 93);
        assert!(report.score.quality_bonus);
    }

    #[test]
    fn test_window_change_reuses_snapshot() {
        let data = tokio_test::block_on(pipeline(PAGE).fetch(URL)).unwrap();

        let report = analyze(&data, AnalysisWindow::Last3Years, 5);
        assert_eq!(report.start_year, Some(2022));
        assert_eq!(report.data.balance_sheet.years(), vec![2022, 2023, 2024]);
        assert_eq!(report.data.shareholding.years(), vec![2022, 2023, 2024]);
        // margin change of exactly one point reads as stable, not expanding
        assert_eq!(report.score.total, 92);

        // the snapshot itself is untouched
        assert_eq!(data.balance_sheet.len(), 5);
    }

    #[test]
    fn test_no_year_skips_window() {
        let mut data = tokio_test::block_on(pipeline(PAGE).fetch(URL)).unwrap();
        data.yearly_pnl = WideStatement::default();
        let report = analyze(&data, AnalysisWindow::Last3Years, 5);
        assert_eq!(report.start_year, None);
        assert_eq!(report.data.balance_sheet.len(), 5);
    }
}
