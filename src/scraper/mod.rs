pub mod cleaner;
pub mod error;
pub mod http_client;
pub mod parsers;

use crate::models::{LongRecord, RatioTable, SectorInfo, StatementKind, WideStatement};
use crate::reshape::pivot;
use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use self::error::ScrapeError;
use self::parsers::{
    parse_company_name, parse_financial_section, parse_quarterly_section, parse_ratios,
    parse_sector, parse_yearly_shareholding,
};

// ── Fetcher trait ─────────────────────────────────────────────────────────────

/// Raw page access. Swappable so pages can come from the network, from disk
/// or from memory in tests.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<String, ScrapeError>;
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Company-level data source. Each call fetches its page once.
#[async_trait]
pub trait FinancialDataSource: Send + Sync {
    /// Resolve user input (a page URL or a bare symbol) to the page URL.
    fn company_url(&self, input: &str) -> Result<String, ScrapeError>;

    async fn fetch_company_name(&self, url: &str) -> Result<String, ScrapeError>;
    async fn fetch_sector(&self, url: &str) -> Result<SectorInfo, ScrapeError>;
    async fn fetch_ratios(&self, url: &str, company: &str) -> Result<RatioTable, ScrapeError>;

    /// One statement, already pivoted to wide form with raw period labels.
    async fn fetch_statement(
        &self,
        url: &str,
        company: &str,
        kind: StatementKind,
    ) -> Result<WideStatement, ScrapeError>;
}

// ── screener.in scraper ───────────────────────────────────────────────────────

pub struct ScreenerScraper<F> {
    fetcher: F,
    base_url: String,
}

impl<F: PageFetcher> ScreenerScraper<F> {
    pub fn new(fetcher: F, base_url: &str) -> Self {
        Self {
            fetcher,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    async fn page(&self, url: &str) -> Result<String, ScrapeError> {
        debug!("Fetching page: {}", url);
        let html = self.fetcher.fetch_page(url).await?;
        debug!("  {} bytes", html.len());
        Ok(html)
    }
}

#[async_trait]
impl<F: PageFetcher> FinancialDataSource for ScreenerScraper<F> {
    /// Full company page URL. Absolute http(s) URLs pass through; anything
    /// else is taken as a symbol.  e.g. tcs → {base}/company/TCS/
    fn company_url(&self, input: &str) -> Result<String, ScrapeError> {
        let input = input.trim();
        let invalid = |reason: &str| ScrapeError::InvalidUrl {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if input.is_empty() {
            return Err(invalid("empty"));
        }

        if let Ok(url) = Url::parse(input) {
            return match url.scheme() {
                "http" | "https" => Ok(url.to_string()),
                other => Err(invalid(&format!("unsupported scheme {}", other))),
            };
        }

        if input.contains(['/', '?', '#', ' ']) {
            return Err(invalid("neither a URL nor a symbol"));
        }

        let base = Url::parse(&format!("{}/", self.base_url))
            .map_err(|e| invalid(&format!("bad base url: {}", e)))?;
        base.join(&format!("company/{}/", input.to_uppercase()))
            .map(|u| u.to_string())
            .map_err(|e| invalid(&e.to_string()))
    }

    async fn fetch_company_name(&self, url: &str) -> Result<String, ScrapeError> {
        let html = self.page(url).await?;
        parse_company_name(&html)
    }

    async fn fetch_sector(&self, url: &str) -> Result<SectorInfo, ScrapeError> {
        let html = self.page(url).await?;
        let sector = parse_sector(&html);
        if sector == SectorInfo::default() {
            warn!("No sector classification on {}", url);
        }
        Ok(sector)
    }

    async fn fetch_ratios(&self, url: &str, company: &str) -> Result<RatioTable, ScrapeError> {
        let html = self.page(url).await?;
        parse_ratios(&html, company)
    }

    async fn fetch_statement(
        &self,
        url: &str,
        company: &str,
        kind: StatementKind,
    ) -> Result<WideStatement, ScrapeError> {
        let html = self.page(url).await?;

        let records: Vec<LongRecord> = match kind {
            StatementKind::QuarterlyPnl => parse_quarterly_section(&html, company)?,
            StatementKind::Shareholding => parse_yearly_shareholding(&html, company)?,
            StatementKind::YearlyPnl | StatementKind::BalanceSheet | StatementKind::CashFlow => {
                parse_financial_section(&html, kind.section_id(), company)?
            }
        };

        debug!("{}: {} records in {}", company, records.len(), kind.title());
        Ok(pivot(&records))
    }
}
