use crate::models::{LongRecord, RatioTable, SectorInfo};
use crate::scraper::cleaner::{
    clean_numeric_value, clean_table_value, last_token, normalize_ws, strip_month_prefix,
};
use crate::scraper::error::ScrapeError;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::debug;

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap_or_else(|e| panic!("invalid selector {:?}: {:?}", s, e))
}

static SECTION: LazyLock<Selector> = LazyLock::new(|| sel("section"));
static TABLE: LazyLock<Selector> = LazyLock::new(|| sel("table"));
static HEADER_CELLS: LazyLock<Selector> = LazyLock::new(|| sel("thead th"));
static BODY_ROWS: LazyLock<Selector> = LazyLock::new(|| sel("tbody tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| sel("td"));
static COMPANY_HEADING: LazyLock<Selector> = LazyLock::new(|| sel("h1.shrink-text"));
static ANY_H1: LazyLock<Selector> = LazyLock::new(|| sel("h1"));
static TOP_RATIOS: LazyLock<Selector> = LazyLock::new(|| sel("ul#top-ratios"));
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| sel("li"));
static RATIO_NAME: LazyLock<Selector> = LazyLock::new(|| sel("span.name"));
static RATIO_VALUE: LazyLock<Selector> = LazyLock::new(|| sel("span.value"));
static SECTOR_LINKS: LazyLock<Selector> = LazyLock::new(|| sel("p.sub a[title]"));
static YEARLY_SHP: LazyLock<Selector> = LazyLock::new(|| sel("div#yearly-shp"));
static DATA_TABLE: LazyLock<Selector> = LazyLock::new(|| sel("table.data-table"));

const PEERS_SECTION: &str = "peers";
const HIGH_LOW_MARKER: &str = "High / Low";

/// How column headers turn into period labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStyle {
    /// "Mar 2016" → "2016"; "TTM" stays.
    Yearly,
    /// "Dec 2023" kept as is.
    Quarterly,
    /// "Mar 2017" → "2017" via the last token.
    LastToken,
}

impl HeaderStyle {
    fn label(self, header: &str) -> String {
        match self {
            HeaderStyle::Yearly => strip_month_prefix(header),
            HeaderStyle::Quarterly => header.to_string(),
            HeaderStyle::LastToken => last_token(header),
        }
    }
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

fn find_section<'a>(doc: &'a Html, id: &str) -> Option<ElementRef<'a>> {
    doc.select(&SECTION).find(|s| s.value().id() == Some(id))
}

// ── Statement tables ──────────────────────────────────────────────────────────

/// Read a period × metric table into long-form records.
///
/// Rows with fewer than two cells are separators. Values pair up with period
/// columns positionally; when the counts disagree the shorter side wins.
pub fn extract_table(table: ElementRef<'_>, company: &str, style: HeaderStyle) -> Vec<LongRecord> {
    let periods: Vec<String> = table
        .select(&HEADER_CELLS)
        .skip(1)
        .map(|th| style.label(&text_of(th)))
        .collect();

    let mut records = Vec::new();

    for tr in table.select(&BODY_ROWS) {
        let cells: Vec<String> = tr.select(&CELL).map(text_of).collect();

        let Some((metric, values)) = cells.split_first() else { continue };
        if values.is_empty() {
            continue;
        }

        if values.len() != periods.len() {
            debug!(
                "{}: row {:?} has {} values for {} periods",
                company,
                metric,
                values.len(),
                periods.len()
            );
        }

        for (period, raw) in periods.iter().zip(values) {
            records.push(LongRecord::new(
                company,
                period.as_str(),
                metric.as_str(),
                clean_table_value(raw),
            ));
        }
    }

    records
}

/// Yearly statement inside `<section id=section_id>`: profit-loss,
/// balance-sheet, cash-flow. A missing section or table is an error.
pub fn parse_financial_section(
    html: &str,
    section_id: &str,
    company: &str,
) -> Result<Vec<LongRecord>, ScrapeError> {
    let doc = Html::parse_document(html);

    let section = find_section(&doc, section_id).ok_or_else(|| ScrapeError::SectionMissing {
        section: section_id.to_string(),
    })?;
    let table = section
        .select(&TABLE)
        .next()
        .ok_or_else(|| ScrapeError::TableMissing {
            section: section_id.to_string(),
        })?;

    Ok(extract_table(table, company, HeaderStyle::Yearly))
}

/// Quarterly results. Not every company publishes them, so a missing
/// section yields no records.
pub fn parse_quarterly_section(html: &str, company: &str) -> Result<Vec<LongRecord>, ScrapeError> {
    let doc = Html::parse_document(html);

    let Some(section) = find_section(&doc, "quarters") else {
        debug!("{}: no quarterly section", company);
        return Ok(vec![]);
    };
    let table = section
        .select(&TABLE)
        .next()
        .ok_or_else(|| ScrapeError::TableMissing {
            section: "quarters".to_string(),
        })?;

    Ok(extract_table(table, company, HeaderStyle::Quarterly))
}

/// Yearly shareholding pattern: the table under `div#yearly-shp`.
pub fn parse_yearly_shareholding(html: &str, company: &str) -> Result<Vec<LongRecord>, ScrapeError> {
    let doc = Html::parse_document(html);

    let yearly = find_section(&doc, "shareholding")
        .and_then(|s| s.select(&YEARLY_SHP).next())
        .ok_or_else(|| ScrapeError::SectionMissing {
            section: "shareholding/yearly-shp".to_string(),
        })?;
    let table = yearly
        .select(&DATA_TABLE)
        .next()
        .or_else(|| yearly.select(&TABLE).next())
        .ok_or_else(|| ScrapeError::TableMissing {
            section: "shareholding/yearly-shp".to_string(),
        })?;

    Ok(extract_table(table, company, HeaderStyle::LastToken))
}

// ── Page header ───────────────────────────────────────────────────────────────

pub fn parse_company_name(html: &str) -> Result<String, ScrapeError> {
    let doc = Html::parse_document(html);

    doc.select(&COMPANY_HEADING)
        .chain(doc.select(&ANY_H1))
        .map(text_of)
        .find(|name| !name.is_empty())
        .ok_or(ScrapeError::MissingField { field: "company name" })
}

/// Top ratios list. "High / Low" carries two prices and is split into
/// "52W High" and "52W Low".
pub fn parse_ratios(html: &str, company: &str) -> Result<RatioTable, ScrapeError> {
    let doc = Html::parse_document(html);

    let list = doc
        .select(&TOP_RATIOS)
        .next()
        .ok_or_else(|| ScrapeError::SectionMissing {
            section: "top-ratios".to_string(),
        })?;

    let mut table = RatioTable::default();

    for li in list.select(&LIST_ITEM) {
        let Some(name) = li.select(&RATIO_NAME).next().map(text_of) else { continue };
        let value_text = li.select(&RATIO_VALUE).next().map(text_of);

        if name.contains(HIGH_LOW_MARKER) {
            let mut halves = value_text.as_deref().unwrap_or_default().splitn(2, '/');
            let high = clean_numeric_value(halves.next());
            let low = clean_numeric_value(halves.next());
            table.push(company, "52W High", high);
            table.push(company, "52W Low", low);
        } else {
            table.push(company, name, clean_numeric_value(value_text.as_deref()));
        }
    }

    debug!("{}: {} ratios", company, table.entries.len());
    Ok(table)
}

/// Classification links in the peers section. Anything absent stays `None`.
pub fn parse_sector(html: &str) -> SectorInfo {
    let doc = Html::parse_document(html);
    let mut info = SectorInfo::default();

    let Some(peers) = find_section(&doc, PEERS_SECTION) else {
        return info;
    };

    for a in peers.select(&SECTOR_LINKS) {
        let text = text_of(a);
        if text.is_empty() {
            continue;
        }
        match a.value().attr("title") {
            Some("Broad Sector") => info.broad_sector = Some(text),
            Some("Sector") => info.sector = Some(text),
            Some("Broad Industry") => info.broad_industry = Some(text),
            Some("Industry") => info.industry = Some(text),
            _ => {}
        }
    }

    info
}

// ── Tests ─────────────────────────────────────────────────────────────────────
