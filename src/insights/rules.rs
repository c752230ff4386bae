//! Section commentary catalog.
//!
//! Thresholds are fixed heuristics. Rates are fractions (0.10 = 10 %), except
//! margin and shareholding columns which are already in percent.

use super::{Finding, InsightRule, Section, Series, Source, mean, std_dev};

/// Minimum yearly points for a trend statement.
const MIN_YEARS: usize = 3;
/// Minimum quarters for a momentum statement.
const MIN_QUARTERS: usize = 4;

pub static CATALOG: &[InsightRule] = &[
    // ── Overview ──────────────────────────────────────────────────────────────
    InsightRule {
        name: "roe_level",
        section: Section::Overview,
        source: Source::Ratios,
        requires: &["ROE"],
        evaluate: roe_level,
    },
    InsightRule {
        name: "roce_level",
        section: Section::Overview,
        source: Source::Ratios,
        requires: &["ROCE"],
        evaluate: roce_level,
    },
    InsightRule {
        name: "dividend_income",
        section: Section::Overview,
        source: Source::Ratios,
        requires: &["Dividend Yield"],
        evaluate: dividend_income,
    },
    InsightRule {
        name: "earnings_valuation",
        section: Section::Overview,
        source: Source::Ratios,
        requires: &["Stock P/E"],
        evaluate: earnings_valuation,
    },
    // ── Performance & growth ──────────────────────────────────────────────────
    InsightRule {
        name: "revenue_trend",
        section: Section::Growth,
        source: Source::YearlyPnl,
        requires: &["Sales"],
        evaluate: revenue_trend,
    },
    InsightRule {
        name: "profit_vs_revenue",
        section: Section::Growth,
        source: Source::YearlyPnl,
        requires: &["Net Profit", "Sales"],
        evaluate: profit_vs_revenue,
    },
    InsightRule {
        name: "eps_trend",
        section: Section::Growth,
        source: Source::YearlyPnl,
        requires: &["EPS in Rs"],
        evaluate: eps_trend,
    },
    InsightRule {
        name: "quarterly_revenue_momentum",
        section: Section::Growth,
        source: Source::QuarterlyPnl,
        requires: &["Sales"],
        evaluate: quarterly_revenue_momentum,
    },
    InsightRule {
        name: "quarterly_profit_momentum",
        section: Section::Growth,
        source: Source::QuarterlyPnl,
        requires: &["Net Profit"],
        evaluate: quarterly_profit_momentum,
    },
    // ── Profitability & efficiency ────────────────────────────────────────────
    InsightRule {
        name: "operating_profit_trend",
        section: Section::Profitability,
        source: Source::YearlyPnl,
        requires: &["Operating Profit"],
        evaluate: operating_profit_trend,
    },
    InsightRule {
        name: "margin_trend",
        section: Section::Profitability,
        source: Source::YearlyPnl,
        requires: &["OPM %"],
        evaluate: margin_trend,
    },
    InsightRule {
        name: "profit_conversion",
        section: Section::Profitability,
        source: Source::YearlyPnl,
        requires: &["Net Profit", "Operating Profit"],
        evaluate: profit_conversion,
    },
    InsightRule {
        name: "roe_quality",
        section: Section::Profitability,
        source: Source::Ratios,
        requires: &["ROE"],
        evaluate: roe_quality,
    },
    InsightRule {
        name: "roce_quality",
        section: Section::Profitability,
        source: Source::Ratios,
        requires: &["ROCE"],
        evaluate: roce_quality,
    },
    // ── Financial position ────────────────────────────────────────────────────
    InsightRule {
        name: "asset_growth",
        section: Section::FinancialPosition,
        source: Source::BalanceSheet,
        requires: &["Total Assets"],
        evaluate: asset_growth,
    },
    InsightRule {
        name: "liability_trend",
        section: Section::FinancialPosition,
        source: Source::BalanceSheet,
        requires: &["Total Liabilities"],
        evaluate: liability_trend,
    },
    InsightRule {
        name: "leverage_trend",
        section: Section::FinancialPosition,
        source: Source::BalanceSheet,
        requires: &["Borrowings"],
        evaluate: leverage_trend,
    },
    InsightRule {
        name: "reserves_trend",
        section: Section::FinancialPosition,
        source: Source::BalanceSheet,
        requires: &["Reserves"],
        evaluate: reserves_trend,
    },
    InsightRule {
        name: "funding_quality",
        section: Section::FinancialPosition,
        source: Source::BalanceSheet,
        requires: &["Borrowings", "Reserves"],
        evaluate: funding_quality,
    },
    // ── Cash flow quality ─────────────────────────────────────────────────────
    InsightRule {
        name: "operating_cash_trend",
        section: Section::CashFlow,
        source: Source::CashFlow,
        requires: &["Cash from Operating Activity"],
        evaluate: operating_cash_trend,
    },
    InsightRule {
        name: "profit_cash_alignment",
        section: Section::CashFlow,
        source: Source::CashFlow,
        requires: &["Cash from Operating Activity", "Net Profit"],
        evaluate: profit_cash_alignment,
    },
    InsightRule {
        name: "free_cash_flow",
        section: Section::CashFlow,
        source: Source::CashFlow,
        requires: &["Cash from Operating Activity", "Cash from Investing Activity"],
        evaluate: free_cash_flow,
    },
    InsightRule {
        name: "cash_flow_structure",
        section: Section::CashFlow,
        source: Source::CashFlow,
        requires: &[
            "Cash from Operating Activity",
            "Cash from Investing Activity",
            "Cash from Financing Activity",
        ],
        evaluate: cash_flow_structure,
    },
    // ── Shareholding ──────────────────────────────────────────────────────────
    InsightRule {
        name: "promoter_trend",
        section: Section::Shareholding,
        source: Source::Shareholding,
        requires: &["Promoters"],
        evaluate: promoter_trend,
    },
    InsightRule {
        name: "fii_trend",
        section: Section::Shareholding,
        source: Source::Shareholding,
        requires: &["FIIs"],
        evaluate: fii_trend,
    },
    InsightRule {
        name: "dii_trend",
        section: Section::Shareholding,
        source: Source::Shareholding,
        requires: &["DIIs"],
        evaluate: dii_trend,
    },
    InsightRule {
        name: "public_trend",
        section: Section::Shareholding,
        source: Source::Shareholding,
        requires: &["Public"],
        evaluate: public_trend,
    },
];

// ── Helpers ───────────────────────────────────────────────────────────────────

/// (first, last) reported values when at least `min` are reported.
fn span(s: &Series, min: usize) -> Option<(f64, f64)> {
    if s.count() < min {
        return None;
    }
    Some((s.first()?, s.last()?))
}

/// Last-vs-first comparison shared by the balance sheet and shareholding rules.
fn rise_or_not(
    s: &Series,
    rose: fn(&'static str) -> Finding,
    rose_msg: &'static str,
    not_rose: fn(&'static str) -> Finding,
    not_rose_msg: &'static str,
    insufficient: &'static str,
) -> Option<Finding> {
    match span(s, MIN_YEARS) {
        Some((first, last)) if last > first => Some(rose(rose_msg)),
        Some(_) => Some(not_rose(not_rose_msg)),
        None => Some(Finding::neutral(insufficient)),
    }
}

fn favorable(msg: &'static str) -> Finding {
    Finding::favorable(msg)
}

fn neutral(msg: &'static str) -> Finding {
    Finding::neutral(msg)
}

fn unfavorable(msg: &'static str) -> Finding {
    Finding::unfavorable(msg)
}

// ── Overview ──────────────────────────────────────────────────────────────────

fn roe_level(s: &[Series]) -> Option<Finding> {
    let roe = s[0].first()?;
    Some(if roe < 10.0 {
        Finding::unfavorable("The company demonstrates low return on equity.")
    } else if roe < 15.0 {
        Finding::neutral("Return on equity remains moderate.")
    } else {
        Finding::favorable("The company demonstrates strong return on equity.")
    })
}

fn roce_level(s: &[Series]) -> Option<Finding> {
    let roce = s[0].first()?;
    Some(if roce > 18.0 {
        Finding::favorable("Capital is being employed efficiently.")
    } else if roce > 12.0 {
        Finding::neutral("Capital efficiency appears average.")
    } else {
        Finding::unfavorable("Capital efficiency appears meagre.")
    })
}

fn dividend_income(s: &[Series]) -> Option<Finding> {
    (s[0].first()? > 1.0)
        .then(|| Finding::favorable("The company provides regular income to shareholders."))
}

fn earnings_valuation(s: &[Series]) -> Option<Finding> {
    (s[0].first()? > 30.0)
        .then(|| Finding::unfavorable("Valuation appears relatively high based on earnings."))
}

// ── Growth ────────────────────────────────────────────────────────────────────

fn revenue_trend(s: &[Series]) -> Option<Finding> {
    let growth = s[0].pct_change();
    if growth.is_empty() {
        return Some(Finding::neutral("Insufficient data to assess revenue trend."));
    }
    let avg = mean(&growth)?;

    let direction = if avg > 0.10 {
        "strong growth"
    } else if avg > 0.0 {
        "moderate growth"
    } else {
        "weak or negative growth"
    };
    let stability = match std_dev(&growth) {
        Some(sd) if sd < 0.05 => "stable",
        _ => "volatile",
    };

    Some(Finding::neutral(format!(
        "Revenue shows {} with relatively {} year-on-year performance.",
        direction, stability
    )))
}

fn profit_vs_revenue(s: &[Series]) -> Option<Finding> {
    let (profit, sales) = (&s[0], &s[1]);
    if profit.count() < MIN_YEARS {
        return Some(Finding::neutral("Insufficient data to assess net profit trend."));
    }
    let profit_growth = mean(&profit.pct_change())?;
    let sales_growth = mean(&sales.pct_change())?;

    Some(if profit_growth > sales_growth {
        Finding::favorable(
            "Net profit growth outpaces revenue growth, indicating operating leverage and improving cost efficiency.",
        )
    } else if profit_growth < sales_growth {
        Finding::unfavorable(
            "Net profit growth lags revenue growth, suggesting margin pressure or rising costs.",
        )
    } else {
        Finding::neutral("Net profit and revenue growth move broadly in line.")
    })
}

fn eps_trend(s: &[Series]) -> Option<Finding> {
    if s[0].count() < MIN_YEARS {
        return Some(Finding::neutral("Insufficient data to assess EPS trend."));
    }
    Some(match mean(&s[0].pct_change()) {
        Some(g) if g > 0.0 => Finding::favorable(
            "Earnings per share show an upward trend, indicating that business growth is translating into shareholder returns.",
        ),
        _ => Finding::unfavorable("EPS growth remains muted despite business performance."),
    })
}

fn quarterly_revenue_momentum(s: &[Series]) -> Option<Finding> {
    if s[0].count() < MIN_QUARTERS {
        return Some(Finding::neutral("Limited quarterly data to assess revenue momentum."));
    }
    Some(match std_dev(&s[0].pct_change()) {
        Some(sd) if sd < 0.10 => Finding::favorable(
            "Quarterly revenue shows relatively stable momentum with limited short-term volatility.",
        ),
        _ => Finding::unfavorable(
            "Quarterly revenue exhibits noticeable volatility, indicating short-term demand fluctuations.",
        ),
    })
}

fn quarterly_profit_momentum(s: &[Series]) -> Option<Finding> {
    if s[0].count() < MIN_QUARTERS {
        return Some(Finding::neutral("Limited quarterly data to assess profit stability."));
    }
    Some(match mean(&s[0].pct_change()) {
        Some(g) if g > 0.0 => {
            Finding::favorable("Quarterly profits show improving momentum in recent periods.")
        }
        _ => Finding::unfavorable(
            "Quarterly profits appear uneven, suggesting sensitivity to costs or one-off factors.",
        ),
    })
}

// ── Profitability ─────────────────────────────────────────────────────────────

fn operating_profit_trend(s: &[Series]) -> Option<Finding> {
    if s[0].count() < MIN_YEARS {
        return Some(Finding::neutral("Insufficient data to assess operating profit trend."));
    }
    Some(match mean(&s[0].pct_change()) {
        Some(g) if g > 0.0 => Finding::favorable(
            "Operating profits show an upward trend, indicating improving core business performance.",
        ),
        _ => Finding::unfavorable(
            "Operating profit growth appears weak, suggesting pressure on core operations.",
        ),
    })
}

fn margin_trend(s: &[Series]) -> Option<Finding> {
    if s[0].count() < MIN_YEARS {
        return Some(Finding::neutral("Insufficient data to assess margin trend."));
    }
    let change = mean(&s[0].diff())?;
    Some(if change > 0.0 {
        Finding::favorable(
            "Operating margins are expanding over time, indicating improvement in cost efficiency or better pricing.",
        )
    } else if change < 0.0 {
        Finding::unfavorable(
            "Operating margins are contracting, suggesting rising costs or pricing pressure.",
        )
    } else {
        Finding::neutral("Operating margins remain broadly stable over time.")
    })
}

fn profit_conversion(s: &[Series]) -> Option<Finding> {
    let (net, operating) = (&s[0], &s[1]);
    if net.count() < MIN_YEARS || operating.count() < MIN_YEARS {
        return None;
    }
    let ratio = net.zip_with(operating, |n, o| n / o).mean()?;
    Some(if ratio > 0.75 {
        Finding::favorable(
            "A high proportion of operating profit converts into net profit, indicating efficient cost, interest, and tax management.",
        )
    } else {
        Finding::unfavorable(
            "Net profit conversion from operating profit is relatively low, suggesting leakage through interest, depreciation, or taxes.",
        )
    })
}

fn roe_quality(s: &[Series]) -> Option<Finding> {
    Some(if s[0].first()? > 15.0 {
        Finding::favorable("Return on equity is strong, reflecting efficient use of shareholder capital.")
    } else {
        Finding::unfavorable(
            "Return on equity is moderate, indicating scope for improved capital efficiency.",
        )
    })
}

fn roce_quality(s: &[Series]) -> Option<Finding> {
    Some(if s[0].first()? > 15.0 {
        Finding::favorable("ROCE is healthy, indicating effective deployment of long-term capital.")
    } else {
        Finding::unfavorable("ROCE is relatively low, suggesting suboptimal capital utilization.")
    })
}

// ── Financial position ────────────────────────────────────────────────────────

fn asset_growth(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        favorable,
        "Total assets have expanded over time, indicating growth in the company's balance sheet size.",
        unfavorable,
        "Balance sheet size has remained flat, indicating limited asset expansion.",
        "Insufficient data to assess asset growth.",
    )
}

fn liability_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        unfavorable,
        "Total liabilities have increased over time, indicating rising financial obligations.",
        favorable,
        "Total liabilities have remained stable, suggesting controlled financial risk.",
        "Insufficient data to assess liability trend.",
    )
}

fn leverage_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        unfavorable,
        "Borrowings have increased over time, suggesting greater reliance on external funding.",
        favorable,
        "Borrowings have reduced or remained stable, indicating improving balance sheet strength.",
        "Insufficient data to assess leverage trend.",
    )
}

fn reserves_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        favorable,
        "Reserves have grown consistently, strengthening the company's financial cushion.",
        unfavorable,
        "Reserves growth appears limited, reducing internal financial flexibility.",
        "Insufficient data to assess reserves trend.",
    )
}

fn funding_quality(s: &[Series]) -> Option<Finding> {
    let (debt, reserves) = (&s[0], &s[1]);
    if debt.count() < MIN_YEARS || reserves.count() < MIN_YEARS {
        return None;
    }
    let debt_growth = mean(&debt.pct_change());
    let reserves_growth = mean(&reserves.pct_change());

    Some(match (debt_growth, reserves_growth) {
        (Some(d), Some(r)) if d > r => Finding::unfavorable(
            "Borrowings are growing faster than reserves, indicating debt-led balance sheet expansion.",
        ),
        _ => Finding::favorable(
            "Reserves are growing at least as fast as borrowings, indicating internally funded balance sheet strength.",
        ),
    })
}

// ── Cash flow ─────────────────────────────────────────────────────────────────

fn operating_cash_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        favorable,
        "Operating cash flows have strengthened over time, indicating improving cash-generating ability of core operations.",
        unfavorable,
        "Operating cash flows appear weak or inconsistent, raising concerns around earnings quality.",
        "Insufficient data to assess operating cash flow trend.",
    )
}

fn profit_cash_alignment(s: &[Series]) -> Option<Finding> {
    let (ocf, profit) = (&s[0], &s[1]);
    if ocf.count() < MIN_YEARS || profit.count() < MIN_YEARS {
        return None;
    }
    let conversion = ocf.zip_with(profit, |o, p| o / p).mean()?;
    Some(if conversion > 1.0 {
        Finding::favorable(
            "Operating cash flows exceed accounting profits, indicating high earnings quality and conservative accounting.",
        )
    } else if conversion > 0.8 {
        Finding::neutral(
            "Operating cash flows broadly track profits, indicating reasonable earnings quality.",
        )
    } else {
        Finding::unfavorable(
            "Operating cash flows lag profits, suggesting aggressive accounting or working capital stress.",
        )
    })
}

fn free_cash_flow(s: &[Series]) -> Option<Finding> {
    let fcf = s[0].zip_with(&s[1], |o, i| o + i);
    if fcf.count() < MIN_YEARS {
        return None;
    }
    Some(match fcf.mean() {
        Some(m) if m > 0.0 => Finding::favorable(
            "Free cash flow is positive on average, indicating the business can fund growth internally.",
        ),
        _ => Finding::unfavorable(
            "Free cash flow remains negative, suggesting dependence on external funding.",
        ),
    })
}

fn cash_flow_structure(s: &[Series]) -> Option<Finding> {
    Some(match s[0].mean() {
        Some(m) if m > 0.0 => Finding::favorable(
            "Operating activities are the primary source of cash, which is a healthy cash flow structure.",
        ),
        _ => Finding::unfavorable(
            "Operating activities are not generating sufficient cash, raising concerns around business sustainability.",
        ),
    })
}

// ── Shareholding ──────────────────────────────────────────────────────────────

fn promoter_trend(s: &[Series]) -> Option<Finding> {
    Some(match span(&s[0], MIN_YEARS) {
        Some((first, last)) if last > first => Finding::favorable(
            "Promoter holding has increased over time, indicating rising promoter confidence and commitment.",
        ),
        Some((first, last)) if last < first => Finding::unfavorable(
            "Promoter holding has declined, which may indicate stake dilution or partial exit.",
        ),
        Some(_) => Finding::neutral("Promoter holding has remained broadly stable."),
        None => Finding::neutral("Insufficient data to assess promoter holding trend."),
    })
}

fn fii_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        favorable,
        "Foreign institutional participation has increased, reflecting improving global investor confidence.",
        unfavorable,
        "Foreign institutional holding has declined, possibly reflecting external risk aversion.",
        "Insufficient data to assess FII trend.",
    )
}

fn dii_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        favorable,
        "Domestic institutional holding has increased, indicating rising confidence among local professionals.",
        unfavorable,
        "Domestic institutional participation has weakened.",
        "Insufficient data to assess DII trend.",
    )
}

fn public_trend(s: &[Series]) -> Option<Finding> {
    rise_or_not(
        &s[0],
        neutral,
        "Public shareholding has increased, indicating wider retail participation or promoter dilution.",
        neutral,
        "Public shareholding has declined, possibly due to increased institutional ownership.",
        "Insufficient data to assess public shareholding trend.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::Polarity;

    fn run(f: fn(&[Series]) -> Option<Finding>, cols: &[&[f64]]) -> Option<Finding> {
        let series: Vec<Series> = cols.iter().map(|c| Series::from_values(c)).collect();
        f(&series)
    }

    #[test]
    fn test_catalog_names_unique() {
        let mut names: Vec<&str> = CATALOG.iter().map(|r| r.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn test_roe_tiers() {
        assert_eq!(run(roe_level, &[&[8.0]]).unwrap().polarity, Polarity::Unfavorable);
        assert_eq!(run(roe_level, &[&[12.0]]).unwrap().polarity, Polarity::Neutral);
        assert_eq!(run(roe_level, &[&[15.0]]).unwrap().polarity, Polarity::Favorable);
    }

    #[test]
    fn test_dividend_and_pe_only_fire_past_threshold() {
        assert!(run(dividend_income, &[&[0.5]]).is_none());
        assert!(run(dividend_income, &[&[1.5]]).is_some());
        assert!(run(earnings_valuation, &[&[30.0]]).is_none());
        assert_eq!(
            run(earnings_valuation, &[&[45.0]]).unwrap().polarity,
            Polarity::Unfavorable
        );
    }

    #[test]
    fn test_revenue_trend_wording() {
        let f = run(revenue_trend, &[&[100.0, 120.0, 144.0]]).unwrap();
        assert_eq!(
            f.message,
            "Revenue shows strong growth with relatively stable year-on-year performance."
        );
        let f = run(revenue_trend, &[&[100.0, 95.0, 110.0]]).unwrap();
        assert_eq!(
            f.message,
            "Revenue shows moderate growth with relatively volatile year-on-year performance."
        );
    }

    #[test]
    fn test_profit_vs_revenue() {
        let lagging = run(profit_vs_revenue, &[&[10.0, 8.0, 6.0], &[100.0, 120.0, 150.0]]).unwrap();
        assert_eq!(lagging.polarity, Polarity::Unfavorable);
        let short = run(profit_vs_revenue, &[&[10.0, 12.0], &[100.0, 120.0]]).unwrap();
        assert_eq!(short.message, "Insufficient data to assess net profit trend.");
    }

    #[test]
    fn test_margin_trend_directions() {
        assert_eq!(run(margin_trend, &[&[12.0, 13.0, 15.0]]).unwrap().polarity, Polarity::Favorable);
        assert_eq!(run(margin_trend, &[&[15.0, 13.0, 12.0]]).unwrap().polarity, Polarity::Unfavorable);
        assert_eq!(run(margin_trend, &[&[15.0, 16.0, 15.0]]).unwrap().polarity, Polarity::Neutral);
    }

    #[test]
    fn test_quarterly_needs_four_points() {
        let f = run(quarterly_revenue_momentum, &[&[1.0, 2.0, 3.0]]).unwrap();
        assert_eq!(f.message, "Limited quarterly data to assess revenue momentum.");
        let f = run(quarterly_revenue_momentum, &[&[100.0, 102.0, 104.0, 106.0]]).unwrap();
        assert_eq!(f.polarity, Polarity::Favorable);
    }

    #[test]
    fn test_balance_sheet_directions() {
        let borrow = run(leverage_trend, &[&[100.0, 120.0, 150.0]]).unwrap();
        assert_eq!(borrow.polarity, Polarity::Unfavorable);
        let assets = run(asset_growth, &[&[100.0, 120.0, 150.0]]).unwrap();
        assert_eq!(assets.polarity, Polarity::Favorable);
        let short = run(reserves_trend, &[&[1.0, 2.0]]).unwrap();
        assert_eq!(short.message, "Insufficient data to assess reserves trend.");
    }

    #[test]
    fn test_funding_quality() {
        let debt_led = run(funding_quality, &[&[10.0, 20.0, 40.0], &[100.0, 110.0, 120.0]]).unwrap();
        assert_eq!(debt_led.polarity, Polarity::Unfavorable);
        let internal = run(funding_quality, &[&[40.0, 30.0, 20.0], &[100.0, 110.0, 120.0]]).unwrap();
        assert_eq!(internal.polarity, Polarity::Favorable);
    }

    #[test]
    fn test_cash_rules() {
        let aligned = run(profit_cash_alignment, &[&[90.0, 90.0, 90.0], &[100.0, 100.0, 100.0]]).unwrap();
        assert_eq!(aligned.polarity, Polarity::Neutral);
        let fcf = run(free_cash_flow, &[&[100.0, 110.0, 120.0], &[-150.0, -160.0, -170.0]]).unwrap();
        assert_eq!(fcf.polarity, Polarity::Unfavorable);
        let structure = run(cash_flow_structure, &[&[10.0, 20.0], &[-5.0], &[-5.0]]).unwrap();
        assert_eq!(structure.polarity, Polarity::Favorable);
    }

    #[test]
    fn test_promoter_trend_three_ways() {
        assert_eq!(run(promoter_trend, &[&[50.0, 51.0, 52.0]]).unwrap().polarity, Polarity::Favorable);
        assert_eq!(run(promoter_trend, &[&[52.0, 51.0, 50.0]]).unwrap().polarity, Polarity::Unfavorable);
        assert_eq!(run(promoter_trend, &[&[50.0, 49.0, 50.0]]).unwrap().polarity, Polarity::Neutral);
    }

    #[test]
    fn test_public_trend_is_neutral_either_way() {
        assert_eq!(run(public_trend, &[&[20.0, 21.0, 22.0]]).unwrap().polarity, Polarity::Neutral);
        assert_eq!(run(public_trend, &[&[22.0, 21.0, 20.0]]).unwrap().polarity, Polarity::Neutral);
    }
}
