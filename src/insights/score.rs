//! Composite financial confidence score (0–100).
//!
//! Five categories start at a midpoint and are moved by [`SCORE_RULES`].
//! Rules are grouped per category; inside a group the first rule whose
//! predicate holds applies and the rest of the group is skipped. Groups and
//! categories are independent of each other.

use super::{AnalysisInputs, Finding, Insight, Polarity, Section, Series, Source, mean};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

const MIN_YEARS: usize = 3;
/// OPM % standard deviation above which margins count as cyclical.
const CYCLICAL_MARGIN_STD: f64 = 5.0;
const QUALITY_BONUS: u8 = 10;
const QUALITY_CHECKS_NEEDED: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Growth,
    Profitability,
    Balance,
    CashFlow,
    Governance,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Growth,
        Category::Profitability,
        Category::Balance,
        Category::CashFlow,
        Category::Governance,
    ];

    /// Neutral starting score.
    pub const fn base(self) -> u8 {
        match self {
            Category::CashFlow => 15,
            _ => 14,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Growth => "Growth Quality",
            Category::Profitability => "Profitability & Efficiency",
            Category::Balance => "Financial Position",
            Category::CashFlow => "Cash Flow Quality",
            Category::Governance => "Governance & Ownership",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Set(u8),
    Raise { by: u8, cap: u8 },
}

impl Effect {
    fn apply(self, score: u8) -> u8 {
        match self {
            Effect::Set(v) => v,
            Effect::Raise { by, cap } => score.saturating_add(by).min(cap),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ScoreRule {
    pub category: Category,
    pub group: &'static str,
    pub when: fn(&ScoreFacts) -> bool,
    pub effect: Effect,
    pub polarity: Polarity,
    pub message: &'static str,
}

/// Category scores that count toward the quality bonus.
pub const QUALITY_BAR: [(Category, u8); 4] = [
    (Category::CashFlow, 16),
    (Category::Balance, 15),
    (Category::Profitability, 14),
    (Category::Governance, 14),
];

pub static SCORE_RULES: &[ScoreRule] = &[
    // Growth
    ScoreRule {
        category: Category::Growth,
        group: "trend",
        when: sales_and_profit_rose,
        effect: Effect::Set(16),
        polarity: Polarity::Favorable,
        message: "Revenue and profits have grown consistently.",
    },
    ScoreRule {
        category: Category::Growth,
        group: "trend",
        when: sales_rose_profit_did_not,
        effect: Effect::Set(10),
        polarity: Polarity::Unfavorable,
        message: "Revenue growth has not translated into profit growth.",
    },
    ScoreRule {
        category: Category::Growth,
        group: "trend",
        when: growth_measurable,
        effect: Effect::Set(8),
        polarity: Polarity::Unfavorable,
        message: "Business growth momentum appears weak or inconsistent.",
    },
    // Profitability
    ScoreRule {
        category: Category::Profitability,
        group: "margin",
        when: margins_expanded,
        effect: Effect::Set(16),
        polarity: Polarity::Favorable,
        message: "Operating margins have expanded.",
    },
    ScoreRule {
        category: Category::Profitability,
        group: "margin",
        when: margins_held,
        effect: Effect::Set(15),
        polarity: Polarity::Favorable,
        message: "Operating margins have remained broadly stable.",
    },
    ScoreRule {
        category: Category::Profitability,
        group: "margin",
        when: margins_measurable,
        effect: Effect::Set(9),
        polarity: Polarity::Unfavorable,
        message: "Operating margins have seen sustained pressure.",
    },
    ScoreRule {
        category: Category::Profitability,
        group: "returns",
        when: strong_returns,
        effect: Effect::Raise { by: 2, cap: 20 },
        polarity: Polarity::Favorable,
        message: "Strong ROE and ROCE indicate efficient capital usage.",
    },
    // Financial position
    ScoreRule {
        category: Category::Balance,
        group: "leverage",
        when: minimal_leverage,
        effect: Effect::Set(18),
        polarity: Polarity::Favorable,
        message: "Minimal leverage supported by a strong reserve base.",
    },
    ScoreRule {
        category: Category::Balance,
        group: "leverage",
        when: internally_funded,
        effect: Effect::Set(16),
        polarity: Polarity::Favorable,
        message: "Balance sheet growth is largely internally funded.",
    },
    ScoreRule {
        category: Category::Balance,
        group: "leverage",
        when: leverage_measurable,
        effect: Effect::Set(9),
        polarity: Polarity::Unfavorable,
        message: "Borrowings are rising faster than internal reserves.",
    },
    // Cash flow
    ScoreRule {
        category: Category::CashFlow,
        group: "conversion",
        when: cash_beats_profit,
        effect: Effect::Set(20),
        polarity: Polarity::Favorable,
        message: "Operating cash flows consistently exceed reported profits.",
    },
    ScoreRule {
        category: Category::CashFlow,
        group: "conversion",
        when: cash_supports_profit,
        effect: Effect::Set(17),
        polarity: Polarity::Favorable,
        message: "Profits are well supported by operating cash flows.",
    },
    ScoreRule {
        category: Category::CashFlow,
        group: "conversion",
        when: conversion_measurable,
        effect: Effect::Set(9),
        polarity: Polarity::Unfavorable,
        message: "Weak cash conversion relative to reported profits.",
    },
    // Governance
    ScoreRule {
        category: Category::Governance,
        group: "promoters",
        when: promoters_steady,
        effect: Effect::Set(16),
        polarity: Polarity::Favorable,
        message: "Promoter shareholding has remained broadly stable.",
    },
    ScoreRule {
        category: Category::Governance,
        group: "promoters",
        when: promoters_measurable,
        effect: Effect::Set(9),
        polarity: Polarity::Unfavorable,
        message: "Declining promoter shareholding observed.",
    },
];

// ── Facts ─────────────────────────────────────────────────────────────────────

/// Series the score rules look at. `None` means the column is absent.
#[derive(Debug, Clone, Default)]
pub struct ScoreFacts {
    pub sales: Option<Series>,
    pub net_profit: Option<Series>,
    pub margins: Option<Series>,
    pub roe: Option<f64>,
    pub roce: Option<f64>,
    pub borrowings: Option<Series>,
    pub reserves: Option<Series>,
    pub operating_cash: Option<Series>,
    pub cash_statement_profit: Option<Series>,
    pub promoters: Option<Series>,
}

impl ScoreFacts {
    pub fn gather(inputs: &AnalysisInputs<'_>) -> Self {
        // First cash-flow column mentioning both "operating" and "cash".
        let operating_cash = inputs
            .cash_flow
            .find_column(|c| {
                let c = c.to_lowercase();
                c.contains("operating") && c.contains("cash")
            })
            .and_then(|name| inputs.series(Source::CashFlow, name));

        Self {
            sales: inputs.series(Source::YearlyPnl, "Sales"),
            net_profit: inputs.series(Source::YearlyPnl, "Net Profit"),
            margins: inputs.series(Source::YearlyPnl, "OPM %"),
            roe: inputs.ratio("ROE"),
            roce: inputs.ratio("ROCE"),
            borrowings: inputs.series(Source::BalanceSheet, "Borrowings"),
            reserves: inputs.series(Source::BalanceSheet, "Reserves"),
            operating_cash,
            cash_statement_profit: inputs.series(Source::CashFlow, "Net Profit"),
            promoters: inputs.series(Source::Shareholding, "Promoters"),
        }
    }

    /// Margins swing enough that a quality bonus would flatter the business.
    pub fn is_cyclical(&self) -> bool {
        self.margins
            .as_ref()
            .filter(|m| m.count() >= MIN_YEARS)
            .and_then(Series::std_dev)
            .is_some_and(|sd| sd > CYCLICAL_MARGIN_STD)
    }
}

/// (first, last) when the column exists with enough reported years.
fn span(s: &Option<Series>) -> Option<(f64, f64)> {
    let s = s.as_ref().filter(|s| s.count() >= MIN_YEARS)?;
    Some((s.first()?, s.last()?))
}

fn enough(s: &Option<Series>) -> Option<&Series> {
    s.as_ref().filter(|s| s.count() >= MIN_YEARS)
}

// ── Predicates ────────────────────────────────────────────────────────────────

fn sales_and_profit_rose(f: &ScoreFacts) -> bool {
    matches!((span(&f.sales), span(&f.net_profit)),
        (Some((s0, s1)), Some((p0, p1))) if s1 > s0 && p1 > p0)
}

fn sales_rose_profit_did_not(f: &ScoreFacts) -> bool {
    matches!((span(&f.sales), span(&f.net_profit)),
        (Some((s0, s1)), Some((p0, p1))) if s1 > s0 && p1 <= p0)
}

fn growth_measurable(f: &ScoreFacts) -> bool {
    span(&f.sales).is_some() && span(&f.net_profit).is_some()
}

fn margin_change(f: &ScoreFacts) -> Option<f64> {
    span(&f.margins).map(|(first, last)| last - first)
}

fn margins_expanded(f: &ScoreFacts) -> bool {
    margin_change(f).is_some_and(|c| c > 1.0)
}

fn margins_held(f: &ScoreFacts) -> bool {
    margin_change(f).is_some_and(|c| c >= -2.0)
}

fn margins_measurable(f: &ScoreFacts) -> bool {
    margin_change(f).is_some()
}

fn strong_returns(f: &ScoreFacts) -> bool {
    matches!((f.roe, f.roce), (Some(roe), Some(roce)) if roe >= 18.0 && roce >= 18.0)
}

fn minimal_leverage(f: &ScoreFacts) -> bool {
    let (Some(debt), Some(reserves)) = (&f.borrowings, &f.reserves) else {
        return false;
    };
    if debt.count() == 0 {
        return true;
    }
    matches!((debt.max(), reserves.max()), (Some(d), Some(r)) if d <= 0.1 * r)
}

fn internally_funded(f: &ScoreFacts) -> bool {
    let (Some(debt), Some(reserves)) = (enough(&f.borrowings), enough(&f.reserves)) else {
        return false;
    };
    matches!((mean(&reserves.diff()), mean(&debt.diff())), (Some(r), Some(d)) if r >= d)
}

fn leverage_measurable(f: &ScoreFacts) -> bool {
    enough(&f.borrowings).is_some() && enough(&f.reserves).is_some()
}

fn cash_beats_profit(f: &ScoreFacts) -> bool {
    let (Some(ocf), Some(profit)) = (enough(&f.operating_cash), enough(&f.cash_statement_profit))
    else {
        return false;
    };
    let beats = ocf.paired(profit).iter().filter(|(o, p)| o > p).count();
    beats + 1 >= ocf.count()
}

fn cash_supports_profit(f: &ScoreFacts) -> bool {
    let (Some(ocf), Some(profit)) = (enough(&f.operating_cash), enough(&f.cash_statement_profit))
    else {
        return false;
    };
    ocf.zip_with(profit, |o, p| o / p).mean().is_some_and(|c| c >= 0.8)
}

fn conversion_measurable(f: &ScoreFacts) -> bool {
    enough(&f.operating_cash).is_some() && enough(&f.cash_statement_profit).is_some()
}

fn promoters_steady(f: &ScoreFacts) -> bool {
    span(&f.promoters).is_some_and(|(first, last)| last - first >= -1.0)
}

fn promoters_measurable(f: &ScoreFacts) -> bool {
    span(&f.promoters).is_some()
}

// ── Result ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: Category,
    pub score: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceScore {
    pub categories: Vec<CategoryScore>,
    pub cyclical: bool,
    pub quality_bonus: bool,
    pub total: u8,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
}

impl ConfidenceScore {
    pub fn compute(inputs: &AnalysisInputs<'_>) -> Self {
        Self::from_facts(&ScoreFacts::gather(inputs))
    }

    pub fn from_facts(facts: &ScoreFacts) -> Self {
        let mut scores: Vec<CategoryScore> = Category::ALL
            .iter()
            .map(|&category| CategoryScore { category, score: category.base() })
            .collect();
        let mut settled: HashSet<(Category, &str)> = HashSet::new();
        let mut strengths = Vec::new();
        let mut risks = Vec::new();

        for rule in SCORE_RULES {
            if settled.contains(&(rule.category, rule.group)) || !(rule.when)(facts) {
                continue;
            }
            settled.insert((rule.category, rule.group));

            if let Some(slot) = scores.iter_mut().find(|s| s.category == rule.category) {
                slot.score = rule.effect.apply(slot.score);
            }
            match rule.polarity {
                Polarity::Unfavorable => risks.push(rule.message.to_string()),
                _ => strengths.push(rule.message.to_string()),
            }
        }

        let score_of = |c: Category| {
            scores.iter().find(|s| s.category == c).map_or(c.base(), |s| s.score)
        };
        let passed = QUALITY_BAR
            .iter()
            .filter(|(category, bar)| score_of(*category) >= *bar)
            .count();
        let cyclical = facts.is_cyclical();
        let quality_bonus = passed >= QUALITY_CHECKS_NEEDED && !cyclical;

        let mut total: u8 = scores.iter().map(|s| s.score).sum();
        if quality_bonus {
            total += QUALITY_BONUS;
            strengths.push(
                "The company exhibits characteristics of a high-quality, resilient business franchise."
                    .to_string(),
            );
        }

        debug!("Confidence score {} ({} quality checks, cyclical={})", total, passed, cyclical);

        Self { categories: scores, cyclical, quality_bonus, total, strengths, risks }
    }

    pub fn score(&self, category: Category) -> u8 {
        self.categories
            .iter()
            .find(|s| s.category == category)
            .map_or(category.base(), |s| s.score)
    }

    pub fn verdict(&self) -> Finding {
        if self.total >= 80 {
            Finding::favorable("Strong and sustainable financial profile.")
        } else if self.total >= 60 {
            Finding::neutral("Moderate financial strength with some areas to monitor.")
        } else {
            Finding::unfavorable("Weak sustainability and elevated financial risk.")
        }
    }

    /// Verdict plus the first `limit` strengths and risks, tagged for the
    /// executive section.
    pub fn insights(&self, limit: usize) -> Vec<Insight> {
        let verdict = self.verdict();
        let mut out = vec![Insight {
            section: Section::Executive,
            polarity: verdict.polarity,
            message: verdict.message,
        }];
        out.extend(self.strengths.iter().take(limit).map(|m| Insight {
            section: Section::Executive,
            polarity: Polarity::Favorable,
            message: m.clone(),
        }));
        out.extend(self.risks.iter().take(limit).map(|m| Insight {
            section: Section::Executive,
            polarity: Polarity::Unfavorable,
            message: m.clone(),
        }));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Option<Series> {
        Some(Series::from_values(values))
    }

    #[test]
    fn test_sales_up_profit_down_scores_ten() {
        let facts = ScoreFacts {
            sales: series(&[100.0, 120.0, 150.0]),
            net_profit: series(&[10.0, 8.0, 6.0]),
            ..Default::default()
        };
        let score = ConfidenceScore::from_facts(&facts);
        assert_eq!(score.score(Category::Growth), 10);
        assert!(score
            .risks
            .iter()
            .any(|r| r == "Revenue growth has not translated into profit growth."));
    }

    #[test]
    fn test_base_scores_without_data() {
        let score = ConfidenceScore::from_facts(&ScoreFacts::default());
        let bases: Vec<u8> = Category::ALL.iter().map(|&c| score.score(c)).collect();
        assert_eq!(bases, vec![14, 14, 14, 15, 14]);
        // profitability and governance sit exactly on their bars, cash flow and
        // balance do not: two checks, no bonus
        assert!(!score.quality_bonus);
        assert_eq!(score.total, 71);
        assert!(score.strengths.is_empty() && score.risks.is_empty());
    }

    #[test]
    fn test_first_match_wins_within_group() {
        let facts = ScoreFacts {
            margins: series(&[15.0, 16.0, 18.0]),
            roe: Some(20.0),
            roce: Some(22.0),
            ..Default::default()
        };
        let score = ConfidenceScore::from_facts(&facts);
        // expanded (16) beats held (15); returns group then raises to 18
        assert_eq!(score.score(Category::Profitability), 18);
        assert_eq!(score.strengths.len(), 2);
    }

    #[test]
    fn test_returns_raise_is_capped() {
        assert_eq!(Effect::Raise { by: 2, cap: 20 }.apply(19), 20);
        assert_eq!(Effect::Set(9).apply(19), 9);
    }

    #[test]
    fn test_minimal_leverage_when_debt_unreported() {
        let facts = ScoreFacts {
            borrowings: Some(Series::new(vec![None, None, None])),
            reserves: series(&[100.0]),
            ..Default::default()
        };
        assert!(minimal_leverage(&facts));
        assert_eq!(ConfidenceScore::from_facts(&facts).score(Category::Balance), 18);
    }

    #[test]
    fn test_debt_led_balance_sheet() {
        let facts = ScoreFacts {
            borrowings: series(&[100.0, 300.0, 600.0]),
            reserves: series(&[1000.0, 1100.0, 1200.0]),
            ..Default::default()
        };
        let score = ConfidenceScore::from_facts(&facts);
        assert_eq!(score.score(Category::Balance), 9);
        assert_eq!(score.risks, vec!["Borrowings are rising faster than internal reserves."]);
    }

    #[test]
    fn test_cash_conversion_tiers() {
        let beats = ScoreFacts {
            operating_cash: series(&[12.0, 9.0, 14.0]),
            cash_statement_profit: series(&[10.0, 10.0, 10.0]),
            ..Default::default()
        };
        assert_eq!(ConfidenceScore::from_facts(&beats).score(Category::CashFlow), 20);

        let supports = ScoreFacts {
            operating_cash: series(&[9.0, 8.5, 9.0]),
            cash_statement_profit: series(&[10.0, 10.0, 10.0]),
            ..Default::default()
        };
        assert_eq!(ConfidenceScore::from_facts(&supports).score(Category::CashFlow), 17);

        let weak = ScoreFacts {
            operating_cash: series(&[2.0, 3.0, 4.0]),
            cash_statement_profit: series(&[10.0, 10.0, 10.0]),
            ..Default::default()
        };
        assert_eq!(ConfidenceScore::from_facts(&weak).score(Category::CashFlow), 9);
    }

    #[test]
    fn test_quality_bonus_and_cyclical_guard() {
        let steady = ScoreFacts {
            margins: series(&[15.0, 15.5, 16.0]),
            borrowings: Some(Series::new(vec![None, None, None])),
            reserves: series(&[100.0, 120.0, 140.0]),
            operating_cash: series(&[12.0, 13.0, 14.0]),
            cash_statement_profit: series(&[10.0, 10.0, 10.0]),
            promoters: series(&[50.0, 50.0, 50.0]),
            ..Default::default()
        };
        let score = ConfidenceScore::from_facts(&steady);
        assert!(score.quality_bonus);
        // 14 + 15 + 18 + 20 + 16 + 10
        assert_eq!(score.total, 93);
        assert_eq!(score.verdict().polarity, Polarity::Favorable);

        let cyclical = ScoreFacts {
            margins: series(&[5.0, 25.0, 14.0]),
            ..steady
        };
        let score = ConfidenceScore::from_facts(&cyclical);
        assert!(score.cyclical);
        assert!(!score.quality_bonus);
    }

    #[test]
    fn test_insights_respect_limit() {
        let score = ConfidenceScore {
            categories: vec![],
            cyclical: false,
            quality_bonus: false,
            total: 55,
            strengths: (0..7).map(|i| format!("s{}", i)).collect(),
            risks: vec!["r".into()],
        };
        let out = score.insights(5);
        assert_eq!(out.len(), 1 + 5 + 1);
        assert_eq!(out[0].polarity, Polarity::Unfavorable);
    }
}
