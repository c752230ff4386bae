use crate::models::NormalizedValue;
use regex::Regex;
use std::sync::LazyLock;

/// One crore in base units.
pub const CRORE: f64 = 10_000_000.0;

const CURRENCY_GLYPH: char = '₹';
const NO_DATA: [&str; 3] = ["", "-", "—"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

static TRAILING_PLUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\+\s*$").expect("valid trailing-plus regex"));

// ── Values ────────────────────────────────────────────────────────────────────

/// Normalize a raw cell into a number.
/// "₹1,234" → 1234 | "₹2.5 Cr." → 25,000,000 | "45.6%" → 45.6 | "—" → None
///
/// Never fails: anything unparseable is `None`.
pub fn clean_numeric_value(text: Option<&str>) -> NormalizedValue {
    let text = text?;
    let stripped = text.replace(CURRENCY_GLYPH, "").replace(',', "");
    let stripped = stripped.trim();

    if stripped.contains("Cr") {
        let number = stripped.replace("Cr.", "").replace("Cr", "");
        return parse_finite(number.trim()).map(|n| n * CRORE);
    }

    if NO_DATA.contains(&stripped) {
        return None;
    }

    if stripped.contains('%') {
        return parse_finite(stripped.replace('%', "").trim());
    }

    parse_finite(stripped)
}

/// Table cells carry surrounding whitespace from the markup.
pub fn clean_table_value(text: &str) -> NormalizedValue {
    clean_numeric_value(Some(text.trim()))
}

fn parse_finite(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Collapse runs of whitespace (including NBSP) into single spaces.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "Sales +" → "Sales". The trailing plus marks expandable rows on the site.
pub fn clean_metric_name(name: &str) -> String {
    TRAILING_PLUS.replace(name, "").trim().to_string()
}

/// "Mar 2016" → "2016". Labels without a month prefix pass through.
pub fn strip_month_prefix(label: &str) -> String {
    let label = label.trim();
    for month in MONTHS {
        if let Some(rest) = label.strip_prefix(month) {
            if rest.starts_with(char::is_whitespace) {
                return rest.trim().to_string();
            }
        }
    }
    label.to_string()
}

/// "Mar 2017" → "2017": shareholding headers keep only their last token.
pub fn last_token(label: &str) -> String {
    label.split_whitespace().last().unwrap_or_default().to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_numeric_value() {
        let cases: [(Option<&str>, Option<f64>); 9] = [
            (Some("₹1,234"), Some(1234.0)),
            (Some("-"), None),
            (Some("—"), None),
            (Some(""), None),
            (Some("45.6%"), Some(45.6)),
            (Some("12.3"), Some(12.3)),
            (Some("₹2.5 Cr"), Some(25_000_000.0)),
            (Some("₹2.5 Cr."), Some(25_000_000.0)),
            (None, None),
        ];
        for (input, expected) in cases {
            assert_eq!(clean_numeric_value(input), expected, "input {:?}", input);
        }
    }

    #[test]
    fn test_clean_numeric_value_never_panics_on_junk() {
        assert_eq!(clean_numeric_value(Some("abc Cr")), None);
        assert_eq!(clean_numeric_value(Some("n/a%")), None);
        assert_eq!(clean_numeric_value(Some("NaN")), None);
        assert_eq!(clean_numeric_value(Some("inf")), None);
        assert_eq!(clean_numeric_value(Some("₹ 12,34,567 Cr.")), Some(1_234_567.0 * CRORE));
        assert_eq!(clean_numeric_value(Some("-3.5")), Some(-3.5));
    }

    #[test]
    fn test_normalizing_twice_is_stable() {
        for raw in ["₹1,234", "45.6%", "12.3", "₹2.5 Cr", "-7"] {
            let once = clean_numeric_value(Some(raw)).unwrap();
            let twice = clean_numeric_value(Some(&once.to_string()));
            assert_eq!(twice, Some(once), "raw {}", raw);
        }
    }

    #[test]
    fn test_clean_table_value_trims() {
        assert_eq!(clean_table_value("\n  1,020 \n"), Some(1020.0));
        assert_eq!(clean_table_value("   "), None);
    }

    #[test]
    fn test_clean_metric_name() {
        assert_eq!(clean_metric_name("Sales +"), "Sales");
        assert_eq!(clean_metric_name("Borrowings\u{a0}+ "), "Borrowings");
        assert_eq!(clean_metric_name("OPM %"), "OPM %");
        assert_eq!(clean_metric_name("  Net Profit  "), "Net Profit");
    }

    #[test]
    fn test_period_labels() {
        assert_eq!(strip_month_prefix("Mar 2016"), "2016");
        assert_eq!(strip_month_prefix("Sep 2023"), "2023");
        assert_eq!(strip_month_prefix("TTM"), "TTM");
        assert_eq!(strip_month_prefix("March"), "March");
        assert_eq!(last_token("Mar 2017"), "2017");
        assert_eq!(last_token(""), "");
    }
}
