//! Long → wide reshaping of scraped statement tables.
//!
//! Extraction yields one record per (company, period, metric). Everything
//! downstream wants a row per period with named columns, so every statement
//! goes through [`pivot`] right after extraction. Period labels stay raw here;
//! [`period`] turns them into years and applies the analysis window.

pub mod period;

use crate::models::{LongRecord, Period, WideRow, WideStatement};
use crate::scraper::cleaner::clean_metric_name;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Pivot long records into a wide statement.
///
/// * one row per (company, period), in first-seen order
/// * one column per distinct cleaned metric name, in first-seen order
/// * cells with no record are `None`
/// * duplicate cells: the last non-null value wins; a null never erases a number
pub fn pivot(records: &[LongRecord]) -> WideStatement {
    let mut columns: Vec<String> = Vec::new();
    let mut column_of: HashMap<String, usize> = HashMap::new();
    let mut row_of: HashMap<(&str, &str), usize> = HashMap::new();
    let mut keys: Vec<(&str, &str)> = Vec::new();
    let mut cells: Vec<(usize, usize, Option<f64>)> = Vec::with_capacity(records.len());

    for rec in records {
        let name = clean_metric_name(&rec.metric);
        let col = match column_of.get(&name) {
            Some(&c) => c,
            None => {
                let c = columns.len();
                column_of.insert(name.clone(), c);
                columns.push(name);
                c
            }
        };

        let key = (rec.company.as_str(), rec.period.as_str());
        let row = *row_of.entry(key).or_insert_with(|| {
            keys.push(key);
            keys.len() - 1
        });

        cells.push((row, col, rec.value));
    }

    let mut rows: Vec<WideRow> = keys
        .iter()
        .map(|(company, period)| WideRow {
            company: company.to_string(),
            period: Period::Label(period.to_string()),
            values: vec![None; columns.len()],
        })
        .collect();

    let mut seen = vec![vec![false; columns.len()]; rows.len()];
    let mut duplicates = 0usize;

    for (row, col, value) in cells {
        if seen[row][col] {
            duplicates += 1;
        }
        seen[row][col] = true;
        if value.is_some() {
            rows[row].values[col] = value;
        }
    }

    if duplicates > 0 {
        warn!("{} duplicate (company, period, metric) cells while pivoting", duplicates);
    }
    debug!("Pivoted {} records into {} rows × {} columns", records.len(), rows.len(), columns.len());

    WideStatement { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(period: &str, metric: &str, value: Option<f64>) -> LongRecord {
        LongRecord::new("A", period, metric, value)
    }

    #[test]
    fn test_pivot_fills_missing_with_none() {
        let records = vec![
            rec("2020", "Sales", Some(100.0)),
            rec("2020", "Profit", Some(10.0)),
            rec("2021", "Sales", Some(120.0)),
        ];
        let wide = pivot(&records);

        assert_eq!(wide.columns, vec!["Sales", "Profit"]);
        assert_eq!(wide.len(), 2);

        let y2020 = Period::Label("2020".into());
        let y2021 = Period::Label("2021".into());
        assert_eq!(wide.value("A", &y2020, "Sales"), Some(100.0));
        assert_eq!(wide.value("A", &y2020, "Profit"), Some(10.0));
        assert_eq!(wide.value("A", &y2021, "Sales"), Some(120.0));
        assert_eq!(wide.value("A", &y2021, "Profit"), None);
        assert_eq!(wide.rows[1].values, vec![Some(120.0), None]);
    }

    #[test]
    fn test_pivot_strips_plus_marker() {
        let records = vec![
            rec("2020", "Sales +", Some(1.0)),
            rec("2020", "Borrowings\u{a0}+", Some(2.0)),
            rec("2020", "OPM %", Some(3.0)),
        ];
        assert_eq!(pivot(&records).columns, vec!["Sales", "Borrowings", "OPM %"]);
    }

    #[test]
    fn test_pivot_duplicates_last_value_wins() {
        let records = vec![
            rec("2020", "Sales +", Some(1.0)),
            rec("2020", "Sales", Some(2.0)),
            rec("2020", "Sales", None),
        ];
        let wide = pivot(&records);
        assert_eq!(wide.columns, vec!["Sales"]);
        assert_eq!(wide.rows[0].values, vec![Some(2.0)]);
    }

    #[test]
    fn test_pivot_keeps_companies_apart() {
        let records = vec![
            LongRecord::new("A", "2020", "Sales", Some(1.0)),
            LongRecord::new("B", "2020", "Sales", Some(2.0)),
        ];
        let wide = pivot(&records);
        assert_eq!(wide.len(), 2);
        assert_eq!(wide.value("B", &Period::Label("2020".into()), "Sales"), Some(2.0));
    }

    #[test]
    fn test_pivot_empty() {
        let wide = pivot(&[]);
        assert!(wide.is_empty());
        assert!(wide.columns.is_empty());
    }
}
