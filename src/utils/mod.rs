use crate::models::ValueKind;
use crate::scraper::cleaner::CRORE;
use std::time::{Duration, Instant};
use tracing::info;

/// A simple wall-clock timer for logging elapsed time.
pub struct Timer {
    label: String,
    start: Instant,
}

impl Timer {
    pub fn start(label: impl Into<String>) -> Self {
        let label = label.into();
        info!("⏱  Starting: {}", label);
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        info!(
            "⏱  Finished: {} (took {:.2?})",
            self.label,
            self.elapsed()
        );
    }
}

/// Display form of a scalar. Missing values print as "NA".
/// Currency is held in base units and shown in crore.
pub fn format_value(value: Option<f64>, kind: ValueKind) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "NA".to_string();
    };
    match kind {
        ValueKind::Currency => format!("{:.2} Crore", v / CRORE),
        ValueKind::Price | ValueKind::Ratio => format!("{:.2}", v),
        ValueKind::Percent => format!("{:.2}%", v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(25_000_000.0), ValueKind::Currency), "2.50 Crore");
        assert_eq!(format_value(Some(1050.0), ValueKind::Price), "1050.00");
        assert_eq!(format_value(Some(19.8), ValueKind::Percent), "19.80%");
        assert_eq!(format_value(Some(-5.0), ValueKind::Ratio), "-5.00");
        assert_eq!(format_value(None, ValueKind::Percent), "NA");
        assert_eq!(format_value(Some(f64::NAN), ValueKind::Price), "NA");
    }

    #[test]
    fn test_timer_elapsed_is_monotonic() {
        let t = Timer::start("test");
        let a = t.elapsed();
        assert!(t.elapsed() >= a);
    }
}
