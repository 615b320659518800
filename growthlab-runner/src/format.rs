//! Display formatting shared by the CLI and TUI.

use crate::metrics::MetricError;

/// `$1,234.56`; negative amounts as `-$12.00`.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return "n/a".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// Fraction as a percentage with two decimals: `0.1` → `10.00%`.
pub fn format_percent(fraction: f64) -> String {
    if fraction.is_finite() {
        format!("{:.2}%", fraction * 100.0)
    } else {
        "n/a".to_string()
    }
}

/// CAGR cell: the percentage, or `n/a` with the reason.
pub fn format_cagr(cagr: &Result<f64, MetricError>) -> String {
    match cagr {
        Ok(rate) => format_percent(*rate),
        Err(e) => format!("n/a ({e})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1050.0), "$1,050.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(f64::NAN), "n/a");
    }

    #[test]
    fn percent() {
        assert_eq!(format_percent(0.1), "10.00%");
        assert_eq!(format_percent(-1.0), "-100.00%");
    }

    #[test]
    fn cagr_cells() {
        assert_eq!(format_cagr(&Ok(0.05)), "5.00%");
        let cell = format_cagr(&Err(MetricError::NonPositiveYears(0.0)));
        assert!(cell.starts_with("n/a ("));
        assert!(cell.contains("elapsed years"));
    }
}
