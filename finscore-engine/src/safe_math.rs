//! Null-safe arithmetic.
//!
//! Every financial input is optional. These helpers propagate absence instead
//! of producing `NaN`, infinities or a panic, so callers can chain them
//! freely: a missing operand or a zero denominator yields `None`.

/// Divide, returning `None` for a missing operand, a zero denominator or a
/// non-finite result.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (n, d) = (numerator?, denominator?);
    if d == 0.0 {
        return None;
    }
    finite(n / d)
}

/// Multiply, propagating absence.
pub fn safe_mul(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(a? * b?)
}

/// Subtract, propagating absence.
pub fn safe_sub(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(a? - b?)
}

/// Add, propagating absence.
pub fn safe_add(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    finite(a? + b?)
}

/// Sum of all values; absent if any term is absent.
pub fn safe_sum<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let mut total = 0.0;
    for value in values {
        total += value?;
    }
    finite(total)
}

/// Filter out `NaN` and infinities.
pub fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Compound annual growth rate between two positive values.
///
/// Absent when either endpoint is not positive or `years` is not positive,
/// since a fractional power of a negative ratio has no real meaning.
pub fn cagr(begin: Option<f64>, end: Option<f64>, years: f64) -> Option<f64> {
    let (b, e) = (begin?, end?);
    if b <= 0.0 || e <= 0.0 || years <= 0.0 {
        return None;
    }
    finite((e / b).powf(1.0 / years) - 1.0)
}

/// CAGR over a yearly series ordered oldest first.
pub fn series_cagr(series: &[f64]) -> Option<f64> {
    if series.len() < 2 {
        return None;
    }
    cagr(
        series.first().copied(),
        series.last().copied(),
        (series.len() - 1) as f64,
    )
}

/// Year-over-year growth, measured against the magnitude of the prior value
/// so that a recovery from a loss reads as positive.
pub fn yoy_growth(current: Option<f64>, prior: Option<f64>) -> Option<f64> {
    let (c, p) = (current?, prior?);
    if p == 0.0 {
        return None;
    }
    finite((c - p) / p.abs())
}

/// Display style for a ratio value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatioFormat {
    /// `0.153` → `15.3%`
    Percent,
    /// `12.34` → `12.3x`
    Multiple,
    /// `1234.5` → `$1,234.50`
    Currency,
    /// `1.2345` → `1.23`
    Decimal,
}

/// Marker rendered for absent values.
pub const UNAVAILABLE: &str = "N/A";

/// Format an optional ratio for display.
pub fn format_ratio(value: Option<f64>, format: RatioFormat) -> String {
    let Some(v) = value.and_then(finite) else {
        return UNAVAILABLE.to_string();
    };
    match format {
        RatioFormat::Percent => format!("{:.1}%", v * 100.0),
        RatioFormat::Multiple => format!("{:.1}x", v),
        RatioFormat::Decimal => format!("{:.2}", v),
        RatioFormat::Currency => {
            let sign = if v < 0.0 { "-" } else { "" };
            let cents = (v.abs() * 100.0).round() as u64;
            let whole = (cents / 100).to_string();
            let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
            for (i, ch) in whole.chars().enumerate() {
                if i > 0 && (whole.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(ch);
            }
            format!("{}${}.{:02}", sign, grouped, cents % 100)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(Some(10.0), Some(4.0)), Some(2.5));
        assert_eq!(safe_div(Some(10.0), Some(0.0)), None);
        assert_eq!(safe_div(None, Some(4.0)), None);
        assert_eq!(safe_div(Some(10.0), None), None);
        assert_eq!(safe_div(Some(f64::NAN), Some(1.0)), None);
    }

    #[test]
    fn test_propagation() {
        assert_eq!(safe_mul(Some(2.0), Some(3.0)), Some(6.0));
        assert_eq!(safe_mul(Some(2.0), None), None);
        assert_eq!(safe_sub(Some(5.0), Some(3.0)), Some(2.0));
        assert_eq!(safe_sub(None, Some(3.0)), None);
        assert_eq!(safe_add(Some(5.0), Some(3.0)), Some(8.0));
        assert_eq!(safe_sum([Some(1.0), Some(2.0), Some(3.0)]), Some(6.0));
        assert_eq!(safe_sum([Some(1.0), None]), None);
    }

    #[test]
    fn test_cagr() {
        let growth = cagr(Some(100.0), Some(121.0), 2.0).unwrap();
        assert!((growth - 0.10).abs() < 1e-9);

        assert_eq!(cagr(Some(0.0), Some(121.0), 2.0), None);
        assert_eq!(cagr(Some(-5.0), Some(121.0), 2.0), None);
        assert_eq!(cagr(Some(100.0), Some(121.0), 0.0), None);
    }

    #[test]
    fn test_series_cagr() {
        let growth = series_cagr(&[100.0, 110.0, 121.0]).unwrap();
        assert!((growth - 0.10).abs() < 1e-9);
        assert_eq!(series_cagr(&[100.0]), None);
        assert_eq!(series_cagr(&[]), None);
    }

    #[test]
    fn test_yoy_growth_from_loss() {
        // -50 → 25 is an improvement of 150% of the prior magnitude
        let growth = yoy_growth(Some(25.0), Some(-50.0)).unwrap();
        assert!((growth - 1.5).abs() < 1e-9);
        assert_eq!(yoy_growth(Some(25.0), Some(0.0)), None);
    }

    #[test_case(Some(0.1534), RatioFormat::Percent, "15.3%" ; "percent")]
    #[test_case(Some(12.34), RatioFormat::Multiple, "12.3x" ; "multiple")]
    #[test_case(Some(1.2345), RatioFormat::Decimal, "1.23" ; "decimal")]
    #[test_case(Some(1234567.891), RatioFormat::Currency, "$1,234,567.89" ; "currency")]
    #[test_case(Some(-12.5), RatioFormat::Currency, "-$12.50" ; "negative currency")]
    #[test_case(None, RatioFormat::Percent, "N/A" ; "absent")]
    #[test_case(Some(f64::INFINITY), RatioFormat::Multiple, "N/A" ; "infinite")]
    fn test_format_ratio(value: Option<f64>, format: RatioFormat, expected: &str) {
        assert_eq!(format_ratio(value, format), expected);
    }
}
