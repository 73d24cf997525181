// 💰 Currency helpers - clamping, display formatting, query number parsing

/// Upper bound for any currency figure (999M TL)
pub const MAX_MONEY_TL: f64 = 999_000_000.0;

/// Clamp a currency value into [0, MAX_MONEY_TL]; NaN maps to 0
pub fn clamp_money(value: f64) -> f64 {
    clamp_money_to(value, MAX_MONEY_TL)
}

/// Clamp against a custom ceiling
pub fn clamp_money_to(value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.max(0.0).min(max)
}

/// Missing values count as 0
pub fn clamp_money_opt(value: Option<f64>) -> f64 {
    value.map(clamp_money).unwrap_or(0.0)
}

/// Format a TL amount in millions, e.g. `720000` → `"0.72M TL"`
pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.2}M TL", v / 1_000_000.0),
        _ => "0".to_string(),
    }
}

/// Format a 0-100 ratio, e.g. `42.27` → `"42.3%"`
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.1}%", v),
        _ => "0%".to_string(),
    }
}

/// Parse a finite number from a query string value
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Parse a strictly positive integer; integral floats like "3.0" are accepted
pub fn parse_positive_integer(raw: &str) -> Option<i64> {
    let value = parse_number(raw)?;
    if value.fract() != 0.0 || value <= 0.0 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_money_bounds() {
        assert_eq!(clamp_money(-5.0), 0.0);
        assert_eq!(clamp_money(1_500_000_000.0), MAX_MONEY_TL);
        assert_eq!(clamp_money(f64::NAN), 0.0);
        assert_eq!(clamp_money(1_234.5), 1_234.5);
        assert_eq!(clamp_money(MAX_MONEY_TL), MAX_MONEY_TL);
    }

    #[test]
    fn test_clamp_money_missing_and_infinite() {
        assert_eq!(clamp_money_opt(None), 0.0);
        assert_eq!(clamp_money_opt(Some(42.0)), 42.0);
        assert_eq!(clamp_money(f64::INFINITY), MAX_MONEY_TL);
        assert_eq!(clamp_money(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_clamp_money_custom_ceiling() {
        assert_eq!(clamp_money_to(150.0, 100.0), 100.0);
        assert_eq!(clamp_money_to(50.0, 100.0), 50.0);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Some(720_000.0)), "0.72M TL");
        assert_eq!(format_money(Some(999_000_000.0)), "999.00M TL");
        assert_eq!(format_money(Some(f64::NAN)), "0");
        assert_eq!(format_money(None), "0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(Some(42.27)), "42.3%");
        assert_eq!(format_percent(Some(7.0)), "7.0%");
        assert_eq!(format_percent(None), "0%");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("30"), Some(30.0));
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_positive_integer() {
        assert_eq!(parse_positive_integer("7"), Some(7));
        assert_eq!(parse_positive_integer("3.0"), Some(3));
        assert_eq!(parse_positive_integer("1e3"), Some(1000));
        assert_eq!(parse_positive_integer("0"), None);
        assert_eq!(parse_positive_integer("-4"), None);
        assert_eq!(parse_positive_integer("2.5"), None);
        assert_eq!(parse_positive_integer("x1"), None);
    }
}
