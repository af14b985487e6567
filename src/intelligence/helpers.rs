use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse an appointment date into a timestamp.
/// Handles: "2024-03-15", "2024-03-15T10:30:00", "2024-03-15T10:30:00.000", RFC 3339.
/// Anything else is treated as "no date".
pub fn parse_visit_date(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `None` for missing or whitespace-only strings, trimmed value otherwise.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Ratio guarded against a zero (or negative) denominator.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Percentage of `part` in `whole`, rounded to the nearest integer. 0 when `whole` is 0.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    (safe_ratio(part, whole) * 100.0).round()
}

/// Format a dollar amount rounded to the nearest integer with thousands separators.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Format a multiplier with one decimal place, e.g. `2.3x`.
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{multiplier:.1}x")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_date_only() {
        let dt = parse_visit_date(Some("2024-03-15")).unwrap();
        assert_eq!(dt.to_string(), "2024-03-15 00:00:00");
    }

    #[test]
    fn parses_naive_datetime_and_rfc3339() {
        assert!(parse_visit_date(Some("2024-03-15T10:30:00")).is_some());
        assert!(parse_visit_date(Some("2024-03-15T10:30:00.250")).is_some());
        let dt = parse_visit_date(Some("2024-03-15T10:30:00-05:00")).unwrap();
        assert_eq!(dt.to_string(), "2024-03-15 15:30:00");
    }

    #[test]
    fn unparsable_dates_are_none() {
        assert!(parse_visit_date(None).is_none());
        assert!(parse_visit_date(Some("")).is_none());
        assert!(parse_visit_date(Some("  ")).is_none());
        assert!(parse_visit_date(Some("next tuesday")).is_none());
        assert!(parse_visit_date(Some("2024-13-45")).is_none());
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(Some(" Instagram ")), Some("Instagram"));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn percent_of_zero_whole_is_zero() {
        assert_eq!(percent_of(10.0, 0.0), 0.0);
        assert_eq!(percent_of(1.0, 3.0), 33.0);
        assert_eq!(percent_of(2.0, 3.0), 67.0);
    }

    #[test]
    fn currency_grouping() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(1234567.5), "$1,234,568");
        assert_eq!(format_currency(-2500.0), "-$2,500");
    }

    #[test]
    fn multiplier_one_decimal() {
        assert_eq!(format_multiplier(2.345), "2.3x");
        assert_eq!(format_multiplier(3.0), "3.0x");
    }
}
