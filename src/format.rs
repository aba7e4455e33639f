//! Number formatting for reports.
//!
//! Grouping always uses `,` as the thousands separator and `.` as the decimal
//! point, independent of the process locale.

/// Formats an integer, optionally with thousands separators.
pub fn format_int(value: i64, grouping: bool) -> String {
    let digits = value.unsigned_abs().to_string();
    let body = if grouping { group_digits(&digits) } else { digits };
    if value < 0 { format!("-{body}") } else { body }
}

/// Formats `value` with a fixed number of decimals, optionally grouped.
pub fn format_decimal(value: f64, decimals: usize, grouping: bool) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = if grouping {
        group_digits(int_part)
    } else {
        int_part.to_string()
    };
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }

    // "-0.0" reads as noise in a report
    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        out.insert(0, '-');
    }
    out
}

/// Signed percentage with one decimal, e.g. `+20.0%` or `-3.5%`.
pub fn format_percent(pct: f64) -> String {
    let body = format_decimal(pct, 1, true);
    if pct > 0.0 && !body.chars().all(|c| c == '0' || c == '.') {
        format!("+{body}%")
    } else {
        format!("{body}%")
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_int_grouping() {
        assert_eq!(format_int(0, true), "0");
        assert_eq!(format_int(999, true), "999");
        assert_eq!(format_int(1000, true), "1,000");
        assert_eq!(format_int(1234567, true), "1,234,567");
        assert_eq!(format_int(-4321, true), "-4,321");
        assert_eq!(format_int(1234567, false), "1234567");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(1234.56, 1, true), "1,234.6");
        assert_eq!(format_decimal(1234.56, 1, false), "1234.6");
        assert_eq!(format_decimal(150.0, 1, true), "150.0");
        assert_eq!(format_decimal(-9876.54, 2, true), "-9,876.54");
        assert_eq!(format_decimal(12.0, 0, true), "12");
    }

    #[test]
    fn test_format_decimal_negative_zero() {
        assert_eq!(format_decimal(-0.01, 1, true), "0.0");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(20.0), "+20.0%");
        assert_eq!(format_percent(-3.46), "-3.5%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(0.01), "0.0%");
        assert_eq!(format_percent(1500.0), "+1,500.0%");
    }
}
