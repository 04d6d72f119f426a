//! Coercion of raw form input
//!
//! Monetary input never blocks the user: anything that is not a number
//! becomes zero. Parsing follows the browser's `parseFloat`/`parseInt`
//! rules (longest numeric prefix wins).

/// Parse an amount, falling back to `0.0`.
///
/// `"12.50"` -> 12.5, `"7abc"` -> 7.0, `"abc"` -> 0.0, `""` -> 0.0.
/// Non-finite results (overflow, `Infinity`) also become 0.0.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let at = |i: usize| bytes.get(i).copied();

    let mut end = 0;
    if matches!(at(0), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while at(end).is_some_and(|b| b.is_ascii_digit()) {
        end += 1;
    }
    let mut digits = end - int_start;

    if at(end) == Some(b'.') {
        let mut frac_end = end + 1;
        while at(frac_end).is_some_and(|b| b.is_ascii_digit()) {
            frac_end += 1;
        }
        let frac_digits = frac_end - end - 1;
        if digits + frac_digits > 0 {
            end = frac_end;
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if matches!(at(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(at(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while at(exp_end).is_some_and(|b| b.is_ascii_digit()) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    match s[..end].parse::<f64>() {
        Ok(value) if value.is_finite() && value != 0.0 => value,
        _ => 0.0,
    }
}

/// Leading integer of `raw`, like `parseInt(raw, 10)`; `None` when there is none
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    let value: i64 = digits.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Replace NaN and infinities with zero before they reach storage
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount_plain_numbers() {
        assert_eq!(parse_amount("100"), 100.0);
        assert_eq!(parse_amount("19.999"), 19.999);
        assert_eq!(parse_amount("-3.5"), -3.5);
        assert_eq!(parse_amount(".5"), 0.5);
        assert_eq!(parse_amount("5."), 5.0);
        assert_eq!(parse_amount("  42"), 42.0);
    }

    #[test]
    fn test_parse_amount_uses_numeric_prefix() {
        assert_eq!(parse_amount("12abc"), 12.0);
        assert_eq!(parse_amount("1.5.6"), 1.5);
        assert_eq!(parse_amount("2e3"), 2000.0);
        assert_eq!(parse_amount("2e"), 2.0);
        assert_eq!(parse_amount("7 dollars"), 7.0);
    }

    #[test]
    fn test_parse_amount_garbage_is_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-"), 0.0);
        assert_eq!(parse_amount("."), 0.0);
        assert_eq!(parse_amount("$5"), 0.0);
        assert_eq!(parse_amount("Infinity"), 0.0);
        assert_eq!(parse_amount("1e999"), 0.0);
    }

    #[test]
    fn test_parse_amount_negative_zero_is_zero() {
        let value = parse_amount("-0");
        assert_eq!(value, 0.0);
        assert!(value.is_sign_positive());
    }

    #[test]
    fn test_parse_leading_int() {
        assert_eq!(parse_leading_int("5"), Some(5));
        assert_eq!(parse_leading_int(" 11 "), Some(11));
        assert_eq!(parse_leading_int("3.9"), Some(3));
        assert_eq!(parse_leading_int("-1"), Some(-1));
        assert_eq!(parse_leading_int("x1"), None);
        assert_eq!(parse_leading_int(""), None);
        assert_eq!(parse_leading_int("-"), None);
    }

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(1.25), 1.25);
    }
}
