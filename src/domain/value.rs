//! Parsing and formatting of display values ("$1.23B", "-3.20%")

/// Multipliers for the unit suffixes used across board columns.
const UNIT_SUFFIXES: [(char, f64); 4] = [('K', 1e3), ('M', 1e6), ('B', 1e9), ('T', 1e12)];

/// Parse a formatted display value into a comparable magnitude.
///
/// Handles a leading `$`, thousands separators, a leading sign, a trailing
/// `%`, and a trailing unit suffix (K/M/B/T, case-insensitive). Anything
/// unparseable yields `0.0` so a single malformed record cannot abort a
/// sort of the whole collection.
pub fn parse_display_value(display: &str) -> f64 {
    let mut rest = display.trim();
    if rest.is_empty() {
        return 0.0;
    }

    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = true;
        rest = stripped;
    }
    rest = rest.strip_prefix('$').unwrap_or(rest);
    // Tolerate "$-1.2M" as well as "-$1.2M"
    if let Some(stripped) = rest.strip_prefix('-') {
        negative = !negative;
        rest = stripped;
    }
    rest = rest.strip_suffix('%').unwrap_or(rest).trim();

    let mut multiplier = 1.0;
    if let Some(last) = rest.chars().last() {
        for (suffix, unit) in UNIT_SUFFIXES {
            if last.eq_ignore_ascii_case(&suffix) {
                multiplier = unit;
                rest = rest[..rest.len() - last.len_utf8()].trim();
                break;
            }
        }
    }

    let cleaned: String = rest.chars().filter(|c| *c != ',').collect();
    let Ok(value) = cleaned.trim().parse::<f64>() else {
        return 0.0;
    };
    let magnitude = value * multiplier;
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

/// Format a magnitude the way board columns display locked value.
///
/// The inverse direction of [`parse_display_value`] up to rounding: two
/// decimals of the scaled value, trailing zeros trimmed.
pub fn format_magnitude(value: f64) -> String {
    let negative = value < 0.0;
    let abs = value.abs();
    let (scaled, suffix) = if abs >= 1e12 {
        (abs / 1e12, "T")
    } else if abs >= 1e9 {
        (abs / 1e9, "B")
    } else if abs >= 1e6 {
        (abs / 1e6, "M")
    } else if abs >= 1e3 {
        (abs / 1e3, "K")
    } else {
        (abs, "")
    };
    let mut body = format!("{scaled:.2}");
    if body.contains('.') {
        body = body.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}${body}{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() <= expected.abs() * 1e-9
    }

    #[test]
    fn parses_currency_with_suffix() {
        assert!(close(parse_display_value("$1.23B"), 1.23e9));
        assert_eq!(parse_display_value("$900K"), 900_000.0);
        assert!(close(parse_display_value("$1.20M"), 1.2e6));
        assert_eq!(parse_display_value("2.5T"), 2.5e12);
        assert_eq!(parse_display_value("1.5k"), 1_500.0);
    }

    #[test]
    fn parses_percentages_and_signs() {
        assert_eq!(parse_display_value("12.4%"), 12.4);
        assert_eq!(parse_display_value("-3.20%"), -3.2);
        assert!(close(parse_display_value("-$4.1M"), -4.1e6));
        assert!(close(parse_display_value("$-4.1M"), -4.1e6));
    }

    #[test]
    fn parses_thousands_separators() {
        assert_eq!(parse_display_value("$1,234,567.89"), 1_234_567.89);
        assert_eq!(parse_display_value("12,400"), 12_400.0);
    }

    #[test]
    fn malformed_input_is_zero() {
        assert_eq!(parse_display_value(""), 0.0);
        assert_eq!(parse_display_value("   "), 0.0);
        assert_eq!(parse_display_value("n/a"), 0.0);
        assert_eq!(parse_display_value("$"), 0.0);
        assert_eq!(parse_display_value("--"), 0.0);
        assert_eq!(parse_display_value("1.2.3M"), 0.0);
    }

    #[test]
    fn formats_round_numbers_without_trailing_zeros() {
        assert_eq!(format_magnitude(900_000.0), "$900K");
        assert_eq!(format_magnitude(1.2e6), "$1.2M");
        assert_eq!(format_magnitude(1.23e9), "$1.23B");
        assert_eq!(format_magnitude(512.0), "$512");
        assert_eq!(format_magnitude(-2.5e3), "-$2.5K");
    }
}
