//! Percentage-space geometry strings.
//!
//! Every consumer (drag, alignment, export) reads `left`, `top`, `width` and
//! friends through [`parse_length`], so the defaulting rule lives in exactly
//! one place: the leading numeric prefix of the string is used (`"40%"` is
//! 40, `"300px"` is 300), and anything without one (`"auto"`, `""`, a
//! missing field, a non-finite value) yields the caller's default.

/// Logical canvas width every percentage resolves against.
pub const CANVAS_WIDTH: f64 = 1000.0;

/// Logical canvas height (16:9 of [`CANVAS_WIDTH`]).
pub const CANVAS_HEIGHT: f64 = 562.5;

/// Default `left`/`top` when a position is absent or unparseable.
pub const DEFAULT_OFFSET: f64 = 0.0;

/// Default `width` when a size is absent or unparseable.
pub const DEFAULT_WIDTH: f64 = 10.0;

/// Parse a CSS-ish length, falling back to `default`. Never panics.
pub fn parse_length(value: Option<&str>, default: f64) -> f64 {
    value
        .and_then(numeric_prefix)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Render a percentage the way the stored documents spell it (`"27.5%"`,
/// `"10%"`).
pub fn format_percent(value: f64) -> String {
    // -0 would otherwise print as "-0%"
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{}%", value)
}

fn numeric_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Optional exponent, only if it is well formed
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_units() {
        assert_eq!(parse_length(Some("40%"), 0.0), 40.0);
        assert_eq!(parse_length(Some("300px"), 0.0), 300.0);
        assert_eq!(parse_length(Some("  12.5%"), 0.0), 12.5);
        assert_eq!(parse_length(Some("-5%"), 0.0), -5.0);
        assert_eq!(parse_length(Some(".5"), 0.0), 0.5);
        assert_eq!(parse_length(Some("1e2px"), 0.0), 100.0);
    }

    #[test]
    fn test_defaults_on_garbage() {
        assert_eq!(parse_length(None, DEFAULT_WIDTH), 10.0);
        assert_eq!(parse_length(Some("auto"), DEFAULT_WIDTH), 10.0);
        assert_eq!(parse_length(Some(""), DEFAULT_OFFSET), 0.0);
        assert_eq!(parse_length(Some("%"), 7.0), 7.0);
        assert_eq!(parse_length(Some("-"), 7.0), 7.0);
        assert_eq!(parse_length(Some("."), 7.0), 7.0);
    }

    #[test]
    fn test_exponent_without_digits_is_ignored() {
        assert_eq!(parse_length(Some("3em"), 0.0), 3.0);
        assert_eq!(parse_length(Some("2e+"), 0.0), 2.0);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(10.0), "10%");
        assert_eq!(format_percent(27.5), "27.5%");
        assert_eq!(format_percent(-0.0), "0%");
    }
}
