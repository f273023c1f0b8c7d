use owo_colors::OwoColorize;

/// Used for formatting fields that potentially produces many values.
const MAX_CODES_PER_LINE: usize = 5;

/// Format error/warning codes, wrapping lines after a fixed number of codes.
pub(crate) fn format_error_codes(error_codes: &[String]) -> String {
    error_codes
        .iter()
        .enumerate()
        .map(|(i, code)| {
            if i > 0 && i % MAX_CODES_PER_LINE == 0 {
                format!("\n{code}")
            } else if i > 0 {
                format!(" {code}")
            } else {
                code.to_string()
            }
        })
        .collect()
}

/// Format a count, dimmed if it is zero.
pub(crate) fn format_count(count: u64) -> String {
    if count == 0 {
        count.dimmed().to_string()
    } else {
        count.to_string()
    }
}

/// Format a part of a total as a percentage.
pub(crate) fn format_fraction(part: u64, total: u64) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1} %", part as f64 / total as f64 * 100.0)
}
