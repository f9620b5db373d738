use std::borrow::Cow;

/// Percentages are reported with one decimal digit.
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}")
}

/// Minimal quoting: wrap in `"` only when the field contains the delimiter,
/// a quote or a line break. Embedded quotes are doubled.
pub fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for c in field.chars() {
        if c == '"' {
            out.push('"');
        }
        out.push(c);
    }
    out.push('"');
    Cow::Owned(out)
}
