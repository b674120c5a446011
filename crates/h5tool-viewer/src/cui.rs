pub mod batch;
pub mod browse;

use unicode_width::UnicodeWidthStr;

/// Pad `s` with spaces up to `width` terminal columns.
fn pad_to_width(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    if w >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - w))
    }
}
