//! Escaping and metadata formatting
//!
//! Pure helpers that turn untrusted catalog text into markup-safe fragments.

use crate::api::Item;

/// Separator between metadata parts
pub const META_SEPARATOR: &str = " · ";

/// Escape text for use as HTML element content
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for use inside a double- or single-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Release year, media descriptor and genres joined by [`META_SEPARATOR`]
///
/// Empty parts are skipped. The result is plain text, not escaped.
pub fn meta_line(item: &Item) -> String {
    let year = item.release_year.map(|y| y.to_string());
    [year.as_deref(), item.meta_line.as_deref(), item.genres.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(META_SEPARATOR)
}
