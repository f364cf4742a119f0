//! HTML entity decoding and escaping.
//!
//! Archive text may arrive partially escaped. It is decoded once and escaped
//! once, so `&amp;` in the archive stays `&amp;` in the output.

/// Escapes HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Decodes every HTML5 named reference and all numeric character references.
///
/// Unknown or malformed references are kept as written.
pub fn decode_entities(s: &str) -> String {
    html_escape::decode_html_entities(s).into_owned()
}
