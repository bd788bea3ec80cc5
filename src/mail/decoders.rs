/// Width used when rendering HTML bodies to text; wide enough to not rewrap prose.
const HTML_WRAP_WIDTH: usize = 100;

/// Best-effort HTML to plain text. Falls back to dropping tags.
pub fn html_to_text(html: &str) -> String {
    match html2text::from_read(html.as_bytes(), HTML_WRAP_WIDTH) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("html2text failed ({e}); stripping tags instead");
            strip_html_minimal(html)
        }
    }
}

pub fn strip_html_minimal(html: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Decode bytes as UTF-8, replacing invalid sequences instead of failing.
pub fn decode_lossy(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}
