use mailparse::{DispositionType, MailHeaderMap, ParsedMail};

use crate::domain::email::EmailMessage;
use crate::mail::decoders::{decode_lossy, html_to_text};

pub const NO_SUBJECT: &str = "(no subject)";

/// Decode a raw RFC 822 message into subject, date and plain-text body.
///
/// Never fails: malformed MIME degrades to an empty body.
pub fn parse(raw: &[u8]) -> EmailMessage {
    let parsed = match mailparse::parse_mail(raw) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("unparseable message ({e}); using empty body");
            return EmailMessage {
                subject: NO_SUBJECT.to_string(),
                date: String::new(),
                body: String::new(),
            };
        }
    };

    // get_first_value decodes RFC 2047 encoded words
    let subject = parsed
        .headers
        .get_first_value("Subject")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| NO_SUBJECT.to_string());

    let date = parsed.headers.get_first_value("Date").unwrap_or_default();

    EmailMessage {
        subject,
        date,
        body: extract_body(&parsed),
    }
}

fn extract_body(parsed: &ParsedMail) -> String {
    if let Some(text) = first_part(parsed, "text/plain") {
        return body_text(text);
    }
    if let Some(html) = first_part(parsed, "text/html") {
        return html_to_text(&body_text(html));
    }
    // an unsplittable multipart (no boundary) has no subparts and falls through to its payload
    if !parsed.subparts.is_empty() {
        return String::new();
    }
    parsed
        .get_body_raw()
        .map(|raw| decode_lossy(&raw))
        .unwrap_or_default()
}

/// Depth-first search for the first inline part of the given type.
fn first_part<'a>(p: &'a ParsedMail<'a>, mimetype: &str) -> Option<&'a ParsedMail<'a>> {
    if !is_multipart(p)
        && p.ctype.mimetype.eq_ignore_ascii_case(mimetype)
        && !matches!(
            p.get_content_disposition().disposition,
            DispositionType::Attachment
        )
    {
        return Some(p);
    }
    p.subparts.iter().find_map(|sp| first_part(sp, mimetype))
}

fn is_multipart(p: &ParsedMail) -> bool {
    p.ctype.mimetype.to_ascii_lowercase().starts_with("multipart/") || !p.subparts.is_empty()
}

fn body_text(p: &ParsedMail) -> String {
    p.get_body()
        .or_else(|_| p.get_body_raw().map(|raw| decode_lossy(&raw)))
        .unwrap_or_default()
}
