use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;

static CHARSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s/>]+)"#).unwrap());

static META_HTTP_EQUIV_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?http-equiv\s*=\s*["']?content-type["']?[^>]*?content\s*=\s*["']?[^"'>]*?charset\s*=\s*([^"'\s;/>]+)"#).unwrap()
});

const SNIFF_LEN: usize = 4096;

/// Decodes an HTML body to UTF-8. Malformed sequences become U+FFFD rather
/// than failing the fetch.
pub fn decode_body(content_type: &str, body: &[u8]) -> (String, &'static Encoding) {
    let encoding = detect_encoding(content_type, body);
    let (decoded, used, _had_errors) = encoding.decode(body);
    (decoded.into_owned(), used)
}

fn detect_encoding(content_type: &str, body: &[u8]) -> &'static Encoding {
    // 1. Declared in the Content-Type header
    if let Some(encoding) = label_from(&CHARSET_REGEX, content_type) {
        return encoding;
    }

    // 2. Declared in the document head
    let head = String::from_utf8_lossy(&body[..body.len().min(SNIFF_LEN)]);
    if let Some(encoding) = label_from(&META_CHARSET_REGEX, &head)
        .or_else(|| label_from(&META_HTTP_EQUIV_REGEX, &head))
    {
        return encoding;
    }

    // 3. Undeclared: trust valid UTF-8, otherwise guess
    if std::str::from_utf8(body).is_ok() {
        return UTF_8;
    }
    let mut detector = chardetng::EncodingDetector::new();
    detector.feed(&body[..body.len().min(SNIFF_LEN)], false);
    detector.guess(None, true)
}

fn label_from(regex: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = regex.captures(haystack)?.get(1)?.as_str().to_ascii_lowercase();
    Encoding::for_label(label.as_bytes())
}
