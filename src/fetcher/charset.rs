use bytes::Bytes;
use chrono::Utc;
use encoding_rs::Encoding;
use regex::Regex;
use reqwest::StatusCode;
use std::sync::LazyLock;
use tracing::warn;
use url::Url;

use crate::fetcher::{
    errors::FetchError,
    types::{Charset, PageResponse},
};

/// How far into the body `<meta>` declarations and sniffing look.
const SNIFF_WINDOW: usize = 4096;

/// Share of replacement characters above which a body is treated as the
/// wrong encoding rather than a page with a few stray bytes.
const MAX_REPLACEMENT_SHARE: f64 = 0.05;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;]+)"#).unwrap());

static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+[^>]*?charset\s*=\s*["']?([^"'\s;/>]+)"#).unwrap()
});

pub fn process_response(
    url_final: Url,
    status: StatusCode,
    body_raw: Bytes,
    content_type: &str,
) -> Result<PageResponse, FetchError> {
    let charset = detect_charset(content_type, &body_raw);
    let body_utf8 = decode(&body_raw, &charset)?;

    Ok(PageResponse {
        url_final,
        status,
        body_raw,
        body_utf8,
        charset,
        fetched_at: Utc::now(),
    })
}

/// Content-Type header first, then `<meta>` in the head of the body, then a
/// statistical guess.
pub fn detect_charset(content_type: &str, body: &[u8]) -> Charset {
    let head = &body[..body.len().min(SNIFF_WINDOW)];

    declared(&HEADER_CHARSET, content_type)
        .or_else(|| declared(&META_CHARSET, &String::from_utf8_lossy(head)))
        .map(Charset::from_encoding)
        .unwrap_or_else(|| {
            let mut detector = chardetng::EncodingDetector::new();
            detector.feed(head, head.len() == body.len());
            Charset::from_encoding(detector.guess(None, true))
        })
}

fn declared(pattern: &Regex, haystack: &str) -> Option<&'static Encoding> {
    let label = pattern.captures(haystack)?.get(1)?.as_str().to_lowercase();
    Encoding::for_label(label.as_bytes())
}

/// Decodes lossily. Invalid sequences become U+FFFD so a stray byte costs at
/// most the row it sits in; a body that is mostly replacements is rejected.
fn decode(body: &[u8], charset: &Charset) -> Result<String, FetchError> {
    let encoding = charset.encoding();
    let (decoded, _, had_errors) = encoding.decode(body);

    if had_errors {
        let total = decoded.chars().count();
        let replaced = decoded
            .chars()
            .filter(|c| *c == char::REPLACEMENT_CHARACTER)
            .count();

        if replaced as f64 > total as f64 * MAX_REPLACEMENT_SHARE {
            return Err(FetchError::Charset(format!(
                "{replaced} of {total} characters are not valid {}",
                encoding.name()
            )));
        }

        warn!(
            encoding = encoding.name(),
            replaced, "Replaced invalid byte sequences while decoding"
        );
    }

    Ok(decoded.into_owned())
}
