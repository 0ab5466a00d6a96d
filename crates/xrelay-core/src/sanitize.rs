//! Rich text → post text.
//!
//! This is a best-effort, regex based transform tuned for the HTML the chat
//! platform renders from message entities. It is not a general HTML parser:
//! anchors that do not match the anchor pattern survive untouched and nested
//! anchors are not supported. Entities are decoded before tags are stripped,
//! so escaped tag-shaped text such as `&lt;T&gt;` is removed along with real
//! markup.

use std::sync::OnceLock;

use regex::{Captures, Regex};

fn entity_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[A-Za-z]{2,8});").expect("valid regex")
    })
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"</?([A-Za-z][A-Za-z0-9]*)\b[^>]*>").expect("valid regex"))
}

fn anchor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a\s[^>]*?href\s*=\s*(?:"([^"]*)"|'([^']*)')[^>]*>(.*?)</a\s*>"#)
            .expect("valid regex")
    })
}

/// Decode HTML character references in a single pass.
///
/// Unknown named references are left as written.
pub fn unescape_html(input: &str) -> String {
    entity_re()
        .replace_all(input, |caps: &Captures| {
            let body = &caps[1];
            let decoded = if let Some(num) = body.strip_prefix('#') {
                let code = match num.strip_prefix(['x', 'X']) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => num.parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            } else {
                match body {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Remove every tag except `<a ...>` / `</a>`.
pub fn strip_non_anchor_tags(input: &str) -> String {
    tag_re()
        .replace_all(input, |caps: &Captures| {
            if caps[1].eq_ignore_ascii_case("a") {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Rewrite `<a href="URL">CONTENT</a>` to `CONTENT (URL)`.
pub fn rewrite_anchors(input: &str) -> String {
    anchor_re()
        .replace_all(input, |caps: &Captures| {
            let href = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            format!("{} ({})", &caps[3], href)
        })
        .into_owned()
}

/// Turn chat-platform HTML into post text: unescape, strip tags, inline links.
pub fn sanitize(rich_text: &str) -> String {
    let text = unescape_html(rich_text);
    let text = strip_non_anchor_tags(&text);
    rewrite_anchors(&text)
}
