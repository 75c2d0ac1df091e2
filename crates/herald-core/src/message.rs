//! CQ code helpers.
//!
//! OneBot gateways deliver `raw_message` in CQ code format: rich segments are
//! written as bracketed tags (`[CQ:at,qq=10001]`) and literal brackets, commas
//! and ampersands inside text are HTML-entity escaped.

/// Unescapes the HTML entities a gateway applies to raw message text.
///
/// Replacement order: `&#91;` → `[`, `&#93;` → `]`, `&amp;` → `&`,
/// `&#44;` → `,`.
pub fn unescape_cq_text(text: &str) -> String {
    text.replace("&#91;", "[")
        .replace("&#93;", "]")
        .replace("&amp;", "&")
        .replace("&#44;", ",")
}

/// Returns the CQ tag that quotes message `message_id`.
pub fn reply_tag(message_id: i64) -> String {
    format!("[CQ:reply,id={message_id}]")
}

/// Prefixes `text` with a quote of the originating message.
pub fn quote_reply(message_id: i64, text: &str) -> String {
    format!("{}{text}", reply_tag(message_id))
}

/// Returns `true` if `text` consists of exactly one at-mention of `bot_id`.
///
/// Both `[CQ:at,qq=<id>]` and the extended `[CQ:at,qq=<id>,name=...]` forms
/// are accepted. Surrounding whitespace is ignored.
pub fn is_exact_mention(text: &str, bot_id: i64) -> bool {
    let text = text.trim();
    let Some(rest) = text.strip_prefix(&format!("[CQ:at,qq={bot_id}")) else {
        return false;
    };
    if !(rest.starts_with(']') || rest.starts_with(',')) {
        return false;
    }
    // The first closing bracket must be the last character.
    rest.find(']') == Some(rest.len() - 1)
}

/// Extracts the user ID from a mention token such as `[CQ:at,qq=10001,name=x]`.
///
/// Returns `None` for `qq=all` and for tokens without a numeric `qq=` value.
pub fn mention_id(token: &str) -> Option<i64> {
    let start = token.find("qq=")? + 3;
    let value = &token[start..];
    let end = value.find([',', ']']).unwrap_or(value.len());
    let value = &value[..end];
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unescape() {
        assert_eq!(unescape_cq_text("&#91;x&#93; &amp; a&#44;b"), "[x] & a,b");
        assert_eq!(unescape_cq_text("/echo plain"), "/echo plain");
    }

    #[test]
    fn test_unescape_order() {
        // `&amp;` is restored before `&#44;`, so a double-escaped comma collapses.
        assert_eq!(unescape_cq_text("&amp;#44;"), ",");
    }

    #[test]
    fn test_quote_reply() {
        assert_eq!(quote_reply(99, "hi"), "[CQ:reply,id=99]hi");
    }

    #[test]
    fn test_exact_mention() {
        assert!(is_exact_mention("[CQ:at,qq=42]", 42));
        assert!(is_exact_mention(" [CQ:at,qq=42,name=bot] ", 42));
        assert!(!is_exact_mention("[CQ:at,qq=421]", 42));
        assert!(!is_exact_mention("[CQ:at,qq=42] hello", 42));
        assert!(!is_exact_mention("[CQ:at,qq=43]", 42));
        assert!(!is_exact_mention("hello", 42));
    }

    #[test]
    fn test_mention_id() {
        assert_eq!(mention_id("[CQ:at,qq=10001,name=alice]"), Some(10001));
        assert_eq!(mention_id("[CQ:at,qq=10001]"), Some(10001));
        assert_eq!(mention_id("[CQ:at,qq=all]"), None);
        assert_eq!(mention_id("[CQ:face,id=1]"), None);
    }
}
