//! Body sanitization
//!
//! Pure string transforms that strip control characters, markup, inline
//! image/content-id placeholders, URLs, and whitespace noise from message
//! bodies. Both entry points are idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{0000}-\u{001F}\u{007F}-\u{009F}]").unwrap());

static IMAGE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[image:.*?\]").unwrap());

static CID_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[cid:.*?\]").unwrap());

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bhttps?://\S+").unwrap());

static STYLE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());

static SCRIPT_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());

static HTML_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static HTML_ENTITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-z]+;").unwrap());

/// Sanitize a plain-text body.
///
/// Collapses whitespace runs, drops control characters, `[image: ...]` and
/// `[cid: ...]` placeholders, and `http(s)://` tokens, then trims.
pub fn sanitize_plain_text(text: &str) -> String {
    let text = WHITESPACE_RE.replace_all(text, " ");
    let text = CONTROL_RE.replace_all(&text, "");
    let text = IMAGE_TAG_RE.replace_all(&text, "");
    let text = CID_TAG_RE.replace_all(&text, "");
    let text = URL_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Sanitize an HTML body down to plain text.
///
/// Removes style/script blocks with their content, replaces remaining tags
/// with a space, resolves `&nbsp;`, drops other named entities, then applies
/// the plain-text pipeline.
pub fn sanitize_html(html: &str) -> String {
    let text = STYLE_BLOCK_RE.replace_all(html, "");
    let text = SCRIPT_BLOCK_RE.replace_all(&text, "");
    let text = HTML_TAG_RE.replace_all(&text, " ");
    let text = text.replace("&nbsp;", " ");
    let text = HTML_ENTITY_RE.replace_all(&text, "");
    let text = WHITESPACE_RE.replace_all(&text, " ");

    sanitize_plain_text(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(sanitize_plain_text("a  b\t\nc"), "a b c");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(sanitize_plain_text("a\u{0007}b\u{009F}c"), "abc");
    }

    #[test]
    fn test_strips_image_and_cid_placeholders() {
        assert_eq!(
            sanitize_plain_text("before [image: logo.png] after [cid: abc123] end"),
            "before after end"
        );
    }

    #[test]
    fn test_strips_urls() {
        assert_eq!(
            sanitize_plain_text("see https://example.com/path?q=1 and http://a.b here"),
            "see and here"
        );
    }

    #[test]
    fn test_plain_text_idempotent() {
        let inputs = [
            "  a  b\u{0001}  [image: x] https://e.com  c  ",
            "already clean",
            "",
            "\t\t\t",
        ];
        for input in inputs {
            let once = sanitize_plain_text(input);
            assert_eq!(sanitize_plain_text(&once), once);
        }
    }

    #[test]
    fn test_html_strips_tags() {
        assert_eq!(
            sanitize_html("<p>Hello <b>world</b></p>"),
            "Hello world"
        );
    }

    #[test]
    fn test_html_strips_style_and_script_blocks() {
        let html = "<style type=\"text/css\">p { color: red; }</style>\
                    <SCRIPT>alert('x');\nmore();</SCRIPT><p>kept</p>";
        assert_eq!(sanitize_html(html), "kept");
    }

    #[test]
    fn test_html_entities() {
        assert_eq!(sanitize_html("a&nbsp;b &amp; c"), "a b c");
    }

    #[test]
    fn test_html_idempotent() {
        let html = "<div>Hi&nbsp;<a href=\"https://x.com\">link</a>\n\n there</div>";
        let once = sanitize_html(html);
        assert_eq!(sanitize_html(&once), once);
        // Double sanitization through the plain-text path is also stable
        assert_eq!(sanitize_plain_text(&once), once);
    }
}
