//! Plain-text extraction from HTML pages / HTML 文本提取

use once_cell::sync::Lazy;
use regex::Regex;

static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid script regex"));
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid style regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid space regex"));
static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));

/// Title used when a page has none / 默认标题
pub const DEFAULT_TITLE: &str = "No Title";

/// Strip tags, scripts and styles; collapse whitespace / 去除标签
pub fn strip_html(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, " ");
    let text = STYLE_RE.replace_all(&text, " ");
    let text = TAG_RE.replace_all(&text, " ");
    let text = SPACE_RE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Contents of the first `<title>` element / 提取标题
pub fn extract_title(html: &str) -> Option<String> {
    TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| SPACE_RE.replace_all(m.as_str(), " ").trim().to_string())
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let html = r#"<html><head><title>Page</title>
            <style>body { color: red; }</style>
            <script type="text/javascript">var x = "<b>hidden</b>";</script></head>
            <body><h1>Hello</h1>
            <p>World   of <a href="/x">links</a></p></body></html>"#;
        assert_eq!(strip_html(html), "Page Hello World of links");
    }

    #[test]
    fn test_strip_plain_text_untouched() {
        assert_eq!(strip_html("just  text\n"), "just text");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(
            extract_title("<html><TITLE>\n Rust  Language </TITLE></html>").as_deref(),
            Some("Rust Language")
        );
        assert_eq!(extract_title("<p>no title</p>"), None);
        assert_eq!(extract_title("<title></title>"), None);
    }
}
