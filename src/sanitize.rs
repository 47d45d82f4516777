//! HTML helpers for the detail view and the PDF export.
//!
//! Object descriptions come from the catalog API as HTML and are treated as
//! untrusted: they pass through [`sanitize_html`] before being injected into
//! the page. Plain-text fields go through [`escape_html`].

use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Escape text for use in HTML content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Reduce an HTML fragment to an allowlist of formatting markup.
///
/// The fragment is parsed the way a browser would parse it. `script` and
/// `style` are dropped with their content, unknown elements are unwrapped,
/// event-handler attributes are removed and URLs are kept only for safe
/// schemes (after entity decoding).
pub fn sanitize_html(html: &str) -> String {
    ammonia::Builder::default().clean(html).to_string()
}

/// Convert an HTML fragment to plain text lines for the PDF export.
///
/// Block-level elements and `<br>` become line breaks and list items get a
/// `- ` prefix. Entities are decoded by the parser. Whitespace is collapsed
/// within each line and runs of blank lines are reduced to a single
/// paragraph break.
pub fn html_to_text(html: &str) -> String {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(sanitize_html(html));
    let mut text = String::new();
    collect_text(&dom.document, &mut text);

    let mut lines: Vec<String> = Vec::new();
    for raw_line in text.lines() {
        let line = raw_line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Document => collect_children(node, out),
        NodeData::Element { name, .. } => match &*name.local {
            "br" => out.push('\n'),
            "script" | "style" | "head" => {}
            "li" => {
                out.push_str("\n- ");
                collect_children(node, out);
            }
            tag if is_block(tag) => {
                out.push_str("\n\n");
                collect_children(node, out);
                out.push_str("\n\n");
            }
            _ => collect_children(node, out),
        },
        _ => {}
    }
}

/// Elements that start a new paragraph in plain-text output.
fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p"
            | "div"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "blockquote"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "pre"
    )
}

fn collect_children(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Escape Tests ====================

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_html_leaves_unicode() {
        assert_eq!(escape_html("日本語 Ünïcode"), "日本語 Ünïcode");
    }

    // ==================== Sanitize Tests ====================

    #[test]
    fn test_sanitize_keeps_formatting_markup() {
        let html = "<p>A <strong>bronze</strong> <em>statue</em>.</p>";
        assert_eq!(sanitize_html(html), html);
    }

    #[test]
    fn test_sanitize_keeps_relative_links() {
        let cleaned = sanitize_html(r#"<a href="/objects/2">statue</a>"#);
        assert!(cleaned.contains("href=\"/objects/2\""));
        assert!(cleaned.contains(">statue</a>"));
    }

    #[test]
    fn test_sanitize_removes_script_with_content() {
        let html = "<p>Hi</p><script>alert('x')</script><p>Bye</p>";
        assert_eq!(sanitize_html(html), "<p>Hi</p><p>Bye</p>");
    }

    #[test]
    fn test_sanitize_removes_style_and_iframe() {
        let cleaned = sanitize_html("<style>p{}</style><IFRAME src=\"https://evil\"></iframe>ok");
        assert_eq!(cleaned, "ok");
    }

    #[test]
    fn test_sanitize_removes_event_handlers() {
        let cleaned =
            sanitize_html(r#"<img src="/a.jpg" onerror="steal()" alt="A"><p onclick='x()'>t</p>"#);
        assert!(!cleaned.contains("onerror"));
        assert!(!cleaned.contains("onclick"));
        assert!(cleaned.contains("src=\"/a.jpg\""));
        assert!(cleaned.contains("<p>t</p>"));
    }

    #[test]
    fn test_sanitize_removes_slash_separated_handler() {
        let cleaned = sanitize_html("<img/onerror=alert(1) src=x>");
        assert!(!cleaned.contains("onerror"));
        assert!(!cleaned.contains("alert"));
    }

    #[test]
    fn test_sanitize_removes_javascript_urls() {
        let payloads = [
            r#"<a href="javascript:alert(1)">x</a>"#,
            r#"<a href="&#106;avascript:alert(1)">x</a>"#,
            r#"<a href="java&#9;script:alert(1)">x</a>"#,
            r#"<a href=" JaVaScRiPt:alert(1)">x</a>"#,
        ];
        for payload in payloads {
            let cleaned = sanitize_html(payload);
            assert!(!cleaned.contains("href"), "{} -> {}", payload, cleaned);
            assert!(!cleaned.contains("alert"), "{} -> {}", payload, cleaned);
            assert!(cleaned.contains(">x</a>"));
        }
    }

    #[test]
    fn test_sanitize_nested_script_splice() {
        let cleaned = sanitize_html("<scr<script></script>ipt>alert(1)</script>");
        assert!(!cleaned.to_lowercase().contains("<script"));
    }

    #[test]
    fn test_sanitize_leaves_text_mentioning_handlers() {
        let html = "<p>Read on = later</p>";
        assert_eq!(sanitize_html(html), html);
    }

    // ==================== Text Conversion Tests ====================

    #[test]
    fn test_html_to_text_paragraphs() {
        let html = "<p>First   paragraph.</p><p>Second<br>line</p>";
        assert_eq!(html_to_text(html), "First paragraph.\n\nSecond\nline");
    }

    #[test]
    fn test_html_to_text_lists() {
        let html = "<ul><li>One</li><li>Two</li></ul>";
        assert_eq!(html_to_text(html), "- One\n- Two");
    }

    #[test]
    fn test_html_to_text_drops_scripts_and_inline_tags() {
        let html = "<p>A <em>keris</em> &amp; sheath</p><script>x()</script>";
        assert_eq!(html_to_text(html), "A keris & sheath");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("&lt;p&gt; &amp;&nbsp;&#39;&#x41;"), "<p> & 'A");
    }

    #[test]
    fn test_html_to_text_plain_input() {
        assert_eq!(html_to_text("Just text"), "Just text");
        assert_eq!(html_to_text(""), "");
    }

    // ==================== Property Tests ====================

    proptest! {
        #[test]
        fn prop_escaped_text_has_no_markup(s in ".*") {
            let escaped = escape_html(&s);
            prop_assert!(!escaped.contains('<'));
            prop_assert!(!escaped.contains('>'));
            prop_assert!(!escaped.contains('"'));
        }

        #[test]
        fn prop_escape_then_text_roundtrips(s in "[a-zA-Z0-9<>&\"']{0,40}") {
            prop_assert_eq!(html_to_text(&escape_html(&s)), s);
        }

        #[test]
        fn prop_sanitized_html_has_no_script_or_handler(
            s in "(<|>|script|SCRIPT|/| |a|img|onload=x|\")*"
        ) {
            let cleaned = sanitize_html(&s).to_lowercase();
            let handler_in_tag = regex::Regex::new(r"<[^>]*onload").unwrap();
            prop_assert!(!cleaned.contains("<script"));
            prop_assert!(!handler_in_tag.is_match(&cleaned));
        }
    }
}
