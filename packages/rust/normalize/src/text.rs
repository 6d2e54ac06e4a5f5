//! Visible-text extraction.

use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{Html, Selector};

/// Collect the visible text under `<body>`: every line trimmed, the trimmed
/// lines joined without a separator.
///
/// Script and style subtrees and comment nodes contribute nothing. The
/// output has no paragraph breaks; the translation stage does its own
/// segmentation.
pub fn visible_text(doc: &Html) -> String {
    let body = Selector::parse("body").unwrap();
    let mut raw = String::new();
    match doc.select(&body).next() {
        Some(el) => collect(*el, &mut raw),
        None => collect(doc.tree.root(), &mut raw),
    }
    raw.lines().map(str::trim).collect()
}

fn collect(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text),
            Node::Element(el) if el.name() == "script" || el.name() == "style" => {}
            Node::Element(_) => collect(child, out),
            // Comments, doctypes, processing instructions.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(html: &str) -> String {
        visible_text(&Html::parse_document(html))
    }

    #[test]
    fn trims_lines_and_joins_without_separator() {
        let html = "<html><body>  Hello \n World </body></html>";
        assert_eq!(text_of(html), "HelloWorld");
    }

    #[test]
    fn skips_script_and_style_subtrees() {
        let html = r#"<html><body>
            <style>.hidden { display: none; }</style>
            <p>Visible</p>
            <script>var tracked = true;</script>
        </body></html>"#;
        assert_eq!(text_of(html), "Visible");
    }

    #[test]
    fn skips_comments() {
        let html = "<html><body><!-- chrome -->Shown<!-- more chrome --></body></html>";
        assert_eq!(text_of(html), "Shown");
    }

    #[test]
    fn head_text_is_not_content() {
        let html = "<html><head><title>Guide</title></head><body>Body only</body></html>";
        assert_eq!(text_of(html), "Body only");
    }

    #[test]
    fn walks_nested_elements_in_document_order() {
        let html = "<html><body><div><p>First</p><div><span>Second</span></div></div>Third</body></html>";
        assert_eq!(text_of(html), "FirstSecondThird");
    }
}
