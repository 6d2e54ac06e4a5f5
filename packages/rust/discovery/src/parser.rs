//! Structural sitemap XML parsing.

use quick_xml::Reader;
use quick_xml::events::Event;

use docsweep_shared::{DocsweepError, Result};

/// Extract one location per sitemap entry.
///
/// Root indexes and service sitemaps share the same shape: the document
/// element's direct children are entries, and each entry's **first**
/// sub-element holds the URL text. The walk is structural rather than
/// tag-name based, so namespaced or unconventional markup resolves the same
/// way; later sub-elements (`lastmod`, `changefreq`, ...) are ignored.
///
/// Entries whose first sub-element is empty yield nothing. Malformed XML is
/// a parse error.
pub fn entry_locations(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut locations = Vec::new();
    let mut depth = 0usize;
    let mut entry_consumed = false;
    let mut capturing = false;
    let mut current = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                if depth == 3 && !entry_consumed {
                    capturing = true;
                    current.clear();
                }
            }
            Ok(Event::End(_)) => {
                if depth == 3 && capturing {
                    let location = current.trim();
                    if !location.is_empty() {
                        locations.push(location.to_string());
                    }
                    capturing = false;
                    entry_consumed = true;
                }
                if depth == 2 {
                    entry_consumed = false;
                }
                depth -= 1;
            }
            Ok(Event::Empty(_)) => {
                // A self-closing first sub-element carries no location.
                if depth == 2 && !entry_consumed {
                    entry_consumed = true;
                }
            }
            Ok(Event::Text(text)) if capturing => {
                let value = text
                    .unescape()
                    .map_err(|e| DocsweepError::parse(format!("sitemap XML: {e}")))?;
                current.push_str(&value);
            }
            Ok(Event::CData(data)) if capturing => {
                current.push_str(&String::from_utf8_lossy(&data));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(DocsweepError::parse(format!("sitemap XML: {e}"))),
        }
    }

    Ok(locations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_root_index() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
  <sitemap>
    <loc>https://docs.aws.amazon.com/s3/sitemap.xml</loc>
  </sitemap>
  <sitemap>
    <loc>https://docs.aws.amazon.com/ec2/sitemap.xml</loc>
  </sitemap>
</sitemapindex>"#;

        let locations = entry_locations(xml).expect("parse");
        assert_eq!(
            locations,
            vec![
                "https://docs.aws.amazon.com/s3/sitemap.xml",
                "https://docs.aws.amazon.com/ec2/sitemap.xml",
            ]
        );
    }

    #[test]
    fn first_sub_element_wins() {
        // lastmod precedes loc in the second entry: the walk takes whatever
        // comes first, matching the upstream sitemap layout assumption.
        let xml = r#"<urlset>
  <url>
    <loc>https://docs.aws.amazon.com/a.html</loc>
    <lastmod>2020-06-27</lastmod>
  </url>
  <url>
    <lastmod>2020-06-27</lastmod>
    <loc>https://docs.aws.amazon.com/b.html</loc>
  </url>
</urlset>"#;

        let locations = entry_locations(xml).expect("parse");
        assert_eq!(
            locations,
            vec!["https://docs.aws.amazon.com/a.html", "2020-06-27"]
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let xml =
            "<urlset><url><loc>\n    https://docs.aws.amazon.com/a.html\n  </loc></url></urlset>";
        let locations = entry_locations(xml).expect("parse");
        assert_eq!(locations, vec!["https://docs.aws.amazon.com/a.html"]);
    }

    #[test]
    fn unescapes_entities_and_cdata() {
        let xml = "<urlset>\
            <url><loc>https://docs.aws.amazon.com/a.html?x=1&amp;y=2</loc></url>\
            <url><loc><![CDATA[https://docs.aws.amazon.com/b.html]]></loc></url>\
        </urlset>";
        let locations = entry_locations(xml).expect("parse");
        assert_eq!(
            locations,
            vec![
                "https://docs.aws.amazon.com/a.html?x=1&y=2",
                "https://docs.aws.amazon.com/b.html",
            ]
        );
    }

    #[test]
    fn empty_entries_yield_nothing() {
        let xml = "<urlset><url><loc></loc></url><url><loc/></url></urlset>";
        let locations = entry_locations(xml).expect("parse");
        assert!(locations.is_empty());
    }

    #[test]
    fn empty_document_element_yields_nothing() {
        let locations = entry_locations("<sitemapindex></sitemapindex>").expect("parse");
        assert!(locations.is_empty());
    }

    #[test]
    fn malformed_xml_is_a_parse_error() {
        let result = entry_locations("<urlset><url><loc>https://x</url>");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse error"));
    }
}
