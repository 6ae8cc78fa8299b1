//! Minimal syndication feed reader built on `quick-xml`.
//!
//! Understands RSS 2.0, RSS 1.0 (RDF) and Atom well enough to pull the
//! title, link, publication string and summary of each entry. Values are
//! returned raw; trimming and link resolution happen in
//! [`crate::normalize`].

use crate::error::FetchError;
use crate::models::Candidate;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Which family of feed the root element announced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    /// `<rss>` and RSS 1.0 `<rdf:RDF>`: links are element text.
    Rss,
    /// `<feed>`: links are `href` attributes.
    Atom,
}

/// Entry-level elements we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    Guid,
    Published,
    Updated,
    Summary,
    Content,
}

impl Field {
    /// Classify a direct child of an entry by prefix and local name.
    ///
    /// Extension namespaces (`atom:`, `media:`, ...) never map onto core
    /// fields; only the Dublin Core dates and `content:encoded` are read.
    fn classify(dialect: Dialect, prefix: Option<&[u8]>, local: &[u8]) -> Option<Self> {
        match (prefix, local) {
            (None, b"title") => Some(Field::Title),
            (None, b"link") => Some(Field::Link),
            (None, b"guid") if dialect == Dialect::Rss => Some(Field::Guid),
            (None, b"pubDate" | b"published" | b"issued") => Some(Field::Published),
            (Some(b"dc" | b"dcterms"), b"date" | b"issued" | b"created") => Some(Field::Published),
            (None, b"updated" | b"modified") | (Some(b"dcterms"), b"modified") => {
                Some(Field::Updated)
            }
            (None, b"description" | b"summary") => Some(Field::Summary),
            (None, b"content") if dialect == Dialect::Atom => Some(Field::Content),
            (Some(b"content"), b"encoded") => Some(Field::Content),
            _ => None,
        }
    }
}

/// Split a qualified name into its prefix and local part.
fn split_qname(raw: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match raw.iter().position(|&b| b == b':') {
        Some(i) => (Some(&raw[..i]), &raw[i + 1..]),
        None => (None, raw),
    }
}

#[derive(Debug, Default)]
struct EntryBuilder {
    title: Option<String>,
    link: Option<String>,
    guid: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    summary: Option<String>,
    content: Option<String>,
}

impl EntryBuilder {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Guid => &mut self.guid,
            Field::Published => &mut self.published,
            Field::Updated => &mut self.updated,
            Field::Summary => &mut self.summary,
            Field::Content => &mut self.content,
        };
        // first occurrence wins
        if slot.is_none() && !value.trim().is_empty() {
            *slot = Some(value);
        }
    }

    /// Atom `<link href=".." rel="..">`. Only the alternate link counts.
    fn offer_link(&mut self, start: &BytesStart<'_>) {
        let href = attribute(start, b"href");
        let rel = attribute(start, b"rel");
        if let Some(href) = href {
            if rel.as_deref().is_none_or(|r| r == "alternate") {
                self.set(Field::Link, href);
            }
        }
    }

    fn finish(self) -> Candidate {
        Candidate {
            title: self.title,
            href: self.link.or(self.guid),
            published: self.published.or(self.updated),
            date: None,
            summary: self.summary.or(self.content),
        }
    }
}

fn attribute(start: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    start
        .attributes()
        .flatten()
        .find(|attr| attr.key.local_name().as_ref() == name)
        .map(|attr| decode(&attr.value))
}

/// An RSS `<guid>` is a permalink unless it says `isPermaLink="false"`.
fn is_permalink(start: &BytesStart<'_>) -> bool {
    attribute(start, b"isPermaLink").is_none_or(|v| v.trim() != "false")
}

fn decode(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match unescape(&text) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => text.into_owned(),
    }
}

/// Parse every entry of a feed document, in document order.
///
/// Fails when the XML is malformed or the root element is not `<rss>`,
/// `<feed>` or `<RDF>`. Entries missing fields are still returned.
///
/// RSS entries take their link from the text of `<link>`, falling back to
/// a permalink `<guid>`; Atom entries take it from the alternate `<link>`'s
/// `href`.
pub fn parse_entries(xml: &str) -> Result<Vec<Candidate>, FetchError> {
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut dialect: Option<Dialect> = None;

    let mut current: Option<EntryBuilder> = None;
    // element depth below the open entry; 0 means directly inside it
    let mut depth = 0usize;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            FetchError::Feed(format!("{e} (at byte {})", reader.buffer_position()))
        })?;

        match event {
            Event::Start(start) => {
                let Some(dialect) = dialect else {
                    dialect = Some(check_root(start.local_name().as_ref())?);
                    continue;
                };
                let qname = start.name();
                let (prefix, local) = split_qname(qname.as_ref());
                match current.as_mut() {
                    None if matches!(local, b"item" | b"entry") => {
                        current = Some(EntryBuilder::default());
                        depth = 0;
                    }
                    None => {}
                    Some(entry) => {
                        depth += 1;
                        if depth == 1 {
                            text.clear();
                            field = match Field::classify(dialect, prefix, local) {
                                Some(Field::Link) if dialect == Dialect::Atom => {
                                    entry.offer_link(&start);
                                    None
                                }
                                Some(Field::Guid) if !is_permalink(&start) => None,
                                other => other,
                            };
                        }
                    }
                }
            }
            Event::Empty(start) => {
                let Some(dialect) = dialect else {
                    dialect = Some(check_root(start.local_name().as_ref())?);
                    continue;
                };
                let qname = start.name();
                let (prefix, local) = split_qname(qname.as_ref());
                if let Some(entry) = current.as_mut() {
                    if depth == 0
                        && dialect == Dialect::Atom
                        && Field::classify(dialect, prefix, local) == Some(Field::Link)
                    {
                        entry.offer_link(&start);
                    }
                }
            }
            Event::End(_) => {
                if current.is_none() {
                    continue;
                }
                if depth == 0 {
                    if let Some(entry) = current.take() {
                        entries.push(entry.finish());
                    }
                    continue;
                }
                if depth == 1 {
                    if let (Some(f), Some(entry)) = (field.take(), current.as_mut()) {
                        entry.set(f, std::mem::take(&mut text));
                    }
                }
                depth -= 1;
            }
            Event::Text(t) if field.is_some() => text.push_str(&decode(&t)),
            Event::CData(c) if field.is_some() => text.push_str(&String::from_utf8_lossy(&c)),
            Event::GeneralRef(r) if field.is_some() => {
                let entity = format!("&{};", String::from_utf8_lossy(&r));
                text.push_str(&decode(entity.as_bytes()));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if dialect.is_none() {
        return Err(FetchError::Feed("document has no root element".to_string()));
    }
    Ok(entries)
}

fn check_root(name: &[u8]) -> Result<Dialect, FetchError> {
    match name {
        b"rss" | b"RDF" => Ok(Dialect::Rss),
        b"feed" => Ok(Dialect::Atom),
        other => Err(FetchError::Feed(format!(
            "root element <{}> is not an RSS or Atom feed",
            String::from_utf8_lossy(other)
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rss_items_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
  <channel>
    <title>Lawyers Weekly</title>
    <link>https://www.lawyersweekly.com.au</link>
    <atom:link href="https://www.lawyersweekly.com.au/rss" rel="self"/>
    <item>
      <title>First</title>
      <link>https://www.lawyersweekly.com.au/news/1</link>
      <pubDate>Mon, 02 Oct 2023 09:00:00 +1100</pubDate>
      <description><![CDATA[<p>First summary</p>]]></description>
    </item>
    <item>
      <title>Second</title>
      <link>https://www.lawyersweekly.com.au/news/2</link>
    </item>
  </channel>
</rss>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title.as_deref(), Some("First"));
        assert_eq!(
            entries[0].href.as_deref(),
            Some("https://www.lawyersweekly.com.au/news/1")
        );
        assert_eq!(
            entries[0].published.as_deref(),
            Some("Mon, 02 Oct 2023 09:00:00 +1100")
        );
        assert_eq!(entries[0].summary.as_deref(), Some("<p>First summary</p>"));
        assert_eq!(entries[1].title.as_deref(), Some("Second"));
        assert_eq!(entries[1].published, None);
        assert_eq!(entries[1].summary, None);
    }

    #[test]
    fn test_entities_are_decoded() {
        let xml = r#"<rss><channel><item>
            <title>Smith &amp; Jones merge</title>
            <link>https://example.com/?a=1&amp;b=2</link>
        </item></channel></rss>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("Smith & Jones merge"));
        assert_eq!(entries[0].href.as_deref(), Some("https://example.com/?a=1&b=2"));
    }

    #[test]
    fn test_atom_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Example</title>
  <link href="https://example.com/" rel="alternate"/>
  <entry>
    <title>Atom entry</title>
    <link rel="edit" href="https://example.com/edit/1"/>
    <link href="https://example.com/posts/1"/>
    <updated>2023-10-02T09:00:00Z</updated>
    <summary>Short</summary>
  </entry>
  <entry>
    <title type="html">Second</title>
    <link rel="alternate" href="https://example.com/posts/2"></link>
    <published>2023-10-01T09:00:00Z</published>
    <updated>2023-10-03T09:00:00Z</updated>
    <content type="html">Body text</content>
  </entry>
</feed>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].href.as_deref(), Some("https://example.com/posts/1"));
        assert_eq!(entries[0].published.as_deref(), Some("2023-10-02T09:00:00Z"));
        assert_eq!(entries[0].summary.as_deref(), Some("Short"));
        assert_eq!(entries[1].href.as_deref(), Some("https://example.com/posts/2"));
        assert_eq!(entries[1].published.as_deref(), Some("2023-10-01T09:00:00Z"));
        assert_eq!(entries[1].summary.as_deref(), Some("Body text"));
    }

    #[test]
    fn test_rdf_feed_with_dc_date() {
        let xml = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns="http://purl.org/rss/1.0/" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel><title>RDF</title></channel>
  <item>
    <title>RDF item</title>
    <link>https://example.com/rdf/1</link>
    <dc:date>2023-10-02</dc:date>
  </item>
</rdf:RDF>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].published.as_deref(), Some("2023-10-02"));
    }

    #[test]
    fn test_nested_markup_does_not_leak_between_fields() {
        let xml = r#"<feed><entry>
            <title>T</title>
            <content type="xhtml"><div><p>Para</p><title>inner</title></div></content>
            <link href="https://example.com/x"/>
        </entry></feed>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].title.as_deref(), Some("T"));
        assert!(entries[0].summary.as_deref().unwrap().contains("Para"));
        assert_eq!(entries[0].href.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn test_rss_link_ignores_extension_namespaces() {
        let xml = r#"<rss xmlns:atom="http://www.w3.org/2005/Atom"
    xmlns:media="http://search.yahoo.com/mrss/"><channel><item>
  <title>Amp</title>
  <atom:link href="https://amp.example/1"/>
  <link>https://example.com/1</link>
  <media:content url="https://cdn.example/1.jpg">
    <media:description>MEDIA</media:description>
  </media:content>
</item></channel></rss>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].href.as_deref(), Some("https://example.com/1"));
        assert_eq!(entries[0].summary, None);
    }

    #[test]
    fn test_content_encoded_backs_up_description() {
        let xml = r#"<rss xmlns:content="http://purl.org/rss/1.0/modules/content/"><channel>
<item><title>A</title><link>https://example.com/a</link>
  <content:encoded><![CDATA[<p>Full body</p>]]></content:encoded></item>
<item><title>B</title><link>https://example.com/b</link>
  <description>Short</description>
  <content:encoded>Long</content:encoded></item>
</channel></rss>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].summary.as_deref(), Some("<p>Full body</p>"));
        assert_eq!(entries[1].summary.as_deref(), Some("Short"));
    }

    #[test]
    fn test_permalink_guid_stands_in_for_link() {
        let xml = r#"<rss><channel>
<item><title>Guid only</title><guid isPermaLink="true">https://example.com/g/1</guid></item>
<item><title>Implicit</title><guid>https://example.com/g/2</guid></item>
<item><title>Opaque</title><guid isPermaLink="false">tag:example.com,2023:3</guid></item>
<item><title>Both</title><guid>https://example.com/g/4</guid><link>https://example.com/4</link></item>
</channel></rss>"#;

        let entries = parse_entries(xml).unwrap();
        assert_eq!(entries[0].href.as_deref(), Some("https://example.com/g/1"));
        assert_eq!(entries[1].href.as_deref(), Some("https://example.com/g/2"));
        assert_eq!(entries[2].href, None);
        assert_eq!(entries[3].href.as_deref(), Some("https://example.com/4"));
    }

    #[test]
    fn test_empty_channel() {
        let xml = "<rss><channel><title>Nothing</title></channel></rss>";
        assert!(parse_entries(xml).unwrap().is_empty());
    }

    #[test]
    fn test_html_page_is_not_a_feed() {
        let err = parse_entries("<html><body><p>Maintenance</p></body></html>").unwrap_err();
        assert!(matches!(err, FetchError::Feed(msg) if msg.contains("<html>")));
    }

    #[test]
    fn test_malformed_xml_fails() {
        let err = parse_entries("<rss><channel><item><title>x</item></channel></rss>").unwrap_err();
        assert!(matches!(err, FetchError::Feed(_)));
    }

    #[test]
    fn test_empty_document_fails() {
        assert!(matches!(parse_entries("   "), Err(FetchError::Feed(_))));
    }
}
