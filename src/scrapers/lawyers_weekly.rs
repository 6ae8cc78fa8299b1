//! Lawyers Weekly news via its RSS feed.
//!
//! The feed is taken in publication order as served; entries are not
//! re-sorted. `pubDate` is preserved verbatim as `published`.

use super::MAX_ITEMS_PER_SOURCE;
use crate::error::FetchError;
use crate::feed::parse_entries;
use crate::models::Candidate;

/// The first five feed entries.
pub fn candidates(xml: &str) -> Result<Vec<Candidate>, FetchError> {
    let mut entries = parse_entries(xml)?;
    entries.truncate(MAX_ITEMS_PER_SOURCE);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::models::Source;
    use crate::scrapers::extract;

    fn feed(items: usize) -> String {
        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"><channel><title>Lawyers Weekly</title>"#,
        );
        for i in 1..=items {
            xml.push_str(&format!(
                "<item><title>Story {i}</title>\
                 <link>https://www.lawyersweekly.com.au/news/{i}</link>\
                 <pubDate>Mon, 0{i} Oct 2023 09:00:00 +1100</pubDate>\
                 <description>Summary {i}</description></item>"
            ));
        }
        xml.push_str("</channel></rss>");
        xml
    }

    #[test]
    fn test_takes_first_five_in_feed_order() {
        let entries = candidates(&feed(8)).unwrap();
        assert_eq!(entries.len(), 5);
        let titles: Vec<_> = entries.iter().filter_map(|e| e.title.as_deref()).collect();
        assert_eq!(titles, ["Story 1", "Story 2", "Story 3", "Story 4", "Story 5"]);
    }

    #[test]
    fn test_fewer_entries_are_not_padded() {
        assert_eq!(candidates(&feed(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_items_carry_published_and_summary() {
        let config = PipelineConfig::defaults().unwrap();
        let spec = config.spec(Source::LawyersWeekly).unwrap();

        let items = extract(spec, &feed(1)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, Source::LawyersWeekly);
        assert_eq!(items[0].title, "Story 1");
        assert_eq!(items[0].link, "https://www.lawyersweekly.com.au/news/1");
        assert_eq!(
            items[0].published.as_deref(),
            Some("Mon, 01 Oct 2023 09:00:00 +1100")
        );
        assert_eq!(items[0].summary.as_deref(), Some("Summary 1"));
        assert_eq!(items[0].date, None);
    }

    #[test]
    fn test_entry_without_optional_fields_is_kept() {
        let config = PipelineConfig::defaults().unwrap();
        let spec = config.spec(Source::LawyersWeekly).unwrap();
        let xml = "<rss><channel><item><title>Bare</title><link>/news/bare</link></item></channel></rss>";

        let items = extract(spec, xml).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://www.lawyersweekly.com.au/news/bare");
        assert_eq!(items[0].published, None);
        assert_eq!(items[0].summary, None);
    }

    #[test]
    fn test_unparsable_feed_fails() {
        assert!(matches!(
            candidates("<rss><channel><item></channel>"),
            Err(FetchError::Feed(_))
        ));
    }
}
