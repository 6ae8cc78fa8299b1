//! AustLII recent Federal Court of Australia judgments.
//!
//! The database listing is a plain `<pre>` block of links. Only the first
//! `<pre>` on the page is considered, and only its first five anchors.
//! Hrefs are site-relative (`/cgi-bin/viewdb/...`) and are resolved against
//! the AustLII base authority by the normalizer.

use super::{MAX_ITEMS_PER_SOURCE, element_text};
use crate::models::Candidate;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static PRE: Lazy<Selector> = Lazy::new(|| Selector::parse("pre").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

pub fn candidates(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let Some(pre) = document.select(&PRE).next() else {
        return Vec::new();
    };

    pre.select(&ANCHOR)
        .take(MAX_ITEMS_PER_SOURCE)
        .map(|a| Candidate {
            title: Some(element_text(a)),
            href: a.value().attr("href").map(String::from),
            ..Candidate::default()
        })
        .collect()
}
