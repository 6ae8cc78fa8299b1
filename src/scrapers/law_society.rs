//! Law Society of NSW news.
//!
//! Each story is a `.news-article` block holding an `<h3>` heading, a link
//! and a `.date` element; blocks missing any of the three are skipped.
//! Links are used exactly as published.

use super::{MAX_ITEMS_PER_SOURCE, element_text};
use crate::models::Candidate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".news-article").expect("static selector"));
static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date").expect("static selector"));

pub fn candidates(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    document
        .select(&ARTICLE)
        .take(MAX_ITEMS_PER_SOURCE)
        .filter_map(article_candidate)
        .collect()
}

fn article_candidate(article: ElementRef<'_>) -> Option<Candidate> {
    let heading = article.select(&HEADING).next()?;
    let anchor = article.select(&ANCHOR).next()?;
    let date = article.select(&DATE).next()?;
    Some(Candidate {
        title: Some(element_text(heading)),
        href: anchor.value().attr("href").map(String::from),
        date: Some(element_text(date)),
        ..Candidate::default()
    })
}
