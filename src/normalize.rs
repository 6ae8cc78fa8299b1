//! Turning source-specific [`Candidate`]s into uniform [`ContentItem`]s.
//!
//! Titles are whitespace-collapsed and trimmed. Dates and summaries are only
//! trimmed, so `published`, `date` and any markup in `summary` keep the
//! source's own spacing. Links are resolved according to the source's
//! [`LinkRule`] and optional fields that come out empty are omitted. A candidate without a title or a usable link is
//! dropped, which is an ordinary outcome rather than an error.

use crate::models::{Candidate, ContentItem, Source};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// How a source's `href` values become the `link` of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkRule {
    /// Join relative hrefs onto this base authority; absolute hrefs pass through.
    Resolve(Url),
    /// Keep the href exactly as published.
    Verbatim,
}

impl LinkRule {
    pub fn apply(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        match self {
            LinkRule::Resolve(base) => base.join(href).ok().map(String::from),
            LinkRule::Verbatim => Some(href.to_string()),
        }
    }
}

/// Collapse runs of whitespace to single spaces and trim the ends.
pub fn clean_text(raw: &str) -> String {
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}

fn trimmed(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Normalize one candidate, or `None` if it lacks a title or link.
pub fn normalize(source: Source, candidate: Candidate, links: &LinkRule) -> Option<ContentItem> {
    let title = candidate
        .title
        .map(|t| clean_text(&t))
        .filter(|t| !t.is_empty())?;
    let link = candidate.href.as_deref().and_then(|href| links.apply(href))?;

    Some(ContentItem {
        source,
        title,
        link,
        published: trimmed(candidate.published),
        date: trimmed(candidate.date),
        summary: trimmed(candidate.summary),
    })
}
