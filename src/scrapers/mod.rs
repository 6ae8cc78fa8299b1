//! Source adapters: turning one fetched document into that source's items.
//!
//! Each submodule knows the markup of exactly one outlet and exposes
//! `candidates(body)`, which returns at most [`MAX_ITEMS_PER_SOURCE`] raw
//! [`Candidate`]s in document order. [`extract`] dispatches on the source
//! and runs every candidate through the normalizer.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Anchor structure |
//! |--------|--------|--------|------------------|
//! | Lawyers Weekly | [`lawyers_weekly`] | RSS/Atom feed | first 5 entries |
//! | AustLII | [`austlii`] | HTML scraping | first 5 `<a>` in the first `<pre>` |
//! | Federal Court | [`federal_court`] | HTML scraping | `table.judgments-table tbody tr` |
//! | Law Society NSW | [`law_society`] | HTML scraping | `.news-article` blocks |
//!
//! A page without the expected container yields no candidates; that is a
//! valid "nothing listed right now" result, not a failure. Only the feed
//! adapter can fail at this stage (unparsable XML).

pub mod austlii;
pub mod federal_court;
pub mod law_society;
pub mod lawyers_weekly;

use crate::config::SourceSpec;
use crate::error::FetchError;
use crate::models::{Candidate, ContentItem, Source};
use crate::normalize::normalize;
use crate::utils::truncate_for_log;
use scraper::ElementRef;
use tracing::debug;

/// Cap on items taken from any single source per call.
pub const MAX_ITEMS_PER_SOURCE: usize = 5;

/// Extract and normalize the items of `spec.source` from a fetched body.
///
/// # Arguments
///
/// * `spec` - The source the body came from, with its link rule
/// * `body` - The raw page or feed text as fetched
///
/// # Returns
///
/// Up to [`MAX_ITEMS_PER_SOURCE`] items in document order. Candidates
/// without a title or link are dropped. Errors only when the Lawyers Weekly
/// body is not a parsable feed.
pub fn extract(spec: &SourceSpec, body: &str) -> Result<Vec<ContentItem>, FetchError> {
    let candidates = match spec.source {
        Source::LawyersWeekly => lawyers_weekly::candidates(body).inspect_err(|e| {
            debug!(error = %e, preview = %truncate_for_log(body, 300), "Feed body did not parse");
        })?,
        Source::AustLii => austlii::candidates(body),
        Source::FederalCourt => federal_court::candidates(body),
        Source::LawSocietyNsw => law_society::candidates(body),
    };

    let found = candidates.len();
    let links = spec.link_rule();
    let items: Vec<ContentItem> = candidates
        .into_iter()
        .filter_map(|candidate: Candidate| normalize(spec.source, candidate, &links))
        .collect();

    debug!(
        source = %spec.source,
        found,
        kept = items.len(),
        "Extracted items"
    );
    Ok(items)
}

/// All text beneath `element`, concatenated in document order.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
