//! Data models shared by the source adapters, the aggregator and the endpoint.
//!
//! - [`Source`]: the tag identifying which outlet produced a record
//! - [`Candidate`]: a raw, source-specific record before normalization
//! - [`ContentItem`]: the unified record returned to API clients

use serde::{Deserialize, Serialize};
use std::fmt;

/// The outlets this service aggregates, in registration order.
///
/// The serialized form is the human-readable label clients already consume
/// (`"Lawyers Weekly"`, `"AustLII"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "Lawyers Weekly")]
    LawyersWeekly,
    #[serde(rename = "AustLII")]
    AustLii,
    #[serde(rename = "Federal Court")]
    FederalCourt,
    #[serde(rename = "Law Society NSW")]
    LawSocietyNsw,
}

impl Source {
    /// Every source, in the order their items appear in the aggregate.
    pub const ALL: [Source; 4] = [
        Source::LawyersWeekly,
        Source::AustLii,
        Source::FederalCourt,
        Source::LawSocietyNsw,
    ];

    /// Display label, identical to the serialized tag.
    pub fn label(&self) -> &'static str {
        match self {
            Source::LawyersWeekly => "Lawyers Weekly",
            Source::AustLii => "AustLII",
            Source::FederalCourt => "Federal Court",
            Source::LawSocietyNsw => "Law Society NSW",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A record as pulled out of a feed entry or an HTML fragment.
///
/// Nothing here is trusted yet: text may carry stray whitespace and `href`
/// may be relative. See [`crate::normalize::normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Candidate {
    pub title: Option<String>,
    pub href: Option<String>,
    pub published: Option<String>,
    pub date: Option<String>,
    pub summary: Option<String>,
}

/// One entry of the aggregated listing.
///
/// `source`, `title` and `link` are always present. The optional fields are
/// omitted from JSON when the source does not provide them:
/// - `published`: feed publication string, verbatim
/// - `date`: listing date text from the HTML sources, verbatim
/// - `summary`: feed summary (Lawyers Weekly only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub source: Source,
    pub title: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}
