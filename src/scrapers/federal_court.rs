//! Federal Court of Australia judgments listing.
//!
//! Judgments are rows of `table.judgments-table`. The first five body rows
//! are considered; a row needs at least three cells or it is skipped.
//! Column one holds the title and the judgment link, column two the date.
//!
//! Links are joined onto the court's base with URL-reference rules, so a
//! page-relative href such as `judgment.aspx` resolves against the site root
//! just like `/judgments/...` does, and every published link is absolute.

use super::{MAX_ITEMS_PER_SOURCE, element_text};
use crate::models::Candidate;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

static ROWS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.judgments-table tbody tr").expect("static selector"));
static CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

const MIN_COLUMNS: usize = 3;

pub fn candidates(html: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    document
        .select(&ROWS)
        .take(MAX_ITEMS_PER_SOURCE)
        .filter_map(row_candidate)
        .collect()
}

fn row_candidate(row: ElementRef<'_>) -> Option<Candidate> {
    let cols: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cols.len() < MIN_COLUMNS {
        return None;
    }
    let (title_col, date_col) = (cols[0], cols[1]);
    Some(Candidate {
        title: Some(element_text(title_col)),
        href: title_col
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(String::from),
        date: Some(element_text(date_col)),
        ..Candidate::default()
    })
}
