use scraper::{ElementRef, Html, Selector};

use crate::models::ArticleRecord;

const TITLE_SELECTOR: &str = "h2.home-title";
const DATE_SELECTOR: &str = "div.item-label";
const LINK_SELECTOR: &str = "a.story-link";

/// Calendar icon placed in front of the date.
const DATE_ICON: char = '\u{e802}';
/// Author icon that follows the date; everything from here on is dropped.
const AUTHOR_ICON: char = '\u{e804}';

/// Extract the homepage article listing from raw markup.
///
/// Titles, date labels and story links are collected separately in document
/// order and zipped by position, so the result is as long as the shortest of
/// the three. Markup that contains none of them yields an empty listing.
pub fn extract(markup: &str) -> Vec<ArticleRecord> {
    let document = Html::parse_document(markup);

    let titles = select_all(&document, TITLE_SELECTOR);
    let dates = select_all(&document, DATE_SELECTOR);
    let links = select_all(&document, LINK_SELECTOR);

    let records: Vec<ArticleRecord> = titles
        .into_iter()
        .zip(dates)
        .zip(links)
        .enumerate()
        .map(|(i, ((title, date), link))| ArticleRecord {
            source_id: i + 1,
            published_date: clean_date(&element_text(date)),
            title: collapse_whitespace(&element_text(title)),
            url: link.value().attr("href").unwrap_or_default().to_string(),
        })
        .collect();

    tracing::debug!(count = records.len(), "Extracted homepage articles");
    records
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(e) => {
            tracing::error!(selector = css, error = %e, "Invalid selector");
            Vec::new()
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// "\u{e802}Jan 07, 2022\u{e804}The Hacker News" -> "Jan 07, 2022"
fn clean_date(label: &str) -> String {
    let before_author = label.split(AUTHOR_ICON).next().unwrap_or_default();
    before_author.replace(DATE_ICON, "").trim().to_string()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
