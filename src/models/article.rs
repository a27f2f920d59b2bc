use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used on the homepage and when printing stored rows,
/// e.g. "January 07, 2022".
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

/// An article as found on the homepage during one scrape.
///
/// `source_id` is the 1-based position in that scrape only; it says nothing
/// about the article on the next scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub source_id: usize,
    pub published_date: String,
    pub title: String,
    pub url: String,
}

impl ArticleRecord {
    pub fn parse_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.published_date, DISPLAY_DATE_FORMAT).ok()
    }
}

/// A row of the `articles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArticle {
    pub id: i64,
    pub date: NaiveDate,
    pub title: String,
    pub url: String,
}

impl StoredArticle {
    pub fn display_date(&self) -> String {
        self.date.format(DISPLAY_DATE_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(date: &str) -> ArticleRecord {
        ArticleRecord {
            source_id: 1,
            published_date: date.to_string(),
            title: "t".to_string(),
            url: "t.html".to_string(),
        }
    }

    #[test]
    fn test_parse_homepage_date() {
        assert_eq!(
            record("January 07, 2022").parse_date(),
            NaiveDate::from_ymd_opt(2022, 1, 7)
        );
        assert_eq!(
            record("Mar 7, 2024").parse_date(),
            NaiveDate::from_ymd_opt(2024, 3, 7)
        );
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert_eq!(record("2022-01-07").parse_date(), None);
        assert_eq!(record("").parse_date(), None);
        assert_eq!(record("Smarch 01, 2022").parse_date(), None);
    }

    #[test]
    fn test_display_date_round_trips_homepage_format() {
        let row = StoredArticle {
            id: 1,
            date: NaiveDate::from_ymd_opt(2023, 11, 2).unwrap(),
            title: "t".to_string(),
            url: "t.html".to_string(),
        };
        assert_eq!(row.display_date(), "November 02, 2023");
    }
}
