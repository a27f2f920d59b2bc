use std::collections::{BTreeSet, HashSet};

use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::ArticleRecord;

use super::{confirm, Console, Notice, Outcome, Pending};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Requested source ids missing from the latest scrape, ascending.
    pub not_found: Vec<i64>,
    /// Source ids whose url is already stored.
    pub already_stored: Vec<usize>,
    /// Source ids sharing a url with an earlier selected article.
    pub duplicates: Vec<usize>,
    pub outcome: Outcome,
}

impl SyncReport {
    pub fn inserted(&self) -> usize {
        self.outcome.changed()
    }
}

/// Store the requested articles of the latest scrape, skipping urls that are
/// already saved, after the user confirms.
///
/// Inserts commit one at a time. An undecodable date stops the batch at that
/// record with [`AppError::MalformedDate`]; rows inserted before it remain.
pub async fn sync<C: Console + ?Sized>(
    requested: &BTreeSet<i64>,
    latest_scrape: &[ArticleRecord],
    repo: &Repository,
    console: &mut C,
) -> Result<SyncReport> {
    let mut already_stored = Vec::new();
    let mut duplicates = Vec::new();
    let mut candidates: Vec<ArticleRecord> = Vec::new();
    let mut candidate_urls = HashSet::new();

    for record in latest_scrape
        .iter()
        .filter(|r| requested.contains(&source_key(r.source_id)))
    {
        if repo.exists_by_url(&record.url).await? {
            console.notice(Notice::AlreadyStored(record));
            already_stored.push(record.source_id);
        } else if candidate_urls.insert(record.url.as_str()) {
            candidates.push(record.clone());
        } else {
            tracing::debug!(source_id = record.source_id, url = %record.url, "Url listed twice on the homepage");
            console.notice(Notice::DuplicateInListing(record));
            duplicates.push(record.source_id);
        }
    }

    let listed: HashSet<i64> = latest_scrape
        .iter()
        .map(|r| source_key(r.source_id))
        .collect();
    let not_found: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|id| !listed.contains(id))
        .collect();
    if !not_found.is_empty() {
        console.notice(Notice::NotInListing(&not_found));
    }

    if candidates.is_empty() {
        console.notice(Notice::NothingToAdd);
        return Ok(SyncReport {
            not_found,
            already_stored,
            duplicates,
            outcome: Outcome::NothingToDo,
        });
    }

    console.show_pending(Pending::Insert(&candidates));
    if !confirm(console)? {
        console.notice(Notice::NoneAdded);
        return Ok(SyncReport {
            not_found,
            already_stored,
            duplicates,
            outcome: Outcome::Declined,
        });
    }

    let mut inserted = 0;
    for record in &candidates {
        let date = record.parse_date().ok_or_else(|| AppError::MalformedDate {
            source_id: record.source_id,
            text: record.published_date.clone(),
        })?;
        let id = repo.insert(date, &record.title, &record.url).await?;
        tracing::debug!(id, source_id = record.source_id, "Stored article");
        inserted += 1;
    }
    tracing::info!(inserted, "Sync finished");
    console.notice(Notice::Added(inserted));

    Ok(SyncReport {
        not_found,
        already_stored,
        duplicates,
        outcome: Outcome::Applied(inserted),
    })
}

/// Requested ids come from the command line as signed integers, so negative
/// ids simply never match.
fn source_key(source_id: usize) -> i64 {
    i64::try_from(source_id).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::testing::ScriptedConsole;

    fn listing(n: usize) -> Vec<ArticleRecord> {
        (1..=n)
            .map(|i| ArticleRecord {
                source_id: i,
                published_date: "January 01, 2022".to_string(),
                title: format!("test{i}"),
                url: format!("test{i}.html"),
            })
            .collect()
    }

    fn ids(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    async fn stored_urls(repo: &Repository) -> Vec<String> {
        repo.list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.url)
            .collect()
    }

    #[tokio::test]
    async fn test_adds_one_article() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut console = ScriptedConsole::answering(&["y"]);

        let report = sync(&ids(&[1]), &listing(5), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.inserted(), 1);
        let rows = repo.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
        assert_eq!(rows[0].title, "test1");
        assert_eq!(rows[0].display_date(), "January 01, 2022");
    }

    #[tokio::test]
    async fn test_known_and_unknown_ids_in_one_request() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut console = ScriptedConsole::answering(&["y"]);

        let report = sync(&ids(&[2, 4, 9]), &listing(5), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.outcome, Outcome::Applied(2));
        assert_eq!(report.not_found, vec![9]);
        assert_eq!(stored_urls(&repo).await, vec!["test2.html", "test4.html"]);
        assert_eq!(console.shown, vec![vec!["test2.html", "test4.html"]]);
        assert!(console
            .notices
            .contains(&"Article #9 not in the homepage articles list.".to_string()));
    }

    #[tokio::test]
    async fn test_rerun_inserts_nothing() {
        let repo = Repository::open_in_memory().await.unwrap();
        let requested = ids(&[1, 3, 4]);

        let mut console = ScriptedConsole::answering(&["yes"]);
        sync(&requested, &listing(5), &repo, &mut console)
            .await
            .unwrap();

        let mut console = ScriptedConsole::answering(&["yes"]);
        let report = sync(&requested, &listing(5), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.outcome, Outcome::NothingToDo);
        assert_eq!(report.already_stored, vec![1, 3, 4]);
        assert_eq!(console.questions, 0);
        assert_eq!(console.notices.last().unwrap(), "No article to be added.");
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_dedup_is_by_url_only() {
        let repo = Repository::open_in_memory().await.unwrap();
        let date = chrono::NaiveDate::from_ymd_opt(2020, 5, 5).unwrap();
        repo.insert(date, "different title", "test2.html")
            .await
            .unwrap();

        let mut console = ScriptedConsole::answering(&["y"]);
        let report = sync(&ids(&[2, 3]), &listing(3), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.already_stored, vec![2]);
        assert_eq!(report.inserted(), 1);
        assert_eq!(stored_urls(&repo).await, vec!["test2.html", "test3.html"]);
    }

    #[tokio::test]
    async fn test_declining_changes_nothing() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut console = ScriptedConsole::answering(&["hmm", "N"]);

        let report = sync(&ids(&[1, 2]), &listing(5), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.outcome, Outcome::Declined);
        assert_eq!(report.inserted(), 0);
        assert_eq!(console.questions, 2);
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_scrape_reports_every_id() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut console = ScriptedConsole::default();

        let report = sync(&ids(&[3, 1]), &[], &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.not_found, vec![1, 3]);
        assert_eq!(report.outcome, Outcome::NothingToDo);
        assert_eq!(console.questions, 0);
    }

    #[tokio::test]
    async fn test_malformed_date_stops_batch_at_that_record() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut scrape = listing(3);
        scrape[1].published_date = "yesterday".to_string();
        let mut console = ScriptedConsole::answering(&["y"]);

        let err = sync(&ids(&[1, 2, 3]), &scrape, &repo, &mut console)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MalformedDate { source_id: 2, .. }));
        assert_eq!(stored_urls(&repo).await, vec!["test1.html"]);
    }

    #[tokio::test]
    async fn test_same_url_twice_in_listing_is_stored_once() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut scrape = listing(2);
        scrape[1].url = scrape[0].url.clone();
        let mut console = ScriptedConsole::answering(&["y"]);

        let report = sync(&ids(&[1, 2]), &scrape, &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.inserted(), 1);
        assert_eq!(report.duplicates, vec![2]);
        assert_eq!(stored_urls(&repo).await, vec!["test1.html"]);
        assert!(console.notices.contains(
            &"Article #2 has the same link as an article already selected".to_string()
        ));
        assert_eq!(console.shown, vec![vec!["test1.html"]]);
    }

    #[tokio::test]
    async fn test_negative_and_zero_ids_are_not_in_listing() {
        let repo = Repository::open_in_memory().await.unwrap();
        let mut console = ScriptedConsole::answering(&["y"]);

        let report = sync(&ids(&[-3, 0, 1]), &listing(2), &repo, &mut console)
            .await
            .unwrap();

        assert_eq!(report.not_found, vec![-3, 0]);
        assert_eq!(report.inserted(), 1);
        assert!(console
            .notices
            .contains(&"Article #-3 #0 not in the homepage articles list.".to_string()));
    }
}
