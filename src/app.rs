use std::collections::BTreeSet;

use crate::cli::Mode;
use crate::config::Config;
use crate::db::Repository;
use crate::display::{print_json, TerminalConsole};
use crate::error::Result;
use crate::homepage::{extract, HomepageFetcher};
use crate::models::ArticleRecord;
use crate::workflow;

pub struct App {
    config: Config,
    repository: Repository,
    fetcher: HomepageFetcher,
    console: TerminalConsole,
}

impl App {
    /// Opens the store. Failing to open it is fatal.
    pub async fn new(config: Config) -> Result<Self> {
        let repository = Repository::open(config.resolve_db_path()?).await?;
        let fetcher = HomepageFetcher::new(&config)?;

        Ok(Self {
            config,
            repository,
            fetcher,
            console: TerminalConsole::new(),
        })
    }

    pub async fn run(&mut self, mode: Mode, json: bool) -> Result<()> {
        match mode {
            Mode::New => {
                let articles = self.latest_articles().await?;
                if json {
                    print_json(&articles)?;
                } else {
                    self.console.show_scrape(&articles);
                }
            }

            Mode::List => {
                let rows = self.repository.list_all().await?;
                if json {
                    print_json(&rows)?;
                } else {
                    self.console.show_stored(&rows);
                }
            }

            Mode::Add(ids) => {
                let requested: BTreeSet<i64> = ids.into_iter().collect();
                let latest = self.latest_articles().await?;
                let report =
                    workflow::sync(&requested, &latest, &self.repository, &mut self.console)
                        .await?;
                tracing::info!(
                    inserted = report.inserted(),
                    not_found = ?report.not_found,
                    already_stored = ?report.already_stored,
                    duplicates = ?report.duplicates,
                    "Add finished"
                );
            }

            Mode::Delete(ids) => {
                let requested: BTreeSet<i64> = ids.into_iter().collect();
                let report =
                    workflow::purge(&requested, &self.repository, &mut self.console).await?;
                tracing::info!(
                    deleted = report.deleted(),
                    not_in_store = ?report.not_in_store,
                    "Delete finished"
                );
            }
        }

        Ok(())
    }

    /// Scrape the homepage. A failed fetch is logged and reads as an empty
    /// listing.
    async fn latest_articles(&self) -> Result<Vec<ArticleRecord>> {
        let url = self.config.homepage()?;
        match self.fetcher.fetch(&url).await {
            Ok(markup) => Ok(extract(&markup)),
            Err(e) => {
                tracing::warn!(error = %e, %url, "Failed to fetch homepage");
                Ok(Vec::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::homepage::testing::{serve_once, unreachable};
    use crate::workflow::testing::ScriptedConsole;
    use crate::workflow::Outcome;

    async fn app_for(homepage: &url::Url, dir: &tempfile::TempDir) -> App {
        let config = Config {
            db_path: Some(dir.path().join("articles.db").to_string_lossy().to_string()),
            homepage_url: homepage.to_string(),
            timeout_secs: Some(5),
            ..Config::default()
        };
        App::new(config).await.unwrap()
    }

    #[tokio::test]
    async fn test_unreachable_homepage_reads_as_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(&unreachable(), &dir).await;

        let latest = app.latest_articles().await.unwrap();
        assert!(latest.is_empty());

        let mut console = ScriptedConsole::answering(&["y"]);
        let requested: BTreeSet<i64> = [1, 2].into_iter().collect();
        let report = workflow::sync(&requested, &latest, &app.repository, &mut console)
            .await
            .unwrap();

        assert_eq!(report.not_found, vec![1, 2]);
        assert_eq!(report.outcome, Outcome::NothingToDo);
        assert_eq!(console.questions, 0);
        assert!(app.repository.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_error_status_reads_as_empty_listing() {
        let dir = tempfile::tempdir().unwrap();
        let url = serve_once("500 Internal Server Error", "<h2 class=\"home-title\">x</h2>").await;
        let app = app_for(&url, &dir).await;

        assert!(app.latest_articles().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_served_homepage_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"<h2 class="home-title">Patch now</h2>
            <div class="item-label">&#xe802;January 09, 2022&#xe804;The Hacker News</div>
            <a class="story-link" href="https://example.com/patch.html">read</a>"#;
        let url = serve_once("200 OK", body).await;
        let app = app_for(&url, &dir).await;

        let latest = app.latest_articles().await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].title, "Patch now");
        assert_eq!(latest[0].published_date, "January 09, 2022");
    }

    #[tokio::test]
    async fn test_older_store_opens_only_when_named() {
        let dir = tempfile::tempdir().unwrap();
        let old_store = dir.path().join("the_haker_news.db");
        let conn = rusqlite::Connection::open(&old_store).unwrap();
        conn.execute_batch(
            "CREATE TABLE articles (id INTEGER PRIMARY KEY, date TIMESTAMP, title TEXT, url TEXT);
             INSERT INTO articles (date, title, url) VALUES ('2022-01-09 00:00:00', 'Patch now', 'patch.html');",
        )
        .unwrap();
        drop(conn);

        assert_ne!(Config::default().db_path_in(dir.path()), old_store);

        let config = Config {
            db_path: Some(old_store.to_string_lossy().to_string()),
            homepage_url: unreachable().to_string(),
            ..Config::default()
        };
        let app = App::new(config).await.unwrap();

        let rows = app.repository.list_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].url, "patch.html");
        assert_eq!(rows[0].display_date(), "January 09, 2022");
    }
}
