use std::path::Path;

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, params_from_iter, Row};
use tokio_rusqlite::Connection;

use crate::error::Result;
use crate::models::StoredArticle;

use super::schema::SCHEMA;

/// Dates are stored as midnight timestamps, e.g. "2022-01-01 00:00:00".
const STORED_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct Repository {
    conn: Connection,
}

impl Repository {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref()).await?;
        let repository = Self { conn };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().await?;
        let repository = Self { conn };
        repository.ensure_schema().await?;
        Ok(repository)
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.execute_batch(SCHEMA)?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    pub async fn list_all(&self) -> Result<Vec<StoredArticle>> {
        let articles = self
            .conn
            .call(|conn| {
                let mut stmt =
                    conn.prepare("SELECT id, date, title, url FROM articles ORDER BY id")?;
                let articles = stmt
                    .query_map([], article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    pub async fn exists_by_url(&self, url: &str) -> Result<bool> {
        let url = url.to_string();
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM articles WHERE url = ?1",
                    params![url],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Appends one row and commits it. The id is assigned by SQLite as
    /// max(id) + 1, which is count + 1 while the table is compacted.
    pub async fn insert(&self, date: NaiveDate, title: &str, url: &str) -> Result<i64> {
        let date = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.format(STORED_DATE_FORMAT).to_string())
            .unwrap_or_default();
        let title = title.to_string();
        let url = url.to_string();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO articles (date, title, url) VALUES (?1, ?2, ?3)",
                    params![date, title, url],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        Ok(id)
    }

    #[allow(dead_code)]
    pub async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists = self
            .conn
            .call(move |conn| {
                let count: i64 = conn.query_row(
                    "SELECT COUNT(*) FROM articles WHERE id = ?1",
                    params![id],
                    |row| row.get(0),
                )?;
                Ok(count > 0)
            })
            .await?;
        Ok(exists)
    }

    /// Rows whose id is in `ids`, ordered by id. Unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<StoredArticle>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        let articles = self
            .conn
            .call(move |conn| {
                let placeholders = vec!["?"; ids.len()].join(", ");
                let sql = format!(
                    "SELECT id, date, title, url FROM articles WHERE id IN ({placeholders}) ORDER BY id"
                );
                let mut stmt = conn.prepare(&sql)?;
                let articles = stmt
                    .query_map(params_from_iter(ids.iter()), article_from_row)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                Ok(articles)
            })
            .await?;
        Ok(articles)
    }

    /// Removes one row and commits it. Returns whether a row was removed.
    pub async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .call(move |conn| {
                let removed = conn.execute("DELETE FROM articles WHERE id = ?1", params![id])?;
                Ok(removed > 0)
            })
            .await?;
        Ok(removed)
    }

    /// Renumbers every row so the ids become exactly `1..=count`, keeping the
    /// current ascending order. Returns how many rows changed id.
    ///
    /// Walking ids in ascending order means every target id is either the
    /// row's own id or one already vacated, so the primary key never collides.
    pub async fn compact_ids(&self) -> Result<usize> {
        let renumbered = self
            .conn
            .call(|conn| {
                let tx = conn.transaction()?;
                let ids = {
                    let mut stmt = tx.prepare("SELECT id FROM articles ORDER BY id")?;
                    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
                    rows.collect::<std::result::Result<Vec<_>, _>>()?
                };

                let mut renumbered = 0;
                for (new_id, old_id) in (1_i64..).zip(ids) {
                    if new_id != old_id {
                        tx.execute(
                            "UPDATE articles SET id = ?1 WHERE id = ?2",
                            params![new_id, old_id],
                        )?;
                        renumbered += 1;
                    }
                }
                tx.commit()?;
                Ok(renumbered)
            })
            .await?;
        Ok(renumbered)
    }
}

fn parse_stored_date(s: &str) -> Option<NaiveDate> {
    // Timestamp format first (e.g., "2022-01-01 00:00:00")
    if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(s, STORED_DATE_FORMAT) {
        return Some(dt.date());
    }
    // Plain date (e.g., "2022-01-01")
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn article_from_row(row: &Row) -> rusqlite::Result<StoredArticle> {
    let raw_date: String = row.get(1)?;
    let date = parse_stored_date(&raw_date).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            Type::Text,
            format!("unrecognized stored date {raw_date:?}").into(),
        )
    })?;

    Ok(StoredArticle {
        id: row.get(0)?,
        date,
        title: row.get(2)?,
        url: row.get(3)?,
    })
}
