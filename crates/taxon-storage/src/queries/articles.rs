// SPDX-FileCopyrightText: 2026 Taxon Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Article import, fetch and category write-back.

use rusqlite::params;
use taxon_core::{ArticleRecord, NewArticle, TaxonError};

use crate::database::{map_tr_err, Database};

/// Insert an article unless its URL is already stored.
///
/// Returns the new row id, or `None` for a duplicate URL.
pub async fn insert_article(
    db: &Database,
    article: &NewArticle,
) -> Result<Option<i64>, TaxonError> {
    let article = article.clone();
    db.connection()
        .call(move |conn| -> Result<Option<i64>, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO articles (short_title, url, source, summary, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    article.short_title,
                    article.url,
                    article.source,
                    article.summary,
                    article.content,
                ],
            )?;
            Ok((inserted > 0).then(|| conn.last_insert_rowid()))
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch up to `limit` articles with `id > after_id`, ordered by id.
pub async fn fetch_articles(
    db: &Database,
    after_id: i64,
    limit: usize,
    only_uncategorized: bool,
) -> Result<Vec<ArticleRecord>, TaxonError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    db.connection()
        .call(move |conn| -> Result<Vec<ArticleRecord>, rusqlite::Error> {
            let sql = if only_uncategorized {
                "SELECT id, short_title, summary, content, category
                 FROM articles
                 WHERE id > ?1 AND (category IS NULL OR category = '')
                 ORDER BY id ASC
                 LIMIT ?2"
            } else {
                "SELECT id, short_title, summary, content, category
                 FROM articles
                 WHERE id > ?1
                 ORDER BY id ASC
                 LIMIT ?2"
            };
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params![after_id, limit], |row| {
                Ok(ArticleRecord {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    summary: row.get(2)?,
                    content: row.get(3)?,
                    category: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Record the rendered category for an article and stamp the time.
pub async fn set_category(db: &Database, article_id: i64, category: &str) -> Result<(), TaxonError> {
    let category = category.to_string();
    let now = chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();
    let updated = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute(
                "UPDATE articles SET category = ?1, categorized_at = ?2 WHERE id = ?3",
                params![category, now, article_id],
            )
        })
        .await
        .map_err(map_tr_err)?;

    if updated == 0 {
        return Err(TaxonError::Storage {
            source: format!("article {article_id} not found").into(),
        });
    }
    Ok(())
}

/// Article counts per stored category, most frequent first.
pub async fn category_counts(db: &Database) -> Result<Vec<(String, i64)>, TaxonError> {
    db.connection()
        .call(|conn| -> Result<Vec<(String, i64)>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT COALESCE(NULLIF(category, ''), '(pending)') AS c, COUNT(*)
                 FROM articles
                 GROUP BY c
                 ORDER BY COUNT(*) DESC, c ASC",
            )?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
