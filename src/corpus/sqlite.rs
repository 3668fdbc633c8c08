use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashSet;

use super::{WordCorpus, WordRecord};
use crate::error::CorpusError;

const RECORD_COLUMNS: &str = "SELECT id, lemma, definition, pos, origin FROM words";

/// Corpus backed by the `words` table / `words` tablosu üzerinde sözlük
///
/// SQLite's LOWER() only folds ASCII letters, so case-insensitive matching of
/// Turkish capitals (Ç, Ş, Ö...) is limited to what the stored data allows.
#[derive(Clone)]
pub struct SqliteCorpus {
    db: SqlitePool,
}

impl SqliteCorpus {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl WordCorpus for SqliteCorpus {
    async fn get_by_id(&self, id: i64) -> Result<Option<WordRecord>, CorpusError> {
        let record = sqlx::query_as::<_, WordRecord>(&format!("{} WHERE id = ?", RECORD_COLUMNS))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(record)
    }

    async fn scan_sample(
        &self,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(RECORD_COLUMNS);
        if !exclude_ids.is_empty() {
            builder.push(" WHERE id NOT IN (");
            let mut separated = builder.separated(", ");
            for id in exclude_ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        builder.push(" ORDER BY id LIMIT ");
        builder.push_bind(limit as i64);

        let records = builder
            .build_query_as::<WordRecord>()
            .fetch_all(&self.db)
            .await?;
        Ok(records)
    }

    async fn find_by_exact_definition(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        let records = sqlx::query_as::<_, WordRecord>(&format!(
            "{} WHERE LOWER(definition) = LOWER(?) ORDER BY id LIMIT ?",
            RECORD_COLUMNS
        ))
        .bind(text)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn find_by_lemma(&self, text: &str, limit: usize) -> Result<Vec<WordRecord>, CorpusError> {
        let records = sqlx::query_as::<_, WordRecord>(&format!(
            "{} WHERE LOWER(lemma) = LOWER(?) ORDER BY id LIMIT ?",
            RECORD_COLUMNS
        ))
        .bind(text)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }

    async fn find_by_definition_substring(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError> {
        // instr() instead of LIKE so that % and _ in the lemma stay literal
        let records = sqlx::query_as::<_, WordRecord>(&format!(
            "{} WHERE instr(LOWER(definition), LOWER(?)) > 0 ORDER BY id LIMIT ?",
            RECORD_COLUMNS
        ))
        .bind(text)
        .bind(limit as i64)
        .fetch_all(&self.db)
        .await?;
        Ok(records)
    }
}
