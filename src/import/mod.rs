//! Bulk loading of dictionary entries / Toplu kelime yükleme
//!
//! Sources / Kaynaklar:
//! - Built-in sample entries for a fresh install / Örnek kayıtlar
//! - JSON array of words / JSON dizisi
//! - `lemma;pos;definition` CSV exports / CSV dosyaları
//! - TDK `gts.json` dumps, one entry per line / TDK dökümü

pub mod csv;
pub mod gts;
pub mod json;
pub mod seed;

pub use csv::import_csv;
pub use gts::import_gts;
pub use json::import_json;
pub use seed::seed;

use anyhow::Result;
use serde::Serialize;
use sqlx::SqliteConnection;

use crate::text::ascii_fold;

/// Outcome of an import run / İçe aktarma sonucu
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// A parsed entry ready to insert / Eklenmeye hazır kayıt
#[derive(Debug, Clone, PartialEq)]
pub struct NewWord {
    pub lemma: String,
    pub pos: Option<String>,
    pub origin: Option<String>,
    pub definition: String,
}

/// Insert one word, filling `lemma_ascii` / Kelimeyi ekle
pub(crate) async fn insert_word(conn: &mut SqliteConnection, word: &NewWord) -> Result<i64> {
    let result = sqlx::query(
        "INSERT INTO words (lemma, lemma_ascii, origin, pos, definition) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&word.lemma)
    .bind(ascii_fold(&word.lemma))
    .bind(&word.origin)
    .bind(&word.pos)
    .bind(&word.definition)
    .execute(&mut *conn)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Remove every word and example / Tüm kelimeleri sil
pub(crate) async fn clear_words(conn: &mut SqliteConnection) -> Result<()> {
    sqlx::query("DELETE FROM examples").execute(&mut *conn).await?;
    let removed = sqlx::query("DELETE FROM words").execute(&mut *conn).await?;
    tracing::info!("Cleared {} existing words", removed.rows_affected());
    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> sqlx::SqlitePool {
    let pool = crate::db::connect("sqlite::memory:").await.unwrap();
    crate::db::run_migrations(&pool).await.unwrap();
    pool
}
