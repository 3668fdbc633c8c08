//! `lemma;pos;definition` word lists / CSV kelime listeleri

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;

use super::{clear_words, insert_word, ImportReport, NewWord};

/// Rows written per transaction / İşlem başına satır
const BATCH_SIZE: usize = 500;

/// Parse one data row; `None` when lemma or definition is missing
/// / Bir satırı çözümle
///
/// Only the first two separators split fields, so definitions may contain `;`.
pub fn parse_csv_line(line: &str) -> Option<NewWord> {
    let mut parts = line.splitn(3, ';');
    let lemma = parts.next()?.trim();
    let pos = parts.next()?.trim();
    let definition = parts.next()?.trim();

    if lemma.is_empty() || definition.is_empty() {
        return None;
    }

    Some(NewWord {
        lemma: lemma.to_string(),
        pos: (!pos.is_empty()).then(|| pos.to_string()),
        origin: None,
        definition: definition.to_string(),
    })
}

async fn write_batch(pool: &SqlitePool, batch: &mut Vec<NewWord>, report: &mut ImportReport) -> Result<()> {
    if batch.is_empty() {
        return Ok(());
    }
    let mut tx = pool.begin().await?;
    for word in batch.drain(..) {
        match insert_word(&mut tx, &word).await {
            Ok(_) => report.imported += 1,
            Err(e) => {
                tracing::debug!("Skipping {}: {}", word.lemma, e);
                report.skipped += 1;
            }
        }
    }
    tx.commit().await?;
    Ok(())
}

/// Import a semicolon separated word list; the first line is a header
/// / Noktalı virgülle ayrılmış listeyi içe aktar
pub async fn import_csv(pool: &SqlitePool, path: &Path, replace: bool) -> Result<ImportReport> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if replace {
        let mut conn = pool.acquire().await?;
        clear_words(&mut conn).await?;
    }

    let lines: Vec<&str> = content
        .lines()
        .skip(1)
        .filter(|l| !l.trim().is_empty())
        .collect();
    tracing::info!("CSV import: {} rows in {}", lines.len(), path.display());

    let mut report = ImportReport::default();
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for line in lines {
        match parse_csv_line(line) {
            Some(word) => batch.push(word),
            None => report.skipped += 1,
        }
        if batch.len() >= BATCH_SIZE {
            write_batch(pool, &mut batch, &mut report).await?;
            if report.imported % 10_000 == 0 {
                tracing::info!("CSV import progress: {} words", report.imported);
            }
        }
    }
    write_batch(pool, &mut batch, &mut report).await?;

    tracing::info!(
        "CSV import finished: {} imported, {} skipped",
        report.imported,
        report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::test_pool;

    #[test]
    fn test_parse_csv_line() {
        let word = parse_csv_line(" ahenk ; isim ; Uyum, düzen. ").unwrap();
        assert_eq!(word.lemma, "ahenk");
        assert_eq!(word.pos.as_deref(), Some("isim"));
        assert_eq!(word.definition, "Uyum, düzen.");

        let word = parse_csv_line("el;;Kol; bilek ve parmaklar").unwrap();
        assert!(word.pos.is_none());
        assert_eq!(word.definition, "Kol; bilek ve parmaklar");

        assert!(parse_csv_line("ahenk;isim").is_none());
        assert!(parse_csv_line(";isim;tanım").is_none());
        assert!(parse_csv_line("ahenk;isim;  ").is_none());
    }

    #[tokio::test]
    async fn test_import_csv() {
        let pool = test_pool().await;
        sqlx::query("INSERT INTO words (lemma, lemma_ascii, definition) VALUES ('eski', 'eski', 'x')")
            .execute(&pool)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        std::fs::write(
            &path,
            "madde;tur;anlam\nahenk;isim;Uyum, düzen.\n\nçiçek;isim;Bitki organı.\nbozuk;;\n",
        )
        .unwrap();

        let report = import_csv(&pool, &path, false).await.unwrap();
        assert_eq!(report, ImportReport { imported: 2, skipped: 1 });
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 3);

        let report = import_csv(&pool, &path, true).await.unwrap();
        assert_eq!(report.imported, 2);
        let lemmas: Vec<(String, String)> = sqlx::query_as("SELECT lemma, lemma_ascii FROM words ORDER BY lemma_ascii")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(
            lemmas,
            vec![("ahenk".to_string(), "ahenk".to_string()), ("çiçek".to_string(), "cicek".to_string())]
        );
    }

    #[tokio::test]
    async fn test_import_csv_missing_file() {
        let pool = test_pool().await;
        let err = import_csv(&pool, Path::new("/nonexistent/words.csv"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
