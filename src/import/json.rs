//! JSON array word lists / JSON kelime dizileri

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::path::Path;

use super::{insert_word, ImportReport, NewWord};

#[derive(Debug, Deserialize)]
struct JsonWord {
    #[serde(default)]
    lemma: Option<String>,
    #[serde(default)]
    pos: Option<String>,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    definition: Option<String>,
}

impl JsonWord {
    /// Missing pos and definition become empty strings / Eksik alanlar boş kalır
    fn into_new_word(self) -> Option<NewWord> {
        let lemma = self.lemma.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())?;
        Some(NewWord {
            lemma,
            pos: Some(self.pos.unwrap_or_default()),
            origin: self.origin.filter(|o| !o.trim().is_empty()),
            definition: self.definition.unwrap_or_default(),
        })
    }
}

/// Import `[{"lemma", "pos", "origin", "definition"}, ...]` in one transaction
/// / JSON dizisini tek işlemde içe aktar
pub async fn import_json(pool: &SqlitePool, path: &Path) -> Result<ImportReport> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let words: Vec<JsonWord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::info!("Read {} words from {}", words.len(), path.display());

    let mut report = ImportReport::default();
    let mut tx = pool.begin().await?;
    for word in words {
        let Some(word) = word.into_new_word() else {
            report.skipped += 1;
            continue;
        };
        insert_word(&mut tx, &word).await?;
        report.imported += 1;
        if report.imported % 1000 == 0 {
            tracing::info!("{} words processed...", report.imported);
        }
    }
    tx.commit().await?;

    tracing::info!("Successfully imported {} words", report.imported);
    Ok(report)
}
