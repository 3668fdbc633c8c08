//! TDK `gts.json` dumps / TDK sözlük dökümü
//!
//! The dump holds one JSON entry per line, sometimes followed by a comma.
//! Lines are streamed so the file never has to fit in memory.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{clear_words, insert_word, ImportReport, NewWord};
use crate::tdk::TdkEntry;

/// Parse one dump line / Döküm satırını çözümle
///
/// `None` for blank lines, array brackets, unparsable JSON and entries
/// without a lemma or definition.
pub fn parse_gts_line(line: &str) -> Option<NewWord> {
    let line = line.trim();
    let line = line.strip_suffix(',').unwrap_or(line).trim_end();
    if line.is_empty() || line == "[" || line == "]" {
        return None;
    }

    let entry: TdkEntry = serde_json::from_str(line).ok()?;
    Some(NewWord {
        lemma: entry.lemma()?,
        definition: entry.first_definition()?,
        pos: entry.first_property(),
        origin: entry.origin(),
    })
}

/// Stream a TDK dump into the database in one transaction / TDK dökümünü içe aktar
pub async fn import_gts(pool: &SqlitePool, path: &Path, replace: bool) -> Result<ImportReport> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut tx = pool.begin().await?;
    if replace {
        clear_words(&mut tx).await?;
    }

    let mut report = ImportReport::default();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_gts_line(&line) {
            Some(word) => {
                insert_word(&mut tx, &word).await?;
                report.imported += 1;
                if report.imported % 10_000 == 0 {
                    tracing::info!("GTS import progress: {} words", report.imported);
                }
            }
            None => report.skipped += 1,
        }
    }
    tx.commit().await?;

    tracing::info!(
        "GTS import finished: {} imported, {} skipped",
        report.imported,
        report.skipped
    );
    Ok(report)
}
