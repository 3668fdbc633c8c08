//! Fill in missing part of speech and origin from the TDK dictionary
//! / Eksik sözcük türü ve köken bilgisini TDK'dan tamamla

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::time::Duration;

use crate::tdk::{parse_lookup_response, TdkMetadata};

/// Enrichment settings / Tamamlama ayarları
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichOptions {
    /// Lookup endpoint, queried with `?ara=<lemma>` / Sorgu adresi
    pub endpoint: String,
    /// Parallel requests / Eşzamanlı istek sayısı
    pub concurrency: usize,
    /// Updates written per transaction / İşlem başına güncelleme
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl Default for EnrichOptions {
    fn default() -> Self {
        Self {
            endpoint: "https://sozluk.gov.tr/gts".to_string(),
            concurrency: 100,
            batch_size: 500,
            timeout_secs: 8,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EnrichReport {
    pub total: usize,
    pub updated: usize,
    pub not_found: usize,
}

/// Where word metadata comes from / Bilgi kaynağı
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// `None` when the word is unknown or the lookup failed
    async fn lookup(&self, lemma: &str) -> Option<TdkMetadata>;
}

/// Online TDK `/gts` client / Çevrimiçi TDK istemcisi
pub struct TdkClient {
    client: reqwest::Client,
    endpoint: String,
}

impl TdkClient {
    pub fn new(options: &EnrichOptions) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(options.timeout_secs))
            .pool_max_idle_per_host(options.concurrency)
            .user_agent(concat!("lugat-backend/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: options.endpoint.clone(),
        })
    }
}

#[async_trait]
impl MetadataSource for TdkClient {
    async fn lookup(&self, lemma: &str) -> Option<TdkMetadata> {
        let response = match self.client.get(&self.endpoint).query(&[("ara", lemma)]).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!("TDK lookup failed for {}: {}", lemma, e);
                return None;
            }
        };
        let body = response.text().await.ok()?;
        parse_lookup_response(&body)
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct PendingWord {
    id: i64,
    lemma: String,
    pos: Option<String>,
    origin: Option<String>,
}

#[derive(Debug, Clone)]
struct MetadataUpdate {
    id: i64,
    pos: Option<String>,
    origin: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

impl PendingWord {
    /// Existing values win; only blanks are filled / Var olan değerler korunur
    fn merge(&self, found: TdkMetadata) -> Option<MetadataUpdate> {
        if found.pos.is_none() && found.origin.is_none() {
            return None;
        }
        Some(MetadataUpdate {
            id: self.id,
            pos: if is_blank(&self.pos) { found.pos } else { self.pos.clone() },
            origin: if is_blank(&self.origin) { found.origin } else { self.origin.clone() },
        })
    }
}

async fn flush(pool: &SqlitePool, updates: &mut Vec<MetadataUpdate>) -> Result<()> {
    if updates.is_empty() {
        return Ok(());
    }
    let mut tx = pool.begin().await?;
    for update in updates.drain(..) {
        sqlx::query("UPDATE words SET pos = ?, origin = ? WHERE id = ?")
            .bind(&update.pos)
            .bind(&update.origin)
            .bind(update.id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}

/// Look up every word lacking pos or origin and store what is found
/// / Türü veya kökeni eksik kelimeleri tamamla
pub async fn enrich_metadata<S>(pool: &SqlitePool, source: &S, options: &EnrichOptions) -> Result<EnrichReport>
where
    S: MetadataSource + ?Sized,
{
    let words: Vec<PendingWord> = sqlx::query_as(
        "SELECT id, lemma, pos, origin FROM words
         WHERE (pos IS NULL OR pos = '' OR origin IS NULL OR origin = '')
         ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut report = EnrichReport {
        total: words.len(),
        ..Default::default()
    };
    tracing::info!("Enriching metadata for {} words", report.total);

    let batch_size = options.batch_size.max(1);
    let mut pending = Vec::with_capacity(batch_size);
    let mut completed = 0usize;

    let mut lookups = stream::iter(words)
        .map(|word| async move {
            let found = source.lookup(&word.lemma).await;
            (word, found)
        })
        .buffer_unordered(options.concurrency.max(1));

    while let Some((word, found)) = lookups.next().await {
        completed += 1;
        match found.and_then(|meta| word.merge(meta)) {
            Some(update) => {
                pending.push(update);
                report.updated += 1;
            }
            None => report.not_found += 1,
        }

        if pending.len() >= batch_size {
            flush(pool, &mut pending).await?;
        }
        if completed % 1000 == 0 {
            tracing::info!("Enrich progress: {}/{} (updated {})", completed, report.total, report.updated);
        }
    }
    flush(pool, &mut pending).await?;

    tracing::info!(
        "Enrich finished: {} updated, {} not found",
        report.updated,
        report.not_found
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use std::collections::HashMap;

    struct FixedSource(HashMap<&'static str, TdkMetadata>);

    #[async_trait]
    impl MetadataSource for FixedSource {
        async fn lookup(&self, lemma: &str) -> Option<TdkMetadata> {
            self.0.get(lemma).cloned()
        }
    }

    #[tokio::test]
    async fn test_enrich_fills_only_blanks() {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        for (lemma, pos, origin) in [
            ("ahenk", None, Some("Farsça")),
            ("umut", Some(""), None),
            ("gönül", Some("isim"), Some("Türkçe")),
            ("xyz", None, None),
        ] {
            sqlx::query("INSERT INTO words (lemma, lemma_ascii, pos, origin, definition) VALUES (?, ?, ?, ?, 'x')")
                .bind(lemma)
                .bind(lemma)
                .bind(pos)
                .bind(origin)
                .execute(&pool)
                .await
                .unwrap();
        }

        let source = FixedSource(HashMap::from([
            ("ahenk", TdkMetadata { pos: Some("isim".into()), origin: Some("Arapça".into()) }),
            ("umut", TdkMetadata { pos: Some("isim".into()), origin: None }),
        ]));
        let options = EnrichOptions { batch_size: 1, concurrency: 2, ..Default::default() };
        let report = enrich_metadata(&pool, &source, &options).await.unwrap();

        assert_eq!(report, EnrichReport { total: 3, updated: 2, not_found: 1 });

        let rows: Vec<(String, Option<String>, Option<String>)> =
            sqlx::query_as("SELECT lemma, pos, origin FROM words ORDER BY id")
                .fetch_all(&pool)
                .await
                .unwrap();
        assert_eq!(rows[0], ("ahenk".into(), Some("isim".into()), Some("Farsça".into())));
        assert_eq!(rows[1], ("umut".into(), Some("isim".into()), None));
        assert_eq!(rows[2], ("gönül".into(), Some("isim".into()), Some("Türkçe".into())));
        assert_eq!(rows[3], ("xyz".into(), None, None));
    }
}
