use sqlx::SqlitePool;
use lugat_backend::config::AppConfig;
use lugat_backend::corpus::SqliteCorpus;
use lugat_backend::similarity::SimilarityEngine;

/// Shared handler state / Ortak uygulama durumu
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    /// Word access used by the similarity engine / Benzerlik motoru için kelime erişimi
    pub corpus: SqliteCorpus,
    pub engine: SimilarityEngine,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        let engine = SimilarityEngine::new(config.similarity.clone());
        Self {
            corpus: SqliteCorpus::new(db.clone()),
            db,
            config,
            engine,
        }
    }
}
