use thiserror::Error;

/// Word store read failure / Kelime deposu okuma hatası
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corpus unavailable: {0}")]
    Unavailable(String),
}

/// Similarity lookup failure / Benzer kelime arama hatası
#[derive(Error, Debug)]
pub enum SimilarityError {
    #[error("Word not found: {0}")]
    NotFound(i64),

    #[error("Target lookup failed: {0}")]
    Corpus(#[from] CorpusError),
}
