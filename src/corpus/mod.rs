//! Read-only word store accessors / Salt okunur kelime deposu
//!
//! The similarity engine only talks to a [`WordCorpus`]; how the words are
//! stored is up to the implementation:
//! - [`SqliteCorpus`]: queries the `words` table
//! - [`MemoryCorpus`]: a plain list of records, for fixtures and tests

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CorpusError;

pub use memory::MemoryCorpus;
pub use sqlite::SqliteCorpus;

/// Word as seen by the similarity engine / Benzerlik motorunun gördüğü kelime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct WordRecord {
    pub id: i64,
    pub lemma: String,
    /// Stored definition text (plain, or a JSON array of senses) / Kayıtlı tanım
    pub definition: String,
    pub pos: Option<String>,
    pub origin: Option<String>,
}

impl WordRecord {
    pub fn new(id: i64, lemma: &str, definition: &str) -> Self {
        Self {
            id,
            lemma: lemma.to_string(),
            definition: definition.to_string(),
            pos: None,
            origin: None,
        }
    }
}

/// Query shapes used by the similarity strategies / Benzerlik sorguları
///
/// Text comparisons are case-insensitive. Implementations never write.
#[async_trait]
pub trait WordCorpus: Send + Sync {
    /// Look up one word / Tek kelime getir
    async fn get_by_id(&self, id: i64) -> Result<Option<WordRecord>, CorpusError>;

    /// Up to `limit` words whose id is not in `exclude_ids`, in storage order
    async fn scan_sample(
        &self,
        exclude_ids: &HashSet<i64>,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError>;

    /// Words whose whole definition equals `text` / Tanımı tam olarak `text` olanlar
    async fn find_by_exact_definition(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError>;

    /// Words whose lemma equals `text` / Madde başı `text` olanlar
    async fn find_by_lemma(&self, text: &str, limit: usize) -> Result<Vec<WordRecord>, CorpusError>;

    /// Words whose definition contains `text` anywhere / Tanımında `text` geçenler
    async fn find_by_definition_substring(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<WordRecord>, CorpusError>;
}
