use serde::{Deserialize, Serialize};

use crate::corpus::WordRecord;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Word {
    pub id: i64,
    pub lemma: String,
    pub lemma_ascii: String,
    pub origin: Option<String>,
    pub pos: Option<String>,
    pub definition: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Example {
    pub sentence: String,
    pub author: Option<String>,
}

/// Word as returned by the API / API'nin döndürdüğü kelime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordView {
    pub id: i64,
    pub lemma: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lemma_ascii: Option<String>,
    pub pos: Option<String>,
    pub origin: Option<String>,
    /// Primary sense / Birincil anlam
    pub definition: String,
    pub definitions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<Example>>,
}

/// Split a stored definition into its senses / Kayıtlı tanımı anlamlarına ayır
///
/// Multi-sense entries are stored as a JSON array of strings; anything else is
/// a single plain-text sense.
pub fn split_definitions(stored: &str) -> Vec<String> {
    if stored.trim_start().starts_with('[') {
        if let Ok(senses) = serde_json::from_str::<Vec<String>>(stored) {
            if !senses.is_empty() {
                return senses;
            }
        }
    }
    vec![stored.to_string()]
}

/// First sense of a stored definition / Tanımın ilk anlamı
pub fn primary_definition(stored: &str) -> String {
    split_definitions(stored)
        .into_iter()
        .next()
        .unwrap_or_default()
}

impl WordView {
    fn build(
        id: i64,
        lemma: String,
        lemma_ascii: Option<String>,
        pos: Option<String>,
        origin: Option<String>,
        stored_definition: &str,
    ) -> Self {
        let definitions = split_definitions(stored_definition);
        let definition = definitions.first().cloned().unwrap_or_default();
        Self {
            id,
            lemma,
            lemma_ascii,
            pos,
            origin,
            definition,
            definitions,
            examples: None,
        }
    }

    pub fn with_examples(mut self, examples: Vec<Example>) -> Self {
        self.examples = Some(examples);
        self
    }
}

impl From<Word> for WordView {
    fn from(word: Word) -> Self {
        WordView::build(
            word.id,
            word.lemma,
            Some(word.lemma_ascii),
            word.pos,
            word.origin,
            &word.definition,
        )
    }
}

impl From<WordRecord> for WordView {
    fn from(record: WordRecord) -> Self {
        WordView::build(
            record.id,
            record.lemma,
            None,
            record.pos,
            record.origin,
            &record.definition,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExampleInput {
    pub sentence: String,
    #[serde(default)]
    pub author: Option<String>,
}

/// Create / update request body / Kelime ekleme ve güncelleme isteği
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordInput {
    #[serde(default)]
    pub lemma: Option<String>,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub definition: Option<String>,
    #[serde(default)]
    pub definitions: Option<Vec<String>>,
    #[serde(default)]
    pub examples: Option<Vec<ExampleInput>>,
}

impl WordInput {
    /// Non-blank lemma / Boş olmayan madde başı
    pub fn lemma(&self) -> Option<&str> {
        self.lemma.as_deref().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Definition text as it is stored in the `words` table / Saklanacak tanım
    ///
    /// Non-blank `definitions` win and are stored as a JSON array; otherwise the
    /// plain `definition` is used.
    pub fn stored_definition(&self) -> Option<String> {
        if let Some(definitions) = &self.definitions {
            let senses: Vec<&str> = definitions
                .iter()
                .map(|d| d.trim())
                .filter(|d| !d.is_empty())
                .collect();
            if !senses.is_empty() {
                return serde_json::to_string(&senses).ok();
            }
        }
        self.definition
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map(str::to_string)
    }

    /// Examples with a non-blank sentence / Cümlesi boş olmayan örnekler
    pub fn examples(&self) -> Vec<ExampleInput> {
        self.examples
            .iter()
            .flatten()
            .filter(|e| !e.sentence.trim().is_empty())
            .cloned()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if limit > 0 { (total + limit - 1) / limit } else { 0 };
        Self { total, page, limit, total_pages }
    }
}
