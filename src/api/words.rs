use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;

use lugat_backend::models::{Example, ExampleInput, Pagination, Word, WordInput, WordView};
use lugat_backend::text::{ascii_fold, lowercase};
use crate::api::{api_error, db_error, parse_id, ApiError};
use crate::auth::require_user;
use crate::state::AppState;

const WORD_COLUMNS: &str = "id, lemma, lemma_ascii, origin, pos, definition";

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

/// Query string of `GET /api/words`; numbers are parsed leniently
#[derive(Debug, Default, Deserialize)]
pub struct WordsQuery {
    #[serde(default)]
    search: Option<String>,
    #[serde(default)]
    random: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

fn positive_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

/// `%term%` with LIKE wildcards in the term escaped / LIKE kalıbı
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

async fn load_examples(db: &SqlitePool, word_id: i64) -> Vec<Example> {
    sqlx::query_as::<_, Example>("SELECT sentence, author FROM examples WHERE word_id = ? ORDER BY id ASC")
        .bind(word_id)
        .fetch_all(db)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!("Failed to load examples of word {}: {}", word_id, e);
            Vec::new()
        })
}

async fn insert_examples(conn: &mut SqliteConnection, word_id: i64, examples: &[ExampleInput]) -> Result<(), sqlx::Error> {
    for example in examples {
        sqlx::query("INSERT INTO examples (word_id, sentence, author) VALUES (?, ?, ?)")
            .bind(word_id)
            .bind(example.sentence.trim())
            .bind(example.author.as_deref().map(str::trim).filter(|a| !a.is_empty()))
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

/// Validated lemma and stored definition of a create/update body
fn validate(input: &WordInput) -> Result<(String, String), ApiError> {
    let lemma = input
        .lemma()
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Kelime (Lemma) boş bırakılamaz!"))?
        .to_string();
    let definition = input
        .stored_definition()
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "En az bir tanım girmelisiniz!"))?;
    Ok((lemma, definition))
}

/// GET /api/words - list, search or sample words / Kelime listesi
pub async fn list_words(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WordsQuery>,
) -> Result<Json<Value>, ApiError> {
    let page = positive_or(params.page.as_deref(), 1);
    let limit = positive_or(params.limit.as_deref(), DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
    let offset = (page - 1).saturating_mul(limit);
    let random = params.random.as_deref() == Some("true");
    let search = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (words, pagination) = if random {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;
        let words = sqlx::query_as::<_, Word>(&format!(
            "SELECT {} FROM words ORDER BY RANDOM() LIMIT ?",
            WORD_COLUMNS
        ))
        .bind(limit)
        .fetch_all(&state.db)
        .await
        .map_err(db_error)?;
        (words, Pagination::new(total, 1, limit))
    } else if let Some(search) = search {
        let term = like_pattern(search);
        let ascii_term = like_pattern(&ascii_fold(search));
        let starts_with = format!("{}%", lowercase(search));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM words WHERE lemma LIKE ? ESCAPE '\\' OR lemma_ascii LIKE ? ESCAPE '\\'",
        )
        .bind(&term)
        .bind(&ascii_term)
        .fetch_one(&state.db)
        .await
        .map_err(db_error)?;

        // Exact match first, then prefix match, then shorter lemmas / Önce tam eşleşme
        let words = sqlx::query_as::<_, Word>(&format!(
            "SELECT {} FROM words
             WHERE lemma LIKE ? ESCAPE '\\' OR lemma_ascii LIKE ? ESCAPE '\\'
             ORDER BY
                CASE WHEN lower(lemma) = lower(?) THEN 0 ELSE 1 END,
                CASE WHEN lower(lemma) LIKE ? THEN 0 ELSE 1 END,
                length(lemma) ASC
             LIMIT ? OFFSET ?",
            WORD_COLUMNS
        ))
        .bind(&term)
        .bind(&ascii_term)
        .bind(search)
        .bind(&starts_with)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await
        .map_err(db_error)?;
        (words, Pagination::new(total, page, limit))
    } else {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&state.db)
            .await
            .map_err(db_error)?;
        let words = sqlx::query_as::<_, Word>(&format!(
            "SELECT {} FROM words ORDER BY lemma ASC LIMIT ? OFFSET ?",
            WORD_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.db)
        .await
        .map_err(db_error)?;
        (words, Pagination::new(total, page, limit))
    };

    let data: Vec<WordView> = words.into_iter().map(WordView::from).collect();
    Ok(Json(json!({
        "data": data,
        "pagination": pagination
    })))
}

/// GET /api/words/random - one random word with examples / Rastgele kelime
pub async fn random_word(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let word = sqlx::query_as::<_, Word>(&format!(
        "SELECT {} FROM words ORDER BY RANDOM() LIMIT 1",
        WORD_COLUMNS
    ))
    .fetch_optional(&state.db)
    .await
    .map_err(db_error)?
    .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "No words found"))?;

    let examples = load_examples(&state.db, word.id).await;
    Ok(Json(json!(WordView::from(word).with_examples(examples))))
}

/// GET /api/words/:id - word detail / Kelime ayrıntısı
pub async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;

    let word = sqlx::query_as::<_, Word>(&format!("SELECT {} FROM words WHERE id = ?", WORD_COLUMNS))
        .bind(id)
        .fetch_optional(&state.db)
        .await
        .map_err(db_error)?
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, "Word not found"))?;

    let examples = load_examples(&state.db, word.id).await;
    Ok(Json(json!(WordView::from(word).with_examples(examples))))
}

/// POST /api/words - add a word / Kelime ekle
pub async fn create_word(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<WordInput>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &headers).await?;
    let (lemma, definition) = validate(&input)?;

    let duplicate: Option<i64> = sqlx::query_scalar("SELECT id FROM words WHERE lower(lemma) = lower(?)")
        .bind(&lemma)
        .fetch_optional(&state.db)
        .await
        .map_err(db_error)?;
    if let Some(existing) = duplicate {
        tracing::debug!("Duplicate lemma {} (id {})", lemma, existing);
        return Err(api_error(StatusCode::CONFLICT, "Bu kelime zaten mevcut!"));
    }

    let mut tx = state.db.begin().await.map_err(db_error)?;
    let result = sqlx::query(
        "INSERT INTO words (lemma, lemma_ascii, pos, origin, definition) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&lemma)
    .bind(ascii_fold(&lemma))
    .bind(&input.pos)
    .bind(&input.origin)
    .bind(&definition)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;
    let id = result.last_insert_rowid();

    insert_examples(&mut tx, id, &input.examples()).await.map_err(db_error)?;
    tx.commit().await.map_err(db_error)?;

    tracing::info!("Word {} ({}) created by {}", lemma, id, user.username);
    Ok(Json(json!({ "id": id, "message": "Word created" })))
}

/// PUT /api/words/:id - replace a word and its examples / Kelimeyi güncelle
pub async fn update_word(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<WordInput>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &headers).await?;
    let id = parse_id(&id)?;
    let (lemma, definition) = validate(&input)?;

    let mut tx = state.db.begin().await.map_err(db_error)?;
    let result = sqlx::query(
        "UPDATE words SET lemma = ?, lemma_ascii = ?, pos = ?, origin = ?, definition = ? WHERE id = ?",
    )
    .bind(&lemma)
    .bind(ascii_fold(&lemma))
    .bind(&input.pos)
    .bind(&input.origin)
    .bind(&definition)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(db_error)?;
    if result.rows_affected() == 0 {
        return Err(api_error(StatusCode::NOT_FOUND, "Word not found"));
    }

    sqlx::query("DELETE FROM examples WHERE word_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    insert_examples(&mut tx, id, &input.examples()).await.map_err(db_error)?;
    tx.commit().await.map_err(db_error)?;

    tracing::info!("Word {} updated by {}", id, user.username);
    Ok(Json(json!({ "message": "Word updated" })))
}

/// DELETE /api/words/:id - remove a word and its examples / Kelimeyi sil
pub async fn delete_word(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user = require_user(&state, &headers).await?;
    let id = parse_id(&id)?;

    let mut tx = state.db.begin().await.map_err(db_error)?;
    sqlx::query("DELETE FROM examples WHERE word_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    let result = sqlx::query("DELETE FROM words WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
    if result.rows_affected() == 0 {
        return Err(api_error(StatusCode::NOT_FOUND, "Word not found"));
    }
    tx.commit().await.map_err(db_error)?;

    tracing::info!("Word {} deleted by {}", id, user.username);
    Ok(Json(json!({ "message": "Word deleted" })))
}
