use anyhow::Result;
use chrono::Utc;
use rand::Rng;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Generate random password / Rastgele parola üret
fn generate_random_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZabcdefghjkmnpqrstuvwxyz23456789!@#$%^&*";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Open the dictionary database / Sözlük veritabanını aç
///
/// In-memory databases get a single long-lived connection, since every new
/// connection would see an empty database.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let in_memory = database_url.contains(":memory:");
    let mut options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        options = options
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?
    };

    Ok(pool)
}

/// Run database migrations / Veritabanı şemasını oluştur
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            lemma TEXT NOT NULL,
            lemma_ascii TEXT NOT NULL,
            origin TEXT,
            pos TEXT,
            definition TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS examples (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_id INTEGER,
            sentence TEXT NOT NULL,
            author TEXT,
            FOREIGN KEY(word_id) REFERENCES words(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT DEFAULT 'admin',
            created_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token TEXT PRIMARY KEY,
            user_id INTEGER NOT NULL,
            expires_at INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_words_lemma_lower ON words(lower(lemma))")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_words_lemma_ascii ON words(lemma_ascii)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_examples_word_id ON examples(word_id)")
        .execute(pool)
        .await?;

    // Databases created before user timestamps existed / Zaman damgası olmayan eski tablolar
    let columns: Vec<(i32, String, String, i32, Option<String>, i32)> =
        sqlx::query_as("PRAGMA table_info(users)")
            .fetch_all(pool)
            .await?;
    let has_created_at = columns.iter().any(|(_, name, _, _, _, _)| name == "created_at");
    if !has_created_at {
        sqlx::query("ALTER TABLE users ADD COLUMN created_at TEXT")
            .execute(pool)
            .await?;
        tracing::info!("Migration: Added users.created_at column");
    }

    tracing::info!("Database migration completed");

    initialize_default_data(pool).await?;

    Ok(())
}

/// Create the default admin account on first start / İlk açılışta yönetici hesabı oluştur
async fn initialize_default_data(pool: &SqlitePool) -> Result<()> {
    let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    if user_count == 0 {
        let admin_password = generate_random_password(16);
        let password_hash = bcrypt::hash(&admin_password, bcrypt::DEFAULT_COST)?;
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT INTO users (username, password_hash, role, created_at) VALUES (?, ?, 'admin', ?)")
            .bind("admin")
            .bind(&password_hash)
            .bind(&now)
            .execute(pool)
            .await?;

        tracing::info!("============================================================");
        tracing::info!("Default admin account created:");
        tracing::info!("  Username: admin");
        tracing::info!("  Password: {}", admin_password);
        tracing::info!("WARNING: Please save the password, it is not shown again!");
        tracing::info!("============================================================");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_create_admin_once() {
        let pool = connect("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let users: Vec<(String, String)> = sqlx::query_as("SELECT username, role FROM users")
            .fetch_all(&pool)
            .await
            .unwrap();
        assert_eq!(users, vec![("admin".to_string(), "admin".to_string())]);
    }

    #[test]
    fn test_generate_random_password() {
        let pw = generate_random_password(16);
        assert_eq!(pw.chars().count(), 16);
        assert_ne!(pw, generate_random_password(16));
    }
}
