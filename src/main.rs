use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod state;

use lugat_backend::{config, db, enrich, import};
use state::AppState;

/// Turkish dictionary backend / Türkçe sözlük sunucusu
#[derive(Parser, Debug)]
#[command(name = "lugat-backend")]
#[command(version, about = "Turkish dictionary REST API and data tools", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API (default) / API sunucusunu çalıştır
    Serve,
    /// Replace all words with the built-in samples / Örnek kelimeleri yükle
    Seed,
    /// Import a JSON array of words / JSON dizisini içe aktar
    ImportJson {
        path: PathBuf,
    },
    /// Import a `lemma;pos;definition` list / CSV listesini içe aktar
    ImportCsv {
        path: PathBuf,
        /// Delete existing words first / Önce mevcut kelimeleri sil
        #[arg(long)]
        replace: bool,
    },
    /// Import a TDK gts.json dump / TDK dökümünü içe aktar
    ImportGts {
        path: PathBuf,
        #[arg(long)]
        replace: bool,
    },
    /// Fill missing part of speech and origin from TDK / Eksik bilgileri TDK'dan tamamla
    EnrichMetadata,
}

/// Open the database, creating the data directory first / Veritabanını aç
async fn open_database(app_config: &config::AppConfig) -> anyhow::Result<SqlitePool> {
    let data_dir = app_config.get_data_dir();
    if !data_dir.exists() {
        std::fs::create_dir_all(&data_dir)?;
        tracing::info!("Created data directory: {:?}", data_dir);
    }

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| app_config.get_database_url());

    let pool = db::connect(&database_url).await?;
    db::run_migrations(&pool).await?;
    Ok(pool)
}

async fn serve(pool: SqlitePool, app_config: config::AppConfig) -> anyhow::Result<()> {
    let bind_addr = app_config.get_bind_address();
    let state = Arc::new(AppState::new(pool, app_config));
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server running at http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lugat_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration / Yapılandırmayı yükle
    config::init_config().map_err(anyhow::Error::msg)?;
    let app_config = config::config();

    let pool = open_database(&app_config).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(pool, app_config).await?,
        Command::Seed => {
            import::seed(&pool).await?;
        }
        Command::ImportJson { path } => {
            let report = import::import_json(&pool, &path).await?;
            tracing::info!("Imported {} words, skipped {}", report.imported, report.skipped);
        }
        Command::ImportCsv { path, replace } => {
            import::import_csv(&pool, &path, replace).await?;
        }
        Command::ImportGts { path, replace } => {
            import::import_gts(&pool, &path, replace).await?;
        }
        Command::EnrichMetadata => {
            let client = enrich::TdkClient::new(&app_config.enrich)?;
            enrich::enrich_metadata(&pool, &client, &app_config.enrich).await?;
        }
    }

    Ok(())
}
