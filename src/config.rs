//! Application configuration module / Uygulama yapılandırması
//!
//! Manages application configuration loaded from config.json
//! Creates default config file on first run / İlk çalıştırmada varsayılan dosya oluşturulur

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::enrich::EnrichOptions;
use crate::similarity::SimilarityOptions;

/// Global configuration instance / Genel yapılandırma örneği
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / Uygulama yapılandırması
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / Sunucu ayarları
    pub server: ServerConfig,
    /// Database configuration / Veritabanı ayarları
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    /// Similar word limits / Benzer kelime sınırları
    #[serde(default)]
    pub similarity: SimilarityOptions,
    /// TDK metadata enrichment / TDK bilgi tamamlama
    #[serde(default)]
    pub enrich: EnrichOptions,
}

/// Server configuration / Sunucu ayarları
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / Dinlenen adres
    pub host: String,
    /// Server port / Sunucu portu
    pub port: u16,
}

/// Database configuration / Veritabanı ayarları
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / Veri dizini
    pub data_dir: String,
    /// Database file (relative to data_dir) / Veritabanı dosyası
    pub db_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token lifetime / Oturum süresi
    pub session_ttl_hours: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "dictionary.db".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { session_ttl_hours: 7 * 24 }
    }
}

impl AppConfig {
    /// Get the full database URL / Veritabanı adresi
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / Veri dizini
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the server bind address / Sunucu bağlantı adresi
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / Yapılandırma dosyası yolu
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / Yapılandırmayı yükle
pub fn load_config() -> Result<AppConfig, String> {
    load_config_from(&get_config_path())
}

/// Load configuration from a specific path / Belirli bir dosyadan yükle
pub fn load_config_from(config_path: &Path) -> Result<AppConfig, String> {
    if config_path.exists() {
        let content = std::fs::read_to_string(config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config_to(&config, config_path)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / Yapılandırmayı kaydet
fn save_config_to(config: &AppConfig, config_path: &Path) -> Result<(), String> {
    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Initialize global configuration / Genel yapılandırmayı başlat
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>, String> {
    let config = load_config()?;

    let config_arc = Arc::new(RwLock::new(config));

    CONFIG.set(config_arc.clone())
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(config_arc)
}

/// Get a read-only snapshot of current config / Güncel yapılandırmanın kopyası
pub fn config() -> AppConfig {
    CONFIG
        .get()
        .map(|c| c.read().clone())
        .unwrap_or_default()
}
