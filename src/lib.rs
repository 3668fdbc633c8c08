pub mod config;
pub mod corpus;
pub mod db;
pub mod error;
pub mod models;
pub mod similarity;
pub mod text;

// Offline tooling (CLI subcommands) / Komut satırı araçları
pub mod enrich;
pub mod import;
pub mod tdk;
