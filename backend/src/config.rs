//! Runtime configuration from environment variables, with local-dev
//! defaults so the server starts without any setup.

use std::env;
use std::path::PathBuf;

/// Root directory for stored objects (template backgrounds, uploaded
/// assets, generated certificates). Served under `/files`.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env::var("CERT_DATA_DIR").unwrap_or_else(|_| "./data".to_string()))
}

pub fn db_path() -> PathBuf {
    PathBuf::from(env::var("CERT_DB_PATH").unwrap_or_else(|_| "./certengine.sqlite".to_string()))
}

/// Directory holding the TTF files used by the raster compositor and the
/// PDF exporter.
pub fn fonts_dir() -> PathBuf {
    PathBuf::from(env::var("CERT_FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()))
}

/// Base URL embedded into QR payloads and dispatch links.
pub fn public_base_url() -> String {
    env::var("CERT_PUBLIC_URL").unwrap_or_else(|_| format!("http://{}:{}", host(), port()))
}

pub fn host() -> String {
    env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
}

pub fn port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}
