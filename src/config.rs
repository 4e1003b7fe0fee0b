//! Process configuration: bind address, upload directory, and inference
//! artifact paths, from `PAPERSORT_*` environment variables with defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

pub const APP_NAME: &str = "papersort";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> &'static str {
    "info,papersort=debug"
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Directory accepted uploads are stored in.
    pub upload_dir: PathBuf,
    /// Serialized ONNX classifier.
    pub model_path: PathBuf,
    /// Fitted TF-IDF vocabulary + IDF table (JSON).
    pub vectorizer_path: PathBuf,
    /// Ordered category names (JSON array).
    pub categories_path: PathBuf,
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// - `PAPERSORT_BIND` — socket address (default `127.0.0.1:8080`;
    ///   an unparseable value logs a warning and falls back)
    /// - `PAPERSORT_UPLOAD_DIR` — upload directory (default `uploads`)
    /// - `PAPERSORT_MODEL_DIR` — directory holding `classifier.onnx`,
    ///   `vectorizer.json`, and `categories.json` (default `models`)
    pub fn from_env() -> Self {
        let bind_addr = match std::env::var("PAPERSORT_BIND") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!(value = %raw, error = %e, "invalid PAPERSORT_BIND, using default");
                default_bind()
            }),
            Err(_) => default_bind(),
        };

        let upload_dir = std::env::var("PAPERSORT_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let model_dir = std::env::var("PAPERSORT_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("models"));

        Self {
            bind_addr,
            upload_dir,
            model_path: model_dir.join("classifier.onnx"),
            vectorizer_path: model_dir.join("vectorizer.json"),
            categories_path: model_dir.join("categories.json"),
        }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
