//! Upload storage.
//!
//! Stored files are keyed by a generated UUID, never by the client
//! filename — concurrent uploads with identical names must not overwrite
//! each other. The original filename is used only for the extension gate
//! and for logging. Files persist after classification; this service does
//! not clean them up.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// True when the filename ends in `.pdf`, case-insensitively.
/// This is the only request-level gate; content validation belongs to
/// the PDF parser.
pub fn is_pdf_filename(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// Directory that accepted uploads are written into.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Open the store, creating the directory if absent.
    pub fn new(dir: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Write uploaded bytes to a freshly keyed file and return its path.
    pub fn save(&self, original_name: &str, bytes: &[u8]) -> Result<PathBuf, std::io::Error> {
        let path = self.dir.join(format!("{}.pdf", Uuid::new_v4()));
        std::fs::write(&path, bytes)?;

        tracing::debug!(
            original = %original_name,
            stored = %path.display(),
            size = bytes.len(),
            "upload stored"
        );

        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
