//! PDF text extraction via Google PDFium.
//!
//! Reads the native text layer only — no rendering, no OCR. PDFium
//! handles CIDFont encodings, embedded fonts, and form fields that
//! trip up lighter parsers.
//!
//! The extractor is stateless (`Send + Sync`). Each operation creates a
//! fresh `Pdfium` instance because the upstream type is `!Send`; the OS
//! caches `dlopen`/`LoadLibrary` calls, so repeat loads are near-free.

use std::path::Path;

use pdfium_render::prelude::*;
use tracing::debug;

use super::PipelineError;

/// How far into the file the `%PDF-` signature may legally appear.
const SIGNATURE_WINDOW: usize = 1024;

/// Extracts the concatenated text of every page, in page order.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path) -> Result<String, PipelineError>;
}

/// PDFium-backed extractor.
pub struct PdfiumExtractor;

impl PdfiumExtractor {
    /// Create a new extractor, verifying the PDFium library is loadable.
    ///
    /// Discovery order:
    /// 1. `PDFIUM_DYNAMIC_LIB_PATH` env var (explicit path to library file)
    /// 2. Alongside the running executable
    /// 3. System library search paths
    pub fn new() -> Result<Self, PipelineError> {
        // Verify library is loadable at construction time (fail-fast).
        let _ = load_pdfium()?;
        Ok(Self)
    }
}

impl TextExtractor for PdfiumExtractor {
    fn extract(&self, path: &Path) -> Result<String, PipelineError> {
        let bytes = std::fs::read(path)?;

        if !has_pdf_signature(&bytes) {
            return Err(PipelineError::PdfParse(
                "missing %PDF- signature".to_string(),
            ));
        }

        let pdfium = load_pdfium()?;
        // Document handle is scoped to this call; dropped after reading
        // whether or not extraction succeeds.
        let document = pdfium
            .load_pdf_from_byte_slice(&bytes, None)
            .map_err(map_load_error)?;

        let page_count = document.pages().len();
        let mut pages = Vec::with_capacity(page_count as usize);

        for page in document.pages().iter() {
            let text = page.text().map(|t| t.all()).unwrap_or_default();
            pages.push(text);
        }

        let full_text = pages.join("\n");

        debug!(
            path = %path.display(),
            pages = page_count,
            text_length = full_text.len(),
            "extracted PDF text layer"
        );

        Ok(full_text)
    }
}

/// Check for the `%PDF-` header within the legal signature window.
/// Cheap first-stage parse validation; PDFium's loader remains the
/// final authority on whether the bytes are a usable document.
pub fn has_pdf_signature(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(SIGNATURE_WINDOW)];
    window.windows(5).any(|w| w == b"%PDF-")
}

/// Load the PDFium dynamic library.
///
/// Discovery order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` env var (explicit path)
/// 2. Alongside the running executable
/// 3. System library search paths
fn load_pdfium() -> Result<Pdfium, PipelineError> {
    // 1. Explicit path via env var
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        debug!(path = %path, "loading PDFium from env var");
        let bindings = Pdfium::bind_to_library(&path).map_err(|e| {
            PipelineError::ModelInit(format!("failed to load PDFium from {path}: {e}"))
        })?;
        return Ok(Pdfium::new(bindings));
    }

    // 2. Alongside the executable (dev / portable).
    // pdfium_platform_library_name_at_path() handles platform names:
    //   Windows → pdfium.dll | Linux → libpdfium.so | macOS → libpdfium.dylib
    if let Ok(exe) = std::env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            let lib_path =
                Pdfium::pdfium_platform_library_name_at_path(exe_dir.to_string_lossy().as_ref());
            if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
                debug!(dir = %exe_dir.display(), "loaded PDFium from executable directory");
                return Ok(Pdfium::new(bindings));
            }
        }
    }

    // 3. System library
    let bindings = Pdfium::bind_to_system_library().map_err(|e| {
        PipelineError::ModelInit(format!(
            "PDFium library not found. Set PDFIUM_DYNAMIC_LIB_PATH or install PDFium: {e}"
        ))
    })?;
    Ok(Pdfium::new(bindings))
}

/// Map PDF load errors — detect encrypted PDFs for distinct messaging.
fn map_load_error(e: PdfiumError) -> PipelineError {
    let msg = format!("{e}");
    let lower = msg.to_lowercase();
    if lower.contains("password") || lower.contains("encrypt") {
        PipelineError::PdfEncrypted
    } else {
        PipelineError::PdfParse(msg)
    }
}

// ═══════════════════════════════════════════════════════════
// Mock for testing
// ═══════════════════════════════════════════════════════════

enum MockOutcome {
    Text(String),
    ParseFailure,
}

/// Mock extractor for pipeline and handler tests that must not depend on
/// the PDFium binary being installed.
pub struct MockTextExtractor {
    outcome: MockOutcome,
}

impl MockTextExtractor {
    /// Always yields the given text, regardless of input file.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            outcome: MockOutcome::Text(text.into()),
        }
    }

    /// Always fails with a parse error, as a corrupt file would.
    pub fn parse_failure() -> Self {
        Self {
            outcome: MockOutcome::ParseFailure,
        }
    }
}

impl TextExtractor for MockTextExtractor {
    fn extract(&self, _path: &Path) -> Result<String, PipelineError> {
        match &self.outcome {
            MockOutcome::Text(text) => Ok(text.clone()),
            MockOutcome::ParseFailure => Err(PipelineError::PdfParse(
                "mock parse failure".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_detected_at_offset_zero() {
        assert!(has_pdf_signature(b"%PDF-1.7\n..."));
    }

    #[test]
    fn signature_detected_after_leading_junk() {
        let mut bytes = vec![0u8; 100];
        bytes.extend_from_slice(b"%PDF-1.4");
        assert!(has_pdf_signature(&bytes));
    }

    #[test]
    fn signature_outside_window_rejected() {
        let mut bytes = vec![b' '; SIGNATURE_WINDOW];
        bytes.extend_from_slice(b"%PDF-1.4");
        assert!(!has_pdf_signature(&bytes));
    }

    #[test]
    fn plain_text_bytes_have_no_signature() {
        assert!(!has_pdf_signature(b"This is not a valid pdf content"));
    }

    #[test]
    fn empty_and_short_inputs_rejected() {
        assert!(!has_pdf_signature(b""));
        assert!(!has_pdf_signature(b"%PDF"));
    }

    #[test]
    fn corrupt_file_with_pdf_extension_fails_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"This is not a valid pdf content").unwrap();

        let extractor = PdfiumExtractor;
        let err = extractor.extract(&path).unwrap_err();
        assert!(matches!(err, PipelineError::PdfParse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let extractor = PdfiumExtractor;
        let err = extractor
            .extract(Path::new("/nonexistent/document.pdf"))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn mock_returns_configured_text() {
        let mock = MockTextExtractor::with_text("Test PDF");
        let text = mock.extract(Path::new("ignored.pdf")).unwrap();
        assert_eq!(text, "Test PDF");
    }

    #[test]
    fn mock_parse_failure_errors() {
        let mock = MockTextExtractor::parse_failure();
        let err = mock.extract(Path::new("ignored.pdf")).unwrap_err();
        assert!(matches!(err, PipelineError::PdfParse(_)));
    }
}
