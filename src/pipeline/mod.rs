pub mod categories;
pub mod classifier;
pub mod engine;
pub mod extract;
pub mod normalize;
pub mod vectorize;

pub use categories::CategoryTable;
pub use classifier::{argmax, ClassifierModel, OnnxClassifier};
pub use engine::{ClassificationEngine, Prediction};
pub use extract::{PdfiumExtractor, TextExtractor};
pub use normalize::normalize_text;
pub use vectorize::TfidfVectorizer;

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParse(String),

    #[error("PDF is password-protected")]
    PdfEncrypted,

    #[error("artifact not found: {0}")]
    ArtifactNotFound(PathBuf),

    #[error("model initialization failed: {0}")]
    ModelInit(String),

    #[error("vectorizer definition invalid: {0}")]
    VectorizerInvalid(String),

    #[error("category table invalid: {0}")]
    CategoryTableInvalid(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model predicts {model_classes} classes but category table has {table_rows} entries")]
    ClassCountMismatch {
        model_classes: usize,
        table_rows: usize,
    },
}
