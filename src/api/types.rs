//! Shared state for the API layer.

use std::sync::Arc;

use crate::pipeline::ClassificationEngine;
use crate::storage::UploadStore;

/// Shared context for all routes: the inference engine and the upload
/// store, both constructed once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppContext {
    pub engine: Arc<ClassificationEngine>,
    pub uploads: Arc<UploadStore>,
}

impl AppContext {
    pub fn new(engine: Arc<ClassificationEngine>, uploads: Arc<UploadStore>) -> Self {
        Self { engine, uploads }
    }
}
