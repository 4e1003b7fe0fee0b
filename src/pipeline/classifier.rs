//! Pre-trained classifier executed via ONNX Runtime.
//!
//! The model takes a `[1, n_features]` f32 tensor and returns a `[1, K]`
//! probability row. `K` must match the category table; the engine
//! validates that once at startup.

use std::path::Path;
use std::sync::Mutex;

use ndarray::{Array1, Array2, Axis};
use ort::session::Session;

use super::PipelineError;

/// Maps a feature vector to a probability distribution over class indices.
pub trait ClassifierModel: Send + Sync {
    fn predict(&self, features: &Array1<f32>) -> Result<Vec<f32>, PipelineError>;
}

/// Index of the maximum probability. Ties break to the first maximal
/// index in order — the argmax convention — so the reported category is
/// stable when two classes tie exactly.
pub fn argmax(probabilities: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &p) in probabilities.iter().enumerate() {
        let replace = match best {
            None => true,
            Some((_, top)) => p > top,
        };
        if replace {
            best = Some((index, p));
        }
    }
    best.map(|(index, _)| index)
}

// ═══════════════════════════════════════════════════════════
// ONNX-backed model
// ═══════════════════════════════════════════════════════════

/// Pre-trained classifier loaded from an ONNX file.
///
/// Uses interior mutability (Mutex) because `ort::Session::run` requires
/// `&mut self` but `ClassifierModel` exposes `&self` for shared usage
/// across concurrent requests.
pub struct OnnxClassifier {
    session: Mutex<Session>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier").finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load the model from disk.
    pub fn load(model_path: &Path) -> Result<Self, PipelineError> {
        if !model_path.exists() {
            return Err(PipelineError::ArtifactNotFound(model_path.to_path_buf()));
        }

        let session = Session::builder()
            .map_err(|e: ort::Error| PipelineError::ModelInit(e.to_string()))?
            .with_intra_threads(2)
            .map_err(|e: ort::Error| PipelineError::ModelInit(e.to_string()))?
            .commit_from_file(model_path)
            .map_err(|e: ort::Error| PipelineError::ModelInit(format!("ONNX load failed: {e}")))?;

        tracing::info!(path = %model_path.display(), "ONNX classifier loaded");

        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl ClassifierModel for OnnxClassifier {
    fn predict(&self, features: &Array1<f32>) -> Result<Vec<f32>, PipelineError> {
        use ort::value::TensorRef;

        let input: Array2<f32> = features.clone().insert_axis(Axis(0));
        let tensor = TensorRef::from_array_view(&input)
            .map_err(|e| PipelineError::Inference(e.to_string()))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PipelineError::Inference("session lock poisoned".to_string()))?;

        let outputs = session
            .run(ort::inputs![tensor])
            .map_err(|e| PipelineError::Inference(format!("ONNX inference failed: {e}")))?;

        let (shape, data) = outputs[0]
            .try_extract_tensor::<f32>()
            .map_err(|e| PipelineError::Inference(format!("output extraction: {e}")))?;

        // Expect a single probability row: [1, K]
        if shape.len() != 2 || shape[0] != 1 {
            return Err(PipelineError::Inference(format!(
                "unexpected output shape {shape:?}, expected [1, K]"
            )));
        }

        Ok(data.to_vec())
    }
}

// ═══════════════════════════════════════════════════════════
// Mock for testing
// ═══════════════════════════════════════════════════════════

/// Mock model returning a fixed probability row — no ONNX runtime needed.
pub struct MockClassifierModel {
    probabilities: Vec<f32>,
}

impl MockClassifierModel {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self { probabilities }
    }
}

impl ClassifierModel for MockClassifierModel {
    fn predict(&self, _features: &Array1<f32>) -> Result<Vec<f32>, PipelineError> {
        Ok(self.probabilities.clone())
    }
}
