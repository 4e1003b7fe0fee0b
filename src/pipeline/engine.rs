//! Pipeline orchestration: extract → normalize → vectorize → predict →
//! resolve, behind one engine object constructed once at startup.

use std::path::Path;

use serde::Serialize;

use super::categories::CategoryTable;
use super::classifier::{argmax, ClassifierModel, OnnxClassifier};
use super::extract::{PdfiumExtractor, TextExtractor};
use super::normalize::normalize_text;
use super::vectorize::TfidfVectorizer;
use super::PipelineError;
use crate::config::Config;

/// Outcome of classifying one document.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Winning class index.
    pub index: usize,
    /// Category name resolved from the table.
    pub category: String,
    /// Probability of the winning class.
    pub confidence: f32,
}

/// Owns the full inference pipeline. Constructed once at process start,
/// shared read-only across requests.
pub struct ClassificationEngine {
    extractor: Box<dyn TextExtractor>,
    vectorizer: TfidfVectorizer,
    model: Box<dyn ClassifierModel>,
    categories: CategoryTable,
}

impl std::fmt::Debug for ClassificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationEngine").finish_non_exhaustive()
    }
}

impl ClassificationEngine {
    /// Assemble an engine and validate model/table consistency.
    ///
    /// Probes the model with a zero vector: the returned probability row
    /// must have exactly one entry per category table row. A mismatch is
    /// a deployment error and must fail startup, not individual requests.
    pub fn new(
        extractor: Box<dyn TextExtractor>,
        vectorizer: TfidfVectorizer,
        model: Box<dyn ClassifierModel>,
        categories: CategoryTable,
    ) -> Result<Self, PipelineError> {
        let probe = model.predict(&ndarray::Array1::zeros(vectorizer.dimension()))?;
        if probe.len() != categories.len() {
            return Err(PipelineError::ClassCountMismatch {
                model_classes: probe.len(),
                table_rows: categories.len(),
            });
        }

        Ok(Self {
            extractor,
            vectorizer,
            model,
            categories,
        })
    }

    /// Wire up the production pipeline from configured artifact paths.
    pub fn load(config: &Config) -> Result<Self, PipelineError> {
        let extractor = PdfiumExtractor::new()?;
        let vectorizer = TfidfVectorizer::load(&config.vectorizer_path)?;
        let model = OnnxClassifier::load(&config.model_path)?;
        let categories = CategoryTable::load(&config.categories_path)?;

        Self::new(
            Box::new(extractor),
            vectorizer,
            Box::new(model),
            categories,
        )
    }

    /// Run the full pipeline on a stored file.
    pub fn classify_file(&self, path: &Path) -> Result<Prediction, PipelineError> {
        let raw_text = self.extractor.extract(path)?;
        let normalized = normalize_text(&raw_text);

        let features = self.vectorizer.transform(&normalized);
        let probabilities = self.model.predict(&features)?;

        // Guaranteed non-empty by the construction-time probe.
        let index = argmax(&probabilities)
            .ok_or_else(|| PipelineError::Inference("empty probability row".to_string()))?;
        let category = self
            .categories
            .resolve(index)
            .ok_or(PipelineError::ClassCountMismatch {
                model_classes: probabilities.len(),
                table_rows: self.categories.len(),
            })?
            .to_string();

        tracing::info!(
            path = %path.display(),
            raw_chars = raw_text.len(),
            tokens = normalized.split_whitespace().count(),
            index,
            category = %category,
            "document classified"
        );

        Ok(Prediction {
            index,
            category,
            confidence: probabilities[index],
        })
    }

    pub fn categories(&self) -> &CategoryTable {
        &self.categories
    }

    pub fn feature_dim(&self) -> usize {
        self.vectorizer.dimension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::classifier::MockClassifierModel;
    use crate::pipeline::extract::MockTextExtractor;
    use std::collections::HashMap;

    fn vectorizer() -> TfidfVectorizer {
        let vocabulary = HashMap::from([
            ("test".to_string(), 0),
            ("pdf".to_string(), 1),
        ]);
        TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0]).unwrap()
    }

    fn categories() -> CategoryTable {
        CategoryTable::from_names(vec!["manuals".into(), "letters".into()]).unwrap()
    }

    fn engine_with(extractor: MockTextExtractor, probabilities: Vec<f32>) -> ClassificationEngine {
        ClassificationEngine::new(
            Box::new(extractor),
            vectorizer(),
            Box::new(MockClassifierModel::new(probabilities)),
            categories(),
        )
        .unwrap()
    }

    #[test]
    fn classifies_into_table_category() {
        let engine = engine_with(MockTextExtractor::with_text("Test PDF"), vec![0.3, 0.7]);
        let prediction = engine.classify_file(Path::new("any.pdf")).unwrap();
        assert_eq!(prediction.index, 1);
        assert_eq!(prediction.category, "letters");
        assert!((prediction.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn empty_document_still_classifies() {
        // No extractable text → empty normalized string → zero vector.
        // Must flow through prediction without error.
        let engine = engine_with(MockTextExtractor::with_text(""), vec![0.9, 0.1]);
        let prediction = engine.classify_file(Path::new("blank.pdf")).unwrap();
        assert_eq!(prediction.category, "manuals");
    }

    #[test]
    fn tie_resolves_to_first_category() {
        let engine = engine_with(MockTextExtractor::with_text("Test"), vec![0.5, 0.5]);
        let prediction = engine.classify_file(Path::new("tie.pdf")).unwrap();
        assert_eq!(prediction.index, 0);
        assert_eq!(prediction.category, "manuals");
    }

    #[test]
    fn parse_failure_propagates() {
        let engine = engine_with(MockTextExtractor::parse_failure(), vec![0.5, 0.5]);
        let err = engine.classify_file(Path::new("corrupt.pdf")).unwrap_err();
        assert!(matches!(err, PipelineError::PdfParse(_)));
    }

    #[test]
    fn construction_rejects_class_count_mismatch() {
        // Model claims 3 classes, table has 2.
        let err = ClassificationEngine::new(
            Box::new(MockTextExtractor::with_text("x")),
            vectorizer(),
            Box::new(MockClassifierModel::new(vec![0.2, 0.3, 0.5])),
            categories(),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ClassCountMismatch {
                model_classes: 3,
                table_rows: 2,
            }
        ));
    }

    #[test]
    fn classification_is_repeatable() {
        let engine = engine_with(MockTextExtractor::with_text("Test PDF"), vec![0.3, 0.7]);
        let first = engine.classify_file(Path::new("a.pdf")).unwrap();
        let second = engine.classify_file(Path::new("a.pdf")).unwrap();
        assert_eq!(first.index, second.index);
        assert_eq!(first.category, second.category);
    }
}
