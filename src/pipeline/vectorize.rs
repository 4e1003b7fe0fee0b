//! TF-IDF vectorization against a vocabulary fitted offline.
//!
//! The artifact is a JSON object with two fields:
//! - `vocabulary`: token → column index
//! - `idf`: inverse document frequency per column
//!
//! The vocabulary is frozen at load time; tokens outside it are ignored.

use std::collections::HashMap;
use std::path::Path;

use ndarray::Array1;
use serde::Deserialize;

use super::PipelineError;

#[derive(Deserialize)]
struct VectorizerArtifact {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

/// Maps normalized text to a fixed-dimension feature vector:
/// raw term counts weighted by IDF, then L2-normalized.
#[derive(Debug)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    /// Load the fitted vectorizer from a JSON artifact.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::ArtifactNotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path)?;
        let artifact: VectorizerArtifact = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::VectorizerInvalid(e.to_string()))?;

        let vectorizer = Self::from_parts(artifact.vocabulary, artifact.idf)?;
        tracing::info!(
            dimension = vectorizer.dimension(),
            path = %path.display(),
            "TF-IDF vectorizer loaded"
        );
        Ok(vectorizer)
    }

    /// Build from an in-memory vocabulary and IDF table, validating that
    /// every vocabulary index falls inside the IDF table.
    pub fn from_parts(
        vocabulary: HashMap<String, usize>,
        idf: Vec<f32>,
    ) -> Result<Self, PipelineError> {
        if idf.is_empty() {
            return Err(PipelineError::VectorizerInvalid(
                "IDF table is empty".into(),
            ));
        }
        for (token, &index) in &vocabulary {
            if index >= idf.len() {
                return Err(PipelineError::VectorizerInvalid(format!(
                    "token '{token}' maps to column {index}, but the IDF table has {} entries",
                    idf.len()
                )));
            }
        }
        Ok(Self { vocabulary, idf })
    }

    /// Number of feature columns.
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Transform normalized text into a feature vector.
    ///
    /// Tokens are whitespace-separated (the normalizer guarantees single
    /// spaces). Out-of-vocabulary tokens contribute nothing; an empty
    /// input yields the zero vector.
    pub fn transform(&self, text: &str) -> Array1<f32> {
        let mut features = Array1::<f32>::zeros(self.dimension());

        for token in text.split_whitespace() {
            if let Some(&index) = self.vocabulary.get(token) {
                features[index] += 1.0;
            }
        }

        for (index, value) in features.iter_mut().enumerate() {
            *value *= self.idf[index];
        }

        let norm: f32 = features.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            features.mapv_inplace(|x| x / norm);
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample() -> TfidfVectorizer {
        let vocabulary = HashMap::from([
            ("invoice".to_string(), 0),
            ("report".to_string(), 1),
            ("total".to_string(), 2),
        ]);
        TfidfVectorizer::from_parts(vocabulary, vec![1.0, 2.0, 0.5]).unwrap()
    }

    #[test]
    fn transform_counts_and_weights_terms() {
        let v = sample();
        // "report" appears twice → tf 2 × idf 2.0 = 4.0 before normalization
        let features = v.transform("report invoice report");
        let norm: f32 = features.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5, "should be L2-normalized");
        assert!(features[1] > features[0]);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let v = sample();
        let features = v.transform("banana invoice banana");
        let only_invoice = v.transform("invoice");
        assert_eq!(features, only_invoice);
    }

    #[test]
    fn empty_input_yields_zero_vector() {
        let v = sample();
        let features = v.transform("");
        assert_eq!(features.len(), 3);
        assert!(features.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn all_oov_input_yields_zero_vector() {
        let v = sample();
        let features = v.transform("completely unknown words");
        assert!(features.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn dimension_matches_idf_table() {
        assert_eq!(sample().dimension(), 3);
    }

    #[test]
    fn transform_is_deterministic() {
        let v = sample();
        assert_eq!(v.transform("invoice total"), v.transform("invoice total"));
    }

    #[test]
    fn rejects_vocabulary_index_out_of_range() {
        let vocabulary = HashMap::from([("stray".to_string(), 7)]);
        let err = TfidfVectorizer::from_parts(vocabulary, vec![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, PipelineError::VectorizerInvalid(_)));
    }

    #[test]
    fn rejects_empty_idf_table() {
        let err = TfidfVectorizer::from_parts(HashMap::new(), vec![]).unwrap_err();
        assert!(matches!(err, PipelineError::VectorizerInvalid(_)));
    }

    #[test]
    fn loads_from_json_artifact() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"vocabulary": {{"alpha": 0, "beta": 1}}, "idf": [1.5, 0.75]}}"#
        )
        .unwrap();

        let v = TfidfVectorizer::load(file.path()).unwrap();
        assert_eq!(v.dimension(), 2);
        let features = v.transform("alpha");
        assert!(features[0] > 0.0);
        assert_eq!(features[1], 0.0);
    }

    #[test]
    fn load_missing_file_is_artifact_not_found() {
        let err = TfidfVectorizer::load(Path::new("/nonexistent/vectorizer.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound(_)));
    }

    #[test]
    fn load_malformed_json_is_invalid() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = TfidfVectorizer::load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::VectorizerInvalid(_)));
    }
}
