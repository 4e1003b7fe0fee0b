//! Category table: classifier output index → human-readable name.

use std::path::Path;

use super::PipelineError;

/// Ordered list of category names. Index = classifier class index.
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    names: Vec<String>,
}

impl CategoryTable {
    /// Load the table from a JSON artifact: an ordered array of names.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.exists() {
            return Err(PipelineError::ArtifactNotFound(path.to_path_buf()));
        }

        let raw = std::fs::read_to_string(path)?;
        let names: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| PipelineError::CategoryTableInvalid(e.to_string()))?;

        let table = Self::from_names(names)?;
        tracing::info!(
            categories = table.len(),
            path = %path.display(),
            "category table loaded"
        );
        Ok(table)
    }

    pub fn from_names(names: Vec<String>) -> Result<Self, PipelineError> {
        if names.is_empty() {
            return Err(PipelineError::CategoryTableInvalid(
                "table has no entries".into(),
            ));
        }
        Ok(Self { names })
    }

    /// Name for a class index, if the index is within the table.
    pub fn resolve(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn table() -> CategoryTable {
        CategoryTable::from_names(vec![
            "contracts".into(),
            "invoices".into(),
            "reports".into(),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_in_range_indices_in_order() {
        let t = table();
        assert_eq!(t.resolve(0), Some("contracts"));
        assert_eq!(t.resolve(1), Some("invoices"));
        assert_eq!(t.resolve(2), Some("reports"));
    }

    #[test]
    fn out_of_range_index_is_none() {
        assert_eq!(table().resolve(3), None);
    }

    #[test]
    fn empty_table_rejected() {
        let err = CategoryTable::from_names(vec![]).unwrap_err();
        assert!(matches!(err, PipelineError::CategoryTableInvalid(_)));
    }

    #[test]
    fn loads_ordered_json_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["legal", "finance", "hr"]"#).unwrap();

        let t = CategoryTable::load(file.path()).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(t.resolve(1), Some("finance"));
    }

    #[test]
    fn missing_file_is_artifact_not_found() {
        let err = CategoryTable::load(Path::new("/nonexistent/categories.json")).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound(_)));
    }

    #[test]
    fn malformed_json_is_invalid_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"not": "an array"}}"#).unwrap();
        let err = CategoryTable::load(file.path()).unwrap_err();
        assert!(matches!(err, PipelineError::CategoryTableInvalid(_)));
    }
}
