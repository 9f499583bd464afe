//! Loading the concept registry document.

use std::path::{Path, PathBuf};
use syllabus_model::{ConceptRegistry, RegistryDocument};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Missing concept registry at {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read concept registry {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("concept registry {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("concept registry {} is not valid YAML: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryFormat {
    Json,
    Yaml,
}

impl RegistryFormat {
    /// `.yaml` / `.yml` are YAML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => RegistryFormat::Yaml,
            _ => RegistryFormat::Json,
        }
    }
}

pub fn load_registry(path: &Path) -> Result<ConceptRegistry, RegistryError> {
    if !path.exists() {
        return Err(RegistryError::Missing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let registry = parse_registry(&text, RegistryFormat::from_path(path), path)?;
    tracing::info!(
        path = %path.display(),
        concepts = registry.len(),
        duplicates = registry.duplicates().len(),
        "concept registry loaded"
    );
    Ok(registry)
}

/// Parse registry text. `path` is only used for error messages.
pub fn parse_registry(
    text: &str,
    format: RegistryFormat,
    path: &Path,
) -> Result<ConceptRegistry, RegistryError> {
    let doc: RegistryDocument = match format {
        RegistryFormat::Json => serde_json::from_str(text).map_err(|source| RegistryError::Json {
            path: path.to_path_buf(),
            source,
        })?,
        RegistryFormat::Yaml => serde_yaml::from_str(text).map_err(|source| RegistryError::Yaml {
            path: path.to_path_buf(),
            source,
        })?,
    };
    Ok(ConceptRegistry::from_document(doc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_registry_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("curriculum.json");
        let err = load_registry(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Missing(_)));
        assert!(err.to_string().starts_with("Missing concept registry at "));
    }

    #[test]
    fn loads_json_and_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("curriculum.json");
        std::fs::write(
            &json,
            r#"{"concepts":[{"id":"loops","canonical_lesson":"basics"},{"id":"vars"}]}"#,
        )
        .unwrap();
        let yaml = dir.path().join("curriculum.yaml");
        std::fs::write(
            &yaml,
            "concepts:\n  - id: loops\n    canonical_lesson: basics\n  - id: vars\n",
        )
        .unwrap();

        let a = load_registry(&json).unwrap();
        let b = load_registry(&yaml).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(
            a.iter().collect::<Vec<_>>(),
            b.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn malformed_registry_is_a_parse_error() {
        let err = parse_registry("{\"concepts\": [", RegistryFormat::Json, Path::new("c.json"))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));

        let err = parse_registry(
            r#"{"concepts":[{"id":""}]}"#,
            RegistryFormat::Json,
            Path::new("c.json"),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Json { .. }));
    }
}
