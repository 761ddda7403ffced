use crate::crd::{generate_crd_yaml, CrdSettings};
use crate::error::Result;
use crate::kinds::CoreKind;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const CRD_DIR: &str = "crd";
const CRD_EXTENSION: &str = "crd.yml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub relative_path: PathBuf,
    pub data: Vec<u8>,
}

impl GeneratedFile {
    /// Writes the file below `root`.
    ///
    /// The data goes to a temporary file in the target directory first, so
    /// readers never observe a half written manifest.
    pub fn write_to(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(&self.relative_path);
        let dir = path.parent().unwrap_or(root);
        std::fs::create_dir_all(dir)?;

        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(&self.data)?;
        file.persist(&path).map_err(|e| e.error)?;
        Ok(path)
    }
}

/// Generates the YAML CRD of a core kind.
pub struct CrdYamlJenny {
    parent_path: PathBuf,
    settings: CrdSettings,
}

impl CrdYamlJenny {
    pub fn new(parent_path: impl Into<PathBuf>) -> Self {
        Self {
            parent_path: parent_path.into(),
            settings: CrdSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CrdSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn name(&self) -> &'static str {
        "CrdYamlJenny"
    }

    pub fn generate(&self, kind: &CoreKind) -> Result<GeneratedFile> {
        let props = &kind.properties;
        let data = generate_crd_yaml(props, &kind.lineage, &self.settings)?;
        let relative_path = self
            .parent_path
            .join(&props.machine_name)
            .join(CRD_DIR)
            .join(format!("{}.{CRD_EXTENSION}", props.machine_name));
        tracing::debug!(
            "{} generated {} ({} bytes)",
            self.name(),
            relative_path.display(),
            data.len()
        );
        Ok(GeneratedFile {
            relative_path,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::kinds::{core_kinds, KindProperties};
    use crate::lineage::SchemaLineage;
    use serde_json::json;
    use tempfile::TempDir;

    fn broken_kind() -> CoreKind {
        CoreKind {
            properties: KindProperties::core("Broken", "broken", "brokens"),
            lineage: SchemaLineage::builder("broken")
                .document(
                    (0, 0),
                    json!({ "components": { "schemas": {
                        "A": { "type": "object" },
                        "B": { "type": "object" }
                    } } }),
                )
                .build()
                .unwrap(),
        }
    }

    #[test]
    fn test_generate_path() {
        let kinds = core_kinds().unwrap();
        let jenny = CrdYamlJenny::new("kinds");
        let file = jenny.generate(&kinds[0]).unwrap();
        assert_eq!(
            file.relative_path,
            PathBuf::from("kinds/dashboard/crd/dashboard.crd.yml")
        );
        assert!(String::from_utf8(file.data)
            .unwrap()
            .starts_with("apiVersion: apiextensions.k8s.io/v1"));
    }

    #[test]
    fn test_write_to() {
        let root = TempDir::new().unwrap();
        let kinds = core_kinds().unwrap();
        let jenny = CrdYamlJenny::new("kinds");
        let file = jenny.generate(&kinds[1]).unwrap();

        let path = file.write_to(root.path()).unwrap();
        assert_eq!(
            path,
            root.path().join("kinds/playlist/crd/playlist.crd.yml")
        );
        assert_eq!(std::fs::read(&path).unwrap(), file.data);

        // overwriting keeps a single file
        file.write_to(root.path()).unwrap();
        let entries = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_failed_generation_writes_nothing() {
        let root = TempDir::new().unwrap();
        let jenny = CrdYamlJenny::new("kinds");
        let result = jenny
            .generate(&broken_kind())
            .and_then(|file| file.write_to(root.path()));
        assert!(matches!(result, Err(Error::Kind { ref kind, .. }) if kind == "Broken"));
        assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
    }
}
