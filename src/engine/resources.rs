//! Naming convention for bundled dataset resources.

use std::path::{Path, PathBuf};

const DESCRIPTOR_EXTENSION: &str = "xml";
const FEATURE_DATA_EXTENSION: &str = "dat";

/// A dataset resource is a pair of read-only files sharing a base name:
/// `<name>.xml` enumerates the targets and their physical sizes, and
/// `<name>.dat` holds the binary feature data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetFiles {
    name: String,
}

impl DatasetFiles {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn descriptor_file(&self) -> String {
        format!("{}.{DESCRIPTOR_EXTENSION}", self.name)
    }

    pub fn feature_data_file(&self) -> String {
        format!("{}.{FEATURE_DATA_EXTENSION}", self.name)
    }

    pub fn descriptor_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.descriptor_file())
    }

    pub fn feature_data_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.feature_data_file())
    }

    /// Both files must be present for the dataset to be loadable.
    pub fn exists_in(&self, dir: &Path) -> bool {
        self.descriptor_path(dir).is_file() && self.feature_data_path(dir).is_file()
    }

    /// Same check against an in-memory asset listing (e.g. an APK asset index).
    pub fn listed_in<S: AsRef<str>>(&self, assets: &[S]) -> bool {
        let descriptor = self.descriptor_file();
        let data = self.feature_data_file();
        let has = |wanted: &str| assets.iter().any(|a| a.as_ref() == wanted);
        has(&descriptor) && has(&data)
    }
}
