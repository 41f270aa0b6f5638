use std::fmt;
use std::path::{Path, PathBuf};

use crate::control::ParamValue;

/// Identifier of a data source, assigned densely in configuration order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SourceId(pub usize);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where a dataset lives and the parameters it was declared with.
///
/// Built once while the configuration is read and never changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSource {
    file_path: PathBuf,
    file_name: String,
    parameters: serde_json::Map<String, ParamValue>,
    valid_active_set_indices: Vec<usize>,
    unique_id: SourceId,
}

impl DataSource {
    pub fn new(
        file_path: PathBuf,
        parameters: serde_json::Map<String, ParamValue>,
        valid_active_set_indices: Vec<usize>,
        unique_id: SourceId,
    ) -> Self {
        let file_name = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unreadable filename")
            .to_owned();
        Self {
            file_path,
            file_name,
            parameters,
            valid_active_set_indices,
            unique_id,
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn parameters(&self) -> &serde_json::Map<String, ParamValue> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn valid_active_set_indices(&self) -> &[usize] {
        &self.valid_active_set_indices
    }

    pub fn unique_id(&self) -> SourceId {
        self.unique_id
    }
}
