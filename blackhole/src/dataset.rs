//! Loaded datasets.
//!
//! Applications define their own dataset types and implement [`Dataset`] for
//! them, usually by embedding a [`DatasetCore`].

use crate::control::ControlState;
use crate::source::{DataSource, SourceId};

pub trait Dataset {
    /// The catalog entry the dataset was loaded from.
    fn source_info(&self) -> &DataSource;

    /// Must equal the ID of [`Dataset::source_info`].
    fn unique_id(&self) -> SourceId {
        self.source_info().unique_id()
    }

    /// Parameters that have been applied to the data so far.
    fn control_performed(&self) -> &ControlState;
}

/// Turns a catalogued data source into a dataset.
pub type Loader<D> = Box<dyn Fn(&DataSource) -> Result<D, String>>;

/// Bookkeeping every dataset needs.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetCore {
    source_info: DataSource,
    control_performed: ControlState,
}

impl DatasetCore {
    pub fn new(source: &DataSource) -> Self {
        Self {
            source_info: source.clone(),
            control_performed: ControlState::new(&format!("performed {}", source.file_name())),
        }
    }

    pub fn control_performed_mut(&mut self) -> &mut ControlState {
        &mut self.control_performed
    }
}

impl Dataset for DatasetCore {
    fn source_info(&self) -> &DataSource {
        &self.source_info
    }

    fn control_performed(&self) -> &ControlState {
        &self.control_performed
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;

    #[test]
    fn test_core_keeps_its_source() {
        let mut params = serde_json::Map::new();
        params.insert("power_dBm".into(), json!(-3));
        let source = DataSource::new(PathBuf::from("/srv/up.csv"), params, vec![1], SourceId(5));
        let core = DatasetCore::new(&source);

        assert_eq!(core.source_info(), &source);
        assert_eq!(core.unique_id(), SourceId(5));
        assert_eq!(core.source_info().parameter("power_dBm"), Some(&json!(-3)));
        assert_eq!(core.control_performed().owner(), "performed up.csv");
    }
}
