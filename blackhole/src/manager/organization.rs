//! Organizational filter layers.
//!
//! A layer groups the catalog by the values of one or more parameters. A
//! dataset selector shows one choice per layer and only lists the data
//! sources that match every choice.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::control::ParamValue;
use crate::error::ConfigError;
use crate::source::DataSource;

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct FilterLayer {
    pub layer: usize,
    pub group_parameters: Vec<String>,
    #[serde(default)]
    pub include_all_option: bool,
}

/// One choice of a layer.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerOption {
    /// Matches every data source.
    All,
    /// Values of the layer's group parameters, in their configured order.
    Values(Vec<ParamValue>),
}

impl LayerOption {
    pub fn label(&self) -> String {
        match self {
            LayerOption::All => "All".to_string(),
            LayerOption::Values(values) => values
                .iter()
                .map(|val| match val {
                    ParamValue::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayerSelection {
    pub layer: usize,
    pub option: LayerOption,
}

/// Layer indices have to be exactly `0..layers.len()`.
///
/// Returns the layers sorted by index.
pub(crate) fn validate_layers(
    mut layers: Vec<FilterLayer>,
) -> Result<Vec<FilterLayer>, ConfigError> {
    let mut seen = BTreeSet::new();
    for layer in layers.iter() {
        if !seen.insert(layer.layer) {
            return Err(ConfigError::DuplicateLayer(layer.layer));
        }
    }
    let count = layers.len();
    if let Some(missing) = (0..count).find(|idx| !seen.contains(idx)) {
        return Err(ConfigError::MissingLayer { missing, count });
    }
    layers.sort_by_key(|layer| layer.layer);
    Ok(layers)
}

impl FilterLayer {
    fn values_of(&self, source: &DataSource) -> Vec<ParamValue> {
        self.group_parameters
            .iter()
            .map(|key| source.parameter(key).cloned().unwrap_or(ParamValue::Null))
            .collect()
    }

    /// Distinct choices over `catalog`, in first-seen order.
    pub fn options<'a>(&self, catalog: impl Iterator<Item = &'a DataSource>) -> Vec<LayerOption> {
        let mut options = Vec::new();
        if self.include_all_option {
            options.push(LayerOption::All);
        }
        for source in catalog {
            let option = LayerOption::Values(self.values_of(source));
            if !options.contains(&option) {
                options.push(option);
            }
        }
        options
    }

    pub fn matches(&self, option: &LayerOption, source: &DataSource) -> bool {
        match option {
            LayerOption::All => true,
            LayerOption::Values(values) => *values == self.values_of(source),
        }
    }
}
