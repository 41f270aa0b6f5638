//! Dataset configuration file.
//!
//! The whole file is parsed and validated into a [`ParsedConfiguration`]
//! before the manager takes over any of it.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use super::organization::{validate_layers, FilterLayer};
use crate::control::ParamValue;
use crate::error::ConfigError;
use crate::source::{DataSource, SourceId};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfiguration {
    #[serde(default)]
    abbreviations: Vec<Abbreviation>,
    datasets: Vec<RawDataSource>,
    #[serde(default)]
    organization: Vec<FilterLayer>,
}

#[derive(Debug, Deserialize)]
struct Abbreviation {
    shortcut: String,
    expanded: String,
}

#[derive(Debug, Deserialize)]
struct RawDataSource {
    path: Vec<String>,
    #[serde(default)]
    parameters: serde_json::Map<String, ParamValue>,
    #[serde(default)]
    active_sets: Vec<usize>,
}

#[derive(Debug)]
pub(crate) struct ParsedConfiguration {
    pub abbreviations: BTreeMap<String, String>,
    pub expected_parameter_keys: Vec<String>,
    pub catalog: Vec<DataSource>,
    pub layers: Vec<FilterLayer>,
}

pub(crate) fn parse_configuration(text: &str) -> Result<ParsedConfiguration, ConfigError> {
    let raw: RawConfiguration =
        serde_json::from_str(text).map_err(|err| ConfigError::Parse(err.to_string()))?;

    let abbreviations: BTreeMap<String, String> = raw
        .abbreviations
        .into_iter()
        .map(|Abbreviation { shortcut, expanded }| (shortcut, expanded))
        .collect();

    // The first record fixes the parameter keys every other record must have.
    let Some(first) = raw.datasets.first() else {
        return Err(ConfigError::NoDatasets);
    };
    let expected_parameter_keys: Vec<String> = first.parameters.keys().cloned().collect();

    let mut catalog = Vec::with_capacity(raw.datasets.len());
    for (record, source) in raw.datasets.into_iter().enumerate() {
        if let Some(key) = expected_parameter_keys
            .iter()
            .find(|key| !source.parameters.contains_key(key.as_str()))
        {
            return Err(ConfigError::MissingParameter {
                record,
                key: key.clone(),
            });
        }
        if let Some(key) = source
            .parameters
            .keys()
            .find(|key| !expected_parameter_keys.contains(*key))
        {
            return Err(ConfigError::UnexpectedParameter {
                record,
                key: key.clone(),
            });
        }
        let file_path = expand_path(&source.path, &abbreviations);
        catalog.push(DataSource::new(
            file_path,
            source.parameters,
            source.active_sets,
            SourceId(record),
        ));
    }

    let layers = validate_layers(raw.organization)?;
    for layer in layers.iter() {
        for key in layer
            .group_parameters
            .iter()
            .filter(|key| !expected_parameter_keys.contains(*key))
        {
            log::warn!(
                "organization layer {} groups by '{key}', which no dataset defines",
                layer.layer
            );
        }
    }

    Ok(ParsedConfiguration {
        abbreviations,
        expected_parameter_keys,
        catalog,
        layers,
    })
}

/// Join path segments, replacing segments that are configured shortcuts.
pub(crate) fn expand_path(
    segments: &[String],
    abbreviations: &BTreeMap<String, String>,
) -> PathBuf {
    segments
        .iter()
        .map(|segment| {
            abbreviations
                .get(segment)
                .map(String::as_str)
                .unwrap_or(segment.as_str())
        })
        .collect()
}
