//! Error types of the framework.
//!
//! Configuration and lookup failures are logged where they happen and then
//! returned to the caller, which decides whether to abort or degrade.

use std::path::PathBuf;

use thiserror::Error;

use crate::manager::Slot;
use crate::source::SourceId;

/// Failures while reading a dataset configuration. None of them leaves a
/// partially applied configuration behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("could not read configuration file {path:?}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("malformed configuration: {0}")]
    Parse(String),

    #[error("configuration was already loaded, reloading is not supported")]
    AlreadyLoaded,

    #[error("configuration does not list any datasets")]
    NoDatasets,

    #[error("dataset record {record} is missing parameter '{key}'")]
    MissingParameter { record: usize, key: String },

    #[error("dataset record {record} has parameter '{key}' which the first record does not")]
    UnexpectedParameter { record: usize, key: String },

    #[error("organization layer {0} is defined more than once")]
    DuplicateLayer(usize),

    #[error("organization layers must be numbered 0..{count}, layer {missing} is missing")]
    MissingLayer { missing: usize, count: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("no data source with ID {0} in catalog")]
    UnknownSource(SourceId),

    #[error("failed to load data source {id}: {reason}")]
    LoadFailed { id: SourceId, reason: String },

    #[error("loader returned dataset {found} for data source {expected}")]
    IdMismatch { expected: SourceId, found: SourceId },

    #[error("slot {0} has no active dataset")]
    EmptySlot(Slot),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("control state '{owner}' has no parameter '{name}'")]
    MissingParameter { owner: String, name: String },

    #[error("parameter '{name}' is not of type {expected}")]
    WrongType { name: String, expected: &'static str },
}
