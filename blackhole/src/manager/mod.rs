//! Catalog, cache and active slots of datasets.
//!
//! A data source is loaded the first time it gets activated in any slot and
//! then kept in memory until the manager is dropped, so switching back and
//! forth between datasets never reads a file twice.

pub(crate) mod config;
mod organization;

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use blackhole_runtime::string_error::ErrorStringExt;

use crate::dataset::{Dataset, Loader};
use crate::error::{ConfigError, DatasetError};
use crate::source::{DataSource, SourceId};
use config::{parse_configuration, ParsedConfiguration};

pub use organization::{FilterLayer, LayerOption, LayerSelection};

/// Key of one simultaneously active dataset, e.g. primary and comparison.
pub type Slot = usize;

pub const PRIMARY_SLOT: Slot = 0;

/// Called after a slot received a new active dataset.
pub type DatasetChangedCallback<D> = Box<dyn FnMut(Slot, &D)>;

pub struct DatasetManager<D> {
    expected_parameter_keys: Vec<String>,
    path_abbreviations: BTreeMap<String, String>,
    catalog: Vec<DataSource>,
    layers: Vec<FilterLayer>,
    /// Append-only, indexed by load order.
    cache: Vec<D>,
    /// Slot to index into `cache`.
    active_slot_map: HashMap<Slot, usize>,
    loader: Loader<D>,
    is_configured: bool,
    on_dataset_changed: Option<DatasetChangedCallback<D>>,
}

impl<D: Dataset> DatasetManager<D> {
    pub fn new(loader: impl Fn(&DataSource) -> Result<D, String> + 'static) -> Self {
        Self {
            expected_parameter_keys: Vec::new(),
            path_abbreviations: BTreeMap::new(),
            catalog: Vec::new(),
            layers: Vec::new(),
            cache: Vec::new(),
            active_slot_map: HashMap::new(),
            loader: Box::new(loader),
            is_configured: false,
            on_dataset_changed: None,
        }
    }

    /// Install the single dataset-changed notification. Replaces any
    /// previously installed callback.
    pub fn set_dataset_changed_callback(&mut self, callback: DatasetChangedCallback<D>) {
        if self.on_dataset_changed.is_some() {
            log::warn!("replacing dataset changed callback");
        }
        self.on_dataset_changed = Some(callback);
    }

    pub fn load_configuration(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path)
            .err_to_string("could not read file")
            .map_err(|reason| ConfigError::Io {
                path: path.to_owned(),
                reason,
            });
        let res = text.and_then(|text| self.load_configuration_str(&text));
        if let Err(err) = &res {
            log::error!("failed to load configuration {:?}: {err}", path);
        }
        res
    }

    /// Parse and apply a configuration. Either everything is applied or,
    /// on error, nothing is.
    pub fn load_configuration_str(&mut self, text: &str) -> Result<(), ConfigError> {
        if self.is_configured {
            log::error!("{}", ConfigError::AlreadyLoaded);
            return Err(ConfigError::AlreadyLoaded);
        }
        let ParsedConfiguration {
            abbreviations,
            expected_parameter_keys,
            catalog,
            layers,
        } = parse_configuration(text).inspect_err(|err| log::error!("{err}"))?;

        log::info!(
            "loaded configuration with {} data sources and {} organization layers",
            catalog.len(),
            layers.len()
        );
        self.path_abbreviations = abbreviations;
        self.expected_parameter_keys = expected_parameter_keys;
        self.catalog = catalog;
        self.layers = layers;
        self.is_configured = true;
        Ok(())
    }

    /// Make data source `id` the active dataset of `slot`, loading it first
    /// if this is its first activation.
    pub fn set_active(&mut self, id: SourceId, slot: Slot) -> Result<(), DatasetError> {
        let index = match self.cache.iter().position(|ds| ds.unique_id() == id) {
            Some(index) => index,
            None => self.load(id)?,
        };
        self.active_slot_map.insert(slot, index);
        log::debug!("slot {slot} now shows data source {id}");

        if let Some(callback) = self.on_dataset_changed.as_mut() {
            callback(slot, &self.cache[index]);
        }
        Ok(())
    }

    fn load(&mut self, id: SourceId) -> Result<usize, DatasetError> {
        let Some(source) = self.catalog.iter().find(|src| src.unique_id() == id) else {
            let err = DatasetError::UnknownSource(id);
            log::error!("{err}");
            return Err(err);
        };

        log::info!("loading data source {id} from {:?}", source.file_path());
        let dataset = (self.loader)(source).map_err(|reason| {
            let err = DatasetError::LoadFailed { id, reason };
            log::error!("{err}");
            err
        })?;
        if dataset.unique_id() != id {
            let err = DatasetError::IdMismatch {
                expected: id,
                found: dataset.unique_id(),
            };
            log::error!("{err}");
            return Err(err);
        }
        self.cache.push(dataset);
        Ok(self.cache.len() - 1)
    }

    /// Active dataset of `slot`, `None` if the slot was never activated.
    pub fn get_active(&self, slot: Slot) -> Option<&D> {
        self.try_get_active(slot)
            .inspect_err(|err| log::warn!("{err}"))
            .ok()
    }

    pub fn try_get_active(&self, slot: Slot) -> Result<&D, DatasetError> {
        self.active_slot_map
            .get(&slot)
            .and_then(|index| self.cache.get(*index))
            .ok_or(DatasetError::EmptySlot(slot))
    }

    pub fn active_id(&self, slot: Slot) -> Option<SourceId> {
        self.active_slot_map
            .get(&slot)
            .and_then(|index| self.cache.get(*index))
            .map(|ds| ds.unique_id())
    }

    /// Slots that have an active dataset, in ascending order.
    pub fn active_slots(&self) -> Vec<Slot> {
        let mut slots: Vec<_> = self.active_slot_map.keys().copied().collect();
        slots.sort_unstable();
        slots
    }

    pub fn is_loaded(&self, id: SourceId) -> bool {
        self.cache.iter().any(|ds| ds.unique_id() == id)
    }

    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    pub fn is_configured(&self) -> bool {
        self.is_configured
    }

    pub fn catalog(&self) -> &[DataSource] {
        &self.catalog
    }

    pub fn source(&self, id: SourceId) -> Option<&DataSource> {
        self.catalog.iter().find(|src| src.unique_id() == id)
    }

    pub fn expected_parameter_keys(&self) -> &[String] {
        &self.expected_parameter_keys
    }

    pub fn abbreviations(&self) -> &BTreeMap<String, String> {
        &self.path_abbreviations
    }

    pub fn layers(&self) -> &[FilterLayer] {
        &self.layers
    }

    /// Choices offered by organization layer `layer`.
    pub fn layer_options(&self, layer: usize) -> Vec<LayerOption> {
        match self.layers.get(layer) {
            Some(filter) => filter.options(self.catalog.iter()),
            None => {
                log::warn!("no organization layer {layer}");
                Vec::new()
            }
        }
    }

    /// Data sources matching every selection. Selections of unknown layers
    /// match nothing.
    pub fn filter_sources(&self, selections: &[LayerSelection]) -> Vec<&DataSource> {
        self.catalog
            .iter()
            .filter(|source| {
                selections.iter().all(|sel| {
                    self.layers
                        .get(sel.layer)
                        .is_some_and(|filter| filter.matches(&sel.option, source))
                })
            })
            .collect()
    }
}
