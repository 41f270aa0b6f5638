use crate::dataset::Dataset;
use crate::manager::{DatasetManager, LayerOption, LayerSelection, Slot};
use crate::source::{DataSource, SourceId};

/// Picks the active data source of one slot, narrowed down by the
/// organization layers of the configuration.
#[derive(Debug)]
pub struct DatasetSelectWidget {
    slot: Slot,
    /// Chosen option index per layer.
    chosen: Vec<usize>,
}

impl DatasetSelectWidget {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            chosen: Vec::new(),
        }
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Pick option `option_idx` of layer `layer`. Out of range picks are
    /// ignored.
    pub fn choose<D: Dataset>(
        &mut self,
        manager: &DatasetManager<D>,
        layer: usize,
        option_idx: usize,
    ) {
        let options = self.sync(manager);
        match options.get(layer) {
            Some(opts) if option_idx < opts.len() => self.chosen[layer] = option_idx,
            _ => log::warn!("no option {option_idx} in organization layer {layer}"),
        }
    }

    /// Options of every layer. Keeps the chosen indices in range.
    fn sync<D: Dataset>(&mut self, manager: &DatasetManager<D>) -> Vec<Vec<LayerOption>> {
        let options: Vec<_> = (0..manager.layers().len())
            .map(|layer| manager.layer_options(layer))
            .collect();
        self.chosen.resize(options.len(), 0);
        for (chosen, opts) in self.chosen.iter_mut().zip(options.iter()) {
            if *chosen >= opts.len() {
                *chosen = 0;
            }
        }
        options
    }

    pub fn selections<D: Dataset>(&mut self, manager: &DatasetManager<D>) -> Vec<LayerSelection> {
        let options = self.sync(manager);
        options
            .into_iter()
            .zip(self.chosen.iter())
            .enumerate()
            .filter_map(|(layer, (mut opts, chosen))| {
                (*chosen < opts.len()).then(|| LayerSelection {
                    layer,
                    option: opts.swap_remove(*chosen),
                })
            })
            .collect()
    }

    /// Data sources matching the current choices.
    pub fn candidates<'a, D: Dataset>(
        &mut self,
        manager: &'a DatasetManager<D>,
    ) -> Vec<&'a DataSource> {
        let selections = self.selections(manager);
        manager.filter_sources(&selections)
    }

    /// Returns the data source the user clicked, if any.
    pub fn show<D: Dataset>(
        &mut self,
        ui: &mut egui::Ui,
        manager: &DatasetManager<D>,
    ) -> Option<SourceId> {
        let options = self.sync(manager);
        for (layer, opts) in options.iter().enumerate() {
            let name = manager.layers()[layer].group_parameters.join(", ");
            let chosen = &mut self.chosen[layer];
            let selected_text = opts.get(*chosen).map(LayerOption::label).unwrap_or_default();
            egui::ComboBox::from_id_salt(("dataset_select", self.slot, layer))
                .selected_text(selected_text)
                .show_ui(ui, |ui| {
                    for (idx, opt) in opts.iter().enumerate() {
                        ui.selectable_value(&mut *chosen, idx, opt.label());
                    }
                });
            ui.label(name);
        }

        let active = manager.active_id(self.slot);
        let mut clicked = None;
        for source in self.candidates(manager) {
            let id = source.unique_id();
            if ui
                .selectable_label(active == Some(id), source.file_name())
                .on_hover_text(source.file_path().display().to_string())
                .clicked()
            {
                clicked = Some(id);
            }
        }
        clicked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetCore;
    use crate::manager::config::tests::TWO_SOURCES;

    fn manager() -> DatasetManager<DatasetCore> {
        let mut manager = DatasetManager::new(|src: &DataSource| Ok(DatasetCore::new(src)));
        manager.load_configuration_str(TWO_SOURCES).unwrap();
        manager
    }

    fn names(sources: Vec<&DataSource>) -> Vec<&str> {
        sources.into_iter().map(|s| s.file_name()).collect()
    }

    #[test]
    fn test_defaults_to_first_option_of_each_layer() {
        let manager = manager();
        let mut select = DatasetSelectWidget::new(0);
        let selections = select.selections(&manager);
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[0].option, LayerOption::All);
        assert_eq!(names(select.candidates(&manager)), vec!["up.csv", "down.csv"]);
    }

    #[test]
    fn test_choice_narrows_candidates() {
        let manager = manager();
        let mut select = DatasetSelectWidget::new(0);
        // layer 0 offers All, up, down
        select.choose(&manager, 0, 2);
        assert_eq!(names(select.candidates(&manager)), vec!["down.csv"]);

        select.choose(&manager, 0, 7);
        assert_eq!(names(select.candidates(&manager)), vec!["down.csv"]);
    }

    #[test]
    fn test_unconfigured_manager_offers_nothing() {
        let manager = DatasetManager::new(|src: &DataSource| Ok(DatasetCore::new(src)));
        let mut select = DatasetSelectWidget::new(1);
        assert!(select.selections(&manager).is_empty());
        assert!(select.candidates(&manager).is_empty());
        assert_eq!(select.slot(), 1);
    }
}
