//! The main window: owner of the requested control state, the dataset
//! manager and the two broadcast channels.
//!
//! It does not draw anything itself; applications embed it in their
//! `eframe::App` and route widget events through it.

use crate::broadcast::{Broadcaster, SharedControlListener, SharedDatasetListener};
use crate::control::ControlState;
use crate::dataset::Dataset;
use crate::error::DatasetError;
use crate::listener::Controller;
use crate::manager::{DatasetManager, Slot};
use crate::source::SourceId;

pub struct MainWindow<D: Dataset + 'static> {
    title: String,
    control_requested: ControlState,
    data_manager: DatasetManager<D>,
    broadcaster: Broadcaster<D>,
}

impl<D: Dataset + 'static> MainWindow<D> {
    pub fn new(title: &str, mut data_manager: DatasetManager<D>) -> Self {
        let broadcaster = Broadcaster::new();
        data_manager.set_dataset_changed_callback(broadcaster.dataset_callback());
        log::info!("creating main window '{title}'");
        Self {
            title: title.to_owned(),
            control_requested: ControlState::new("requested"),
            data_manager,
            broadcaster,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn control_requested(&self) -> &ControlState {
        &self.control_requested
    }

    pub fn data_manager(&self) -> &DatasetManager<D> {
        &self.data_manager
    }

    pub fn add_control_subscriber(&mut self, listener: SharedControlListener) {
        self.broadcaster.add_control_subscriber(listener);
    }

    pub fn add_dataset_subscriber(&mut self, listener: SharedDatasetListener<D>) {
        self.broadcaster.add_dataset_subscriber(listener);
    }

    pub fn broadcast_control_changes(&self) -> usize {
        self.broadcaster
            .broadcast_control_changes(&self.control_requested)
    }

    /// Re-send the active dataset of `slot` to all dataset subscribers.
    pub fn broadcast_dataset_changes(&self, slot: Slot) -> Result<usize, DatasetError> {
        let dataset = self.data_manager.try_get_active(slot)?;
        Ok(self.broadcaster.broadcast_dataset_changes(slot, dataset))
    }

    /// Run `handler` on the requested control state, then broadcast.
    ///
    /// This is the only way user input reaches the control subscribers.
    pub fn control_changed<R>(&mut self, handler: impl FnOnce(&mut ControlState) -> R) -> R {
        let res = handler(&mut self.control_requested);
        self.broadcast_control_changes();
        res
    }

    pub fn apply_controller(&mut self, controller: &dyn Controller) {
        self.control_changed(|control| controller.write_controls(control));
    }

    /// Change a listener's visibility; becoming visible renders it if stale.
    pub fn set_listener_active(&self, listener: &SharedControlListener, active: bool) {
        let Ok(mut listener) = listener.try_borrow_mut() else {
            log::warn!("cannot change activity of a listener that is busy");
            return;
        };
        if let Err(err) = listener.set_active(active, &self.control_requested) {
            log::error!("listener failed to render on activation: {err}");
        }
    }

    /// Activate data source `id` in `slot`. Dataset subscribers are notified
    /// on success.
    pub fn set_active_dataset(&mut self, id: SourceId, slot: Slot) -> Result<(), DatasetError> {
        self.data_manager.set_active(id, slot)
    }
}
