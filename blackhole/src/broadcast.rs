//! Fan-out of control and dataset changes to registered widgets.
//!
//! Subscribers are notified synchronously, in registration order. A failing
//! subscriber is logged and skipped; the remaining subscribers are still
//! notified.

use std::cell::RefCell;
use std::rc::Rc;

use crate::control::ControlState;
use crate::listener::{ControlListener, DatasetListener};
use crate::manager::{DatasetChangedCallback, Slot};

pub type SharedControlListener = Rc<RefCell<dyn ControlListener>>;
pub type SharedDatasetListener<D> = Rc<RefCell<dyn DatasetListener<D>>>;

type DatasetSubscribers<D> = Rc<RefCell<Vec<SharedDatasetListener<D>>>>;

pub struct Broadcaster<D> {
    control_subscribers: Vec<SharedControlListener>,
    dataset_subscribers: DatasetSubscribers<D>,
}

impl<D> Default for Broadcaster<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Broadcaster<D> {
    pub fn new() -> Self {
        Self {
            control_subscribers: Vec::new(),
            dataset_subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn add_control_subscriber(&mut self, listener: SharedControlListener) {
        self.control_subscribers.push(listener);
        log::debug!(
            "registered control subscriber #{}",
            self.control_subscribers.len()
        );
    }

    pub fn add_dataset_subscriber(&self, listener: SharedDatasetListener<D>) {
        let mut subscribers = self.dataset_subscribers.borrow_mut();
        subscribers.push(listener);
        log::debug!("registered dataset subscriber #{}", subscribers.len());
    }

    pub fn control_subscriber_count(&self) -> usize {
        self.control_subscribers.len()
    }

    pub fn dataset_subscriber_count(&self) -> usize {
        self.dataset_subscribers.borrow().len()
    }

    /// Tell every control subscriber that `control` changed. Returns the
    /// number of subscribers that handled the update without error.
    pub fn broadcast_control_changes(&self, control: &ControlState) -> usize {
        let mut handled = 0;
        for (idx, subscriber) in self.control_subscribers.iter().enumerate() {
            let Ok(mut listener) = subscriber.try_borrow_mut() else {
                log::warn!("control subscriber #{idx} is busy, skipping re-entrant update");
                continue;
            };
            match listener.get_update(control) {
                Ok(()) => handled += 1,
                Err(err) => log::error!("control subscriber #{idx} failed to update: {err}"),
            }
        }
        handled
    }
}

impl<D: 'static> Broadcaster<D> {
    pub fn broadcast_dataset_changes(&self, slot: Slot, dataset: &D) -> usize {
        notify_dataset_subscribers(&self.dataset_subscribers, slot, dataset)
    }

    /// Callback for [`crate::DatasetManager::set_dataset_changed_callback`],
    /// sharing this broadcaster's dataset subscriber list.
    pub fn dataset_callback(&self) -> DatasetChangedCallback<D> {
        let subscribers = self.dataset_subscribers.clone();
        Box::new(move |slot, dataset: &D| {
            notify_dataset_subscribers(&subscribers, slot, dataset);
        })
    }
}

fn notify_dataset_subscribers<D>(
    subscribers: &DatasetSubscribers<D>,
    slot: Slot,
    dataset: &D,
) -> usize {
    // Snapshot, so handlers may register further subscribers.
    let snapshot: Vec<_> = subscribers.borrow().iter().cloned().collect();
    let mut handled = 0;
    for (idx, subscriber) in snapshot.iter().enumerate() {
        let Ok(mut listener) = subscriber.try_borrow_mut() else {
            log::warn!("dataset subscriber #{idx} is busy, skipping re-entrant update");
            continue;
        };
        match listener.dataset_changed(slot, dataset) {
            Ok(()) => handled += 1,
            Err(err) => log::error!("dataset subscriber #{idx} failed to update: {err}"),
        }
    }
    handled
}
