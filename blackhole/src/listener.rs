//! Contracts of widgets taking part in control and dataset broadcasts.

use crate::control::ControlState;
use crate::manager::Slot;

/// Visibility and freshness of a listener's output.
///
/// Rendering happens only when a listener is active but not current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerState {
    is_active: bool,
    is_current: bool,
}

impl Default for ListenerState {
    fn default() -> Self {
        Self {
            is_active: true,
            is_current: false,
        }
    }
}

impl ListenerState {
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_current(&self) -> bool {
        self.is_current
    }

    pub fn needs_render(&self) -> bool {
        self.is_active && !self.is_current
    }
}

/// A widget whose output depends on the requested control state.
pub trait ControlListener {
    fn listener_state(&self) -> &ListenerState;
    fn listener_state_mut(&mut self) -> &mut ListenerState;

    /// Recompute the widget's output from `control`. Calling it while
    /// already current must be harmless.
    fn render(&mut self, control: &ControlState) -> Result<(), String>;

    fn is_active(&self) -> bool {
        self.listener_state().is_active
    }

    fn is_current(&self) -> bool {
        self.listener_state().is_current
    }

    /// Entry point of the control broadcast: the output is stale from now
    /// on, and rendered right away if the widget is active.
    fn get_update(&mut self, control: &ControlState) -> Result<(), String> {
        self.listener_state_mut().is_current = false;
        self.refresh(control).map(|_| ())
    }

    /// Render if active and stale. Returns whether rendering happened.
    fn refresh(&mut self, control: &ControlState) -> Result<bool, String> {
        if !self.listener_state().needs_render() {
            return Ok(false);
        }
        self.render(control)?;
        self.listener_state_mut().is_current = true;
        Ok(true)
    }

    /// Activating a stale widget renders it immediately.
    fn set_active(&mut self, active: bool, control: &ControlState) -> Result<(), String> {
        self.listener_state_mut().is_active = active;
        if active {
            self.refresh(control)?;
        }
        Ok(())
    }
}

/// A widget that follows the active dataset of one or more slots.
pub trait DatasetListener<D> {
    fn dataset_changed(&mut self, slot: Slot, dataset: &D) -> Result<(), String>;
}

/// A widget that writes user input into the requested control state.
///
/// Writes go through [`crate::MainWindow::apply_controller`], which
/// broadcasts the change afterwards.
pub trait Controller {
    fn write_controls(&self, control: &mut ControlState);
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Counts renders, optionally failing every one of them.
    #[derive(Default)]
    pub(crate) struct Probe {
        pub state: ListenerState,
        pub renders: usize,
        pub fail: bool,
    }

    impl ControlListener for Probe {
        fn listener_state(&self) -> &ListenerState {
            &self.state
        }
        fn listener_state_mut(&mut self) -> &mut ListenerState {
            &mut self.state
        }
        fn render(&mut self, _control: &ControlState) -> Result<(), String> {
            self.renders += 1;
            if self.fail {
                Err("probe failure".into())
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_active_stale_listener_renders() {
        let control = ControlState::new("requested");
        let mut probe = Probe::default();
        assert!(probe.is_active());
        assert!(!probe.is_current());

        probe.get_update(&control).unwrap();
        assert_eq!(probe.renders, 1);
        assert!(probe.is_current());

        // already current, nothing to do
        assert_eq!(probe.refresh(&control), Ok(false));
        assert_eq!(probe.renders, 1);
    }

    #[test]
    fn test_inactive_listener_renders_on_activation() {
        let control = ControlState::new("requested");
        let mut probe = Probe::default();
        probe.set_active(false, &control).unwrap();

        probe.get_update(&control).unwrap();
        probe.get_update(&control).unwrap();
        assert_eq!(probe.renders, 0);
        assert!(!probe.is_current());

        probe.set_active(true, &control).unwrap();
        assert_eq!(probe.renders, 1);
        assert!(probe.is_current());

        // activating a current listener does not render again
        probe.set_active(true, &control).unwrap();
        assert_eq!(probe.renders, 1);
    }

    #[test]
    fn test_update_while_hidden_clears_current() {
        let control = ControlState::new("requested");
        let mut probe = Probe::default();
        probe.get_update(&control).unwrap();
        probe.set_active(false, &control).unwrap();
        assert!(probe.is_current());

        probe.get_update(&control).unwrap();
        assert!(!probe.is_current());
        assert_eq!(probe.renders, 1);
    }

    #[test]
    fn test_failed_render_stays_stale() {
        let control = ControlState::new("requested");
        let mut probe = Probe {
            fail: true,
            ..Default::default()
        };
        assert!(probe.get_update(&control).is_err());
        assert!(!probe.is_current());
        assert!(probe.listener_state().needs_render());
    }
}
