use std::sync::mpsc::TryRecvError;

use log::{debug, warn};

use crate::backend::LinkReceiver;

/// Where a background task currently is.
#[derive(Debug)]
pub enum TaskState<T> {
    /// Nothing submitted, or the last result was taken.
    Idle,
    /// Waiting for the backend to reply.
    Running(LinkReceiver<T>),
    /// The backend replied; the value waits to be taken.
    Completed(T),
}

/// Payload-free view of [`TaskState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Idle,
    Running,
    Completed,
}

/// UI side of a single outstanding backend job.
///
/// At most one job can be in flight: [`BackgroundTask::start`] refuses a new
/// receiver while the current one has not replied.
#[derive(Debug)]
pub struct BackgroundTask<T> {
    state: TaskState<T>,
    description: String,
}

impl<T> Default for BackgroundTask<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BackgroundTask<T> {
    pub fn new() -> Self {
        Self {
            state: TaskState::Idle,
            description: String::new(),
        }
    }

    pub fn start(&mut self, description: &str, rx: LinkReceiver<T>) -> Result<(), String> {
        if self.is_running() {
            // dropping `rx` cancels the rejected request
            return Err(format!(
                "task '{}' is still running, rejected '{description}'",
                self.description
            ));
        }
        debug!("task '{description}' started");
        self.description = description.to_owned();
        self.state = TaskState::Running(rx);
        Ok(())
    }

    /// Poll the backend reply. Returns true if the state changed.
    pub fn try_update(&mut self) -> bool {
        let TaskState::Running(rx) = &self.state else {
            return false;
        };
        match rx.try_recv() {
            Ok(val) => {
                debug!("task '{}' completed", self.description);
                self.state = TaskState::Completed(val);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!(
                    "Backend dropped task '{}' without a reply.",
                    self.description
                );
                self.state = TaskState::Idle;
                true
            }
        }
    }

    /// Take the result of a completed task, returning the task to `Idle`.
    pub fn take_completed(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, TaskState::Idle) {
            TaskState::Completed(val) => Some(val),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.state {
            TaskState::Idle => TaskStatus::Idle,
            TaskState::Running(_) => TaskStatus::Running,
            TaskState::Completed(_) => TaskStatus::Completed,
        }
    }

    pub fn state(&self) -> &TaskState<T> {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TaskState::Running(_))
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}
