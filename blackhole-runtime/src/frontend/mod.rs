mod task;

pub use task::{BackgroundTask, TaskState, TaskStatus};
