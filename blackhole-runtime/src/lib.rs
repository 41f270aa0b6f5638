#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod frontend;
pub mod string_error;

pub const BACKEND_HUNG_UP_MSG: &str = "backend event loop hung up";

#[cfg(test)]
mod tests {
    use std::sync::mpsc::channel;
    use std::time::{Duration, Instant};

    use log::trace;

    use crate::backend::{request_stop, BackendEventLoop, BackendLink, BackendState};
    use crate::frontend::{BackgroundTask, TaskStatus};

    #[derive(Default)]
    struct TestState {
        handled: usize,
    }
    impl BackendState for TestState {}

    fn wait_for<T>(task: &mut BackgroundTask<T>) {
        let tic = Instant::now();
        while !task.try_update() {
            assert!(tic.elapsed() < Duration::from_secs(5), "task never finished");
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    #[test]
    fn test_cancel_request_working() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let tic = Instant::now();

        let (rx, linker) = BackendLink::new("test", |_: &mut BackendEventLoop<TestState>| {
            std::thread::sleep(Duration::from_millis(1000));
        });

        // dropping rx makes the request invalid, such that the backend
        // action (waiting for 1 s) is not executed ...
        drop(rx);
        trace!("drop of receiver done");
        assert!(linker.is_cancelled());
        request_tx.send(Box::new(linker)).unwrap();
        request_stop(&request_tx, eventloop_handle);
        // ... thus this whole process takes much less than a second
        assert!(tic.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn test_backend_state_is_mutated_in_order() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let mut first = BackgroundTask::new();
        let mut second = BackgroundTask::new();
        let bump = |b: &mut BackendEventLoop<TestState>| {
            b.state.handled += 1;
            b.state.handled
        };
        BackendLink::submit_task(&mut first, "first", bump, &request_tx).unwrap();
        BackendLink::submit_task(&mut second, "second", bump, &request_tx).unwrap();
        wait_for(&mut first);
        wait_for(&mut second);

        assert_eq!(first.take_completed(), Some(1));
        assert_eq!(second.take_completed(), Some(2));
        assert_eq!(first.status(), TaskStatus::Idle);
        request_stop(&request_tx, eventloop_handle);
    }

    #[test]
    fn test_resubmission_rejected_while_running() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let mut task = BackgroundTask::new();
        let slow = |_: &mut BackendEventLoop<TestState>| {
            std::thread::sleep(Duration::from_millis(100));
            "slow"
        };
        BackendLink::submit_task(&mut task, "slow job", slow, &request_tx).unwrap();
        assert_eq!(task.status(), TaskStatus::Running);

        let rejected = BackendLink::submit_task(
            &mut task,
            "second job",
            |_: &mut BackendEventLoop<TestState>| "fast",
            &request_tx,
        );
        assert!(rejected.is_err());
        assert_eq!(task.description(), "slow job");

        wait_for(&mut task);
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(task.take_completed(), Some("slow"));
        assert_eq!(task.take_completed(), None);
        request_stop(&request_tx, eventloop_handle);
    }

    #[test]
    fn test_rejected_job_never_reaches_backend() {
        let _ = env_logger::builder().is_test(true).try_init();

        let (request_tx, request_rx) = channel();
        let eventloop_handle = BackendEventLoop::new(request_rx, TestState::default()).run();

        let mut task = BackgroundTask::new();
        let slow = |b: &mut BackendEventLoop<TestState>| {
            std::thread::sleep(Duration::from_millis(50));
            b.state.handled
        };
        let bump = |b: &mut BackendEventLoop<TestState>| {
            b.state.handled += 1;
            b.state.handled
        };
        BackendLink::submit_task(&mut task, "slow", slow, &request_tx).unwrap();
        let rejected = BackendLink::submit_task(&mut task, "bump", bump, &request_tx);
        assert!(rejected.unwrap_err().contains("still running"));

        wait_for(&mut task);
        assert_eq!(task.take_completed(), Some(0));
        BackendLink::submit_task(&mut task, "read", slow, &request_tx).unwrap();
        wait_for(&mut task);
        assert_eq!(task.take_completed(), Some(0));
        request_stop(&request_tx, eventloop_handle);
    }

    #[test]
    fn test_eventloop_update_stops_without_senders() {
        let (request_tx, request_rx) =
            channel::<Box<dyn crate::backend::BackendRequest<TestState>>>();
        let mut eventloop = BackendEventLoop::new(request_rx, TestState::default());
        assert!(!eventloop.update());
        drop(request_tx);
        assert!(eventloop.update());
    }
}
