use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::thread::JoinHandle;

use log::{debug, info, warn};

use crate::backend::{BackendLink, BackendRequest, BackendState};

pub type RequestSender<S> = Sender<Box<dyn BackendRequest<S>>>;

pub struct BackendEventLoop<S>
where
    S: BackendState,
{
    pub state: S,
    request_rx: Receiver<Box<dyn BackendRequest<S>>>,
    should_stop: bool,
}

impl<S: BackendState + Send + 'static> BackendEventLoop<S> {
    /// Run every request that is already queued, without blocking.
    ///
    /// Returns true if the loop was asked to stop or all senders are gone.
    pub fn update(&mut self) -> bool {
        loop {
            match self.request_rx.try_recv() {
                Ok(request) => self.handle(request),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.should_stop = true;
                    break;
                }
            }
            if self.should_stop {
                break;
            }
        }
        self.should_stop
    }

    fn handle(&mut self, request: Box<dyn BackendRequest<S>>) {
        debug!("handling request '{}'", request.describe());
        request.run_on_backend(self);
    }

    pub fn run(mut self) -> JoinHandle<()> {
        std::thread::spawn(move || {
            while !self.should_stop {
                match self.request_rx.recv() {
                    Ok(request) => self.handle(request),
                    Err(_) => {
                        info!("all request senders dropped");
                        break;
                    }
                }
            }
            info!("stopping backend event loop");
        })
    }

    pub fn new(request_rx: Receiver<Box<dyn BackendRequest<S>>>, state: S) -> Self {
        info!("creating new event loop");
        Self {
            state,
            request_rx,
            should_stop: false,
        }
    }

    pub fn signal_stop(&mut self) -> bool {
        self.should_stop = true;
        true
    }
}

pub fn request_stop<S: BackendState + Send + 'static>(
    request_tx: &RequestSender<S>,
    backend_thread_handle: JoinHandle<()>,
) {
    let (rx, signal_end_linker) =
        BackendLink::new("try end event loop", |b: &mut BackendEventLoop<S>| {
            b.signal_stop()
        });
    info!("sending signal to end backend event loop");
    if request_tx.send(Box::new(signal_end_linker)).is_ok() {
        if let Err(e) = rx.recv_timeout(std::time::Duration::from_secs(10)) {
            warn!("did not receive a response after 10 seconds: {e}");
        };
    };
    match backend_thread_handle.join() {
        Ok(_) => info!("backend event loop ended"),
        Err(e) => warn!("failed to signal event loop to stop: {e:?}"),
    }
}
