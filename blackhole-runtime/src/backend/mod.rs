mod backend_link;
mod eventloop;

pub use self::{
    backend_link::{BackendLink, BackendRequest, LinkReceiver},
    eventloop::{request_stop, BackendEventLoop, RequestSender},
};

/// State owned by the backend thread. Requests get mutable access to it
/// through [`BackendEventLoop::state`].
pub trait BackendState {}
