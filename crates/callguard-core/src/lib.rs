pub mod config;
pub mod logging;

pub mod control;
pub mod dispatcher;
pub mod error;
pub mod error_body;
pub mod http;
pub mod retry;
pub mod scheduler;

mod oneshot;

pub use control::CancelToken;
pub use dispatcher::Dispatcher;
pub use error::ApiError;
pub use http::{HttpClient, Method, Request, Response};
