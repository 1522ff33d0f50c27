//! CLI command handlers.

mod call;
mod config;

pub use call::{run_call, CallArgs};
pub use config::run_config;
