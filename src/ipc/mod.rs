mod error;
mod handlers;
mod router;
mod types;

pub use router::handle_request;
pub use types::{AppHandle, Request};
