//! JSON-over-Unix-socket service entry.

pub mod client;
pub mod protocol;
pub mod server;

pub use client::send_request;
pub use protocol::{Request, Response, UtteranceView};
pub use server::{IpcServer, RequestHandler};
