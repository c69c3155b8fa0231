//! tether-client: client for a hosted remote graph execution service.
//!
//! A [`RemoteGraphClient`] bridges caller intent (one input, one config) to
//! a remote execution: it creates conversation threads, and runs a named
//! graph either to completion ([`RemoteGraphClient::invoke`]) or as a lazy
//! chunk sequence ([`RemoteGraphClient::stream`]) over HTTP(S) and SSE.

mod client;
mod error;
mod sse;

pub mod config;
pub mod types;

pub use client::RemoteGraphClient;
pub use config::{ClientConfig, RunConfig, API_KEY_HEADER};
pub use error::ClientError;
pub use types::{GraphInput, Message, Role, StreamMode, Thread};
