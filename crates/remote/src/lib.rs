//! Clients for the remote file manager API.
//!
//! [`RemoteApi`] is the seam between the upload/reconcile logic and the
//! transport. [`HttpRemote`] talks to the real CGI over HTTP;
//! [`MemoryRemote`] keeps an in-process tree with the same request and
//! response contract and records every request it receives.

pub mod api;
pub mod error;
pub mod http;
pub mod memory;

pub use api::{RemoteApi, RemoteFuture};
pub use error::RemoteError;
pub use http::HttpRemote;
pub use memory::{MemoryRemote, RemoteRequest};
