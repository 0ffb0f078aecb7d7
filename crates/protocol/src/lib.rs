//! Wire protocol for the remote file manager API.
//!
//! The remote side is a small CGI exposing four endpoints (`info`, `get`,
//! `put`, `delete`). Every endpoint takes `path=` query parameters and,
//! except `get`, answers with a JSON object carrying an `ok` flag.

pub mod paths;
pub mod query;
pub mod types;

// Re-export primary types for convenience.
pub use query::{INFO_QUERY_LIMIT, InfoBatcher, InfoQuery, encode_path, path_query, put_query};
pub use types::{InfoResponse, NodeKind, NodeProps, StatusResponse};
