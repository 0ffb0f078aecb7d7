//! Query-string encoding and `info` request batching.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Encoded query length after which an `info` batch is sent.
pub const INFO_QUERY_LIMIT: usize = 500;

/// Characters left unescaped by a URI component encoder.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a path for use as a query value.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path, COMPONENT).to_string()
}

/// `path=<encoded>` query for `get` and `delete`.
pub fn path_query(path: &str) -> String {
    format!("path={}", encode_path(path))
}

/// `path=<encoded>&off=<offset>` query for `put`.
pub fn put_query(path: &str, offset: u64) -> String {
    format!("path={}&off={offset}", encode_path(path))
}

/// One `info` request: the requested paths and their encoded query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoQuery {
    paths: Vec<String>,
    query: String,
}

impl InfoQuery {
    /// Query for a single path.
    pub fn single(path: impl Into<String>) -> Self {
        let mut q = Self::default();
        q.push(path.into());
        q
    }

    /// Paths in request order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Encoded query string (`path=a&path=b`).
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn push(&mut self, path: String) {
        if !self.query.is_empty() {
            self.query.push('&');
        }
        self.query.push_str("path=");
        self.query.push_str(&encode_path(&path));
        self.paths.push(path);
    }
}

/// Splits a stream of paths into `info` queries of bounded length.
///
/// A batch is emitted as soon as its encoded query exceeds the limit, so
/// the path that crossed the limit is part of the emitted batch.
#[derive(Debug)]
pub struct InfoBatcher {
    limit: usize,
    current: InfoQuery,
}

impl Default for InfoBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl InfoBatcher {
    pub fn new() -> Self {
        Self::with_limit(INFO_QUERY_LIMIT)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            current: InfoQuery::default(),
        }
    }

    /// Adds a path; returns a full batch once the limit is exceeded.
    pub fn push(&mut self, path: impl Into<String>) -> Option<InfoQuery> {
        self.current.push(path.into());
        if self.current.query.len() > self.limit {
            Some(std::mem::take(&mut self.current))
        } else {
            None
        }
    }

    /// Returns the trailing partial batch, if any.
    pub fn finish(self) -> Option<InfoQuery> {
        if self.current.is_empty() {
            None
        } else {
            Some(self.current)
        }
    }
}
