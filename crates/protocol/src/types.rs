use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a remote path, as reported by `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Dir,
}

impl NodeKind {
    /// Wire name of the kind (`"file"` or `"dir"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::File => "file",
            NodeKind::Dir => "dir",
        }
    }
}

/// Server-reported metadata for one remote path.
///
/// Only `path` and `type` are guaranteed. Directories carry `kids`; the
/// remaining attributes (`readonly`, `ctime`, `mtime`, `length`, ...) are
/// kept verbatim in `extra` so unknown fields survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kids: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl NodeProps {
    /// Creates props with only the mandatory fields set.
    pub fn new(path: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            path: path.into(),
            kind,
            name: None,
            kids: None,
            extra: BTreeMap::new(),
        }
    }

    /// Sets an explicit display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets an extra attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Dir
    }

    /// Whether the server flagged the path as not writable.
    pub fn readonly(&self) -> bool {
        self.extra
            .get("readonly")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// File length in bytes, if reported.
    pub fn length(&self) -> Option<u64> {
        self.extra.get("length").and_then(Value::as_u64)
    }

    /// Modification time in Unix seconds, if reported.
    pub fn mtime(&self) -> Option<i64> {
        self.extra.get("mtime").and_then(Value::as_i64)
    }

    /// Flattened string snapshot of every attribute except `kids`.
    ///
    /// Two props with equal snapshots render identically; the view layer
    /// compares these to decide whether a node needs rebuilding.
    pub fn attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = BTreeMap::new();
        attrs.insert("path".to_string(), self.path.clone());
        attrs.insert("type".to_string(), self.kind.as_str().to_string());
        if let Some(name) = &self.name {
            attrs.insert("name".to_string(), name.clone());
        }
        for (key, value) in &self.extra {
            if key == "kids" || key == "draggable" {
                continue;
            }
            attrs.insert(key.clone(), value_to_attr(value));
        }
        attrs
    }
}

fn value_to_attr(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Response of the `info` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoResponse {
    pub ok: bool,
    /// Metadata for each requested path that still exists.
    #[serde(default)]
    pub paths: Vec<NodeProps>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
}

impl InfoResponse {
    pub fn ok(paths: Vec<NodeProps>) -> Self {
        Self {
            ok: true,
            paths,
            msg: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            paths: Vec::new(),
            msg: Some(msg.into()),
        }
    }
}

/// Response of the `put` and `delete` endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    /// Paths removed by a successful `delete`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            ok: true,
            msg: None,
            paths: Vec::new(),
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            msg: Some(msg.into()),
            paths: Vec::new(),
        }
    }

    /// Human-readable failure reason, falling back to `fallback`.
    pub fn reason_or(&self, fallback: &str) -> String {
        self.msg.clone().unwrap_or_else(|| fallback.to_string())
    }
}
