fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use remotefm_protocol::{InfoResponse, NodeKind, StatusResponse};

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture JSON file and returns it as a `serde_json::Value`.
    fn load_fixture(name: &str) -> serde_json::Value {
        let path = fixtures_dir().join(name);
        let data = fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()));
        serde_json::from_str(&data)
            .unwrap_or_else(|e| panic!("failed to parse fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture, re-serializes it and compares the JSON values.
    ///
    /// Unknown server fields must survive, so the comparison is exact apart
    /// from key order.
    fn roundtrip<T>(name: &str) -> T
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let fixture = load_fixture(name);
        let parsed: T = serde_json::from_value(fixture.clone())
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_value(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));
        assert_eq!(
            fixture, reserialized,
            "roundtrip mismatch for {name}:\n  server: {fixture}\n  client: {reserialized}"
        );
        parsed
    }

    // --- info ---

    #[test]
    fn fixture_info_dir_and_file() {
        let resp: InfoResponse = roundtrip("info_dir_and_file.json");
        assert!(resp.ok);
        let dir = &resp.paths[0];
        assert_eq!(dir.kind, NodeKind::Dir);
        assert_eq!(dir.kids.as_deref(), Some(&["a.txt".to_string(), "sub".to_string()][..]));
        assert_eq!(dir.mtime(), Some(1_700_000_100));

        // Files report their modification time under `ctime` only.
        let file = &resp.paths[1];
        assert_eq!(file.length(), Some(5));
        assert_eq!(file.mtime(), None);
        assert_eq!(file.attributes().get("ctime").map(String::as_str), Some("1700000200"));
        assert!(!file.attributes().contains_key("kids"));
    }

    #[test]
    fn fixture_info_readonly_root() {
        let resp: InfoResponse = roundtrip("info_readonly_root.json");
        let root = &resp.paths[0];
        assert!(root.readonly());
        assert_eq!(root.path, "");
        assert_eq!(root.kids.as_deref().map(<[String]>::len), Some(0));
    }

    #[test]
    fn fixture_info_missing() {
        let resp: InfoResponse = roundtrip("info_missing.json");
        assert!(resp.ok);
        assert!(resp.paths.is_empty());
    }

    #[test]
    fn fixture_info_invalid_path() {
        let resp: InfoResponse = serde_json::from_value(load_fixture("info_invalid_path.json"))
            .expect("failed to deserialize info_invalid_path.json");
        assert!(!resp.ok);
        assert!(resp.paths.is_empty());
        assert_eq!(resp.msg.as_deref(), Some("invalid path \".env\""));
    }

    // --- put / delete ---

    #[test]
    fn fixture_put_ok() {
        let resp: StatusResponse = roundtrip("put_ok.json");
        assert!(resp.ok);
    }

    #[test]
    fn fixture_put_bad_offset() {
        let resp: StatusResponse = roundtrip("put_bad_offset.json");
        assert!(!resp.ok);
        assert_eq!(resp.reason_or("?"), "offset 65536 should be 32768");
    }

    #[test]
    fn fixture_delete_ok() {
        let resp: StatusResponse = roundtrip("delete_ok.json");
        assert!(resp.ok);
        assert_eq!(resp.paths, vec!["docs/sub/x.txt", "docs/sub/"]);
    }

    #[test]
    fn fixture_delete_not_writable() {
        let resp: StatusResponse = roundtrip("delete_not_writable.json");
        assert!(!resp.ok);
        assert!(resp.reason_or("?").starts_with("delete not writable"));
    }
}
