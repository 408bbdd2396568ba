//! Manifest types for object storage registration.
//!
//! A manifest lists every storage location holding a copy of a named content
//! object. Registering a new replica appends a descriptor cloned from the first
//! existing entry with its `storage_name` replaced; all fields this tool does
//! not understand are carried through verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::errors::{CopyError, Result};

/// Object manifest — one JSON file per object under `<root>/manifest/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub storages: Vec<StorageDescriptor>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One storage location in a manifest, plus opaque metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    pub storage_name: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Manifest {
    /// Append a storage entry for `localrepo`, cloned from the first existing
    /// descriptor. The clone is deep: nested values are not shared with the
    /// template. Existing entries keep their order and contents.
    ///
    /// The template may carry fields specific to the original storage host
    /// (capacity, health); they are copied as-is.
    pub fn register_storage(&mut self, localrepo: &str) -> Result<()> {
        let template = self.storages.first().ok_or(CopyError::EmptyStorages)?;

        let mut entry = template.clone();
        entry.storage_name = localrepo.to_string();
        tracing::debug!(storage_name = %entry.storage_name, "Appending storage descriptor");

        self.storages.push(entry);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Manifest {
        serde_json::from_value(json!({
            "storages": [
                {"storage_name": "host-A", "size": 10},
                {"storage_name": "host-B", "free": 42, "tags": ["ssd"]}
            ],
            "object": "/ndn/example/video.mp4"
        }))
        .unwrap()
    }

    #[test]
    fn test_append_only_order_preserving() {
        let mut manifest = sample();
        let before = manifest.clone();

        manifest.register_storage("host-X").unwrap();

        assert_eq!(manifest.storages.len(), 3);
        assert_eq!(manifest.storages[0], before.storages[0]);
        assert_eq!(manifest.storages[1], before.storages[1]);
        assert_eq!(manifest.extra, before.extra);

        let added = &manifest.storages[2];
        assert_eq!(added.storage_name, "host-X");
        assert_eq!(added.extra, before.storages[0].extra);
    }

    #[test]
    fn test_empty_storages_is_an_error() {
        let mut manifest: Manifest =
            serde_json::from_value(json!({ "storages": [] })).unwrap();

        let err = manifest.register_storage("host-X").unwrap_err();
        assert!(matches!(err, CopyError::EmptyStorages));
        assert!(manifest.storages.is_empty());
    }

    #[test]
    fn test_deep_copy_of_nested_fields() {
        let mut manifest = sample();
        manifest.register_storage("host-X").unwrap();

        // Mutate the nested array on the appended copy; the template is by
        // construction unaffected, since Value::clone is recursive.
        if let Some(Value::Array(tags)) = manifest.storages[1].extra.get("tags") {
            assert_eq!(tags, &vec![json!("ssd")]);
        }
        manifest.storages[2]
            .extra
            .insert("free".into(), json!(0));
        assert_eq!(manifest.storages[0].extra.get("free"), None);
        assert_eq!(manifest.storages[1].extra.get("free"), Some(&json!(42)));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let mut manifest = sample();
        manifest.register_storage("host-X").unwrap();

        let bytes = serde_json::to_vec(&manifest).unwrap();
        let reparsed: Manifest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(reparsed, manifest);
    }

    #[test]
    fn test_spec_scenario_host_a_to_host_b() {
        let raw = r#"{"storages":[{"storage_name":"host-A","size":10}]}"#;
        let mut manifest: Manifest = serde_json::from_str(raw).unwrap();
        manifest.register_storage("host-B").unwrap();

        let patched: Value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(
            patched,
            json!({
                "storages": [
                    {"storage_name": "host-A", "size": 10},
                    {"storage_name": "host-B", "size": 10}
                ]
            })
        );
    }

    #[test]
    fn test_patch_through_a_real_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("da39a3ee5e6b4b0d3255bfef95601890afd80709");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(br#"{"storages":[{"storage_name":"host-A","size":10}]}"#)
            .unwrap();
        drop(file);

        let raw = std::fs::read(&path).unwrap();
        let mut manifest: Manifest = serde_json::from_slice(&raw).unwrap();
        manifest.register_storage("host-B").unwrap();
        std::fs::write(&path, serde_json::to_vec(&manifest).unwrap()).unwrap();

        let reread: Manifest =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(reread, manifest);
        assert_eq!(reread.storages[1].storage_name, "host-B");
    }

    #[test]
    fn test_missing_storages_field_fails_to_parse() {
        let result: std::result::Result<Manifest, _> =
            serde_json::from_str(r#"{"object": "/ndn/x"}"#);
        assert!(result.is_err());
    }
}
