//! # Configuration Loading
//!
//! Configuration is supplied as an ordered list of YAML documents. Each
//! document must carry its data under a top-level `Config` key:
//!
//! ```yaml
//! Config:
//!   Go:
//!     Version: "1.22.5"
//! ```
//!
//! Documents are merged left to right with [`crate::merge::merge`], so later
//! documents override earlier ones at the same key path. The merged mapping is
//! the data every template executes against.

use std::path::Path;

use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::filesystem::FileSystem;
use crate::merge::merge;

/// Name of the required top-level key in every configuration document.
pub const CONFIG_KEY: &str = "Config";

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    #[serde(rename = "Config")]
    config: Option<Value>,
}

/// The merged configuration of a generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSpec {
    config: Value,
}

impl ConfigSpec {
    /// An empty configuration.
    pub fn new() -> Self {
        Self {
            config: Value::Object(Map::new()),
        }
    }

    /// Load and merge the documents at `names`, in order.
    pub fn load<P: AsRef<Path>>(fs: &dyn FileSystem, names: &[P]) -> Result<Self> {
        let mut spec = Self::new();
        for name in names {
            spec.merge_file(fs, name.as_ref())?;
        }
        Ok(spec)
    }

    /// Merge one more document file on top of the current configuration.
    pub fn merge_file(&mut self, fs: &dyn FileSystem, name: &Path) -> Result<()> {
        let content = fs.read_to_string(name)?;
        let data = parse(&content).map_err(|err| match err {
            Error::ConfigInvalid { message } => Error::ConfigInvalid {
                message: format!("{}: {}", message, name.display()),
            },
            other => other,
        })?;

        debug!("Merging configuration from {}", name.display());
        self.merge_value(data);
        Ok(())
    }

    /// Merge an already parsed `Config` mapping on top of the current one.
    pub fn merge_value(&mut self, data: Value) {
        let current = std::mem::take(&mut self.config);
        self.config = merge(current, data);
    }

    /// The merged mapping.
    pub fn config(&self) -> &Value {
        &self.config
    }

    pub fn into_value(self) -> Value {
        self.config
    }
}

impl Default for ConfigSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one configuration document and return its `Config` mapping.
pub fn parse(content: &str) -> Result<Value> {
    let document: ConfigDocument = serde_yaml::from_str(content)?;
    match document.config {
        Some(config @ Value::Object(_)) => Ok(config),
        Some(other) if !other.is_null() => Err(Error::ConfigInvalid {
            message: format!("field '{}' must be a mapping", CONFIG_KEY),
        }),
        _ => Err(Error::ConfigInvalid {
            message: format!("required field '{}' not found", CONFIG_KEY),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::MemoryFS;
    use serde_json::json;

    #[test]
    fn test_load_merges_in_order() {
        let fs = MemoryFS::new();
        fs.add_file_string(
            "/config/config1.yaml",
            "Config:\n  Go:\n    Version:\n      Full: \"1.22.5\"",
        )
        .unwrap();
        fs.add_file_string(
            "/config/config2.yaml",
            "Config:\n  Go:\n    Packages:\n      - something",
        )
        .unwrap();

        let spec = ConfigSpec::load(
            &fs,
            &["/config/config1.yaml", "/config/config2.yaml"],
        )
        .unwrap();

        assert_eq!(
            spec.config(),
            &json!({
                "Go": {
                    "Version": {"Full": "1.22.5"},
                    "Packages": ["something"]
                }
            })
        );
    }

    #[test]
    fn test_load_later_document_wins() {
        let fs = MemoryFS::new();
        fs.add_file_string("/c1.yaml", "Config:\n  Name: first\n  Keep: yes")
            .unwrap();
        fs.add_file_string("/c2.yaml", "Config:\n  Name: second").unwrap();

        let spec = ConfigSpec::load(&fs, &["/c1.yaml", "/c2.yaml"]).unwrap();
        assert_eq!(spec.config()["Name"], json!("second"));
        assert_eq!(spec.config()["Keep"], json!("yes"));
    }

    #[test]
    fn test_load_no_documents() {
        let fs = MemoryFS::new();
        let spec = ConfigSpec::load(&fs, &[] as &[&str]).unwrap();
        assert_eq!(spec.config(), &json!({}));
    }

    #[test]
    fn test_load_missing_config_key() {
        let fs = MemoryFS::new();
        fs.add_file_string("/bad.yaml", "Other:\n  Name: x").unwrap();

        let err = ConfigSpec::load(&fs, &["/bad.yaml"]).unwrap_err();
        match err {
            Error::ConfigInvalid { message } => {
                assert!(message.contains("required field 'Config' not found"));
                assert!(message.contains("/bad.yaml"));
            }
            other => panic!("expected ConfigInvalid, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_mapping_config() {
        let err = parse("Config: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));

        let err = parse("Config:").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = parse("Config: [").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let fs = MemoryFS::new();
        let err = ConfigSpec::load(&fs, &["/missing.yaml"]).unwrap_err();
        assert!(err.is_not_found());
    }
}
