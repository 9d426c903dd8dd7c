//! The manifest's `asset` block.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EntityKind, GltfError, GltfResult};

/// Target API profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub api: String,
    pub version: String,
}

/// Metadata about the asset and the tool that wrote it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub version: String,
    pub profile: Option<Profile>,
    pub copyright: Option<String>,
    pub generator: Option<String>,
    #[serde(default)]
    pub premultiplied_alpha: bool,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub extras: Value,
}

impl Asset {
    /// Decode the `asset` member. `version` is required.
    pub fn from_value(value: Option<&Value>) -> GltfResult<Self> {
        let Some(value) = value else {
            return Err(GltfError::missing(EntityKind::Asset, "asset", "version"));
        };
        if value.get("version").and_then(Value::as_str).is_none() {
            return Err(GltfError::missing(EntityKind::Asset, "asset", "version"));
        }
        Asset::deserialize(value)
            .map_err(|e| GltfError::invalid(EntityKind::Asset, "asset", "asset", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_asset_defaults() {
        let asset = Asset::from_value(Some(&json!({ "version": "1.0" }))).unwrap();
        assert_eq!(asset.version, "1.0");
        assert!(!asset.premultiplied_alpha);
        assert!(asset.profile.is_none());
    }

    #[test]
    fn test_asset_full() {
        let asset = Asset::from_value(Some(&json!({
            "version": "1.0.3",
            "generator": "collada2gltf",
            "premultipliedAlpha": true,
            "profile": { "api": "WebGL", "version": "1.0.2" }
        })))
        .unwrap();
        assert_eq!(asset.generator.as_deref(), Some("collada2gltf"));
        assert!(asset.premultiplied_alpha);
        assert_eq!(asset.profile.unwrap().api, "WebGL");
    }

    #[test]
    fn test_version_required() {
        assert!(matches!(
            Asset::from_value(None),
            Err(GltfError::MissingRequiredField { field: "version", .. })
        ));
        assert!(Asset::from_value(Some(&json!({ "generator": "x" }))).is_err());
    }
}
