//! Error types shared by every stage of the loader.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The kinds of entity a glTF 1.0 manifest declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Asset,
    Accessor,
    Animation,
    Buffer,
    BufferView,
    Camera,
    Image,
    Light,
    Material,
    Mesh,
    Node,
    Program,
    Sampler,
    Scene,
    Shader,
    Skin,
    Technique,
    Texture,
}

impl EntityKind {
    /// The manifest's singular name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Asset => "asset",
            EntityKind::Accessor => "accessor",
            EntityKind::Animation => "animation",
            EntityKind::Buffer => "buffer",
            EntityKind::BufferView => "bufferView",
            EntityKind::Camera => "camera",
            EntityKind::Image => "image",
            EntityKind::Light => "light",
            EntityKind::Material => "material",
            EntityKind::Mesh => "mesh",
            EntityKind::Node => "node",
            EntityKind::Program => "program",
            EntityKind::Sampler => "sampler",
            EntityKind::Scene => "scene",
            EntityKind::Shader => "shader",
            EntityKind::Skin => "skin",
            EntityKind::Technique => "technique",
            EntityKind::Texture => "texture",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while loading or querying a glTF asset.
#[derive(Error, Debug)]
pub enum GltfError {
    #[error("Malformed binary container: {0}")]
    MalformedContainer(String),

    #[error("Truncated binary container: {field} needs {needed} bytes but the file has {available}")]
    TruncatedContainer {
        field: &'static str,
        needed: u64,
        available: u64,
    },

    #[error("Malformed JSON manifest: {0}")]
    MalformedJson(String),

    #[error("{entity} '{key}' is missing required field '{field}'")]
    MissingRequiredField {
        entity: EntityKind,
        key: String,
        field: &'static str,
    },

    #[error("{entity} '{key}' has invalid '{field}': {reason}")]
    InvalidField {
        entity: EntityKind,
        key: String,
        field: &'static str,
        reason: String,
    },

    #[error("Unknown value '{value}' for {entity}.{field}")]
    UnknownEnum {
        entity: EntityKind,
        field: &'static str,
        value: String,
    },

    #[error("Unknown {kind} key '{key}'")]
    UnknownKey { kind: EntityKind, key: String },

    #[error("{entity} '{key}' is out of bounds: {reason}")]
    OutOfBounds {
        entity: EntityKind,
        key: String,
        reason: String,
    },

    #[error("Accessor '{key}' cannot be read as {requested}")]
    UnsupportedAccessor { key: String, requested: &'static str },

    #[error("IO error for '{}': {cause}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        cause: std::io::Error,
    },

    #[error("Image decoding error for '{path}': {cause}")]
    ImageDecode {
        path: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Malformed skin '{skin}': {reason}")]
    MalformedSkin { skin: String, reason: String },

    #[error("Animation '{animation}' parameter '{parameter}' has {actual} keyframes, expected {expected}")]
    MismatchedKeyframes {
        animation: String,
        parameter: String,
        expected: usize,
        actual: usize,
    },

    #[error("No animation targets joint '{joint}'")]
    MissingJointAnimation { joint: String },

    #[error("Cycle in scene graph at node '{node}'")]
    CyclicScene { node: String },

    #[error("Node '{node}' has two parents: '{first}' and '{second}'")]
    MultipleParents {
        node: String,
        first: String,
        second: String,
    },

    #[error("Camera '{camera}' is {actual}, not {requested}")]
    CameraTypeMismatch {
        camera: String,
        requested: &'static str,
        actual: &'static str,
    },
}

/// Result type for loading and query operations.
pub type GltfResult<T> = Result<T, GltfError>;

impl GltfError {
    pub(crate) fn missing(entity: EntityKind, key: &str, field: &'static str) -> Self {
        GltfError::MissingRequiredField {
            entity,
            key: key.to_string(),
            field,
        }
    }

    pub(crate) fn invalid(
        entity: EntityKind,
        key: &str,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        GltfError::InvalidField {
            entity,
            key: key.to_string(),
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown_enum(entity: EntityKind, field: &'static str, value: impl ToString) -> Self {
        GltfError::UnknownEnum {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub(crate) fn unknown_key(kind: EntityKind, key: &str) -> Self {
        GltfError::UnknownKey {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn out_of_bounds(entity: EntityKind, key: &str, reason: impl Into<String>) -> Self {
        GltfError::OutOfBounds {
            entity,
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
