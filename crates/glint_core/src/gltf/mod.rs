//! glTF 1.0 file handling: container split, manifest parsing and the
//! load pipeline.

pub mod container;
pub mod json;
pub mod loader;
pub(crate) mod parser;
pub mod uri;

pub use loader::{load_gltf, GltfLoader, LoadOptions};
pub use parser::{KHR_BINARY_GLTF, KHR_MATERIALS_COMMON};
