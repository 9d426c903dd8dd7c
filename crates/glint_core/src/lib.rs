//! Glint Core - glTF 1.0 asset loading and animation resolution.
//!
//! This crate provides:
//!
//! - **Loading**: `.gltf` JSON manifests and `.glb` binary containers
//!   (`KHR_binary_glTF`), with `data:` URIs and external files
//! - **Entities**: a key-addressed registry of accessors, meshes,
//!   materials, techniques, nodes, skins, animations and the rest
//! - **Scene graph**: parent/child links resolved after load
//! - **Animation**: keyframe clips, sampled per node or per skeleton
//!
//! # Example
//!
//! ```ignore
//! use glint_core::load_gltf;
//!
//! let gltf = load_gltf("CesiumMan.gltf")?;
//! let skeleton = gltf.skeleton("Armature_Cylinder-skin")?;
//! let animation = gltf.skeleton_animation(&skeleton)?;
//! let pose = skeleton.skin_matrices(&animation.sample(0.5));
//! ```

pub mod accessor;
pub mod animation;
pub mod asset;
pub mod camera;
pub mod document;
pub mod error;
pub mod gltf;
pub mod io;
pub mod material;
pub mod mesh;
pub mod node;
pub mod registry;
pub mod scene;
pub mod skin;
pub mod technique;
pub mod texture;

// Re-export commonly used types
pub use accessor::{Accessor, AccessorView, Buffer, BufferView, ComponentType, DataType};
pub use animation::{Animation, Clip, Keyframe, SkeletonAnimation, TransformClip};
pub use asset::Asset;
pub use camera::{Camera, CameraProjection};
pub use document::Gltf;
pub use error::{EntityKind, GltfError, GltfResult};
pub use gltf::{load_gltf, GltfLoader, LoadOptions};
pub use io::{AssetIo, FsIo, MemoryIo};
pub use material::{Light, LightKind, Material};
pub use mesh::{Mesh, MeshGeometry, Primitive};
pub use node::{Node, NodeKind, NodeTransform};
pub use registry::Registry;
pub use scene::Scene;
pub use skin::{Joint, Skeleton, Skin};
pub use technique::{Program, Shader, Technique};
pub use texture::{DecodedImage, Image, ImageDecoder, Sampler, Texture};
