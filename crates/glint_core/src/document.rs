//! The loaded asset and its query surface.

use glint_math::{Mat4, OrthographicProjection, PerspectiveProjection};

use crate::accessor::AccessorView;
use crate::animation::{self, ParameterData, SkeletonAnimation, TransformClip};
use crate::asset::Asset;
use crate::error::{EntityKind, GltfError, GltfResult};
use crate::mesh::{AttributeSemantic, MeshGeometry};
use crate::node::Node;
use crate::registry::Registry;
use crate::scene::{self, Scene};
use crate::skin::{self, Skeleton};

/// A fully loaded, validated and linked glTF asset.
///
/// Immutable once built, so it can be shared across threads freely.
#[derive(Clone, Debug)]
pub struct Gltf {
    registry: Registry,
    extensions_used: Vec<String>,
    asset: Asset,
    default_scene: Option<String>,
}

impl Gltf {
    pub(crate) fn new(
        registry: Registry,
        extensions_used: Vec<String>,
        asset: Asset,
        default_scene: Option<String>,
    ) -> Self {
        Self {
            registry,
            extensions_used,
            asset,
            default_scene,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn asset(&self) -> &Asset {
        &self.asset
    }

    /// Extension names, sorted.
    pub fn extensions_used(&self) -> &[String] {
        &self.extensions_used
    }

    pub fn has_extension(&self, name: &str) -> bool {
        self.extensions_used
            .binary_search_by(|e| e.as_str().cmp(name))
            .is_ok()
    }

    /// Key of the scene named by `scene`, else the first scene in key order.
    pub fn default_scene_key(&self) -> Option<&str> {
        self.default_scene
            .as_deref()
            .or_else(|| self.registry.scenes().next().map(|(key, _)| key))
    }

    pub fn default_scene(&self) -> Option<&Scene> {
        self.default_scene_key()
            .and_then(|key| self.registry.scene(key).ok())
    }

    pub fn accessor_view(&self, key: &str) -> GltfResult<AccessorView<'_>> {
        self.registry.accessor_view(key)
    }

    pub fn node_parent(&self, key: &str) -> GltfResult<Option<&Node>> {
        match self.registry.node(key)?.parent.as_deref() {
            Some(parent) => self.registry.node(parent).map(Some),
            None => Ok(None),
        }
    }

    pub fn node_children(&self, key: &str) -> GltfResult<Vec<(&str, &Node)>> {
        let node = self.registry.node(key)?;
        let mut children = Vec::with_capacity(node.children.len());
        for child in &node.children {
            children.push((child.as_str(), self.registry.node(child)?));
        }
        Ok(children)
    }

    /// First linked child of `key` whose `name` is `name`.
    pub fn node_child_by_name(&self, key: &str, name: &str) -> GltfResult<Option<(&str, &Node)>> {
        for (child_key, child) in self.node_children(key)? {
            if child.name == name {
                return Ok(Some((child_key, child)));
            }
        }
        Ok(None)
    }

    pub fn find_node_by_key(&self, key: &str, root: &str) -> Option<&Node> {
        scene::find_node_by_key(&self.registry, key, root)
    }

    pub fn world_transform(&self, key: &str) -> GltfResult<Mat4> {
        scene::world_transform(&self.registry, key)
    }

    pub fn animation_parameters(&self, key: &str) -> GltfResult<Vec<ParameterData>> {
        animation::parameters(&self.registry, key)
    }

    pub fn transform_clip(&self, key: &str) -> GltfResult<TransformClip> {
        animation::transform_clip(&self.registry, key)
    }

    pub fn skeleton(&self, skin: &str) -> GltfResult<Skeleton> {
        skin::create_skeleton(&self.registry, skin)
    }

    pub fn skeleton_animation(&self, skeleton: &Skeleton) -> GltfResult<SkeletonAnimation> {
        animation::skeleton_animation(&self.registry, skeleton)
    }

    pub fn perspective_camera(&self, key: &str) -> GltfResult<PerspectiveProjection> {
        self.registry.camera(key)?.perspective(key)
    }

    pub fn orthographic_camera(&self, key: &str) -> GltfResult<OrthographicProjection> {
        self.registry.camera(key)?.orthographic(key)
    }

    /// Read primitive `index` of mesh `mesh` into CPU-side geometry.
    /// `POSITION` is required; normals, the first UV set and indices are
    /// read when present.
    pub fn primitive_geometry(&self, mesh: &str, index: usize) -> GltfResult<MeshGeometry> {
        let primitive = self.registry.mesh(mesh)?.primitives.get(index).ok_or_else(|| {
            GltfError::out_of_bounds(
                EntityKind::Mesh,
                mesh,
                format!("no primitive at index {}", index),
            )
        })?;

        let positions = primitive
            .attribute(&AttributeSemantic::Position)
            .ok_or_else(|| GltfError::missing(EntityKind::Mesh, mesh, "POSITION"))?;
        let positions = self.accessor_view(positions)?.read_vec3()?;

        let normals = primitive
            .attribute(&AttributeSemantic::Normal)
            .map(|key| self.accessor_view(key)?.read_vec3())
            .transpose()?;
        let uvs = primitive
            .attribute(&AttributeSemantic::TexCoord(0))
            .map(|key| self.accessor_view(key)?.read_vec2())
            .transpose()?;
        let indices = primitive
            .indices
            .as_deref()
            .map(|key| self.accessor_view(key)?.read_indices())
            .transpose()?;

        Ok(MeshGeometry::new(positions, normals, uvs, indices, primitive.mode))
    }
}
