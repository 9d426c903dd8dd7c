//! Keyed storage for every entity kind.
//!
//! Entities refer to each other by key. The registry owns everything and
//! resolves those keys on demand; [`Registry::validate_references`] checks
//! them all once loading has inserted every entity.

use std::collections::BTreeMap;

use crate::accessor::{Accessor, AccessorView, Buffer, BufferView};
use crate::animation::Animation;
use crate::camera::Camera;
use crate::error::{EntityKind, GltfError, GltfResult};
use crate::material::{Light, Material, MaterialTechnique, SourceValue};
use crate::mesh::Mesh;
use crate::node::{Node, NodeKind};
use crate::scene::Scene;
use crate::skin::Skin;
use crate::technique::{Program, Shader, Technique};
use crate::texture::{Image, ImageSource, Sampler, Texture};

macro_rules! registry {
    ($($field:ident: $ty:ty => $kind:ident, $get:ident, $get_mut:ident, $add:ident;)*) => {
        /// Every loaded entity, keyed per kind. Iteration is in key order.
        #[derive(Clone, Debug, Default)]
        pub struct Registry {
            $($field: BTreeMap<String, $ty>,)*
        }

        impl Registry {
            $(
                pub fn $get(&self, key: &str) -> GltfResult<&$ty> {
                    self.$field
                        .get(key)
                        .ok_or_else(|| GltfError::unknown_key(EntityKind::$kind, key))
                }

                pub fn $get_mut(&mut self, key: &str) -> GltfResult<&mut $ty> {
                    self.$field
                        .get_mut(key)
                        .ok_or_else(|| GltfError::unknown_key(EntityKind::$kind, key))
                }

                /// Insert or replace; the last declaration wins.
                pub fn $add(&mut self, key: impl Into<String>, value: $ty) {
                    let key = key.into();
                    if self.$field.insert(key.clone(), value).is_some() {
                        log::debug!("Replaced {} '{}'", EntityKind::$kind, key);
                    }
                }

                pub fn $field(&self) -> impl Iterator<Item = (&str, &$ty)> {
                    self.$field.iter().map(|(k, v)| (k.as_str(), v))
                }
            )*

            /// Number of entities of `kind`.
            pub fn count(&self, kind: EntityKind) -> usize {
                match kind {
                    $(EntityKind::$kind => self.$field.len(),)*
                    // Singleton, held by the document.
                    EntityKind::Asset => 0,
                }
            }

            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_empty())*
            }
        }
    };
}

registry! {
    accessors: Accessor => Accessor, accessor, accessor_mut, add_accessor;
    animations: Animation => Animation, animation, animation_mut, add_animation;
    buffers: Buffer => Buffer, buffer, buffer_mut, add_buffer;
    buffer_views: BufferView => BufferView, buffer_view, buffer_view_mut, add_buffer_view;
    cameras: Camera => Camera, camera, camera_mut, add_camera;
    images: Image => Image, image, image_mut, add_image;
    lights: Light => Light, light, light_mut, add_light;
    materials: Material => Material, material, material_mut, add_material;
    meshes: Mesh => Mesh, mesh, mesh_mut, add_mesh;
    nodes: Node => Node, node, node_mut, add_node;
    programs: Program => Program, program, program_mut, add_program;
    samplers: Sampler => Sampler, sampler, sampler_mut, add_sampler;
    scenes: Scene => Scene, scene, scene_mut, add_scene;
    shaders: Shader => Shader, shader, shader_mut, add_shader;
    skins: Skin => Skin, skin, skin_mut, add_skin;
    techniques: Technique => Technique, technique, technique_mut, add_technique;
    textures: Texture => Texture, texture, texture_mut, add_texture;
}

fn invalid_ref(entity: EntityKind, key: &str, field: &'static str, reason: String) -> GltfError {
    GltfError::invalid(entity, key, field, reason)
}

impl Registry {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Resolve accessor `key` through its buffer view into its buffer.
    pub fn accessor_view(&self, key: &str) -> GltfResult<AccessorView<'_>> {
        let accessor = self.accessor(key)?;
        let view = self.buffer_view(&accessor.buffer_view)?;
        let buffer = self.buffer(&view.buffer)?;
        accessor.view(key, &accessor.buffer_view, view, buffer)
    }

    /// Bytes covered by buffer view `key`.
    pub fn buffer_view_bytes(&self, key: &str) -> GltfResult<&[u8]> {
        let view = self.buffer_view(key)?;
        let buffer = self.buffer(&view.buffer)?;
        let range = view.range(key, buffer)?;
        Ok(&buffer.data[range])
    }

    /// Node named by a skin joint reference: the node with that key, else
    /// the node whose `jointName` matches.
    pub fn resolve_joint(&self, reference: &str) -> GltfResult<(&str, &Node)> {
        if let Some((key, node)) = self.nodes.get_key_value(reference) {
            return Ok((key.as_str(), node));
        }
        self.nodes()
            .find(|(_, node)| node.joint_name() == Some(reference))
            .ok_or_else(|| GltfError::unknown_key(EntityKind::Node, reference))
    }

    /// Check that every cross-reference resolves. Fails on the first that
    /// does not.
    pub fn validate_references(&self) -> GltfResult<()> {
        for view in self.buffer_views.values() {
            self.buffer(&view.buffer)?;
        }
        for accessor in self.accessors.values() {
            self.buffer_view(&accessor.buffer_view)?;
        }

        for (key, animation) in &self.animations {
            self.accessor(&animation.time_accessor)?;
            for (_, accessor) in &animation.parameters {
                self.accessor(accessor)?;
            }
            for channel in &animation.channels {
                self.node(&channel.target)?;
                if animation.sampler(&channel.sampler).is_none() {
                    return Err(invalid_ref(
                        EntityKind::Animation,
                        key,
                        "channels",
                        format!("unknown sampler '{}'", channel.sampler),
                    ));
                }
            }
            for sampler in &animation.samplers {
                for name in [&sampler.input, &sampler.output] {
                    if !animation.has_parameter(name) {
                        return Err(invalid_ref(
                            EntityKind::Animation,
                            key,
                            "samplers",
                            format!("sampler '{}' names unknown parameter '{}'", sampler.key, name),
                        ));
                    }
                }
            }
        }

        for image in self.images.values() {
            if let ImageSource::BufferView(view) = &image.source {
                self.buffer_view(view)?;
            }
        }
        for texture in self.textures.values() {
            self.image(&texture.source)?;
            self.sampler(&texture.sampler)?;
        }
        for shader in self.shaders.values() {
            if let Some(view) = &shader.buffer_view {
                self.buffer_view(view)?;
            }
        }
        for program in self.programs.values() {
            self.shader(&program.vertex_shader)?;
            self.shader(&program.fragment_shader)?;
        }

        for (key, technique) in &self.techniques {
            self.program(&technique.program)?;
            for parameter in &technique.parameters {
                if let Some(node) = &parameter.node {
                    self.node(node)?;
                }
            }
            for (name, parameter) in technique.attributes.iter().chain(&technique.uniforms) {
                if technique.parameter(parameter).is_none() {
                    return Err(invalid_ref(
                        EntityKind::Technique,
                        key,
                        "parameters",
                        format!("'{}' is bound to unknown parameter '{}'", name, parameter),
                    ));
                }
            }
        }

        for material in self.materials.values() {
            if let MaterialTechnique::Technique(technique) = &material.technique {
                self.technique(technique)?;
            }
            for source in &material.sources {
                if let SourceValue::Texture(texture) = &source.value {
                    self.texture(texture)?;
                }
            }
        }

        for mesh in self.meshes.values() {
            for primitive in &mesh.primitives {
                self.material(&primitive.material)?;
                if let Some(indices) = &primitive.indices {
                    self.accessor(indices)?;
                }
                for (_, accessor) in &primitive.attributes {
                    self.accessor(accessor)?;
                }
            }
        }

        for node in self.nodes.values() {
            for child in &node.child_keys {
                self.node(child)?;
            }
            match &node.kind {
                NodeKind::Transform | NodeKind::Joint(_) => {}
                NodeKind::Camera(camera) => {
                    self.camera(camera)?;
                }
                NodeKind::Light(light) => {
                    self.light(light)?;
                }
                NodeKind::Renderable {
                    meshes,
                    skin,
                    skeletons,
                } => {
                    for mesh in meshes {
                        self.mesh(mesh)?;
                    }
                    if let Some(skin) = skin {
                        self.skin(skin)?;
                    }
                    for skeleton in skeletons {
                        self.node(skeleton)?;
                    }
                }
            }
        }

        for skin in self.skins.values() {
            self.accessor(&skin.inverse_bind_matrices)?;
            for joint in &skin.joints {
                self.resolve_joint(joint)?;
            }
        }
        for scene in self.scenes.values() {
            for node in &scene.nodes {
                self.node(node)?;
            }
        }

        Ok(())
    }

    /// Check every buffer view against its buffer and every accessor against
    /// its buffer view.
    pub fn validate_ranges(&self) -> GltfResult<()> {
        for (key, view) in &self.buffer_views {
            view.range(key, self.buffer(&view.buffer)?)?;
        }
        for key in self.accessors.keys() {
            self.accessor_view(key)?;
        }
        Ok(())
    }
}
