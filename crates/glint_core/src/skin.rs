//! Skins and the skeletons built from them.

use glint_math::Mat4;
use serde_json::Value;

use crate::accessor::{ComponentType, DataType};
use crate::error::{GltfError, GltfResult};
use crate::registry::Registry;

/// Parent index of the root joint.
pub const ROOT_PARENT: u8 = 0xFF;

/// Most joints a skeleton can index with a `u8` parent.
pub const MAX_JOINTS: usize = 255;

#[derive(Clone, Debug)]
pub struct Skin {
    pub name: String,
    /// Accessor key of the MAT4 inverse-bind matrices
    pub inverse_bind_matrices: String,
    /// `jointNames` as declared: node keys, or joint names of nodes
    pub joints: Vec<String>,
    pub bind_shape_matrix: Mat4,
    pub extras: Value,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Joint {
    /// Index of the parent joint, [`ROOT_PARENT`] for the root
    pub parent_index: u8,
    /// Index into [`Skeleton::joint_names`]
    pub name_index: u32,
    pub inverse_bind: Mat4,
}

impl Joint {
    pub fn is_root(&self) -> bool {
        self.parent_index == ROOT_PARENT
    }
}

/// Joints in skin order; every parent precedes its children.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    pub joints: Vec<Joint>,
    pub joint_names: Vec<String>,
    pub bind_shape_matrix: Mat4,
}

impl Skeleton {
    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    pub fn joint_index(&self, name: &str) -> Option<usize> {
        self.joint_names.iter().position(|n| n == name)
    }

    pub fn joint_name(&self, joint: &Joint) -> Option<&str> {
        self.joint_names.get(joint.name_index as usize).map(String::as_str)
    }

    /// Compose joint-local matrices into model space. Missing locals count
    /// as identity.
    pub fn global_matrices(&self, locals: &[Mat4]) -> Vec<Mat4> {
        let mut globals: Vec<Mat4> = Vec::with_capacity(self.joints.len());
        for (i, joint) in self.joints.iter().enumerate() {
            let local = locals.get(i).copied().unwrap_or(Mat4::IDENTITY);
            let global = match globals.get(joint.parent_index as usize) {
                Some(parent) if !joint.is_root() => *parent * local,
                _ => local,
            };
            globals.push(global);
        }
        globals
    }

    /// Final skinning matrices: model-space joint transform times inverse bind.
    pub fn skin_matrices(&self, locals: &[Mat4]) -> Vec<Mat4> {
        self.global_matrices(locals)
            .into_iter()
            .zip(&self.joints)
            .map(|(global, joint)| global * joint.inverse_bind)
            .collect()
    }
}

fn malformed(skin: &str, reason: impl Into<String>) -> GltfError {
    GltfError::MalformedSkin {
        skin: skin.to_string(),
        reason: reason.into(),
    }
}

/// Check the inverse-bind accessor of skin `key` against its joint list.
pub(crate) fn validate_skin(registry: &Registry, key: &str) -> GltfResult<()> {
    let skin = registry.skin(key)?;
    let accessor = registry.accessor(&skin.inverse_bind_matrices)?;
    if accessor.data_type != DataType::Mat4 || accessor.component_type != ComponentType::Float {
        return Err(malformed(key, "inverseBindMatrices must be a MAT4 FLOAT accessor"));
    }
    if accessor.count != skin.joints.len() {
        return Err(malformed(
            key,
            format!(
                "{} joints but {} inverse bind matrices",
                skin.joints.len(),
                accessor.count
            ),
        ));
    }
    if skin.joints.len() > MAX_JOINTS {
        return Err(malformed(
            key,
            format!("{} joints, at most {} supported", skin.joints.len(), MAX_JOINTS),
        ));
    }
    Ok(())
}

/// Build the skeleton of skin `key`.
///
/// A joint's parent is the earlier joint whose node is its scene-graph
/// parent; when keys differ, the parent node's name is compared against the
/// earlier joint names.
pub fn create_skeleton(registry: &Registry, key: &str) -> GltfResult<Skeleton> {
    validate_skin(registry, key)?;
    let skin = registry.skin(key)?;
    let inverse_binds = registry
        .accessor_view(&skin.inverse_bind_matrices)?
        .read_mat4()?;

    let mut joint_keys: Vec<&str> = Vec::with_capacity(skin.joints.len());
    let mut joint_names: Vec<String> = Vec::with_capacity(skin.joints.len());
    let mut joints = Vec::with_capacity(skin.joints.len());

    for (i, (reference, inverse_bind)) in skin.joints.iter().zip(inverse_binds).enumerate() {
        let (node_key, node) = registry.resolve_joint(reference)?;
        let joint_name = match node.joint_name() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(malformed(key, format!("node '{}' has no jointName", node_key))),
        };

        let parent_index = if i == 0 {
            ROOT_PARENT
        } else {
            let parent_key = node.parent.as_deref().ok_or_else(|| {
                malformed(key, format!("joint '{}' is a second root", joint_name))
            })?;
            let by_key = joint_keys.iter().position(|k| *k == parent_key);
            let by_name = || {
                let parent = registry.node(parent_key).ok()?;
                if parent.name.is_empty() {
                    return None;
                }
                joint_names.iter().position(|n| *n == parent.name)
            };
            match by_key.or_else(by_name) {
                Some(index) => index as u8,
                None => {
                    return Err(malformed(
                        key,
                        format!(
                            "parent '{}' of joint '{}' is not an earlier joint",
                            parent_key, joint_name
                        ),
                    ))
                }
            }
        };

        joint_keys.push(node_key);
        joint_names.push(joint_name.to_string());
        joints.push(Joint {
            parent_index,
            name_index: i as u32,
            inverse_bind,
        });
    }

    log::debug!("Built skeleton '{}' with {} joints", key, joints.len());

    Ok(Skeleton {
        joints,
        joint_names,
        bind_shape_matrix: skin.bind_shape_matrix,
    })
}
