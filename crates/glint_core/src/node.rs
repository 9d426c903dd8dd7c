//! Scene graph nodes.

use glint_math::{Mat4, Quat, Transform, Vec3};
use serde_json::Value;

/// A node's local transform as declared in the manifest.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeTransform {
    /// `matrix`: 16 floats, column-major
    Matrix(Mat4),
    /// `translation` / `rotation` / `scale`, each optional
    Decomposed {
        translation: Option<Vec3>,
        rotation: Option<Quat>,
        scale: Option<Vec3>,
    },
}

impl Default for NodeTransform {
    fn default() -> Self {
        NodeTransform::Decomposed {
            translation: None,
            rotation: None,
            scale: None,
        }
    }
}

/// What a node carries besides its transform. At most one of these.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum NodeKind {
    #[default]
    Transform,
    /// Key of a camera
    Camera(String),
    /// Key of a `KHR_materials_common` light
    Light(String),
    /// A skeleton joint, identified by its `jointName`
    Joint(String),
    Renderable {
        /// Mesh keys
        meshes: Vec<String>,
        /// Skin key
        skin: Option<String>,
        /// Keys of skeleton root nodes
        skeletons: Vec<String>,
    },
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: String,
    pub transform: NodeTransform,
    pub kind: NodeKind,
    /// `children` exactly as declared
    pub child_keys: Vec<String>,
    /// Set by the scene linker
    pub parent: Option<String>,
    /// Set by the scene linker, in declaration order
    pub children: Vec<String>,
    pub extras: Value,
}

impl Node {
    /// Local translation. Decomposed from the matrix when the node has one.
    pub fn translation(&self) -> Vec3 {
        self.local_transform().translation
    }

    pub fn rotation(&self) -> Quat {
        self.local_transform().rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.local_transform().scale
    }

    /// The declared `matrix`, or identity when the node uses the
    /// decomposed form.
    pub fn transform_matrix(&self) -> Mat4 {
        match &self.transform {
            NodeTransform::Matrix(m) => *m,
            NodeTransform::Decomposed { .. } => Mat4::IDENTITY,
        }
    }

    pub fn local_transform(&self) -> Transform {
        match &self.transform {
            NodeTransform::Matrix(m) => Transform::from_matrix(*m),
            NodeTransform::Decomposed {
                translation,
                rotation,
                scale,
            } => Transform::new(
                translation.unwrap_or(Vec3::ZERO),
                rotation.unwrap_or(Quat::IDENTITY),
                scale.unwrap_or(Vec3::ONE),
            ),
        }
    }

    /// Local transform as a matrix, whichever form was declared.
    pub fn local_matrix(&self) -> Mat4 {
        match &self.transform {
            NodeTransform::Matrix(m) => *m,
            NodeTransform::Decomposed { .. } => self.local_transform().to_matrix(),
        }
    }

    pub fn joint_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Joint(name) => Some(name),
            _ => None,
        }
    }

    pub fn camera(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Camera(key) => Some(key),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Light(key) => Some(key),
            _ => None,
        }
    }

    pub fn meshes(&self) -> &[String] {
        match &self.kind {
            NodeKind::Renderable { meshes, .. } => meshes,
            _ => &[],
        }
    }

    pub fn skin(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Renderable { skin, .. } => skin.as_deref(),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decomposed_transform() {
        let node = Node {
            transform: NodeTransform::Decomposed {
                translation: Some(Vec3::new(1.0, 2.0, 3.0)),
                rotation: Some(Quat::IDENTITY),
                scale: Some(Vec3::splat(2.0)),
            },
            ..Default::default()
        };

        assert_eq!(node.translation(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(node.rotation(), Quat::IDENTITY);
        assert_eq!(node.scale(), Vec3::splat(2.0));
        assert_eq!(node.transform_matrix(), Mat4::IDENTITY);

        let m = node.local_matrix();
        assert_eq!(m.transform_point3(Vec3::ONE), Vec3::new(3.0, 4.0, 5.0));
    }

    #[test]
    fn test_defaults_are_identity() {
        let node = Node::default();
        assert_eq!(node.local_matrix(), Mat4::IDENTITY);
        assert_eq!(node.scale(), Vec3::ONE);
        assert!(node.is_root());
    }

    #[test]
    fn test_matrix_form() {
        let m = Mat4::from_translation(Vec3::new(4.0, 0.0, 0.0));
        let node = Node {
            transform: NodeTransform::Matrix(m),
            ..Default::default()
        };
        assert_eq!(node.transform_matrix(), m);
        assert!((node.translation() - Vec3::new(4.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_kind_getters() {
        let node = Node {
            kind: NodeKind::Renderable {
                meshes: vec!["m".into()],
                skin: Some("s".into()),
                skeletons: vec![],
            },
            ..Default::default()
        };
        assert_eq!(node.meshes(), ["m".to_string()]);
        assert_eq!(node.skin(), Some("s"));
        assert_eq!(node.joint_name(), None);
    }
}
