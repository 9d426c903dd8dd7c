//! Meshes and primitives, plus a flattened geometry form for consumers
//! that just want vertex arrays.

use glint_math::{Vec2, Vec3};
use serde_json::Value;

/// GL primitive topology.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn from_gl(value: u64) -> Option<Self> {
        match value {
            0 => Some(PrimitiveMode::Points),
            1 => Some(PrimitiveMode::Lines),
            2 => Some(PrimitiveMode::LineLoop),
            3 => Some(PrimitiveMode::LineStrip),
            4 => Some(PrimitiveMode::Triangles),
            5 => Some(PrimitiveMode::TriangleStrip),
            6 => Some(PrimitiveMode::TriangleFan),
            _ => None,
        }
    }

    pub fn gl_enum(&self) -> u32 {
        match self {
            PrimitiveMode::Points => 0,
            PrimitiveMode::Lines => 1,
            PrimitiveMode::LineLoop => 2,
            PrimitiveMode::LineStrip => 3,
            PrimitiveMode::Triangles => 4,
            PrimitiveMode::TriangleStrip => 5,
            PrimitiveMode::TriangleFan => 6,
        }
    }
}

/// What a vertex attribute channel carries.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AttributeSemantic {
    Position,
    Normal,
    /// TEXCOORD_0 through TEXCOORD_3
    TexCoord(u8),
    Color,
    /// Bone indices
    Joint,
    /// Bone weights
    Weight,
    /// Anything else, JOINTMATRIX included
    Custom(String),
}

impl AttributeSemantic {
    /// Classify a manifest attribute name. Never fails: unknown names become
    /// [`AttributeSemantic::Custom`].
    pub fn parse(name: &str) -> Self {
        match name {
            "POSITION" => AttributeSemantic::Position,
            "NORMAL" => AttributeSemantic::Normal,
            "COLOR" => AttributeSemantic::Color,
            "JOINT" => AttributeSemantic::Joint,
            "WEIGHT" => AttributeSemantic::Weight,
            "JOINTMATRIX" => {
                log::warn!("JOINTMATRIX attribute kept as a custom channel");
                AttributeSemantic::Custom(name.to_string())
            }
            _ => match name.strip_prefix("TEXCOORD_").and_then(|n| n.parse::<u8>().ok()) {
                Some(set) if set < 4 => AttributeSemantic::TexCoord(set),
                _ => {
                    log::warn!("Unrecognized attribute semantic '{}', kept as custom", name);
                    AttributeSemantic::Custom(name.to_string())
                }
            },
        }
    }
}

/// One draw call's worth of geometry.
#[derive(Clone, Debug)]
pub struct Primitive {
    /// (semantic, accessor key) in manifest order
    pub attributes: Vec<(AttributeSemantic, String)>,
    /// Key of the index accessor
    pub indices: Option<String>,
    /// Key of the material
    pub material: String,
    pub mode: PrimitiveMode,
    pub extras: Value,
}

impl Primitive {
    /// Accessor key bound to `semantic`, if any.
    pub fn attribute(&self, semantic: &AttributeSemantic) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(s, _)| s == semantic)
            .map(|(_, key)| key.as_str())
    }
}

/// A set of primitives drawn together.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
    pub extras: Value,
}

/// Vertex arrays of one primitive, read out of its accessors.
///
/// Intentionally decoupled from any GPU vertex layout.
#[derive(Clone, Debug)]
pub struct MeshGeometry {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals, if the primitive has a NORMAL channel
    pub normals: Option<Vec<Vec3>>,

    /// First UV set, if present
    pub uvs: Option<Vec<Vec2>>,

    /// Vertex indices; `None` for non-indexed primitives
    pub indices: Option<Vec<u32>>,

    pub mode: PrimitiveMode,

    /// Component-wise minimum and maximum of the positions
    pub bounds: (Vec3, Vec3),
}

impl MeshGeometry {
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        indices: Option<Vec<u32>>,
        mode: PrimitiveMode,
    ) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            normals,
            uvs,
            indices,
            mode,
            bounds,
        }
    }

    fn compute_bounds(positions: &[Vec3]) -> (Vec3, Vec3) {
        if positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }
        (min, max)
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Only meaningful for triangle lists; other modes are left untouched.
    /// Counter-clockwise winding is front-facing.
    pub fn compute_normals(&mut self) {
        if self.mode != PrimitiveMode::Triangles {
            return;
        }

        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for [i0, i1, i2] in self.triangles() {
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }
            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Ensure normals exist and match the vertex count, computing them if not.
    pub fn ensure_normals(&mut self) {
        let len = self.normals.as_ref().map(Vec::len);
        if len != Some(self.positions.len()) {
            if let Some(len) = len {
                log::debug!(
                    "Normals array length ({}) doesn't match vertex count ({}), computing smooth normals",
                    len,
                    self.positions.len()
                );
            }
            self.compute_normals();
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in a TRIANGLES primitive, zero otherwise.
    pub fn triangle_count(&self) -> usize {
        if self.mode != PrimitiveMode::Triangles {
            return 0;
        }
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    /// Get the geometry center (center of the bounds).
    pub fn center(&self) -> Vec3 {
        (self.bounds.0 + self.bounds.1) * 0.5
    }

    fn triangles(&self) -> Vec<[usize; 3]> {
        match &self.indices {
            Some(indices) => indices
                .chunks_exact(3)
                .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
                .collect(),
            None => (0..self.positions.len() / 3)
                .map(|t| [t * 3, t * 3 + 1, t * 3 + 2])
                .collect(),
        }
    }
}
