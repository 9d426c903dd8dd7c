//! Shaders, programs and techniques: the GL rendering recipe a material
//! points at.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Shader stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderType {
    Vertex,
    Fragment,
}

impl ShaderType {
    pub fn from_gl(value: u64) -> Option<Self> {
        match value {
            35633 => Some(ShaderType::Vertex),
            35632 => Some(ShaderType::Fragment),
            _ => None,
        }
    }
}

/// A GLSL shader with its source already loaded.
#[derive(Clone, Debug)]
pub struct Shader {
    pub name: String,
    pub uri: Option<String>,
    /// Set when the source lives in the binary chunk (`KHR_binary_glTF`)
    pub buffer_view: Option<String>,
    pub shader_type: ShaderType,
    pub source: String,
    pub extras: Value,
}

/// A vertex + fragment shader pair.
#[derive(Clone, Debug)]
pub struct Program {
    pub name: String,
    /// Key of the vertex shader
    pub vertex_shader: String,
    /// Key of the fragment shader
    pub fragment_shader: String,
    pub attributes: Vec<String>,
    pub extras: Value,
}

/// Fixed-function state overrides, straight from `states.functions`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateFunctions {
    pub blend_color: Option<[f32; 4]>,
    pub blend_equation_separate: Option<[u32; 2]>,
    pub blend_func_separate: Option<[u32; 4]>,
    pub color_mask: Option<[bool; 4]>,
    #[serde(deserialize_with = "single")]
    pub cull_face: Option<u32>,
    #[serde(deserialize_with = "single")]
    pub depth_func: Option<u32>,
    #[serde(deserialize_with = "single")]
    pub depth_mask: Option<bool>,
    pub depth_range: Option<[f32; 2]>,
    #[serde(deserialize_with = "single")]
    pub front_face: Option<u32>,
    #[serde(deserialize_with = "single")]
    pub line_width: Option<f32>,
    pub polygon_offset: Option<[f32; 2]>,
    pub scissor: Option<[f32; 4]>,
    pub extras: Value,
}

/// Single-valued functions are written as one-element arrays; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrArray<T> {
    One(T),
    Array([T; 1]),
}

fn single<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<OneOrArray<T>>::deserialize(deserializer)?.map(|v| match v {
        OneOrArray::One(value) | OneOrArray::Array([value]) => value,
    }))
}

/// Render states a technique enables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TechniqueStates {
    /// GL capabilities passed to `glEnable`
    pub enables: Vec<u32>,
    pub functions: StateFunctions,
    pub extras: Value,
}

/// Built-in uniform semantics a technique parameter may request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniformSemantic {
    Model,
    View,
    Projection,
    ModelView,
    ModelViewProjection,
    ModelInverse,
    ViewInverse,
    ProjectionInverse,
    ModelViewInverse,
    ModelViewProjectionInverse,
    ModelInverseTranspose,
    ModelViewInverseTranspose,
    Viewport,
    JointMatrix,
}

impl UniformSemantic {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "MODEL" => Some(UniformSemantic::Model),
            "VIEW" => Some(UniformSemantic::View),
            "PROJECTION" => Some(UniformSemantic::Projection),
            "MODELVIEW" => Some(UniformSemantic::ModelView),
            "MODELVIEWPROJECTION" => Some(UniformSemantic::ModelViewProjection),
            "MODELINVERSE" => Some(UniformSemantic::ModelInverse),
            "VIEWINVERSE" => Some(UniformSemantic::ViewInverse),
            "PROJECTIONINVERSE" => Some(UniformSemantic::ProjectionInverse),
            "MODELVIEWINVERSE" => Some(UniformSemantic::ModelViewInverse),
            "MODELVIEWPROJECTIONINVERSE" => Some(UniformSemantic::ModelViewProjectionInverse),
            "MODELINVERSETRANSPOSE" => Some(UniformSemantic::ModelInverseTranspose),
            "MODELVIEWINVERSETRANSPOSE" => Some(UniformSemantic::ModelViewInverseTranspose),
            "VIEWPORT" => Some(UniformSemantic::Viewport),
            "JOINTMATRIX" => Some(UniformSemantic::JointMatrix),
            _ => None,
        }
    }
}

/// A named technique input.
#[derive(Clone, Debug)]
pub struct TechniqueParameter {
    pub name: String,
    /// GL type enum (e.g. 35676 for FLOAT_MAT4)
    pub param_type: u32,
    pub count: Option<u32>,
    /// Key of the node whose transform feeds this parameter
    pub node: Option<String>,
    pub semantic: Option<String>,
    pub value: Option<Value>,
    pub extras: Value,
}

impl TechniqueParameter {
    /// The semantic as a built-in uniform, if it names one.
    pub fn uniform_semantic(&self) -> Option<UniformSemantic> {
        self.semantic.as_deref().and_then(UniformSemantic::from_name)
    }
}

/// A program plus the bindings and state needed to draw with it.
#[derive(Clone, Debug)]
pub struct Technique {
    pub name: String,
    /// Key of the program
    pub program: String,
    /// (attribute name, parameter name) in manifest order
    pub attributes: Vec<(String, String)>,
    /// (uniform name, parameter name) in manifest order
    pub uniforms: Vec<(String, String)>,
    pub states: TechniqueStates,
    pub parameters: Vec<TechniqueParameter>,
    pub extras: Value,
}

impl Technique {
    pub fn parameter(&self, name: &str) -> Option<&TechniqueParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameter bound to a uniform name.
    pub fn uniform_parameter(&self, uniform: &str) -> Option<&TechniqueParameter> {
        self.uniforms
            .iter()
            .find(|(name, _)| name == uniform)
            .and_then(|(_, param)| self.parameter(param))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_functions_deserialize() {
        let functions: StateFunctions = serde_json::from_str(
            r#"{ "blendColor": [0, 0, 0, 1], "colorMask": [true, true, true, false], "depthMask": [false], "cullFace": 1029 }"#,
        )
        .unwrap();

        assert_eq!(functions.blend_color, Some([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(functions.color_mask, Some([true, true, true, false]));
        assert_eq!(functions.depth_mask, Some(false));
        assert_eq!(functions.cull_face, Some(1029));
        assert_eq!(functions.line_width, None);
    }

    #[test]
    fn test_uniform_lookup() {
        let technique = Technique {
            name: String::new(),
            program: "p".into(),
            attributes: vec![("a_position".into(), "position".into())],
            uniforms: vec![("u_mvp".into(), "mvp".into())],
            states: TechniqueStates::default(),
            parameters: vec![TechniqueParameter {
                name: "mvp".into(),
                param_type: 35676,
                count: None,
                node: None,
                semantic: Some("MODELVIEWPROJECTION".into()),
                value: None,
                extras: Value::Null,
            }],
            extras: Value::Null,
        };

        let param = technique.uniform_parameter("u_mvp").unwrap();
        assert_eq!(param.uniform_semantic(), Some(UniformSemantic::ModelViewProjection));
        assert!(technique.uniform_parameter("u_missing").is_none());
    }
}
