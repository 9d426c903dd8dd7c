//! Materials and `KHR_materials_common` lights.

use std::collections::BTreeMap;
use std::f32::consts::FRAC_PI_4;

use glint_math::{Vec3, Vec4};
use serde_json::Value;

/// Lighting model of a `KHR_materials_common` material.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommonShading {
    Blinn,
    Phong,
    Lambert,
    Constant,
}

impl CommonShading {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "BLINN" => Some(CommonShading::Blinn),
            "PHONG" => Some(CommonShading::Phong),
            "LAMBERT" => Some(CommonShading::Lambert),
            "CONSTANT" => Some(CommonShading::Constant),
            _ => None,
        }
    }
}

/// How a material is shaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaterialTechnique {
    /// Key of a technique entity
    Technique(String),
    /// Built-in model from `KHR_materials_common`
    Common(CommonShading),
    None,
}

/// Which lighting term a source feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    Diffuse,
    Specular,
    Emission,
}

impl SourceKind {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "diffuse" => Some(SourceKind::Diffuse),
            "specular" => Some(SourceKind::Specular),
            "emission" => Some(SourceKind::Emission),
            _ => None,
        }
    }
}

/// A constant color or a texture lookup.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceValue {
    Color(Vec4),
    /// Key of a texture
    Texture(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSource {
    pub kind: SourceKind,
    pub value: SourceValue,
}

#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub technique: MaterialTechnique,
    pub ambient: Vec4,
    pub sources: Vec<MaterialSource>,
    pub shininess: f32,
    pub transparency: f32,
    pub double_sided: bool,
    pub transparent: bool,
    pub joint_count: u32,
    /// Remaining `values` entries, untouched
    pub overrides: BTreeMap<String, Value>,
    pub extras: Value,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            technique: MaterialTechnique::None,
            ambient: Vec4::ZERO,
            sources: Vec::new(),
            shininess: 0.0,
            transparency: 1.0,
            double_sided: false,
            transparent: false,
            joint_count: 0,
            overrides: BTreeMap::new(),
            extras: Value::Null,
        }
    }
}

impl Material {
    pub fn source(&self, kind: SourceKind) -> Option<&SourceValue> {
        self.sources.iter().find(|s| s.kind == kind).map(|s| &s.value)
    }

    /// Keys of every texture the material samples.
    pub fn texture_keys(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().filter_map(|s| match &s.value {
            SourceValue::Texture(key) => Some(key.as_str()),
            SourceValue::Color(_) => None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
}

impl LightKind {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "ambient" => Some(LightKind::Ambient),
            "directional" => Some(LightKind::Directional),
            "point" => Some(LightKind::Point),
            "spot" => Some(LightKind::Spot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightKind::Ambient => "ambient",
            LightKind::Directional => "directional",
            LightKind::Point => "point",
            LightKind::Spot => "spot",
        }
    }

    /// Point and spot lights carry distance and attenuation terms.
    pub fn is_positional(&self) -> bool {
        matches!(self, LightKind::Point | LightKind::Spot)
    }
}

/// A light declared under `extensions.KHR_materials_common.lights`.
#[derive(Clone, Debug)]
pub struct Light {
    pub name: String,
    pub kind: LightKind,
    pub color: Vec3,
    pub constant_attenuation: f32,
    pub linear_attenuation: f32,
    pub quadratic_attenuation: f32,
    pub distance: f32,
    pub falloff_angle: f32,
    pub falloff_exponent: f32,
    pub extras: Value,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            name: String::new(),
            kind,
            color: Vec3::ZERO,
            constant_attenuation: 1.0,
            linear_attenuation: 0.0,
            quadratic_attenuation: 0.0,
            distance: 0.0,
            falloff_angle: FRAC_PI_4,
            falloff_exponent: 0.0,
            extras: Value::Null,
        }
    }

    /// Attenuation factor at `d` units from the light. Always 1 for
    /// ambient and directional lights.
    pub fn attenuation(&self, d: f32) -> f32 {
        if !self.kind.is_positional() {
            return 1.0;
        }
        let denom =
            self.constant_attenuation + self.linear_attenuation * d + self.quadratic_attenuation * d * d;
        if denom > 0.0 {
            1.0 / denom
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_defaults() {
        let light = Light::new(LightKind::Spot);
        assert_eq!(light.constant_attenuation, 1.0);
        assert_eq!(light.linear_attenuation, 0.0);
        assert!((light.falloff_angle - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(light.attenuation(10.0), 1.0);
    }

    #[test]
    fn test_attenuation() {
        let mut light = Light::new(LightKind::Point);
        light.linear_attenuation = 1.0;
        assert!((light.attenuation(1.0) - 0.5).abs() < 1e-6);

        let mut ambient = Light::new(LightKind::Ambient);
        ambient.linear_attenuation = 1.0;
        assert_eq!(ambient.attenuation(1.0), 1.0);
    }

    #[test]
    fn test_material_sources() {
        let material = Material {
            sources: vec![
                MaterialSource {
                    kind: SourceKind::Diffuse,
                    value: SourceValue::Texture("tex".into()),
                },
                MaterialSource {
                    kind: SourceKind::Specular,
                    value: SourceValue::Color(Vec4::ONE),
                },
            ],
            ..Default::default()
        };

        assert_eq!(material.transparency, 1.0);
        assert_eq!(material.source(SourceKind::Specular), Some(&SourceValue::Color(Vec4::ONE)));
        assert!(material.source(SourceKind::Emission).is_none());
        assert_eq!(material.texture_keys().collect::<Vec<_>>(), vec!["tex"]);
    }

    #[test]
    fn test_shading_names() {
        assert_eq!(CommonShading::from_name("PHONG"), Some(CommonShading::Phong));
        assert_eq!(CommonShading::from_name("phong"), None);
    }
}
