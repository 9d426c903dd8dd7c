//! Keyframe animation: the manifest's sampler tables, and the transform
//! clips extracted from them.
//!
//! A glTF 1.0 animation stores one accessor per named parameter plus a
//! shared `TIME` accessor. [`parameters`] copies that data out of the
//! buffers; [`TransformClip::from_parameters`] turns it into three
//! keyframe tracks on the same time axis.

use glint_math::{Interpolate, Mat4, Quat, Transform, Vec3};
use serde_json::Value;

use crate::accessor::{ComponentType, DataType};
use crate::error::{EntityKind, GltfError, GltfResult};
use crate::registry::Registry;
use crate::skin::Skeleton;

/// Name of the parameter holding keyframe times.
pub const TIME: &str = "TIME";

/// Node property a channel drives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationPath {
    Translation,
    Rotation,
    Scale,
}

impl AnimationPath {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "translation" => Some(AnimationPath::Translation),
            "rotation" => Some(AnimationPath::Rotation),
            "scale" => Some(AnimationPath::Scale),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationPath::Translation => "translation",
            AnimationPath::Rotation => "rotation",
            AnimationPath::Scale => "scale",
        }
    }

    /// Floats per keyframe value.
    pub fn components(&self) -> usize {
        match self {
            AnimationPath::Rotation => 4,
            AnimationPath::Translation | AnimationPath::Scale => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Linear,
}

impl Interpolation {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "LINEAR" => Some(Interpolation::Linear),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AnimationChannel {
    /// Key of a sampler within the same animation
    pub sampler: String,
    /// Key of the animated node
    pub target: String,
    pub path: AnimationPath,
    pub extras: Value,
}

#[derive(Clone, Debug)]
pub struct AnimationSampler {
    pub key: String,
    /// Parameter name of the keyframe times
    pub input: String,
    /// Parameter name of the keyframe values
    pub output: String,
    pub interpolation: Interpolation,
}

#[derive(Clone, Debug, Default)]
pub struct Animation {
    pub name: String,
    /// Target node of the first channel
    pub target: Option<String>,
    pub channels: Vec<AnimationChannel>,
    pub samplers: Vec<AnimationSampler>,
    /// (parameter name, accessor key) in manifest order, `TIME` excluded
    pub parameters: Vec<(String, String)>,
    /// Accessor key of the `TIME` parameter
    pub time_accessor: String,
    pub extras: Value,
}

impl Animation {
    pub fn sampler(&self, key: &str) -> Option<&AnimationSampler> {
        self.samplers.iter().find(|s| s.key == key)
    }

    /// Whether `name` is `TIME` or a declared parameter.
    pub fn has_parameter(&self, name: &str) -> bool {
        name == TIME || self.parameters.iter().any(|(n, _)| n == name)
    }

    /// Parameter feeding `path`: the output of the sampler of the first
    /// channel on that path.
    pub fn output_for_path(&self, path: AnimationPath) -> Option<&str> {
        self.channels
            .iter()
            .find(|c| c.path == path)
            .and_then(|c| self.sampler(&c.sampler))
            .map(|s| s.output.as_str())
    }
}

/// Float data of one animation parameter, copied out of its buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterData {
    pub name: String,
    /// Floats per keyframe
    pub components: usize,
    /// `keyframes * components` floats
    pub data: Vec<f32>,
}

impl ParameterData {
    pub fn keyframes(&self) -> usize {
        if self.components == 0 {
            0
        } else {
            self.data.len() / self.components
        }
    }
}

/// Copy every parameter of animation `key` out of its accessor, `TIME`
/// first, the rest in manifest order.
pub fn parameters(registry: &Registry, key: &str) -> GltfResult<Vec<ParameterData>> {
    let animation = registry.animation(key)?;

    let time_view = registry.accessor_view(&animation.time_accessor)?;
    if time_view.data_type() != DataType::Scalar || time_view.component_type() != ComponentType::Float {
        return Err(GltfError::invalid(
            EntityKind::Animation,
            key,
            "parameters",
            format!("TIME accessor '{}' must be SCALAR FLOAT", animation.time_accessor),
        ));
    }
    let keyframes = time_view.count();

    let mut out = Vec::with_capacity(animation.parameters.len() + 1);
    out.push(ParameterData {
        name: TIME.to_string(),
        components: 1,
        data: time_view.read_f32()?,
    });

    for (name, accessor_key) in &animation.parameters {
        let view = registry.accessor_view(accessor_key)?;
        if view.count() != keyframes {
            return Err(mismatched(key, name, keyframes, view.count()));
        }
        out.push(ParameterData {
            name: name.clone(),
            components: view.data_type().num_components(),
            data: view.read_f32()?,
        });
    }

    Ok(out)
}

/// Check that every parameter accessor has as many elements as `TIME`.
pub(crate) fn validate_keyframes(registry: &Registry) -> GltfResult<()> {
    for (key, animation) in registry.animations() {
        let expected = registry.accessor(&animation.time_accessor)?.count;
        for (name, accessor_key) in &animation.parameters {
            let actual = registry.accessor(accessor_key)?.count;
            if actual != expected {
                return Err(mismatched(key, name, expected, actual));
            }
        }
    }
    Ok(())
}

fn mismatched(animation: &str, parameter: &str, expected: usize, actual: usize) -> GltfError {
    GltfError::MismatchedKeyframes {
        animation: animation.to_string(),
        parameter: parameter.to_string(),
        expected,
        actual,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<T> {
    pub time: f32,
    pub value: T,
}

/// A keyframe track, linearly interpolated.
#[derive(Clone, Debug, PartialEq)]
pub struct Clip<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolate> Clip<T> {
    /// Keyframes must be in non-decreasing time order.
    pub fn new(keyframes: Vec<Keyframe<T>>) -> Self {
        Self { keyframes }
    }

    pub fn keyframes(&self) -> &[Keyframe<T>] {
        &self.keyframes
    }

    pub fn times(&self) -> impl Iterator<Item = f32> + '_ {
        self.keyframes.iter().map(|k| k.time)
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn start_time(&self) -> f32 {
        self.keyframes.first().map_or(0.0, |k| k.time)
    }

    pub fn end_time(&self) -> f32 {
        self.keyframes.last().map_or(0.0, |k| k.time)
    }

    pub fn duration(&self) -> f32 {
        self.end_time() - self.start_time()
    }

    /// Value at time `t`, held constant outside the keyframe range.
    pub fn sample(&self, t: f32) -> Option<T> {
        let first = self.keyframes.first()?;
        let idx = self.keyframes.partition_point(|k| k.time <= t);
        if idx == 0 {
            return Some(first.value);
        }
        let a = &self.keyframes[idx - 1];
        let Some(b) = self.keyframes.get(idx) else {
            return Some(a.value);
        };
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return Some(a.value);
        }
        Some(a.value.interpolate(b.value, (t - a.time) / span))
    }
}

fn find<'a>(params: &'a [ParameterData], name: &str) -> Option<&'a ParameterData> {
    params.iter().find(|p| p.name == name)
}

fn build_track<T: Interpolate>(
    animation: &str,
    times: &[f32],
    param: Option<&ParameterData>,
    path: AnimationPath,
    default: T,
    convert: fn(&[f32]) -> T,
) -> GltfResult<Clip<T>> {
    let values: Vec<T> = match param {
        Some(param) => {
            if param.components != path.components() {
                return Err(GltfError::invalid(
                    EntityKind::Animation,
                    animation,
                    "parameters",
                    format!(
                        "'{}' drives {} but has {} components per keyframe",
                        param.name,
                        path.as_str(),
                        param.components
                    ),
                ));
            }
            if param.keyframes() != times.len() {
                return Err(mismatched(animation, &param.name, times.len(), param.keyframes()));
            }
            param.data.chunks_exact(param.components).map(convert).collect()
        }
        None => vec![default; times.len()],
    };

    Ok(Clip::new(
        times
            .iter()
            .zip(values)
            .map(|(&time, value)| Keyframe { time, value })
            .collect(),
    ))
}

fn time_axis<'a>(animation: &str, params: &'a [ParameterData]) -> GltfResult<&'a [f32]> {
    find(params, TIME)
        .map(|p| p.data.as_slice())
        .ok_or_else(|| GltfError::missing(EntityKind::Animation, animation, "parameters.TIME"))
}

/// Translation track read from the parameter named `translation`.
pub fn translation_clip(animation: &str, params: &[ParameterData]) -> GltfResult<Clip<Vec3>> {
    let times = time_axis(animation, params)?;
    let param = find(params, "translation")
        .ok_or_else(|| GltfError::missing(EntityKind::Animation, animation, "parameters.translation"))?;
    build_track(animation, times, Some(param), AnimationPath::Translation, Vec3::ZERO, Vec3::from_slice)
}

/// Rotation track read from the parameter named `rotation`.
pub fn rotation_clip(animation: &str, params: &[ParameterData]) -> GltfResult<Clip<Quat>> {
    let times = time_axis(animation, params)?;
    let param = find(params, "rotation")
        .ok_or_else(|| GltfError::missing(EntityKind::Animation, animation, "parameters.rotation"))?;
    build_track(animation, times, Some(param), AnimationPath::Rotation, Quat::IDENTITY, Quat::from_slice)
}

/// Scale track read from the parameter named `scale`.
pub fn scale_clip(animation: &str, params: &[ParameterData]) -> GltfResult<Clip<Vec3>> {
    let times = time_axis(animation, params)?;
    let param = find(params, "scale")
        .ok_or_else(|| GltfError::missing(EntityKind::Animation, animation, "parameters.scale"))?;
    build_track(animation, times, Some(param), AnimationPath::Scale, Vec3::ONE, Vec3::from_slice)
}

/// Translation, rotation and scale tracks sharing one time axis.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformClip {
    pub translation: Clip<Vec3>,
    pub rotation: Clip<Quat>,
    pub scale: Clip<Vec3>,
}

impl TransformClip {
    /// Build from parameters named `TIME`, `translation`, `rotation` and
    /// `scale`. Missing tracks hold their identity value at every keyframe.
    pub fn from_parameters(animation: &str, params: &[ParameterData]) -> GltfResult<Self> {
        Self::from_named_parameters(animation, params, ["translation", "rotation", "scale"])
    }

    /// Like [`TransformClip::from_parameters`], with the parameter names for
    /// the translation, rotation and scale tracks given explicitly.
    pub fn from_named_parameters(
        animation: &str,
        params: &[ParameterData],
        [translation, rotation, scale]: [&str; 3],
    ) -> GltfResult<Self> {
        let times = time_axis(animation, params)?;
        Ok(Self {
            translation: build_track(
                animation,
                times,
                find(params, translation),
                AnimationPath::Translation,
                Vec3::ZERO,
                Vec3::from_slice,
            )?,
            rotation: build_track(
                animation,
                times,
                find(params, rotation),
                AnimationPath::Rotation,
                Quat::IDENTITY,
                Quat::from_slice,
            )?,
            scale: build_track(
                animation,
                times,
                find(params, scale),
                AnimationPath::Scale,
                Vec3::ONE,
                Vec3::from_slice,
            )?,
        })
    }

    pub fn duration(&self) -> f32 {
        self.translation.duration()
    }

    pub fn keyframe_count(&self) -> usize {
        self.translation.len()
    }

    /// Local transform at time `t`.
    pub fn sample(&self, t: f32) -> Transform {
        Transform::new(
            self.translation.sample(t).unwrap_or(Vec3::ZERO),
            self.rotation.sample(t).unwrap_or(Quat::IDENTITY).normalize(),
            self.scale.sample(t).unwrap_or(Vec3::ONE),
        )
    }
}

/// Build the clip of animation `key`, following its channels to find which
/// parameter drives each path.
pub fn transform_clip(registry: &Registry, key: &str) -> GltfResult<TransformClip> {
    let animation = registry.animation(key)?;
    let params = parameters(registry, key)?;
    let names = [
        AnimationPath::Translation,
        AnimationPath::Rotation,
        AnimationPath::Scale,
    ]
    .map(|path| animation.output_for_path(path).unwrap_or(path.as_str()));
    TransformClip::from_named_parameters(key, &params, names)
}

/// One clip per skeleton joint, in joint order.
#[derive(Clone, Debug, PartialEq)]
pub struct SkeletonAnimation {
    pub clips: Vec<TransformClip>,
}

impl SkeletonAnimation {
    pub fn duration(&self) -> f32 {
        self.clips.iter().map(TransformClip::duration).fold(0.0, f32::max)
    }

    /// Joint-local matrices at time `t`.
    pub fn sample(&self, t: f32) -> Vec<Mat4> {
        self.clips.iter().map(|clip| clip.sample(t).to_matrix()).collect()
    }
}

/// Find the animation driving each joint of `skeleton` and build its clip.
///
/// An animation drives a joint when its target node's key, or that node's
/// `jointName`, equals the joint name. The first match in key order wins.
pub fn skeleton_animation(registry: &Registry, skeleton: &Skeleton) -> GltfResult<SkeletonAnimation> {
    let mut clips = Vec::with_capacity(skeleton.joint_names.len());
    for joint in &skeleton.joint_names {
        let found = registry.animations().find(|(_, animation)| {
            animation.target.as_deref().is_some_and(|target| {
                target == joint.as_str()
                    || registry
                        .node(target)
                        .is_ok_and(|node| node.joint_name() == Some(joint.as_str()))
            })
        });
        let Some((key, _)) = found else {
            return Err(GltfError::MissingJointAnimation {
                joint: joint.clone(),
            });
        };
        clips.push(transform_clip(registry, key)?);
    }
    log::debug!("Assembled {} joint clips", clips.len());
    Ok(SkeletonAnimation { clips })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(name: &str, components: usize, data: &[f32]) -> ParameterData {
        ParameterData {
            name: name.to_string(),
            components,
            data: data.to_vec(),
        }
    }

    fn sample_params() -> Vec<ParameterData> {
        vec![
            param(TIME, 1, &[0.0, 1.0]),
            param("translation", 3, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0]),
            param("rotation", 4, &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]),
        ]
    }

    #[test]
    fn test_transform_clip_fills_missing_scale() {
        let clip = TransformClip::from_parameters("a", &sample_params()).unwrap();

        assert_eq!(clip.translation.keyframes()[1].value, Vec3::X);
        assert_eq!(clip.rotation.keyframes()[0].value, Quat::IDENTITY);
        assert_eq!(clip.scale.len(), 2);
        assert!(clip.scale.keyframes().iter().all(|k| k.value == Vec3::ONE));

        let times: Vec<f32> = clip.translation.times().collect();
        assert_eq!(times, clip.rotation.times().collect::<Vec<_>>());
        assert_eq!(times, clip.scale.times().collect::<Vec<_>>());
    }

    #[test]
    fn test_sample_interpolates_and_clamps() {
        let clip = TransformClip::from_parameters("a", &sample_params()).unwrap();

        assert!((clip.sample(0.5).translation - Vec3::new(0.5, 0.0, 0.0)).length() < 1e-6);
        assert_eq!(clip.sample(-1.0).translation, Vec3::ZERO);
        assert_eq!(clip.sample(5.0).translation, Vec3::X);
        assert_eq!(clip.duration(), 1.0);
    }

    #[test]
    fn test_single_track_builders() {
        let params = sample_params();
        assert_eq!(translation_clip("a", &params).unwrap().len(), 2);
        assert_eq!(rotation_clip("a", &params).unwrap().len(), 2);
        assert!(matches!(
            scale_clip("a", &params),
            Err(GltfError::MissingRequiredField { field: "parameters.scale", .. })
        ));
    }

    #[test]
    fn test_wrong_component_count_fails() {
        let params = vec![param(TIME, 1, &[0.0]), param("rotation", 3, &[0.0, 0.0, 0.0])];
        assert!(matches!(
            TransformClip::from_parameters("a", &params),
            Err(GltfError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_missing_time_fails() {
        let params = vec![param("translation", 3, &[0.0, 0.0, 0.0])];
        assert!(TransformClip::from_parameters("a", &params).is_err());
    }

    #[test]
    fn test_empty_clip_samples_none() {
        let clip: Clip<f32> = Clip::new(Vec::new());
        assert!(clip.is_empty());
        assert_eq!(clip.sample(0.0), None);
        assert_eq!(clip.duration(), 0.0);
    }

    #[test]
    fn test_path_names() {
        assert_eq!(AnimationPath::from_name("scale"), Some(AnimationPath::Scale));
        assert_eq!(AnimationPath::from_name("weights"), None);
        assert_eq!(Interpolation::from_name("STEP"), None);
    }
}
