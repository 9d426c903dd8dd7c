//! Manifest decoding: one decoder per entity kind.
//!
//! Decoders store references as keys and never look other entities up, so
//! declaration order in the manifest does not matter. Payloads that live in
//! other entities (binary-chunk images and shaders) are filled in later by
//! the loader.

use std::path::{Path, PathBuf};

use glint_math::{Mat4, Quat, Vec3, Vec4};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::accessor::{
    Accessor, Buffer, BufferTarget, BufferType, BufferView, ComponentType, DataType, BINARY_BUFFER_KEY,
};
use crate::animation::{Animation, AnimationChannel, AnimationPath, AnimationSampler, Interpolation, TIME};
use crate::asset::Asset;
use crate::camera::{Camera, CameraProjection};
use crate::error::{EntityKind, GltfError, GltfResult};
use crate::gltf::json::Fields;
use crate::gltf::uri;
use crate::io::AssetIo;
use crate::material::{
    CommonShading, Light, LightKind, Material, MaterialSource, MaterialTechnique, SourceKind, SourceValue,
};
use crate::mesh::{AttributeSemantic, Mesh, Primitive, PrimitiveMode};
use crate::node::{Node, NodeKind, NodeTransform};
use crate::registry::Registry;
use crate::scene::Scene;
use crate::skin::Skin;
use crate::technique::{
    Program, Shader, ShaderType, StateFunctions, Technique, TechniqueParameter, TechniqueStates,
};
use crate::texture::{Image, ImageDecoder, ImageFormat, ImageSource, Sampler, Texture};

pub const KHR_BINARY_GLTF: &str = "KHR_binary_glTF";
pub const KHR_MATERIALS_COMMON: &str = "KHR_materials_common";

/// Everything a decoder may need besides the manifest itself.
pub(crate) struct Resources<'a> {
    pub io: &'a dyn AssetIo,
    pub decoder: &'a dyn ImageDecoder,
    pub base_dir: Option<&'a Path>,
    pub binary: Option<&'a [u8]>,
    pub decode_images: bool,
}

impl Resources<'_> {
    fn resolve(&self, uri: &str) -> PathBuf {
        match self.base_dir {
            Some(dir) => dir.join(uri),
            None => PathBuf::from(uri),
        }
    }

    /// Bytes behind `uri` plus the media type when a data URI names one.
    fn load_uri(&self, entity: EntityKind, key: &str, uri: &str) -> GltfResult<(Vec<u8>, Option<String>)> {
        if uri::is_data_uri(uri) {
            let data = uri::parse_data_uri(uri).map_err(|reason| GltfError::invalid(entity, key, "uri", reason))?;
            let mime = (!data.mime.is_empty()).then_some(data.mime);
            return Ok((data.data, mime));
        }
        let path = self.resolve(uri);
        log::debug!("Loading {} '{}' from {}", entity, key, path.display());
        Ok((self.io.load_bytes(&path)?, None))
    }

    pub(crate) fn decode_image(
        &self,
        label: &str,
        bytes: &[u8],
        format: Option<ImageFormat>,
    ) -> GltfResult<Option<crate::texture::DecodedImage>> {
        if !self.decode_images {
            return Ok(None);
        }
        self.decoder
            .decode(bytes, format)
            .map(Some)
            .map_err(|cause| GltfError::ImageDecode {
                path: label.to_string(),
                cause,
            })
    }
}

/// The decoded manifest, before references are checked.
pub(crate) struct Parsed {
    pub registry: Registry,
    pub extensions_used: Vec<String>,
    pub asset: Asset,
    pub default_scene: Option<String>,
}

fn extensions_used(root: &Map<String, Value>) -> GltfResult<Vec<String>> {
    let mut names = match root.get("extensionsUsed") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| GltfError::MalformedJson("extensionsUsed must hold strings".to_string()))
            })
            .collect::<GltfResult<Vec<_>>>()?,
        Some(_) => {
            return Err(GltfError::MalformedJson(
                "extensionsUsed must be an array".to_string(),
            ))
        }
    };
    names.sort();
    names.dedup();
    Ok(names)
}

fn for_each_entity<'a>(
    kind: EntityKind,
    category: &str,
    value: &'a Value,
    mut decode: impl FnMut(&'a str, Fields<'a>) -> GltfResult<()>,
) -> GltfResult<()> {
    let Value::Object(entities) = value else {
        return Err(GltfError::MalformedJson(format!(
            "'{}' must be an object keyed by id",
            category
        )));
    };
    for (key, body) in entities {
        decode(key, Fields::new(kind, key, body)?)?;
        log::debug!("Decoded {} '{}'", kind, key);
    }
    Ok(())
}

/// Decode every entity of the manifest into a fresh registry.
pub(crate) fn parse(root: &Map<String, Value>, res: &Resources<'_>) -> GltfResult<Parsed> {
    let extensions_used = extensions_used(root)?;
    let asset = Asset::from_value(root.get("asset"))?;
    let mut registry = Registry::default();

    for (category, value) in root {
        match category.as_str() {
            "accessors" => for_each_entity(EntityKind::Accessor, category, value, |key, f| {
                registry.add_accessor(key, parse_accessor(f)?);
                Ok(())
            })?,
            "animations" => for_each_entity(EntityKind::Animation, category, value, |key, f| {
                registry.add_animation(key, parse_animation(f)?);
                Ok(())
            })?,
            "bufferViews" => for_each_entity(EntityKind::BufferView, category, value, |key, f| {
                registry.add_buffer_view(key, parse_buffer_view(f)?);
                Ok(())
            })?,
            "buffers" => for_each_entity(EntityKind::Buffer, category, value, |key, f| {
                registry.add_buffer(key, parse_buffer(f, res)?);
                Ok(())
            })?,
            "cameras" => for_each_entity(EntityKind::Camera, category, value, |key, f| {
                registry.add_camera(key, parse_camera(f)?);
                Ok(())
            })?,
            "images" => for_each_entity(EntityKind::Image, category, value, |key, f| {
                registry.add_image(key, parse_image(f, res)?);
                Ok(())
            })?,
            "materials" => for_each_entity(EntityKind::Material, category, value, |key, f| {
                registry.add_material(key, parse_material(f)?);
                Ok(())
            })?,
            "meshes" => for_each_entity(EntityKind::Mesh, category, value, |key, f| {
                registry.add_mesh(key, parse_mesh(f)?);
                Ok(())
            })?,
            "nodes" => for_each_entity(EntityKind::Node, category, value, |key, f| {
                registry.add_node(key, parse_node(f)?);
                Ok(())
            })?,
            "programs" => for_each_entity(EntityKind::Program, category, value, |key, f| {
                registry.add_program(key, parse_program(f)?);
                Ok(())
            })?,
            "samplers" => for_each_entity(EntityKind::Sampler, category, value, |key, f| {
                registry.add_sampler(key, parse_sampler(f)?);
                Ok(())
            })?,
            "scenes" => for_each_entity(EntityKind::Scene, category, value, |key, f| {
                registry.add_scene(key, parse_scene(f)?);
                Ok(())
            })?,
            "shaders" => for_each_entity(EntityKind::Shader, category, value, |key, f| {
                registry.add_shader(key, parse_shader(f, res)?);
                Ok(())
            })?,
            "skins" => for_each_entity(EntityKind::Skin, category, value, |key, f| {
                registry.add_skin(key, parse_skin(f)?);
                Ok(())
            })?,
            "techniques" => for_each_entity(EntityKind::Technique, category, value, |key, f| {
                registry.add_technique(key, parse_technique(f)?);
                Ok(())
            })?,
            "textures" => for_each_entity(EntityKind::Texture, category, value, |key, f| {
                registry.add_texture(key, parse_texture(f)?);
                Ok(())
            })?,
            "extensions" => {
                let lights = value
                    .get(KHR_MATERIALS_COMMON)
                    .and_then(|ext| ext.get("lights"))
                    .filter(|lights| !lights.is_null());
                match lights {
                    Some(lights) if extensions_used.binary_search_by(|e| e.as_str().cmp(KHR_MATERIALS_COMMON)).is_ok() => {
                        for_each_entity(EntityKind::Light, "lights", lights, |key, f| {
                            registry.add_light(key, parse_light(f)?);
                            Ok(())
                        })?
                    }
                    Some(_) => log::warn!(
                        "Ignoring {} lights: extension not listed in extensionsUsed",
                        KHR_MATERIALS_COMMON
                    ),
                    None => {}
                }
            }
            "extensionsUsed" | "asset" | "scene" | "extras" | "glExtensionsUsed" => {}
            other => log::debug!("Ignoring unknown top-level member '{}'", other),
        }
    }

    let default_scene = match root.get("scene") {
        None | Some(Value::Null) => None,
        Some(Value::String(key)) => Some(key.clone()),
        Some(_) => return Err(GltfError::MalformedJson("'scene' must be a string".to_string())),
    };

    Ok(Parsed {
        registry,
        extensions_used,
        asset,
        default_scene,
    })
}

fn parse_accessor(f: Fields<'_>) -> GltfResult<Accessor> {
    let component_type = f.req_u64("componentType")?;
    let component_type = ComponentType::from_gl(component_type)
        .ok_or_else(|| GltfError::unknown_enum(f.entity, "componentType", component_type))?;
    let data_type = f.req_str("type")?;
    let data_type =
        DataType::from_name(data_type).ok_or_else(|| GltfError::unknown_enum(f.entity, "type", data_type))?;

    let min = f.opt_floats("min")?.unwrap_or_default();
    let max = f.opt_floats("max")?.unwrap_or_default();
    if !min.is_empty() && !max.is_empty() && min.len() != max.len() {
        return Err(GltfError::invalid(
            f.entity,
            f.key,
            "max",
            format!("min has {} values but max has {}", min.len(), max.len()),
        ));
    }

    Ok(Accessor {
        name: f.name()?,
        buffer_view: f.req_str("bufferView")?.to_string(),
        byte_offset: f.req_usize("byteOffset")?,
        byte_stride: f.opt_usize("byteStride")?,
        count: f.req_usize("count")?,
        component_type,
        data_type,
        min,
        max,
        extras: f.extras(),
    })
}

fn parse_buffer_view(f: Fields<'_>) -> GltfResult<BufferView> {
    let target = f
        .opt_u64("target")?
        .map(|t| BufferTarget::from_gl(t).ok_or_else(|| GltfError::unknown_enum(f.entity, "target", t)))
        .transpose()?;

    Ok(BufferView {
        name: f.name()?,
        buffer: f.req_str("buffer")?.to_string(),
        byte_offset: f.req_usize("byteOffset")?,
        byte_length: f.opt_usize("byteLength")?,
        target,
        extras: f.extras(),
    })
}

fn parse_buffer(f: Fields<'_>, res: &Resources<'_>) -> GltfResult<Buffer> {
    let buffer_type = match f.opt_str("type")? {
        None => BufferType::default(),
        Some(name) => BufferType::from_name(name).ok_or_else(|| GltfError::unknown_enum(f.entity, "type", name))?,
    };

    let uri = f.opt_str("uri")?;
    let mut data = if f.key == BINARY_BUFFER_KEY {
        res.binary
            .ok_or_else(|| GltfError::invalid(f.entity, f.key, "uri", "file has no binary chunk"))?
            .to_vec()
    } else {
        let uri = uri.ok_or_else(|| GltfError::missing(f.entity, f.key, "uri"))?;
        res.load_uri(f.entity, f.key, uri)?.0
    };

    let byte_length = match f.opt_usize("byteLength")? {
        Some(declared) if declared > data.len() => {
            return Err(GltfError::out_of_bounds(
                f.entity,
                f.key,
                format!("byteLength {} exceeds the {} bytes loaded", declared, data.len()),
            ))
        }
        Some(declared) => {
            data.truncate(declared);
            declared
        }
        None => data.len(),
    };

    Ok(Buffer {
        name: f.name()?,
        uri: uri.map(str::to_string),
        byte_length,
        buffer_type,
        data,
        extras: f.extras(),
    })
}

fn parse_camera(f: Fields<'_>) -> GltfResult<Camera> {
    let kind = f.req_str("type")?;
    let (projection, body) = match kind {
        "perspective" => {
            let p = f
                .opt_object("perspective")?
                .ok_or_else(|| GltfError::missing(f.entity, f.key, "perspective"))?;
            let projection = CameraProjection::Perspective {
                aspect_ratio: p.opt_f32("aspectRatio")?,
                yfov: p.req_f32("yfov")?,
                znear: p.req_f32("znear")?,
                zfar: p.req_f32("zfar")?,
            };
            (projection, p)
        }
        "orthographic" => {
            let o = f
                .opt_object("orthographic")?
                .ok_or_else(|| GltfError::missing(f.entity, f.key, "orthographic"))?;
            let projection = CameraProjection::Orthographic {
                xmag: o.req_f32("xmag")?,
                ymag: o.req_f32("ymag")?,
                znear: o.req_f32("znear")?,
                zfar: o.req_f32("zfar")?,
            };
            (projection, o)
        }
        other => return Err(GltfError::unknown_enum(f.entity, "type", other)),
    };

    Ok(Camera {
        name: f.name()?,
        projection,
        projection_extras: body.extras(),
        extras: f.extras(),
    })
}

/// `extensions.KHR_binary_glTF` of an image or shader, if present.
fn binary_extension<'a>(f: &Fields<'a>) -> GltfResult<Option<Fields<'a>>> {
    match f.opt_object("extensions")? {
        Some(ext) => ext.opt_object("KHR_binary_glTF"),
        None => Ok(None),
    }
}

fn parse_image(f: Fields<'_>, res: &Resources<'_>) -> GltfResult<Image> {
    let uri = f.opt_str("uri")?;

    if let Some(binary) = binary_extension(&f)? {
        let format = binary.opt_str("mimeType")?.and_then(ImageFormat::from_mime);
        return Ok(Image {
            name: f.name()?,
            uri: uri.map(str::to_string),
            source: ImageSource::BufferView(binary.req_str("bufferView")?.to_string()),
            format,
            decoded: None,
            extras: f.extras(),
        });
    }

    let uri = uri.ok_or_else(|| GltfError::missing(f.entity, f.key, "uri"))?;
    let (bytes, mime) = res.load_uri(f.entity, f.key, uri)?;
    let (source, format, label) = match mime {
        Some(mime) => (ImageSource::Embedded, ImageFormat::from_mime(&mime), f.key.to_string()),
        None if uri::is_data_uri(uri) => (ImageSource::Embedded, None, f.key.to_string()),
        None => {
            let format = Path::new(uri)
                .extension()
                .and_then(|e| e.to_str())
                .and_then(ImageFormat::from_extension);
            (ImageSource::External(uri.to_string()), format, uri.to_string())
        }
    };

    Ok(Image {
        name: f.name()?,
        uri: Some(uri.to_string()),
        decoded: res.decode_image(&label, &bytes, format)?,
        source,
        format,
        extras: f.extras(),
    })
}

fn parse_color(f: &Fields<'_>, field: &'static str, value: &Value) -> GltfResult<Vec4> {
    let channels: Option<Vec<f32>> = value
        .as_array()
        .map(|items| items.iter().filter_map(|v| v.as_f64().map(|c| c as f32)).collect());
    match channels.as_deref() {
        Some([r, g, b]) => Ok(Vec4::new(*r, *g, *b, 1.0)),
        Some([r, g, b, a]) => Ok(Vec4::new(*r, *g, *b, *a)),
        _ => Err(GltfError::invalid(
            f.entity,
            f.key,
            field,
            "expected a color of 3 or 4 numbers",
        )),
    }
}

fn parse_material(f: Fields<'_>) -> GltfResult<Material> {
    let common = match f.opt_object("extensions")? {
        Some(ext) => ext.opt_object(KHR_MATERIALS_COMMON)?,
        None => None,
    };
    let body = common.unwrap_or(f);

    let technique = match (common.is_some(), body.opt_str("technique")?) {
        (true, Some(name)) => MaterialTechnique::Common(
            CommonShading::from_name(name).ok_or_else(|| GltfError::unknown_enum(f.entity, "technique", name))?,
        ),
        (false, Some(key)) => MaterialTechnique::Technique(key.to_string()),
        (_, None) => MaterialTechnique::None,
    };

    let mut material = Material {
        name: f.name()?,
        technique,
        double_sided: body.opt_bool("doubleSided")?.unwrap_or(false),
        transparent: body.opt_bool("transparent")?.unwrap_or(false),
        joint_count: body.opt_u32("jointCount")?.unwrap_or(0),
        extras: f.extras(),
        ..Default::default()
    };

    if let Some(values) = body.opt_object("values")? {
        for (name, value) in values.members() {
            match name.as_str() {
                "ambient" => material.ambient = parse_color(&f, "values.ambient", value)?,
                "diffuse" | "specular" | "emission" => {
                    let kind = SourceKind::from_name(name).unwrap_or(SourceKind::Diffuse);
                    let value = match value {
                        Value::String(texture) => SourceValue::Texture(texture.clone()),
                        other => SourceValue::Color(parse_color(&f, "values", other)?),
                    };
                    material.sources.push(MaterialSource { kind, value });
                }
                "shininess" => material.shininess = values.req_f32("shininess")?,
                "transparency" => material.transparency = values.req_f32("transparency")?,
                "doubleSided" => material.double_sided = values.opt_bool("doubleSided")?.unwrap_or(false),
                "transparent" => material.transparent = values.opt_bool("transparent")?.unwrap_or(false),
                "jointCount" => material.joint_count = values.opt_u32("jointCount")?.unwrap_or(0),
                _ => {
                    material.overrides.insert(name.clone(), value.clone());
                }
            }
        }
    }

    Ok(material)
}

fn parse_light(f: Fields<'_>) -> GltfResult<Light> {
    let kind_name = f.req_str("type")?;
    let kind = LightKind::from_name(kind_name).ok_or_else(|| GltfError::unknown_enum(f.entity, "type", kind_name))?;

    let mut light = Light::new(kind);
    light.name = f.name()?;
    light.extras = f.extras();

    let Some(body) = f.opt_object(kind.as_str())? else {
        return Ok(light);
    };
    if let Some(color) = body.opt_float_array::<3>("color")? {
        light.color = Vec3::from_array(color);
    }
    light.constant_attenuation = body.opt_f32("constantAttenuation")?.unwrap_or(1.0);
    if kind.is_positional() {
        light.distance = body.opt_f32("distance")?.unwrap_or(0.0);
        light.linear_attenuation = body.opt_f32("linearAttenuation")?.unwrap_or(0.0);
        light.quadratic_attenuation = body.opt_f32("quadraticAttenuation")?.unwrap_or(0.0);
    }
    if kind == LightKind::Spot {
        if let Some(angle) = body.opt_f32("falloffAngle")? {
            light.falloff_angle = angle;
        }
        light.falloff_exponent = body.opt_f32("falloffExponent")?.unwrap_or(0.0);
    }
    Ok(light)
}

fn parse_mesh(f: Fields<'_>) -> GltfResult<Mesh> {
    let primitives = match f.get("primitives") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| parse_primitive(f.nested(item, "primitives")?))
            .collect::<GltfResult<Vec<_>>>()?,
        Some(_) => {
            return Err(GltfError::invalid(
                f.entity,
                f.key,
                "primitives",
                "expected an array",
            ))
        }
    };

    Ok(Mesh {
        name: f.name()?,
        primitives,
        extras: f.extras(),
    })
}

fn parse_primitive(p: Fields<'_>) -> GltfResult<Primitive> {
    let mode = match p.opt_u64("mode")? {
        None => PrimitiveMode::default(),
        Some(mode) => PrimitiveMode::from_gl(mode).ok_or_else(|| GltfError::unknown_enum(p.entity, "mode", mode))?,
    };
    let attributes = p
        .str_pairs("attributes")?
        .into_iter()
        .map(|(semantic, accessor)| (AttributeSemantic::parse(&semantic), accessor))
        .collect();

    Ok(Primitive {
        attributes,
        indices: p.opt_str("indices")?.map(str::to_string),
        material: p.req_str("material")?.to_string(),
        mode,
        extras: p.extras(),
    })
}

fn parse_node(f: Fields<'_>) -> GltfResult<Node> {
    let transform = match f.opt_float_array::<16>("matrix")? {
        Some(matrix) => NodeTransform::Matrix(Mat4::from_cols_array(&matrix)),
        None => NodeTransform::Decomposed {
            translation: f.opt_float_array::<3>("translation")?.map(Vec3::from_array),
            rotation: f.opt_float_array::<4>("rotation")?.map(Quat::from_array),
            scale: f.opt_float_array::<3>("scale")?.map(Vec3::from_array),
        },
    };

    let light = match f.opt_object("extensions")? {
        Some(ext) => match ext.opt_object(KHR_MATERIALS_COMMON)? {
            Some(common) => common.opt_str("light")?,
            None => None,
        },
        None => None,
    };

    let kind = if let Some(light) = light {
        NodeKind::Light(light.to_string())
    } else if let Some(camera) = f.opt_str("camera")? {
        NodeKind::Camera(camera.to_string())
    } else if let Some(joint) = f.opt_str("jointName")? {
        NodeKind::Joint(joint.to_string())
    } else {
        let meshes = f.str_list("meshes")?;
        let skin = f.opt_str("skin")?.map(str::to_string);
        let skeletons = f.str_list("skeletons")?;
        if meshes.is_empty() && skin.is_none() && skeletons.is_empty() {
            NodeKind::Transform
        } else {
            NodeKind::Renderable {
                meshes,
                skin,
                skeletons,
            }
        }
    };

    Ok(Node {
        name: f.name()?,
        transform,
        kind,
        child_keys: f.str_list("children")?,
        parent: None,
        children: Vec::new(),
        extras: f.extras(),
    })
}

fn parse_program(f: Fields<'_>) -> GltfResult<Program> {
    Ok(Program {
        name: f.name()?,
        vertex_shader: f.req_str("vertexShader")?.to_string(),
        fragment_shader: f.req_str("fragmentShader")?.to_string(),
        attributes: f.str_list("attributes")?,
        extras: f.extras(),
    })
}

fn parse_sampler(f: Fields<'_>) -> GltfResult<Sampler> {
    Ok(Sampler {
        name: f.name()?,
        mag_filter: f.opt_u32("magFilter")?.unwrap_or(Sampler::LINEAR),
        min_filter: f.opt_u32("minFilter")?.unwrap_or(Sampler::NEAREST_MIPMAP_LINEAR),
        wrap_s: f.opt_u32("wrapS")?.unwrap_or(Sampler::REPEAT),
        wrap_t: f.opt_u32("wrapT")?.unwrap_or(Sampler::REPEAT),
        extras: f.extras(),
    })
}

fn parse_scene(f: Fields<'_>) -> GltfResult<Scene> {
    Ok(Scene {
        name: f.name()?,
        nodes: f.str_list("nodes")?,
        extras: f.extras(),
    })
}

fn parse_shader(f: Fields<'_>, res: &Resources<'_>) -> GltfResult<Shader> {
    let shader_type = f.req_u64("type")?;
    let shader_type =
        ShaderType::from_gl(shader_type).ok_or_else(|| GltfError::unknown_enum(f.entity, "type", shader_type))?;
    let uri = f.opt_str("uri")?;

    let (buffer_view, source) = match binary_extension(&f)? {
        Some(binary) => (Some(binary.req_str("bufferView")?.to_string()), String::new()),
        None => {
            let uri = uri.ok_or_else(|| GltfError::missing(f.entity, f.key, "uri"))?;
            let source = if uri::is_data_uri(uri) {
                let (bytes, _) = res.load_uri(f.entity, f.key, uri)?;
                String::from_utf8(bytes)
                    .map_err(|_| GltfError::invalid(f.entity, f.key, "uri", "shader source is not UTF-8"))?
            } else {
                res.io.load_text(&res.resolve(uri))?
            };
            (None, source)
        }
    };

    Ok(Shader {
        name: f.name()?,
        uri: uri.map(str::to_string),
        buffer_view,
        shader_type,
        source,
        extras: f.extras(),
    })
}

fn parse_skin(f: Fields<'_>) -> GltfResult<Skin> {
    if f.get("jointNames").is_none() {
        return Err(GltfError::missing(f.entity, f.key, "jointNames"));
    }
    let bind_shape_matrix = f
        .opt_float_array::<16>("bindShapeMatrix")?
        .map(|m| Mat4::from_cols_array(&m))
        .unwrap_or(Mat4::IDENTITY);

    Ok(Skin {
        name: f.name()?,
        inverse_bind_matrices: f.req_str("inverseBindMatrices")?.to_string(),
        joints: f.str_list("jointNames")?,
        bind_shape_matrix,
        extras: f.extras(),
    })
}

fn parse_technique(f: Fields<'_>) -> GltfResult<Technique> {
    let mut parameters = Vec::new();
    if let Some(params) = f.opt_object("parameters")? {
        for (name, value) in params.members() {
            let p = params.nested(value, "parameters")?;
            let param_type = p.req_u64("type")?;
            parameters.push(TechniqueParameter {
                name: name.clone(),
                param_type: u32::try_from(param_type)
                    .map_err(|_| GltfError::unknown_enum(f.entity, "parameters.type", param_type))?,
                count: p.opt_u32("count")?,
                node: p.opt_str("node")?.map(str::to_string),
                semantic: p.opt_str("semantic")?.map(str::to_string),
                value: p.get("value").cloned(),
                extras: p.extras(),
            });
        }
    }

    let states = match f.opt_object("states")? {
        None => TechniqueStates::default(),
        Some(states) => {
            let enables = states
                .opt_floats("enable")?
                .unwrap_or_default()
                .into_iter()
                .map(|e| e as u32)
                .collect();
            let functions = match states.get("functions") {
                None => StateFunctions::default(),
                Some(value) => StateFunctions::deserialize(value)
                    .map_err(|e| GltfError::invalid(f.entity, f.key, "states.functions", e.to_string()))?,
            };
            TechniqueStates {
                enables,
                functions,
                extras: states.extras(),
            }
        }
    };

    Ok(Technique {
        name: f.name()?,
        program: f.req_str("program")?.to_string(),
        attributes: f.str_pairs("attributes")?,
        uniforms: f.str_pairs("uniforms")?,
        states,
        parameters,
        extras: f.extras(),
    })
}

fn parse_texture(f: Fields<'_>) -> GltfResult<Texture> {
    Ok(Texture {
        name: f.name()?,
        source: f.req_str("source")?.to_string(),
        sampler: f.req_str("sampler")?.to_string(),
        target: f.opt_u32("target")?.unwrap_or(Texture::TEXTURE_2D),
        format: f.opt_u32("format")?.unwrap_or(Texture::RGBA),
        internal_format: f.opt_u32("internalFormat")?.unwrap_or(Texture::RGBA),
        texel_type: f.opt_u32("type")?.unwrap_or(Texture::UNSIGNED_BYTE),
        extras: f.extras(),
    })
}

fn parse_animation(f: Fields<'_>) -> GltfResult<Animation> {
    let channels = match f.get("channels") {
        None => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| -> GltfResult<AnimationChannel> {
                let c = f.nested(item, "channels")?;
                let target = c
                    .opt_object("target")?
                    .ok_or_else(|| GltfError::missing(f.entity, f.key, "channels.target"))?;
                let path = target.req_str("path")?;
                Ok(AnimationChannel {
                    sampler: c.req_str("sampler")?.to_string(),
                    target: target.req_str("id")?.to_string(),
                    path: AnimationPath::from_name(path)
                        .ok_or_else(|| GltfError::unknown_enum(f.entity, "path", path))?,
                    extras: c.extras(),
                })
            })
            .collect::<GltfResult<Vec<_>>>()?,
        Some(_) => return Err(GltfError::invalid(f.entity, f.key, "channels", "expected an array")),
    };

    let sampler_bodies: Vec<(String, &Value)> = match f.get("samplers") {
        None => Vec::new(),
        Some(Value::Object(samplers)) => samplers.iter().map(|(k, v)| (k.clone(), v)).collect(),
        Some(Value::Array(samplers)) => samplers.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        Some(_) => {
            return Err(GltfError::invalid(
                f.entity,
                f.key,
                "samplers",
                "expected an object or array",
            ))
        }
    };
    let samplers = sampler_bodies
        .into_iter()
        .map(|(key, body)| -> GltfResult<AnimationSampler> {
            let s = f.nested(body, "samplers")?;
            let interpolation = match s.opt_str("interpolation")? {
                None => Interpolation::default(),
                Some(name) => Interpolation::from_name(name)
                    .ok_or_else(|| GltfError::unknown_enum(f.entity, "interpolation", name))?,
            };
            Ok(AnimationSampler {
                key,
                input: s.req_str("input")?.to_string(),
                output: s.req_str("output")?.to_string(),
                interpolation,
            })
        })
        .collect::<GltfResult<Vec<_>>>()?;

    let mut time_accessor = None;
    let mut parameters = Vec::new();
    for (name, accessor) in f.str_pairs("parameters")? {
        if name == TIME {
            time_accessor = Some(accessor);
        } else {
            parameters.push((name, accessor));
        }
    }
    let time_accessor = time_accessor.ok_or_else(|| GltfError::missing(f.entity, f.key, "parameters.TIME"))?;

    Ok(Animation {
        name: f.name()?,
        target: channels.first().map(|c| c.target.clone()),
        channels,
        samplers,
        parameters,
        time_accessor,
        extras: f.extras(),
    })
}
