//! Load pipeline: container, manifest, entity decoding, validation and
//! scene linking.

use std::path::Path;

use crate::animation;
use crate::document::Gltf;
use crate::error::{EntityKind, GltfError, GltfResult};
use crate::gltf::container;
use crate::gltf::json::parse_manifest;
use crate::gltf::parser::{parse, Parsed, Resources};
use crate::io::{AssetIo, FsIo};
use crate::registry::Registry;
use crate::scene;
use crate::skin;
use crate::texture::{ImageCrateDecoder, ImageDecoder, ImageSource};

/// Switches for the optional parts of loading.
#[derive(Clone, Copy, Debug)]
pub struct LoadOptions {
    /// Decode PNG/JPEG images into RGBA8 pixels.
    pub decode_images: bool,
    /// Check every accessor and buffer view against its buffer's length.
    pub validate_ranges: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            decode_images: true,
            validate_ranges: true,
        }
    }
}

/// Loads glTF 1.0 assets, either `.gltf` JSON or `.glb` binary containers.
///
/// # Example
///
/// ```ignore
/// use glint_core::GltfLoader;
///
/// let gltf = GltfLoader::new().load("duck.gltf")?;
/// println!("{} nodes", gltf.registry().node_count());
/// ```
pub struct GltfLoader {
    io: Box<dyn AssetIo>,
    decoder: Box<dyn ImageDecoder>,
    options: LoadOptions,
}

impl Default for GltfLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl GltfLoader {
    pub fn new() -> Self {
        Self {
            io: Box::new(FsIo),
            decoder: Box::new(ImageCrateDecoder),
            options: LoadOptions::default(),
        }
    }

    pub fn with_io(mut self, io: impl AssetIo + 'static) -> Self {
        self.io = Box::new(io);
        self
    }

    pub fn with_image_decoder(mut self, decoder: impl ImageDecoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// Load the asset at `path`. Relative URIs resolve against its
    /// directory.
    pub fn load(&self, path: impl AsRef<Path>) -> GltfResult<Gltf> {
        let path = path.as_ref();
        log::info!("Loading glTF: {}", path.display());
        let bytes = self.io.load_bytes(path)?;

        let is_glb = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("glb"));
        let container = if is_glb {
            container::split_binary(&bytes)?
        } else {
            container::read_container(&bytes)?
        };

        self.load_container(container, path.parent())
    }

    /// Load from raw file contents; binary containers are sniffed by magic.
    pub fn load_from_bytes(&self, bytes: &[u8], base_dir: Option<&Path>) -> GltfResult<Gltf> {
        self.load_container(container::read_container(bytes)?, base_dir)
    }

    /// Load from manifest text.
    pub fn load_from_str(&self, manifest: &str, base_dir: Option<&Path>) -> GltfResult<Gltf> {
        self.load_container(
            container::Container {
                manifest: manifest.to_string(),
                binary: None,
            },
            base_dir,
        )
    }

    fn load_container(&self, container: container::Container, base_dir: Option<&Path>) -> GltfResult<Gltf> {
        let root = parse_manifest(&container.manifest)?;
        let res = Resources {
            io: self.io.as_ref(),
            decoder: self.decoder.as_ref(),
            base_dir,
            binary: container.binary.as_deref(),
            decode_images: self.options.decode_images,
        };

        let Parsed {
            mut registry,
            extensions_used,
            asset,
            default_scene,
        } = parse(&root, &res)?;

        registry.validate_references()?;
        materialize_binary_payloads(&mut registry, &res)?;
        if self.options.validate_ranges {
            registry.validate_ranges()?;
        }

        let skins: Vec<String> = registry.skins().map(|(key, _)| key.to_string()).collect();
        for key in &skins {
            skin::validate_skin(&registry, key)?;
        }
        animation::validate_keyframes(&registry)?;
        scene::link(&mut registry)?;

        if let Some(key) = &default_scene {
            registry.scene(key)?;
        }

        log::info!(
            "Loaded glTF {}: {} nodes, {} meshes, {} materials, {} animations, {} skins",
            asset.version,
            registry.node_count(),
            registry.count(EntityKind::Mesh),
            registry.count(EntityKind::Material),
            registry.count(EntityKind::Animation),
            registry.count(EntityKind::Skin),
        );

        Ok(Gltf::new(registry, extensions_used, asset, default_scene))
    }
}

/// Fill in images and shaders whose bytes live in a buffer view.
fn materialize_binary_payloads(registry: &mut Registry, res: &Resources<'_>) -> GltfResult<()> {
    let images: Vec<(String, String)> = registry
        .images()
        .filter_map(|(key, image)| match &image.source {
            ImageSource::BufferView(view) => Some((key.to_string(), view.clone())),
            _ => None,
        })
        .collect();
    for (key, view) in images {
        let format = registry.image(&key)?.format;
        let decoded = res.decode_image(&key, registry.buffer_view_bytes(&view)?, format)?;
        registry.image_mut(&key)?.decoded = decoded;
    }

    let shaders: Vec<(String, String)> = registry
        .shaders()
        .filter_map(|(key, shader)| shader.buffer_view.clone().map(|view| (key.to_string(), view)))
        .collect();
    for (key, view) in shaders {
        let source = std::str::from_utf8(registry.buffer_view_bytes(&view)?)
            .map_err(|_| GltfError::invalid(EntityKind::Shader, &key, "bufferView", "shader source is not UTF-8"))?
            .to_string();
        registry.shader_mut(&key)?.source = source;
    }
    Ok(())
}

/// Load a `.gltf` or `.glb` file from disk with default options.
pub fn load_gltf(path: impl AsRef<Path>) -> GltfResult<Gltf> {
    GltfLoader::new().load(path)
}
