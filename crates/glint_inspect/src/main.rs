// Inspect a glTF 1.0 asset from the command line.
// Run with: cargo run --bin glint_inspect -- <path.gltf|path.glb> [--json] [--nodes]

use std::env;

use anyhow::{bail, Context, Result};
use glint_core::{EntityKind, Gltf, GltfLoader, LoadOptions, NodeKind};
use glint_math::Vec3;
use serde::Serialize;

#[derive(Serialize)]
struct Summary<'a> {
    path: &'a str,
    version: &'a str,
    generator: Option<&'a str>,
    extensions_used: &'a [String],
    default_scene: Option<&'a str>,
    counts: Vec<(&'static str, usize)>,
    meshes: Vec<MeshSummary<'a>>,
    animations: Vec<AnimationSummary<'a>>,
    skins: Vec<SkinSummary<'a>>,
}

#[derive(Serialize)]
struct MeshSummary<'a> {
    key: &'a str,
    primitives: usize,
    vertices: usize,
    triangles: usize,
    bounds: Option<([f32; 3], [f32; 3])>,
}

#[derive(Serialize)]
struct AnimationSummary<'a> {
    key: &'a str,
    target: Option<&'a str>,
    keyframes: usize,
    duration: f32,
}

#[derive(Serialize)]
struct SkinSummary<'a> {
    key: &'a str,
    joints: Vec<String>,
}

const KINDS: [EntityKind; 17] = [
    EntityKind::Accessor,
    EntityKind::Animation,
    EntityKind::Buffer,
    EntityKind::BufferView,
    EntityKind::Camera,
    EntityKind::Image,
    EntityKind::Light,
    EntityKind::Material,
    EntityKind::Mesh,
    EntityKind::Node,
    EntityKind::Program,
    EntityKind::Sampler,
    EntityKind::Scene,
    EntityKind::Shader,
    EntityKind::Skin,
    EntityKind::Technique,
    EntityKind::Texture,
];

fn summarize<'a>(path: &'a str, gltf: &'a Gltf) -> Result<Summary<'a>> {
    let reg = gltf.registry();

    let mut meshes = Vec::new();
    for (key, mesh) in reg.meshes() {
        let mut vertices = 0;
        let mut triangles = 0;
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for index in 0..mesh.primitives.len() {
            let geometry = gltf
                .primitive_geometry(key, index)
                .with_context(|| format!("reading primitive {} of mesh '{}'", index, key))?;
            vertices += geometry.vertex_count();
            triangles += geometry.triangle_count();
            let (min, max) = geometry.bounds;
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });
        }
        meshes.push(MeshSummary {
            key,
            primitives: mesh.primitives.len(),
            vertices,
            triangles,
            bounds: bounds.map(|(lo, hi)| (lo.to_array(), hi.to_array())),
        });
    }

    let mut animations = Vec::new();
    for (key, animation) in reg.animations() {
        let clip = gltf
            .transform_clip(key)
            .with_context(|| format!("building clip for animation '{}'", key))?;
        animations.push(AnimationSummary {
            key,
            target: animation.target.as_deref(),
            keyframes: clip.keyframe_count(),
            duration: clip.duration(),
        });
    }

    let mut skins = Vec::new();
    for (key, _) in reg.skins() {
        let skeleton = gltf
            .skeleton(key)
            .with_context(|| format!("building skeleton for skin '{}'", key))?;
        skins.push(SkinSummary {
            key,
            joints: skeleton.joint_names,
        });
    }

    Ok(Summary {
        path,
        version: &gltf.asset().version,
        generator: gltf.asset().generator.as_deref(),
        extensions_used: gltf.extensions_used(),
        default_scene: gltf.default_scene_key(),
        counts: KINDS
            .iter()
            .map(|kind| (kind.as_str(), reg.count(*kind)))
            .filter(|(_, count)| *count > 0)
            .collect(),
        meshes,
        animations,
        skins,
    })
}

fn print_summary(summary: &Summary<'_>) {
    println!("File: {}", summary.path);
    println!("glTF version: {}", summary.version);
    if let Some(generator) = summary.generator {
        println!("Generator: {}", generator);
    }
    if !summary.extensions_used.is_empty() {
        println!("Extensions: {}", summary.extensions_used.join(", "));
    }
    println!("Default scene: {}", summary.default_scene.unwrap_or("(none)"));

    println!("\nEntities:");
    for (kind, count) in &summary.counts {
        println!("  {:<12} {}", kind, count);
    }

    for mesh in &summary.meshes {
        println!(
            "\nMesh '{}': {} primitive(s), {} vertices, {} triangles",
            mesh.key, mesh.primitives, mesh.vertices, mesh.triangles
        );
        if let Some((min, max)) = mesh.bounds {
            println!(
                "  bounds: ({:.3}, {:.3}, {:.3}) .. ({:.3}, {:.3}, {:.3})",
                min[0], min[1], min[2], max[0], max[1], max[2]
            );
        }
    }

    for animation in &summary.animations {
        println!(
            "\nAnimation '{}' -> {}: {} keyframes over {:.3}s",
            animation.key,
            animation.target.unwrap_or("(no target)"),
            animation.keyframes,
            animation.duration
        );
    }

    for skin in &summary.skins {
        println!("\nSkin '{}': {} joint(s)", skin.key, skin.joints.len());
        println!("  {}", skin.joints.join(", "));
    }
}

fn print_node(gltf: &Gltf, key: &str, depth: usize) -> Result<()> {
    let node = gltf.registry().node(key)?;
    let kind = match &node.kind {
        NodeKind::Transform => String::new(),
        NodeKind::Camera(camera) => format!(" [camera {}]", camera),
        NodeKind::Light(light) => format!(" [light {}]", light),
        NodeKind::Joint(joint) => format!(" [joint {}]", joint),
        NodeKind::Renderable { meshes, skin, .. } => match skin {
            Some(skin) => format!(" [meshes {} skin {}]", meshes.join(","), skin),
            None => format!(" [meshes {}]", meshes.join(",")),
        },
    };
    let t = node.translation();
    println!(
        "{}{}{} t=({:.3}, {:.3}, {:.3})",
        "  ".repeat(depth),
        key,
        kind,
        t.x,
        t.y,
        t.z
    );
    for (child, _) in gltf.node_children(key)? {
        print_node(gltf, child, depth + 1)?;
    }
    Ok(())
}

fn print_nodes(gltf: &Gltf) -> Result<()> {
    for (key, scene) in gltf.registry().scenes() {
        println!("\nScene '{}':", key);
        for root in &scene.nodes {
            print_node(gltf, root, 1)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let args: Vec<String> = env::args().collect();
    let mut path = None;
    let mut json = false;
    let mut nodes = false;
    let mut decode_images = true;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--nodes" => nodes = true,
            "--no-images" => decode_images = false,
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            other => path = Some(other.to_string()),
        }
    }
    let Some(path) = path else {
        eprintln!("Usage: {} <path.gltf|path.glb> [--json] [--nodes] [--no-images]", args[0]);
        std::process::exit(1);
    };

    let loader = GltfLoader::new().with_options(LoadOptions {
        decode_images,
        ..LoadOptions::default()
    });
    let gltf = loader
        .load(&path)
        .with_context(|| format!("failed to load '{}'", path))?;
    log::info!("Loaded {}", path);

    let summary = summarize(&path, &gltf)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    if nodes {
        print_nodes(&gltf)?;
    }
    Ok(())
}
