//! End-to-end loading scenarios.

use std::collections::HashSet;

use glint_core::gltf::container::{self, HEADER_LEN, MAGIC};
use glint_core::skin::ROOT_PARENT;
use glint_core::{EntityKind, GltfError, GltfLoader, MemoryIo};
use glint_math::{Mat4, Quat, Vec3};
use serde_json::{json, Value};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn floats_to_bytes(values: &[f32]) -> Vec<u8> {
    bytemuck::cast_slice(values).to_vec()
}

/// Loader reading `scene.gltf` and `data.bin` from memory.
fn load_with_bin(manifest: Value, bin: &[f32]) -> Result<glint_core::Gltf, GltfError> {
    init_logging();
    let io = MemoryIo::new()
        .with_file("scene.gltf", manifest.to_string())
        .with_file("data.bin", floats_to_bytes(bin));
    GltfLoader::new().with_io(io).load("scene.gltf")
}

fn glb(json: &str, payload: &[u8]) -> Vec<u8> {
    let mut json = json.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let length = (HEADER_LEN + json.len() + payload.len()) as u32;
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&length.to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&json);
    out.extend_from_slice(payload);
    out
}

#[test]
fn empty_scene() {
    let gltf = GltfLoader::new()
        .load_from_str(
            r#"{"asset":{"version":"1.0"},"scene":"s","scenes":{"s":{"nodes":[]}}}"#,
            None,
        )
        .unwrap();

    assert!(gltf.default_scene().unwrap().nodes.is_empty());
    assert_eq!(gltf.default_scene_key(), Some("s"));
    for kind in [
        EntityKind::Accessor,
        EntityKind::Animation,
        EntityKind::Buffer,
        EntityKind::Camera,
        EntityKind::Image,
        EntityKind::Material,
        EntityKind::Mesh,
        EntityKind::Node,
        EntityKind::Skin,
        EntityKind::Texture,
    ] {
        assert_eq!(gltf.registry().count(kind), 0, "{}", kind);
    }
}

#[test]
fn external_buffer_accessor() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("b.bin"), floats_to_bytes(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0])).unwrap();
    let manifest = json!({
        "asset": { "version": "1.0" },
        "buffers": { "b": { "uri": "b.bin", "byteLength": 24 } },
        "bufferViews": { "v": { "buffer": "b", "byteOffset": 0, "byteLength": 24, "target": 34962 } },
        "accessors": { "a": {
            "bufferView": "v", "byteOffset": 0, "componentType": 5126, "type": "VEC3", "count": 2
        } }
    });
    let path = dir.path().join("model.gltf");
    std::fs::write(&path, manifest.to_string()).unwrap();

    let gltf = glint_core::load_gltf(&path).unwrap();
    let accessor = gltf.registry().accessor("a").unwrap();
    assert_eq!(accessor.num_components(), 3);
    assert_eq!(accessor.component_byte_size(), 4);
    assert_eq!(
        gltf.accessor_view("a").unwrap().read_vec3().unwrap(),
        vec![Vec3::X, Vec3::Y]
    );
}

#[test]
fn binary_container_layout() {
    let json = r#"{"asset":{"version":"1.0"}}"#;
    let payload: Vec<u8> = (0..40).collect();
    let bytes = glb(&format!("{:<40}", json), &payload);
    assert_eq!(bytes.len(), 100);
    assert_eq!(&bytes[12..16], &40u32.to_le_bytes());

    let split = container::read_container(&bytes).unwrap();
    assert_eq!(split.manifest, json);
    assert_eq!(split.binary.as_deref(), Some(payload.as_slice()));
}

#[test]
fn binary_gltf_buffer() {
    let payload: Vec<u8> = (0..40).collect();
    let json = json!({
        "asset": { "version": "1.0" },
        "extensionsUsed": ["KHR_binary_glTF"],
        "buffers": { "binary_glTF": { "byteLength": 40 } }
    })
    .to_string();
    let bytes = glb(&json, &payload);

    let io = MemoryIo::new().with_file("model.glb", bytes.clone());
    let gltf = GltfLoader::new().with_io(io).load("model.glb").unwrap();
    assert!(gltf.has_extension("KHR_binary_glTF"));
    assert_eq!(gltf.registry().buffer("binary_glTF").unwrap().data, payload);

    // Sniffed by magic when there is no file name to go by.
    let gltf = GltfLoader::new().load_from_bytes(&bytes, None).unwrap();
    assert_eq!(gltf.registry().buffer("binary_glTF").unwrap().byte_length, 40);
}

#[test]
fn binary_shader_from_buffer_view() {
    let source = b"void main() {}";
    let json = json!({
        "asset": { "version": "1.0" },
        "extensionsUsed": ["KHR_binary_glTF"],
        "buffers": { "binary_glTF": { "byteLength": source.len() } },
        "bufferViews": { "src": { "buffer": "binary_glTF", "byteOffset": 0, "byteLength": source.len() } },
        "shaders": { "vs": {
            "type": 35633,
            "uri": "data:,",
            "extensions": { "KHR_binary_glTF": { "bufferView": "src" } }
        } }
    })
    .to_string();

    let gltf = GltfLoader::new().load_from_bytes(&glb(&json, source), None).unwrap();
    assert_eq!(gltf.registry().shader("vs").unwrap().source, "void main() {}");
}

#[test]
fn truncated_binary_container() {
    let mut bytes = glb(r#"{"asset":{"version":"1.0"}}"#, &[0; 8]);
    bytes.truncate(bytes.len() - 4);
    assert!(matches!(
        GltfLoader::new().load_from_bytes(&bytes, None),
        Err(GltfError::TruncatedContainer { .. })
    ));
}

#[test]
fn node_with_decomposed_transform() {
    let gltf = GltfLoader::new()
        .load_from_str(
            r#"{
                "asset": { "version": "1.0" },
                "nodes": { "n": { "translation": [1, 2, 3], "rotation": [0, 0, 0, 1], "scale": [2, 2, 2] } }
            }"#,
            None,
        )
        .unwrap();
    let node = gltf.registry().node("n").unwrap();
    assert_eq!(node.translation(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(node.rotation(), Quat::from_xyzw(0.0, 0.0, 0.0, 1.0));
    assert_eq!(node.scale(), Vec3::splat(2.0));
    assert_eq!(node.transform_matrix(), Mat4::IDENTITY);
}

fn linked_tree() -> glint_core::Gltf {
    init_logging();
    GltfLoader::new()
        .load_from_str(
            r#"{
                // comments are tolerated
                "asset": { "version": "1.0" },
                "scene": "s",
                "scenes": { "s": { "nodes": ["r"] } },
                "nodes": {
                    "r": { "children": ["c"] },
                    "c": { "children": ["g"], "translation": [0, 1, 0] },
                    "g": { "translation": [1, 0, 0] }
                }
            }"#,
            None,
        )
        .unwrap()
}

#[test]
fn parent_linking() {
    let gltf = linked_tree();
    let reg = gltf.registry();

    assert!(gltf.node_parent("r").unwrap().is_none());
    assert_eq!(reg.node("c").unwrap().parent.as_deref(), Some("r"));
    assert_eq!(reg.node("g").unwrap().parent.as_deref(), Some("c"));
    assert_eq!(reg.node("r").unwrap().children, vec!["c"]);

    let found = gltf.find_node_by_key("g", "r").unwrap();
    assert!(std::ptr::eq(found, reg.node("g").unwrap()));
    assert!(gltf.find_node_by_key("r", "c").is_none());

    let world = gltf.world_transform("g").unwrap();
    assert!(world.transform_point3(Vec3::ZERO).abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
}

#[test]
fn scene_trees_are_well_formed() {
    let gltf = linked_tree();
    let reg = gltf.registry();

    for (_, scene) in reg.scenes() {
        let mut seen = HashSet::new();
        let mut stack: Vec<&str> = scene.nodes.iter().map(String::as_str).collect();
        while let Some(key) = stack.pop() {
            assert!(seen.insert(key), "node '{}' reached twice", key);
            let node = reg.node(key).unwrap();
            match node.parent.as_deref() {
                Some(parent) => assert!(reg.node(parent).unwrap().children.iter().any(|c| c == key)),
                None => assert!(scene.nodes.iter().any(|root| root == key)),
            }
            for (child, _) in gltf.node_children(key).unwrap() {
                assert_eq!(reg.node(child).unwrap().parent.as_deref(), Some(key));
                stack.push(child);
            }
        }
    }
}

#[test]
fn cyclic_scene_is_rejected() {
    let result = GltfLoader::new().load_from_str(
        r#"{
            "asset": { "version": "1.0" },
            "scenes": { "s": { "nodes": ["a"] } },
            "nodes": { "a": { "children": ["b"] }, "b": { "children": ["a"] } }
        }"#,
        None,
    );
    assert!(matches!(result, Err(GltfError::CyclicScene { .. })));
}

fn animated_manifest() -> Value {
    // data.bin floats: TIME [0, 1] @0, translation @8, rotation @32
    json!({
        "asset": { "version": "1.0" },
        "buffers": { "b": { "uri": "data.bin", "byteLength": 64 } },
        "bufferViews": { "v": { "buffer": "b", "byteOffset": 0, "byteLength": 64 } },
        "accessors": {
            "time": { "bufferView": "v", "byteOffset": 0, "componentType": 5126, "count": 2, "type": "SCALAR" },
            "trans": { "bufferView": "v", "byteOffset": 8, "componentType": 5126, "count": 2, "type": "VEC3" },
            "rot": { "bufferView": "v", "byteOffset": 32, "componentType": 5126, "count": 2, "type": "VEC4" }
        },
        "nodes": { "n": {} },
        "scenes": { "s": { "nodes": ["n"] } },
        "animations": { "anim": {
            "channels": [
                { "sampler": "t", "target": { "id": "n", "path": "translation" } },
                { "sampler": "r", "target": { "id": "n", "path": "rotation" } }
            ],
            "samplers": {
                "t": { "input": "TIME", "output": "translation", "interpolation": "LINEAR" },
                "r": { "input": "TIME", "output": "rotation", "interpolation": "LINEAR" }
            },
            "parameters": { "TIME": "time", "translation": "trans", "rotation": "rot" }
        } }
    })
}

const ANIMATED_BIN: [f32; 16] = [
    0.0, 1.0, // TIME
    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, // translation
    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, // rotation
];

#[test]
fn animation_clip_assembly() {
    let gltf = load_with_bin(animated_manifest(), &ANIMATED_BIN).unwrap();
    let clip = gltf.transform_clip("anim").unwrap();

    let translation: Vec<(f32, Vec3)> = clip.translation.keyframes().iter().map(|k| (k.time, k.value)).collect();
    assert_eq!(translation, vec![(0.0, Vec3::ZERO), (1.0, Vec3::X)]);

    let rotation: Vec<(f32, Quat)> = clip.rotation.keyframes().iter().map(|k| (k.time, k.value)).collect();
    assert_eq!(rotation, vec![(0.0, Quat::IDENTITY), (1.0, Quat::IDENTITY)]);

    let scale: Vec<(f32, Vec3)> = clip.scale.keyframes().iter().map(|k| (k.time, k.value)).collect();
    assert_eq!(scale, vec![(0.0, Vec3::ONE), (1.0, Vec3::ONE)]);

    let halfway = clip.sample(0.5);
    assert!(halfway.translation.abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-6));
}

#[test]
fn clip_tracks_share_timestamps() {
    let gltf = load_with_bin(animated_manifest(), &ANIMATED_BIN).unwrap();
    for (key, _) in gltf.registry().animations() {
        let clip = gltf.transform_clip(key).unwrap();
        let t: Vec<f32> = clip.translation.times().collect();
        let r: Vec<f32> = clip.rotation.times().collect();
        let s: Vec<f32> = clip.scale.times().collect();
        assert_eq!(t, r);
        assert_eq!(t, s);
    }
}

#[test]
fn accessors_stay_inside_their_buffer_views() {
    let gltf = load_with_bin(animated_manifest(), &ANIMATED_BIN).unwrap();
    let reg = gltf.registry();
    for (key, accessor) in reg.accessors() {
        let view = gltf.accessor_view(key).unwrap();
        let buffer_view = reg.buffer_view(&accessor.buffer_view).unwrap();
        let view_len = buffer_view.byte_length.unwrap_or(0);
        let last_end = accessor.byte_offset + (view.count() - 1) * view.stride() + view.element_size();
        assert!(last_end <= view_len, "accessor '{}' ends at {} of {}", key, last_end, view_len);
    }
}

#[test]
fn mismatched_keyframes_are_rejected() {
    let mut manifest = animated_manifest();
    manifest["accessors"]["trans"]["count"] = json!(1);
    assert!(matches!(
        load_with_bin(manifest, &ANIMATED_BIN),
        Err(GltfError::MismatchedKeyframes { expected: 2, actual: 1, .. })
    ));
}

fn skinned_manifest(animate_knee: bool) -> Value {
    let mut manifest = json!({
        "asset": { "version": "1.0" },
        "buffers": { "b": { "uri": "data.bin", "byteLength": 184 } },
        "bufferViews": { "v": { "buffer": "b", "byteOffset": 0, "byteLength": 184 } },
        "accessors": {
            "time": { "bufferView": "v", "byteOffset": 0, "componentType": 5126, "count": 2, "type": "SCALAR" },
            "hip_t": { "bufferView": "v", "byteOffset": 8, "componentType": 5126, "count": 2, "type": "VEC3" },
            "knee_t": { "bufferView": "v", "byteOffset": 32, "componentType": 5126, "count": 2, "type": "VEC3" },
            "ibm": { "bufferView": "v", "byteOffset": 56, "componentType": 5126, "count": 2, "type": "MAT4" }
        },
        "nodes": {
            "j0": { "jointName": "hip", "name": "Hip", "children": ["j1"] },
            "j1": { "jointName": "knee", "name": "Knee" }
        },
        "scenes": { "s": { "nodes": ["j0"] } },
        "skins": { "sk": { "inverseBindMatrices": "ibm", "jointNames": ["j0", "j1"] } },
        "animations": {
            "a_hip": {
                "channels": [{ "sampler": "s", "target": { "id": "j0", "path": "translation" } }],
                "samplers": { "s": { "input": "TIME", "output": "translation" } },
                "parameters": { "TIME": "time", "translation": "hip_t" }
            }
        }
    });
    if animate_knee {
        manifest["animations"]["a_knee"] = json!({
            "channels": [{ "sampler": "s", "target": { "id": "j1", "path": "translation" } }],
            "samplers": { "s": { "input": "TIME", "output": "translation" } },
            "parameters": { "TIME": "time", "translation": "knee_t" }
        });
    }
    manifest
}

fn skinned_bin() -> Vec<f32> {
    let mut bin = vec![0.0, 1.0];
    bin.extend([0.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend([0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    bin.extend(Mat4::IDENTITY.to_cols_array());
    bin.extend(Mat4::IDENTITY.to_cols_array());
    bin
}

#[test]
fn skeleton_parents_precede_children() {
    let gltf = load_with_bin(skinned_manifest(true), &skinned_bin()).unwrap();
    let skeleton = gltf.skeleton("sk").unwrap();

    assert_eq!(skeleton.joint_names, vec!["hip", "knee"]);
    let roots: Vec<usize> = skeleton
        .joints
        .iter()
        .enumerate()
        .filter(|(_, j)| j.parent_index == ROOT_PARENT)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(roots, vec![0]);
    for (i, joint) in skeleton.joints.iter().enumerate().skip(1) {
        assert!((joint.parent_index as usize) < i);
    }
}

#[test]
fn skeleton_animation_poses_joints() {
    let gltf = load_with_bin(skinned_manifest(true), &skinned_bin()).unwrap();
    let skeleton = gltf.skeleton("sk").unwrap();
    let animation = gltf.skeleton_animation(&skeleton).unwrap();
    assert_eq!(animation.clips.len(), 2);
    assert_eq!(animation.duration(), 1.0);

    let skinning = skeleton.skin_matrices(&animation.sample(1.0));
    let knee = skinning[1].transform_point3(Vec3::ZERO);
    assert!(knee.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), 1e-6));
}

#[test]
fn unanimated_joint_is_reported() {
    let gltf = load_with_bin(skinned_manifest(false), &skinned_bin()).unwrap();
    let skeleton = gltf.skeleton("sk").unwrap();
    assert!(matches!(
        gltf.skeleton_animation(&skeleton),
        Err(GltfError::MissingJointAnimation { joint }) if joint == "knee"
    ));
}

#[test]
fn extension_detection_ignores_order() {
    let names = ["KHR_materials_common", "KHR_binary_glTF", "EXT_custom"];
    for order in [[0, 1, 2], [2, 1, 0], [1, 2, 0]] {
        let used: Vec<&str> = order.iter().map(|&i| names[i]).collect();
        let manifest = json!({ "asset": { "version": "1.0" }, "extensionsUsed": used });
        let gltf = GltfLoader::new().load_from_str(&manifest.to_string(), None).unwrap();
        for name in names {
            assert!(gltf.has_extension(name));
        }
        assert!(!gltf.has_extension("KHR_technique_webgl"));
    }
}

#[test]
fn cameras_by_type() {
    let gltf = GltfLoader::new()
        .load_from_str(
            r#"{
                "asset": { "version": "1.0" },
                "cameras": {
                    "persp": { "type": "perspective", "perspective": { "yfov": 0.8, "znear": 0.1, "zfar": 100 } },
                    "ortho": { "type": "orthographic", "orthographic": { "xmag": 2, "ymag": 1, "znear": 0.1, "zfar": 10 } }
                }
            }"#,
            None,
        )
        .unwrap();

    assert!(gltf.perspective_camera("persp").is_ok());
    assert!(gltf.orthographic_camera("ortho").is_ok());
    assert!(matches!(
        gltf.orthographic_camera("persp"),
        Err(GltfError::CameraTypeMismatch { requested: "orthographic", actual: "perspective", .. })
    ));
}

#[test]
fn unknown_reference_is_rejected() {
    let result = GltfLoader::new().load_from_str(
        r#"{
            "asset": { "version": "1.0" },
            "nodes": { "n": { "meshes": ["missing"] } }
        }"#,
        None,
    );
    assert!(matches!(
        result,
        Err(GltfError::UnknownKey { kind: EntityKind::Mesh, .. })
    ));
}

#[test]
fn indexed_primitive_geometry() {
    let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let mut bytes = floats_to_bytes(&positions);
    bytes.extend(bytemuck::cast_slice::<u16, u8>(&[0, 1, 2]));
    bytes.extend([0, 0]);

    let manifest = json!({
        "asset": { "version": "1.0" },
        "buffers": { "b": { "uri": "data.bin", "byteLength": 44 } },
        "bufferViews": {
            "verts": { "buffer": "b", "byteOffset": 0, "byteLength": 36, "target": 34962 },
            "idx": { "buffer": "b", "byteOffset": 36, "byteLength": 6, "target": 34963 }
        },
        "accessors": {
            "pos": { "bufferView": "verts", "byteOffset": 0, "componentType": 5126, "count": 3, "type": "VEC3" },
            "ind": { "bufferView": "idx", "byteOffset": 0, "componentType": 5123, "count": 3, "type": "SCALAR" }
        },
        "materials": { "mat": {} },
        "meshes": { "tri": { "primitives": [
            { "attributes": { "POSITION": "pos" }, "indices": "ind", "material": "mat", "mode": 4 }
        ] } }
    });
    let io = MemoryIo::new()
        .with_file("scene.gltf", manifest.to_string())
        .with_file("data.bin", bytes);
    let gltf = GltfLoader::new().with_io(io).load("scene.gltf").unwrap();

    let mut geometry = gltf.primitive_geometry("tri", 0).unwrap();
    assert_eq!(geometry.indices, Some(vec![0, 1, 2]));
    assert_eq!(geometry.triangle_count(), 1);
    assert_eq!(geometry.bounds, (Vec3::ZERO, Vec3::new(1.0, 1.0, 0.0)));

    geometry.ensure_normals();
    let normals = geometry.normals.unwrap();
    assert!(normals.iter().all(|n| n.abs_diff_eq(Vec3::Z, 1e-6)));

    assert!(matches!(
        gltf.primitive_geometry("tri", 1),
        Err(GltfError::OutOfBounds { .. })
    ));
}

/// Skin `sk` over `joints`, with identity inverse binds.
fn load_skin(nodes: Value, roots: &[&str], joints: &[String]) -> Result<glint_core::Gltf, GltfError> {
    let bin: Vec<f32> = joints
        .iter()
        .flat_map(|_| Mat4::IDENTITY.to_cols_array())
        .collect();
    let byte_length = bin.len() * 4;
    let manifest = json!({
        "asset": { "version": "1.0" },
        "buffers": { "b": { "uri": "data.bin", "byteLength": byte_length } },
        "bufferViews": { "v": { "buffer": "b", "byteOffset": 0, "byteLength": byte_length } },
        "accessors": {
            "ibm": { "bufferView": "v", "byteOffset": 0, "componentType": 5126, "count": joints.len(), "type": "MAT4" }
        },
        "nodes": nodes,
        "scenes": { "s": { "nodes": roots } },
        "skins": { "sk": { "inverseBindMatrices": "ibm", "jointNames": joints } }
    });
    load_with_bin(manifest, &bin)
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn joint_without_name_is_rejected() {
    for knee in [json!({ "jointName": "" }), json!({})] {
        let nodes = json!({
            "j0": { "jointName": "hip", "children": ["j1"] },
            "j1": knee
        });
        let gltf = load_skin(nodes, &["j0"], &keys(&["j0", "j1"])).unwrap();
        assert!(matches!(
            gltf.skeleton("sk"),
            Err(GltfError::MalformedSkin { skin, .. }) if skin == "sk"
        ));
    }
}

#[test]
fn joint_parent_listed_later_is_rejected() {
    let nodes = json!({
        "j0": { "jointName": "hip", "children": ["j1"] },
        "j1": { "jointName": "knee", "children": ["j2"] },
        "j2": { "jointName": "ankle" }
    });
    let gltf = load_skin(nodes.clone(), &["j0"], &keys(&["j0", "j1", "j2"])).unwrap();
    assert_eq!(gltf.skeleton("sk").unwrap().len(), 3);

    let gltf = load_skin(nodes, &["j0"], &keys(&["j0", "j2", "j1"])).unwrap();
    assert!(matches!(gltf.skeleton("sk"), Err(GltfError::MalformedSkin { .. })));
}

#[test]
fn second_root_joint_is_rejected() {
    let nodes = json!({
        "j0": { "jointName": "left" },
        "j1": { "jointName": "right" }
    });
    let gltf = load_skin(nodes, &["j0", "j1"], &keys(&["j0", "j1"])).unwrap();
    assert!(matches!(gltf.skeleton("sk"), Err(GltfError::MalformedSkin { .. })));
}

#[test]
fn oversized_skin_is_rejected() {
    let joints: Vec<String> = (0..256).map(|i| format!("j{}", i)).collect();
    let mut nodes = serde_json::Map::new();
    for (i, key) in joints.iter().enumerate() {
        let mut node = json!({ "jointName": format!("bone{}", i) });
        if let Some(next) = joints.get(i + 1) {
            node["children"] = json!([next]);
        }
        nodes.insert(key.clone(), node);
    }
    assert!(matches!(
        load_skin(Value::Object(nodes), &["j0"], &joints),
        Err(GltfError::MalformedSkin { skin, .. }) if skin == "sk"
    ));
}

#[test]
fn scene_length_past_end_of_file() {
    let mut bytes = glb(r#"{"asset":{"version":"1.0"}}"#, &[0; 8]);
    bytes[12..16].copy_from_slice(&1000u32.to_le_bytes());
    assert!(matches!(
        GltfLoader::new().load_from_bytes(&bytes, None),
        Err(GltfError::TruncatedContainer { field: "sceneLength", needed: 1020, .. })
    ));
}

#[test]
fn child_lookup_by_name() {
    let gltf = GltfLoader::new()
        .load_from_str(
            r#"{
                "asset": { "version": "1.0" },
                "scenes": { "s": { "nodes": ["root"] } },
                "nodes": {
                    "root": { "children": ["a", "b"] },
                    "a": { "name": "Arm" },
                    "b": { "name": "Leg" }
                }
            }"#,
            None,
        )
        .unwrap();

    let (key, node) = gltf.node_child_by_name("root", "Leg").unwrap().unwrap();
    assert_eq!(key, "b");
    assert_eq!(node.name, "Leg");
    assert!(gltf.node_child_by_name("root", "Head").unwrap().is_none());
    assert!(gltf.node_child_by_name("missing", "Leg").is_err());
}
