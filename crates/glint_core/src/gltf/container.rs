//! The `.glb` binary container (`KHR_binary_glTF`).
//!
//! Layout, all little-endian:
//!
//! ```text
//! 0   magic "glTF"
//! 4   u32 version (1)
//! 8   u32 length        total file size
//! 12  u32 sceneLength   JSON bytes
//! 16  u32 sceneFormat   0 = JSON
//! 20  JSON manifest, sceneLength bytes
//! ..  binary chunk, up to `length`
//! ```

use crate::error::{GltfError, GltfResult};

pub const MAGIC: &[u8; 4] = b"glTF";
pub const HEADER_LEN: usize = 20;
pub const VERSION: u32 = 1;
pub const SCENE_FORMAT_JSON: u32 = 0;

/// Manifest text plus the binary chunk, if the file had one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Container {
    pub manifest: String,
    pub binary: Option<Vec<u8>>,
}

/// Whether `bytes` starts with the binary container magic.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.starts_with(MAGIC)
}

/// Split a file into manifest and binary chunk. Plain JSON files yield the
/// whole text and no binary chunk.
pub fn read_container(bytes: &[u8]) -> GltfResult<Container> {
    if is_binary(bytes) {
        return split_binary(bytes);
    }
    let manifest = std::str::from_utf8(bytes)
        .map_err(|e| GltfError::MalformedJson(format!("manifest is not UTF-8: {}", e)))?;
    Ok(Container {
        manifest: manifest.to_string(),
        binary: None,
    })
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Parse a binary container.
pub fn split_binary(bytes: &[u8]) -> GltfResult<Container> {
    if bytes.len() < HEADER_LEN {
        return Err(GltfError::TruncatedContainer {
            field: "header",
            needed: HEADER_LEN as u64,
            available: bytes.len() as u64,
        });
    }
    if !is_binary(bytes) {
        return Err(GltfError::MalformedContainer(
            "missing 'glTF' magic".to_string(),
        ));
    }

    let version = read_u32(bytes, 4);
    let length = read_u32(bytes, 8) as usize;
    let scene_length = read_u32(bytes, 12) as usize;
    let scene_format = read_u32(bytes, 16);

    if version != VERSION {
        return Err(GltfError::MalformedContainer(format!(
            "unsupported container version {}",
            version
        )));
    }
    if scene_format != SCENE_FORMAT_JSON {
        return Err(GltfError::MalformedContainer(format!(
            "unsupported sceneFormat {}",
            scene_format
        )));
    }
    if length > bytes.len() {
        return Err(GltfError::TruncatedContainer {
            field: "length",
            needed: length as u64,
            available: bytes.len() as u64,
        });
    }
    let json_end = match HEADER_LEN.checked_add(scene_length) {
        Some(end) if end <= bytes.len() => end,
        _ => {
            return Err(GltfError::TruncatedContainer {
                field: "sceneLength",
                needed: HEADER_LEN as u64 + scene_length as u64,
                available: bytes.len() as u64,
            })
        }
    };
    if json_end > length {
        return Err(GltfError::MalformedContainer(format!(
            "length {} is smaller than header plus sceneLength {}",
            length, scene_length
        )));
    }

    let manifest = std::str::from_utf8(&bytes[HEADER_LEN..json_end])
        .map_err(|e| GltfError::MalformedContainer(format!("JSON chunk is not UTF-8: {}", e)))?
        .trim_end_matches(|c: char| c == '\0' || c == ' ')
        .to_string();

    let binary = &bytes[json_end..length];
    log::debug!(
        "Binary container: {} bytes of JSON, {} bytes of binary data",
        scene_length,
        binary.len()
    );

    Ok(Container {
        manifest,
        binary: (!binary.is_empty()).then(|| binary.to_vec()),
    })
}
