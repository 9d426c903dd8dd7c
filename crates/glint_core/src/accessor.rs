//! Buffers, buffer views and accessors, plus the byte-level view that
//! resolves an accessor through its buffer view into its buffer.

use glint_math::{Mat4, Quat, Vec2, Vec3};
use serde_json::Value;

use crate::error::{EntityKind, GltfError, GltfResult};

/// Reserved key of the buffer backed by a `.glb` binary chunk.
pub const BINARY_BUFFER_KEY: &str = "binary_glTF";

/// How the buffer's bytes are meant to be interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BufferType {
    #[default]
    ArrayBuffer,
    Text,
}

impl BufferType {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "arraybuffer" => Some(BufferType::ArrayBuffer),
            "text" => Some(BufferType::Text),
            _ => None,
        }
    }
}

/// A raw byte blob. Owns its bytes.
#[derive(Clone, Debug, Default)]
pub struct Buffer {
    pub name: String,
    /// `None` for the binary chunk buffer; the scheme part for data URIs.
    pub uri: Option<String>,
    pub byte_length: usize,
    pub buffer_type: BufferType,
    pub data: Vec<u8>,
    pub extras: Value,
}

/// GPU binding hint for a buffer view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferTarget {
    ArrayBuffer,
    ElementArrayBuffer,
}

impl BufferTarget {
    pub fn from_gl(value: u64) -> Option<Self> {
        match value {
            34962 => Some(BufferTarget::ArrayBuffer),
            34963 => Some(BufferTarget::ElementArrayBuffer),
            _ => None,
        }
    }

    pub fn gl_enum(&self) -> u32 {
        match self {
            BufferTarget::ArrayBuffer => 34962,
            BufferTarget::ElementArrayBuffer => 34963,
        }
    }
}

/// A contiguous byte range within a buffer.
#[derive(Clone, Debug, Default)]
pub struct BufferView {
    pub name: String,
    /// Key of the owning buffer
    pub buffer: String,
    pub byte_offset: usize,
    /// `None` means "to the end of the buffer"
    pub byte_length: Option<usize>,
    pub target: Option<BufferTarget>,
    pub extras: Value,
}

impl BufferView {
    /// Byte range of this view inside `buffer`, checked against its length.
    pub fn range(&self, key: &str, buffer: &Buffer) -> GltfResult<std::ops::Range<usize>> {
        let len = buffer.data.len();
        if self.byte_offset > len {
            return Err(GltfError::out_of_bounds(
                EntityKind::BufferView,
                key,
                format!("byteOffset {} exceeds buffer length {}", self.byte_offset, len),
            ));
        }
        let byte_length = self.byte_length.unwrap_or(len - self.byte_offset);
        let end = self.byte_offset.checked_add(byte_length).filter(|end| *end <= len);
        match end {
            Some(end) => Ok(self.byte_offset..end),
            None => Err(GltfError::out_of_bounds(
                EntityKind::BufferView,
                key,
                format!(
                    "range {}+{} exceeds buffer '{}' length {}",
                    self.byte_offset, byte_length, self.buffer, len
                ),
            )),
        }
    }
}

/// Component scalar type of an accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    UnsignedInt,
    Float,
}

impl ComponentType {
    pub fn from_gl(value: u64) -> Option<Self> {
        match value {
            5120 => Some(ComponentType::Byte),
            5121 => Some(ComponentType::UnsignedByte),
            5122 => Some(ComponentType::Short),
            5123 => Some(ComponentType::UnsignedShort),
            5125 => Some(ComponentType::UnsignedInt),
            5126 => Some(ComponentType::Float),
            _ => None,
        }
    }

    /// Size in bytes of one component.
    pub fn byte_size(&self) -> usize {
        match self {
            ComponentType::Byte | ComponentType::UnsignedByte => 1,
            ComponentType::Short | ComponentType::UnsignedShort => 2,
            ComponentType::UnsignedInt | ComponentType::Float => 4,
        }
    }
}

/// Element shape of an accessor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl DataType {
    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "SCALAR" => Some(DataType::Scalar),
            "VEC2" => Some(DataType::Vec2),
            "VEC3" => Some(DataType::Vec3),
            "VEC4" => Some(DataType::Vec4),
            "MAT2" => Some(DataType::Mat2),
            "MAT3" => Some(DataType::Mat3),
            "MAT4" => Some(DataType::Mat4),
            _ => None,
        }
    }

    /// Number of components per element.
    pub fn num_components(&self) -> usize {
        match self {
            DataType::Scalar => 1,
            DataType::Vec2 => 2,
            DataType::Vec3 => 3,
            DataType::Vec4 | DataType::Mat2 => 4,
            DataType::Mat3 => 9,
            DataType::Mat4 => 16,
        }
    }
}

/// A typed view over a region of a buffer view.
#[derive(Clone, Debug)]
pub struct Accessor {
    pub name: String,
    /// Key of the buffer view this accessor reads from
    pub buffer_view: String,
    pub byte_offset: usize,
    /// Zero or absent means tightly packed
    pub byte_stride: Option<usize>,
    pub count: usize,
    pub component_type: ComponentType,
    pub data_type: DataType,
    pub min: Vec<f32>,
    pub max: Vec<f32>,
    pub extras: Value,
}

impl Accessor {
    pub fn num_components(&self) -> usize {
        self.data_type.num_components()
    }

    pub fn component_byte_size(&self) -> usize {
        self.component_type.byte_size()
    }

    /// Size in bytes of one element.
    pub fn element_size(&self) -> usize {
        self.num_components() * self.component_byte_size()
    }

    /// Distance in bytes between the starts of consecutive elements.
    pub fn stride(&self) -> usize {
        match self.byte_stride {
            Some(stride) if stride > 0 => stride,
            _ => self.element_size(),
        }
    }

    /// Number of bytes spanned by all elements, from the first byte of the
    /// first element to the last byte of the last.
    /// `None` if the span does not fit in `usize`.
    pub fn byte_span(&self) -> Option<usize> {
        if self.count == 0 {
            return Some(0);
        }
        (self.count - 1)
            .checked_mul(self.stride())?
            .checked_add(self.element_size())
    }

    /// Resolve this accessor against its buffer view and buffer.
    pub fn view<'a>(
        &self,
        key: &str,
        buffer_view_key: &str,
        buffer_view: &BufferView,
        buffer: &'a Buffer,
    ) -> GltfResult<AccessorView<'a>> {
        let view_range = buffer_view.range(buffer_view_key, buffer)?;
        let view_len = view_range.len();
        let end = self
            .byte_span()
            .and_then(|span| self.byte_offset.checked_add(span));
        match end {
            Some(end) if end <= view_len => {
                let start = view_range.start + self.byte_offset;
                Ok(AccessorView {
                    key: key.to_string(),
                    bytes: &buffer.data[start..view_range.start + end],
                    count: self.count,
                    element_size: self.element_size(),
                    stride: self.stride(),
                    component_type: self.component_type,
                    data_type: self.data_type,
                })
            }
            _ => Err(GltfError::out_of_bounds(
                EntityKind::Accessor,
                key,
                format!(
                    "{} elements of {} bytes (stride {}) from offset {} exceed bufferView '{}' length {}",
                    self.count,
                    self.element_size(),
                    self.stride(),
                    self.byte_offset,
                    buffer_view_key,
                    view_len
                ),
            )),
        }
    }
}

/// The resolved bytes of an accessor: `count` elements of `element_size`
/// bytes, `stride` bytes apart.
#[derive(Clone, Debug)]
pub struct AccessorView<'a> {
    key: String,
    bytes: &'a [u8],
    count: usize,
    element_size: usize,
    stride: usize,
    component_type: ComponentType,
    data_type: DataType,
}

impl<'a> AccessorView<'a> {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// All bytes covered by the view, including stride padding.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Raw bytes of element `index`.
    pub fn element(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.stride;
        self.bytes.get(start..start + self.element_size)
    }

    /// Iterate raw element bytes in order.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.count).filter_map(move |i| self.element(i))
    }

    /// Copy every component out as `f32`. FLOAT accessors only.
    pub fn read_f32(&self) -> GltfResult<Vec<f32>> {
        if self.component_type != ComponentType::Float {
            return Err(self.unsupported("f32"));
        }
        let mut out = Vec::with_capacity(self.count * self.data_type.num_components());
        for element in self.iter() {
            out.extend(
                element
                    .chunks_exact(4)
                    .map(bytemuck::pod_read_unaligned::<f32>),
            );
        }
        Ok(out)
    }

    pub fn read_vec2(&self) -> GltfResult<Vec<Vec2>> {
        self.expect_type(DataType::Vec2, "VEC2")?;
        Ok(self
            .read_f32()?
            .chunks_exact(2)
            .map(Vec2::from_slice)
            .collect())
    }

    pub fn read_vec3(&self) -> GltfResult<Vec<Vec3>> {
        self.expect_type(DataType::Vec3, "VEC3")?;
        Ok(self
            .read_f32()?
            .chunks_exact(3)
            .map(Vec3::from_slice)
            .collect())
    }

    pub fn read_quat(&self) -> GltfResult<Vec<Quat>> {
        self.expect_type(DataType::Vec4, "VEC4")?;
        Ok(self
            .read_f32()?
            .chunks_exact(4)
            .map(Quat::from_slice)
            .collect())
    }

    pub fn read_mat4(&self) -> GltfResult<Vec<Mat4>> {
        self.expect_type(DataType::Mat4, "MAT4")?;
        Ok(self
            .read_f32()?
            .chunks_exact(16)
            .map(Mat4::from_cols_slice)
            .collect())
    }

    /// Read a SCALAR index accessor, widening to `u32`.
    pub fn read_indices(&self) -> GltfResult<Vec<u32>> {
        self.expect_type(DataType::Scalar, "SCALAR indices")?;
        let read: fn(&[u8]) -> u32 = match self.component_type {
            ComponentType::UnsignedByte => |b| b[0] as u32,
            ComponentType::UnsignedShort => |b| u16::from_le_bytes([b[0], b[1]]) as u32,
            ComponentType::UnsignedInt => |b| bytemuck::pod_read_unaligned::<u32>(&b[..4]),
            _ => return Err(self.unsupported("indices")),
        };
        Ok(self.iter().map(read).collect())
    }

    fn expect_type(&self, data_type: DataType, requested: &'static str) -> GltfResult<()> {
        if self.data_type == data_type {
            Ok(())
        } else {
            Err(self.unsupported(requested))
        }
    }

    fn unsupported(&self, requested: &'static str) -> GltfError {
        GltfError::UnsupportedAccessor {
            key: self.key.clone(),
            requested,
        }
    }
}
