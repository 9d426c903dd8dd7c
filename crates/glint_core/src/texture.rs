//! Images, samplers and textures.
//!
//! Images are decoded once during load through an [`ImageDecoder`] and kept
//! as RGBA8 pixels, ready for upload by whichever renderer consumes them.

use std::error::Error;

use serde_json::Value;

/// Boxed error returned by image decoders.
pub type DecodeError = Box<dyn Error + Send + Sync>;

/// Encoded image formats a glTF 1.0 asset may carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Parse a MIME type such as `image/png`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Guess from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }
}

/// A decoded image with pixel data.
///
/// Stores pixels as RGBA8, row-major, top row first.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// 4 bytes per pixel
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Create a new image from pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get pixel at integer coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.pixels.get(idx..idx + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.pixels.len()
    }
}

/// Turns encoded image bytes into pixels.
pub trait ImageDecoder: Send + Sync {
    /// Decode `bytes`; `hint` is the format the manifest claims, if any.
    fn decode(&self, bytes: &[u8], hint: Option<ImageFormat>) -> Result<DecodedImage, DecodeError>;
}

/// Default decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8], hint: Option<ImageFormat>) -> Result<DecodedImage, DecodeError> {
        let img = match hint {
            Some(ImageFormat::Png) => image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?,
            Some(ImageFormat::Jpeg) => {
                image::load_from_memory_with_format(bytes, image::ImageFormat::Jpeg)?
            }
            None => image::load_from_memory(bytes)?,
        };

        // Convert to RGBA8
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DecodedImage::new(width, height, rgba.into_raw()))
    }
}

/// Where an image's encoded bytes came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// Path relative to the manifest
    External(String),
    /// Inline `data:` URI
    Embedded,
    /// A buffer view of the binary chunk (`KHR_binary_glTF`)
    BufferView(String),
}

/// An image entity.
#[derive(Clone, Debug)]
pub struct Image {
    pub name: String,
    pub uri: Option<String>,
    pub source: ImageSource,
    pub format: Option<ImageFormat>,
    /// `None` when the loader was told not to decode images.
    pub decoded: Option<DecodedImage>,
    pub extras: Value,
}

/// Texture sampling state, as GL enums.
#[derive(Clone, Debug)]
pub struct Sampler {
    pub name: String,
    pub mag_filter: u32,
    pub min_filter: u32,
    pub wrap_s: u32,
    pub wrap_t: u32,
    pub extras: Value,
}

impl Sampler {
    pub const LINEAR: u32 = 9729;
    pub const NEAREST_MIPMAP_LINEAR: u32 = 9986;
    pub const REPEAT: u32 = 10497;
}

impl Default for Sampler {
    fn default() -> Self {
        Self {
            name: String::new(),
            mag_filter: Self::LINEAR,
            min_filter: Self::NEAREST_MIPMAP_LINEAR,
            wrap_s: Self::REPEAT,
            wrap_t: Self::REPEAT,
            extras: Value::Null,
        }
    }
}

/// An image paired with a sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    pub name: String,
    /// Key of the image
    pub source: String,
    /// Key of the sampler
    pub sampler: String,
    pub target: u32,
    pub format: u32,
    pub internal_format: u32,
    pub texel_type: u32,
    pub extras: Value,
}

impl Texture {
    pub const TEXTURE_2D: u32 = 3553;
    pub const RGBA: u32 = 6408;
    pub const UNSIGNED_BYTE: u32 = 5121;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_lookup() {
        let img = DecodedImage::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.size_bytes(), 8);
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ImageFormat::from_mime("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime("image/gif"), None);
        assert_eq!(ImageFormat::from_extension("JPG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_decode_png() {
        // Encode a 1x1 red pixel, then decode it back through the trait.
        let mut bytes = Vec::new();
        let img = image::RgbaImage::from_raw(1, 1, vec![255, 0, 0, 255]).unwrap();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = ImageCrateDecoder.decode(&bytes, Some(ImageFormat::Png)).unwrap();
        assert_eq!((decoded.width, decoded.height), (1, 1));
        assert_eq!(decoded.pixel(0, 0), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(ImageCrateDecoder.decode(b"not an image", None).is_err());
    }

    #[test]
    fn test_sampler_defaults() {
        let sampler = Sampler::default();
        assert_eq!(sampler.mag_filter, 9729);
        assert_eq!(sampler.wrap_t, 10497);
    }
}
