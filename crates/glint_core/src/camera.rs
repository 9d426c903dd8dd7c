//! Cameras and their projection descriptors.

use glint_math::{OrthographicProjection, PerspectiveProjection};
use serde_json::Value;

use crate::error::{GltfError, GltfResult};

/// Projection parameters as declared in the manifest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraProjection {
    Perspective {
        aspect_ratio: Option<f32>,
        yfov: f32,
        znear: f32,
        zfar: f32,
    },
    Orthographic {
        xmag: f32,
        ymag: f32,
        znear: f32,
        zfar: f32,
    },
}

impl CameraProjection {
    pub fn type_name(&self) -> &'static str {
        match self {
            CameraProjection::Perspective { .. } => "perspective",
            CameraProjection::Orthographic { .. } => "orthographic",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub name: String,
    pub projection: CameraProjection,
    /// `extras` of the perspective/orthographic block
    pub projection_extras: Value,
    pub extras: Value,
}

impl Camera {
    /// Perspective descriptor, or `CameraTypeMismatch` for an orthographic
    /// camera.
    pub fn perspective(&self, key: &str) -> GltfResult<PerspectiveProjection> {
        match self.projection {
            CameraProjection::Perspective {
                aspect_ratio,
                yfov,
                znear,
                zfar,
            } => Ok(PerspectiveProjection::new(aspect_ratio, yfov, znear, zfar)),
            other => Err(mismatch(key, "perspective", other)),
        }
    }

    /// Orthographic descriptor spanning `[-xmag, xmag] x [-ymag, ymag]`.
    pub fn orthographic(&self, key: &str) -> GltfResult<OrthographicProjection> {
        match self.projection {
            CameraProjection::Orthographic {
                xmag,
                ymag,
                znear,
                zfar,
            } => Ok(OrthographicProjection::from_magnification(xmag, ymag, znear, zfar)),
            other => Err(mismatch(key, "orthographic", other)),
        }
    }
}

fn mismatch(key: &str, requested: &'static str, actual: CameraProjection) -> GltfError {
    GltfError::CameraTypeMismatch {
        camera: key.to_string(),
        requested,
        actual: actual.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(projection: CameraProjection) -> Camera {
        Camera {
            name: String::new(),
            projection,
            projection_extras: Value::Null,
            extras: Value::Null,
        }
    }

    #[test]
    fn test_perspective() {
        let cam = camera(CameraProjection::Perspective {
            aspect_ratio: Some(1.5),
            yfov: 0.8,
            znear: 0.1,
            zfar: 100.0,
        });

        let proj = cam.perspective("c").unwrap();
        assert_eq!(proj.aspect_ratio, Some(1.5));
        assert_eq!(proj.fov_y, 0.8);
        assert!(matches!(
            cam.orthographic("c"),
            Err(GltfError::CameraTypeMismatch { requested: "orthographic", actual: "perspective", .. })
        ));
    }

    #[test]
    fn test_orthographic_bounds() {
        let cam = camera(CameraProjection::Orthographic {
            xmag: 2.0,
            ymag: 1.0,
            znear: 0.0,
            zfar: 10.0,
        });

        let proj = cam.orthographic("c").unwrap();
        assert_eq!((proj.left, proj.right, proj.bottom, proj.top), (-2.0, 2.0, -1.0, 1.0));
        assert!(cam.perspective("c").is_err());
    }
}
