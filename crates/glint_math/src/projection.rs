use glam::Mat4;

/// Perspective projection parameters (camera → clip space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveProjection {
    /// Width / height. `None` means "use the viewport's aspect".
    pub aspect_ratio: Option<f32>,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveProjection {
    /// Create a perspective projection.
    pub fn new(aspect_ratio: Option<f32>, fov_y: f32, near: f32, far: f32) -> Self {
        Self {
            aspect_ratio,
            fov_y,
            near,
            far,
        }
    }

    /// Update aspect ratio (e.g., on window resize)
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect_ratio = Some(aspect);
    }

    /// Get the projection matrix, falling back to `viewport_aspect` when the
    /// projection carries no aspect ratio of its own.
    pub fn matrix(&self, viewport_aspect: f32) -> Mat4 {
        let aspect = self.aspect_ratio.unwrap_or(viewport_aspect);
        Mat4::perspective_rh_gl(self.fov_y, aspect, self.near, self.far)
    }
}

/// Orthographic projection volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthographicProjection {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthographicProjection {
    /// Build a symmetric volume from half extents.
    pub fn from_magnification(xmag: f32, ymag: f32, near: f32, far: f32) -> Self {
        Self {
            left: -xmag,
            right: xmag,
            bottom: -ymag,
            top: ymag,
            near,
            far,
        }
    }

    /// Get the projection matrix (camera → clip space)
    pub fn matrix(&self) -> Mat4 {
        Mat4::orthographic_rh_gl(self.left, self.right, self.bottom, self.top, self.near, self.far)
    }
}
