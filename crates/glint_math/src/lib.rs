// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod interpolate;
mod projection;
mod transform;

pub use interpolate::Interpolate;
pub use projection::{OrthographicProjection, PerspectiveProjection};
pub use transform::Transform;
