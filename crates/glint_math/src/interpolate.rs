use glam::{Quat, Vec3};

/// Values that can be blended between two keyframes.
pub trait Interpolate: Copy {
    /// Blend from `self` to `other` by `t` in `[0, 1]`.
    fn interpolate(self, other: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Vec3 {
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Interpolate for Quat {
    /// Spherical linear interpolation.
    fn interpolate(self, other: Self, t: f32) -> Self {
        self.slerp(other, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_lerp() {
        let mid = Vec3::ZERO.interpolate(Vec3::new(2.0, 4.0, 6.0), 0.5);
        assert!((mid - Vec3::new(1.0, 2.0, 3.0)).length() < 0.001);
    }

    #[test]
    fn test_quat_slerp_halfway() {
        let a = Quat::IDENTITY;
        let b = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let mid = a.interpolate(b, 0.5);
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(mid.angle_between(expected) < 0.001);
    }

    #[test]
    fn test_scalar_endpoints() {
        assert_eq!(1.0f32.interpolate(3.0, 0.0), 1.0);
        assert_eq!(1.0f32.interpolate(3.0, 1.0), 3.0);
    }
}
