use crate::math::{Ray, Vec3};

/// Pinhole at `eye` with an orthonormal basis looking toward the target.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    eye: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl Camera {
    /// `None` when `eye` and `look_at` coincide.
    pub fn look_at(eye: Vec3, look_at: Vec3) -> Option<Self> {
        let forward = look_at - eye;
        if forward.length() == 0.0 || !forward.is_finite() {
            return None;
        }
        let forward = forward.normalized();

        let mut right = Vec3::new(0.0, 1.0, 0.0).cross(forward);
        if right.length() < 1e-6 {
            // Looking straight up or down.
            right = Vec3::new(0.0, 0.0, 1.0).cross(forward);
        }
        let right = right.normalized();
        let up = forward.cross(right);

        Some(Self {
            eye,
            right,
            up,
            forward,
        })
    }

    /// Ray through the point `(px, py)` of a plane `distance` in front of the eye.
    pub fn ray(&self, px: f32, py: f32, distance: f32) -> Ray {
        let direction = self.right * px + self.up * py + self.forward * distance;
        Ray::new(self.eye, direction)
    }
}
