use crate::{EulerRot, Mat4, Quat, Vec3};

/// World axis used by keyboard-driven translation and rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline]
    pub const fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
        }
    }
}

/// Object transform with non-uniform scale (Euler XYZ).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians (XYZ order).
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    #[inline]
    pub const fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation_euler: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    #[inline]
    pub fn from_trs(translation: Vec3, rotation_euler: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation_euler,
            scale,
        }
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.translation)
    }

    /// Move along a world axis. `amount` may be negative.
    #[inline]
    pub fn translate_along(&mut self, axis: Axis, amount: f32) {
        self.translation += axis.unit() * amount;
    }

    /// Accumulate `radians` into the Euler angle of `axis`.
    #[inline]
    pub fn rotate_about(&mut self, axis: Axis, radians: f32) {
        self.rotation_euler += axis.unit() * radians;
    }

    /// Add `delta` to every scale component, never going below `min`.
    pub fn grow_uniform(&mut self, delta: f32, min: f32) {
        self.scale = (self.scale + Vec3::splat(delta)).max(Vec3::splat(min));
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn translate_along_axis_is_signed() {
        let mut t = Transform::identity();
        t.translate_along(Axis::X, 0.5);
        t.translate_along(Axis::Z, -0.25);
        assert_eq!(t.translation, vec3(0.5, 0.0, -0.25));
    }

    #[test]
    fn rotate_about_accumulates() {
        let mut t = Transform::identity();
        t.rotate_about(Axis::Y, 0.1);
        t.rotate_about(Axis::Y, 0.2);
        assert!((t.rotation_euler.y - 0.3).abs() < 1e-6);
        assert_eq!(t.rotation_euler.x, 0.0);
    }

    #[test]
    fn grow_uniform_respects_floor() {
        let mut t = Transform::identity();
        t.grow_uniform(-5.0, 0.05);
        assert_eq!(t.scale, Vec3::splat(0.05));
        t.grow_uniform(0.5, 0.05);
        assert!((t.scale.x - 0.55).abs() < 1e-6);
    }
}
