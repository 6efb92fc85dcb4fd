use crate::{Mat4, Vec3};

pub const MIN_FOV_DEG: f32 = 1.0;
pub const MAX_FOV_DEG: f32 = 45.0;
pub const PITCH_LIMIT_DEG: f32 = 89.0;

/// Direction for a single keyboard camera step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMove {
    Forward,
    Backward,
    Left,
    Right,
}

/// First-person perspective camera (right-handed, yaw/pitch in degrees).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw_deg: f32,
    pub pitch_deg: f32,
    pub up: Vec3,
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
    /// World units per key event.
    pub move_step: f32,
    /// Degrees per mouse count.
    pub sensitivity: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        position: Vec3,
        yaw_deg: f32,
        pitch_deg: f32,
        fov_y_deg: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            position,
            yaw_deg,
            pitch_deg: pitch_deg.clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
            up: Vec3::Y,
            fov_y_deg: fov_y_deg.clamp(MIN_FOV_DEG, MAX_FOV_DEG),
            z_near,
            z_far,
            aspect,
            move_step: 0.05,
            sensitivity: 0.05,
        }
    }

    /// Camera at `position` oriented towards `target`.
    pub fn looking_at(
        position: Vec3,
        target: Vec3,
        fov_y_deg: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        let dir = (target - position).normalize_or_zero();
        let (yaw, pitch) = if dir == Vec3::ZERO {
            (-90.0, 0.0)
        } else {
            (
                dir.z.atan2(dir.x).to_degrees(),
                dir.y.clamp(-1.0, 1.0).asin().to_degrees(),
            )
        };
        Self::new_perspective(position, yaw, pitch, fov_y_deg, z_near, z_far, aspect)
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw_deg.to_radians(), self.pitch_deg.to_radians());
        Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.front().cross(self.up).normalize()
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front(), self.up)
    }

    /// Depth in [0, 1], which is what wgpu expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_deg.to_radians(),
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    #[inline]
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn step(&mut self, dir: CameraMove) {
        let delta = match dir {
            CameraMove::Forward => self.front(),
            CameraMove::Backward => -self.front(),
            CameraMove::Left => -self.right(),
            CameraMove::Right => self.right(),
        };
        self.position += delta * self.move_step;
    }

    /// Apply a relative mouse motion. Screen Y grows downwards.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw_deg += dx * self.sensitivity;
        self.pitch_deg =
            (self.pitch_deg - dy * self.sensitivity).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);
    }

    /// Scroll up narrows the field of view.
    pub fn zoom(&mut self, scroll: f32) {
        self.fov_y_deg = (self.fov_y_deg - scroll).clamp(MIN_FOV_DEG, MAX_FOV_DEG);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::looking_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO, 45.0, 0.1, 100.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = Camera::default();
        assert!((cam.yaw_deg + 90.0).abs() < 1e-4);
        assert!((cam.front() - Vec3::NEG_Z).length() < 1e-5);
        assert!((cam.right() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn step_moves_by_move_step() {
        let mut cam = Camera::default();
        cam.step(CameraMove::Forward);
        assert!((cam.position.z - (3.0 - cam.move_step)).abs() < 1e-5);
        cam.step(CameraMove::Right);
        assert!((cam.position.x - cam.move_step).abs() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = Camera::default();
        cam.look(0.0, -1.0e6);
        assert_eq!(cam.pitch_deg, PITCH_LIMIT_DEG);
        cam.look(0.0, 1.0e6);
        assert_eq!(cam.pitch_deg, -PITCH_LIMIT_DEG);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::default();
        cam.zoom(100.0);
        assert_eq!(cam.fov_y_deg, MIN_FOV_DEG);
        cam.zoom(-100.0);
        assert_eq!(cam.fov_y_deg, MAX_FOV_DEG);
    }

    #[test]
    fn looking_at_own_position_falls_back() {
        let cam = Camera::looking_at(Vec3::ONE, Vec3::ONE, 45.0, 0.1, 100.0, 1.0);
        assert!((cam.yaw_deg + 90.0).abs() < 1e-6);
        assert!(cam.proj_view().to_cols_array().iter().all(|f| f.is_finite()));
    }
}
