//! Core types: math re-exports, Transform, Camera, Bézier curves, input
//! bindings and the scene update loop.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod bezier;
pub mod camera;
pub mod error;
pub mod input;
pub mod scene;
pub mod transform;

pub use error::{CoreError, CoreResult};

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn to_ndc(cam: &camera::Camera, model: Mat4, p: Vec3) -> Vec3 {
        let clip = cam.proj_view() * model * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn default_camera_sees_the_origin_centered() {
        let ndc = to_ndc(&camera::Camera::default(), Mat4::IDENTITY, Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn row_neighbours_land_on_opposite_sides() {
        let cam = camera::Camera::looking_at(
            vec3(0.0, 0.0, 10.0),
            Vec3::ZERO,
            45.0,
            0.1,
            100.0,
            16.0 / 9.0,
        );
        let xs = scene::row_positions(3, 2.75);
        let placed: Vec<f32> = xs
            .iter()
            .map(|&x| {
                let t = transform::Transform::from_trs(vec3(x, 0.0, 0.0), Vec3::ZERO, Vec3::ONE);
                to_ndc(&cam, t.matrix(), Vec3::ZERO).x
            })
            .collect();
        assert!(placed[0].abs() < 1e-5);
        assert!(placed[1] > 0.0 && placed[2] < 0.0);
        assert!((placed[1] + placed[2]).abs() < 1e-5);
    }

    #[test]
    fn scaled_object_grows_on_screen() {
        let cam = camera::Camera::default();
        let corner = vec3(0.5, 0.5, 0.0);
        let small = to_ndc(&cam, Mat4::IDENTITY, corner);
        let big = transform::Transform::from_trs(Vec3::ZERO, Vec3::ZERO, Vec3::splat(2.0));
        let big = to_ndc(&cam, big.matrix(), corner);
        assert!(big.x > small.x && big.y > small.y);
        assert!(big.to_array().iter().all(|f| f.is_finite()));
    }
}
