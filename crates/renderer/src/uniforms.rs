//! CPU mirrors of the WGSL uniform blocks in `shaders/phong.wgsl`.

use bytemuck::{Pod, Zeroable};
use corelib::camera::Camera;
use corelib::scene::{Light, SceneObject};
use glam::{Mat3, Mat4, Vec3};
use wgpu::{VertexBufferLayout, VertexStepMode};

use asset::mesh::MeshVertex;

/// Vertex: position + normal + uv.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2],
    };
}

impl From<&MeshVertex> for Vertex {
    fn from(v: &MeshVertex) -> Self {
        Self {
            pos: v.position,
            normal: v.normal,
            uv: v.uv,
        }
    }
}

/// Per-frame block (group 0).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GlobalsUniform {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_pos: [f32; 4],
    pub light_color: [f32; 4],
}

impl GlobalsUniform {
    pub fn new(camera: &Camera, light: &Light) -> Self {
        Self {
            view: camera.view().to_cols_array_2d(),
            proj: camera.proj().to_cols_array_2d(),
            camera_pos: point(camera.position),
            light_pos: point(light.position),
            light_color: point(light.color),
        }
    }
}

/// Per-object block (group 1).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub diffuse: [f32; 4],
    /// `w` carries the shininess exponent.
    pub specular: [f32; 4],
}

impl ObjectUniform {
    pub fn new(object: &SceneObject) -> Self {
        let model = object.transform.matrix();
        let m = &object.material;
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix(model).to_cols_array_2d(),
            ambient: point(m.ambient),
            diffuse: point(m.diffuse),
            specular: m.specular.extend(m.shininess).to_array(),
        }
    }
}

/// Inverse-transpose of the model's linear part; identity if it is singular.
pub fn normal_matrix(model: Mat4) -> Mat4 {
    let linear = Mat3::from_mat4(model);
    if linear.determinant().abs() < f32::EPSILON {
        return Mat4::IDENTITY;
    }
    Mat4::from_mat3(linear.inverse().transpose())
}

#[inline]
fn point(v: Vec3) -> [f32; 4] {
    v.extend(1.0).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::scene::Material;
    use corelib::transform::Transform;
    use corelib::vec3;

    #[test]
    fn uniform_sizes_match_wgsl() {
        assert_eq!(std::mem::size_of::<GlobalsUniform>(), 176);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 176);
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
    }

    #[test]
    fn object_uniform_packs_material() {
        let obj = SceneObject::new(
            "cube",
            0,
            Transform::from_trs(vec3(1.0, 0.0, 0.0), Vec3::ZERO, Vec3::ONE),
        )
        .with_material(Material {
            shininess: 32.0,
            ..Material::default()
        });
        let u = ObjectUniform::new(&obj);
        assert_eq!(u.specular[3], 32.0);
        assert_eq!(u.model[3][0], 1.0);
        // pure translation leaves normals untouched
        assert_eq!(Mat4::from_cols_array_2d(&u.normal_matrix), Mat4::IDENTITY);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(vec3(2.0, 1.0, 1.0));
        let n = normal_matrix(model).transform_vector3(Vec3::X);
        assert!((n.x - 0.5).abs() < 1e-6);
        assert_eq!(normal_matrix(Mat4::ZERO), Mat4::IDENTITY);
    }
}
