//! Scene description -> CPU meshes + `corelib::Scene`.
//!
//! Everything here runs before the GPU is touched, so it can be tested
//! without a window. Meshes are deduplicated by path; `SceneObject::mesh`
//! indexes into [`LoadedScene::meshes`], and the renderer receives them in
//! the same order.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use asset::mesh::MeshData;
use asset::mtl::{MaterialLibrary, MtlMaterial};
use asset::obj::{ObjModel, load_obj_from_path};
use asset::scene::{ObjectDesc, SceneDescription};
use asset::texture::TextureData;
use corelib::bezier::BezierCurve;
use corelib::camera::Camera;
use corelib::scene::{Light, Material, Motion, Scene, SceneObject, row_positions};
use corelib::transform::Transform;
use corelib::{Vec3, vec3};

const FALLBACK_TEXTURE_SIZE: u32 = 64;

pub struct LoadedMesh {
    pub path: PathBuf,
    pub mesh: MeshData,
    pub texture: TextureData,
    pub material: Material,
}

pub struct LoadedScene {
    pub scene: Scene,
    pub meshes: Vec<LoadedMesh>,
    pub clear_color: [f32; 3],
}

pub fn load_scene(path: &Path) -> Result<LoadedScene> {
    let desc = SceneDescription::load(path)?;
    build_scene(&desc)
}

pub fn build_scene(desc: &SceneDescription) -> Result<LoadedScene> {
    let c = &desc.camera;
    let mut camera = Camera::looking_at(
        Vec3::from(c.position),
        Vec3::from(c.target),
        c.fov_deg,
        c.near,
        c.far,
        1.0,
    );
    camera.move_step = c.move_step;
    camera.sensitivity = c.sensitivity;

    let light = Light {
        position: Vec3::from(desc.light.position),
        color: Vec3::from(desc.light.color),
    };

    let mut scene = Scene::new(camera, light);
    scene.motion = Motion {
        translation_step: desc.motion.translation_step,
        rotation_speed: desc.motion.rotation_speed_deg.to_radians(),
        scale_step: desc.motion.scale_step,
        min_scale: desc.motion.min_scale,
    };

    let mut meshes: Vec<LoadedMesh> = Vec::new();
    let mut by_path: HashMap<PathBuf, usize> = HashMap::new();

    for obj in &desc.objects {
        let path = desc.mesh_path(obj);
        let mesh_idx = match by_path.get(&path) {
            Some(&i) => i,
            None => {
                meshes.push(load_mesh(&path)?);
                by_path.insert(path, meshes.len() - 1);
                meshes.len() - 1
            }
        };
        let material = meshes[mesh_idx].material;

        for object in expand_object(obj, mesh_idx, material) {
            scene
                .push(object)
                .with_context(|| format!("Cannot add '{}' to the scene", obj.display_name()))?;
        }
    }

    log::info!(
        "Scene ready: {} object(s), {} unique mesh(es)",
        scene.len(),
        meshes.len()
    );

    Ok(LoadedScene {
        scene,
        meshes,
        clear_color: desc.clear_color.unwrap_or([0.1, 0.1, 0.1]),
    })
}

/// One description entry -> `copies` scene objects laid out in a row.
fn expand_object(obj: &ObjectDesc, mesh: usize, material: Material) -> Vec<SceneObject> {
    let name = obj.display_name();
    let rotation = Vec3::from(obj.rotation_deg.map(f32::to_radians));
    let base = Vec3::from(obj.position);

    row_positions(obj.copies as usize, obj.spacing)
        .into_iter()
        .enumerate()
        .map(|(k, dx)| {
            let offset = vec3(dx, 0.0, 0.0);
            let transform = Transform::from_trs(base + offset, rotation, Vec3::splat(obj.scale));
            let label = if obj.copies > 1 {
                format!("{name}#{k}")
            } else {
                name.clone()
            };

            let mut object = SceneObject::new(label, mesh, transform).with_material(material);
            if let Some(id) = obj.id {
                object = object.with_id(id.saturating_add(k as u32));
            }
            if let Some(curve) = &obj.curve {
                let points = curve
                    .control_points
                    .iter()
                    .map(|p| Vec3::from(*p) + offset)
                    .collect();
                let bezier = BezierCurve::new(points, curve.points_per_segment);
                if bezier.is_empty() {
                    log::warn!(
                        "Curve of '{}' needs at least 4 control points; playback disabled",
                        object.name
                    );
                }
                object = object.with_curve(bezier, curve.play);
            }
            object
        })
        .collect()
}

fn load_mesh(path: &Path) -> Result<LoadedMesh> {
    let model = load_obj_from_path(path)?;
    let (material, texture) = resolve_material(&model, path);
    Ok(LoadedMesh {
        path: path.to_path_buf(),
        mesh: model.mesh,
        texture,
        material,
    })
}

/// Missing or broken material files are not fatal: the object falls back to
/// default coefficients and a checkerboard texture.
fn resolve_material(model: &ObjModel, obj_path: &Path) -> (Material, TextureData) {
    let fallback = || {
        (
            Material::default(),
            TextureData::create_test_texture(FALLBACK_TEXTURE_SIZE),
        )
    };

    let Some(lib_path) = model.material_library_path(obj_path) else {
        log::debug!("{} has no mtllib; using default material", obj_path.display());
        return fallback();
    };
    let lib = match MaterialLibrary::load(&lib_path) {
        Ok(lib) => lib,
        Err(e) => {
            log::warn!("{e:#}; using default material");
            return fallback();
        }
    };
    let Some(mtl) = model.material_name.as_deref().and_then(|n| lib.get(n)) else {
        log::warn!(
            "Material {:?} not found in {}; using default material",
            model.material_name,
            lib_path.display()
        );
        return fallback();
    };

    let texture = match lib.diffuse_map_path(mtl) {
        Some(tex_path) => TextureData::load(&tex_path).unwrap_or_else(|e| {
            log::warn!("{e:#}; using checkerboard texture");
            TextureData::create_test_texture(FALLBACK_TEXTURE_SIZE)
        }),
        None => TextureData::create_test_texture(FALLBACK_TEXTURE_SIZE),
    };
    (to_material(mtl), texture)
}

fn to_material(mtl: &MtlMaterial) -> Material {
    Material {
        ambient: Vec3::from(mtl.ambient),
        diffuse: Vec3::from(mtl.diffuse),
        specular: Vec3::from(mtl.specular),
        shininess: mtl.shininess,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TRIANGLE: &str = "mtllib tri.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl Red\nf 1 2 3\n";
    const MTL: &str = "newmtl Red\nKd 1 0 0\nNs 64\nmap_Kd missing.png\n";

    fn write_assets(dir: &Path) {
        fs::create_dir_all(dir.join("models")).unwrap();
        fs::write(dir.join("models/tri.obj"), TRIANGLE).unwrap();
        fs::write(dir.join("models/tri.mtl"), MTL).unwrap();
        fs::write(dir.join("models/plain.obj"), "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    }

    #[test]
    fn builds_scene_with_shared_meshes_and_replicas() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        let scene_path = dir.path().join("scene.json");
        fs::write(
            &scene_path,
            r#"{
                "objects": [
                    { "mesh": "models/tri.obj", "id": 0, "copies": 3, "spacing": 2.0 },
                    { "mesh": "models/tri.obj", "name": "lone", "position": [0, 5, 0] },
                    { "mesh": "models/plain.obj", "id": 5 }
                ]
            }"#,
        )
        .unwrap();

        let loaded = load_scene(&scene_path).unwrap();
        assert_eq!(loaded.meshes.len(), 2);
        assert_eq!(loaded.scene.len(), 5);

        let xs: Vec<f32> = loaded.scene.objects()[..3]
            .iter()
            .map(|o| o.transform.translation.x)
            .collect();
        assert_eq!(xs, vec![0.0, 2.0, -2.0]);
        assert_eq!(loaded.scene.objects()[2].id, Some(2));
        assert_eq!(loaded.scene.objects()[3].id, None);
        assert_eq!(loaded.scene.objects()[3].mesh, 0);
        assert_eq!(loaded.scene.objects()[4].mesh, 1);

        let red = loaded.scene.objects()[0].material;
        assert_eq!(red.diffuse, vec3(1.0, 0.0, 0.0));
        assert_eq!(red.shininess, 64.0);
        // missing texture falls back to the checkerboard
        assert_eq!(loaded.meshes[0].texture.width, FALLBACK_TEXTURE_SIZE);

        assert_eq!(loaded.scene.objects()[4].material, Material::default());
    }

    #[test]
    fn replica_curves_follow_their_offset() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        let mut desc = SceneDescription::from_json(
            r#"{ "objects": [ {
                "mesh": "models/plain.obj", "id": 1, "copies": 2, "spacing": 3.0,
                "curve": { "control_points": [[0,0,0],[1,0,0],[1,1,0],[0,1,0]],
                           "points_per_segment": 4, "play": true }
            } ] }"#,
        )
        .unwrap();
        desc.base_dir = dir.path().to_path_buf();

        let loaded = build_scene(&desc).unwrap();
        let second = &loaded.scene.objects()[1];
        assert!(second.play_curve);
        assert_eq!(second.curve.samples()[0], vec3(3.0, 0.0, 0.0));
    }

    #[test]
    fn missing_mesh_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut desc =
            SceneDescription::from_json(r#"{ "objects": [ { "mesh": "nope.obj" } ] }"#).unwrap();
        desc.base_dir = dir.path().to_path_buf();
        let err = build_scene(&desc).err().unwrap();
        assert!(format!("{err:#}").contains("nope.obj"), "{err:#}");
    }

    #[test]
    fn camera_and_motion_come_from_description() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path());
        let mut desc = SceneDescription::from_json(
            r#"{
                "camera": { "position": [0, 0, 10], "move_step": 0.5 },
                "motion": { "rotation_speed_deg": 180 },
                "clear_color": [1, 1, 1],
                "objects": [ { "mesh": "models/plain.obj" } ]
            }"#,
        )
        .unwrap();
        desc.base_dir = dir.path().to_path_buf();

        let loaded = build_scene(&desc).unwrap();
        assert_eq!(loaded.scene.camera.position, vec3(0.0, 0.0, 10.0));
        assert_eq!(loaded.scene.camera.move_step, 0.5);
        assert!((loaded.scene.motion.rotation_speed - std::f32::consts::PI).abs() < 1e-6);
        assert_eq!(loaded.clear_color, [1.0, 1.0, 1.0]);
    }
}
