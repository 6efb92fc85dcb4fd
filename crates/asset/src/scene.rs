//! JSON scene description: camera, light, motion tuning and the object list.
//!
//! Loaded once at startup. Every field except `objects[].mesh` has a default.

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Upper bound for `curve.points_per_segment`.
pub const MAX_POINTS_PER_SEGMENT: u32 = 10_000;
/// Upper bound for `objects[].copies`.
pub const MAX_COPIES: u32 = 1024;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CameraDesc {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub move_step: f32,
    pub sensitivity: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            target: [0.0, 0.0, 0.0],
            fov_deg: 45.0,
            near: 0.1,
            far: 100.0,
            move_step: 0.05,
            sensitivity: 0.05,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LightDesc {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Default for LightDesc {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 0.0],
            color: [1.0, 1.0, 0.8],
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MotionDesc {
    pub translation_step: f32,
    pub rotation_speed_deg: f32,
    pub scale_step: f32,
    pub min_scale: f32,
}

impl Default for MotionDesc {
    fn default() -> Self {
        Self {
            translation_step: 0.1,
            rotation_speed_deg: 90.0,
            scale_step: 0.05,
            min_scale: 0.05,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CurveDesc {
    pub control_points: Vec<[f32; 3]>,
    pub points_per_segment: u32,
    /// Start playing as soon as the scene loads.
    pub play: bool,
}

impl Default for CurveDesc {
    fn default() -> Self {
        Self {
            control_points: Vec::new(),
            points_per_segment: 100,
            play: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ObjectDesc {
    #[serde(default)]
    pub name: Option<String>,
    /// OBJ file, relative to the scene file.
    pub mesh: PathBuf,
    /// Selection id (keys 0-9). Omit for decoration.
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    #[serde(default = "one")]
    pub scale: f32,
    /// Replicas laid out in a row along X.
    #[serde(default = "one_u32")]
    pub copies: u32,
    #[serde(default = "default_spacing")]
    pub spacing: f32,
    #[serde(default)]
    pub curve: Option<CurveDesc>,
}

fn one() -> f32 {
    1.0
}

fn one_u32() -> u32 {
    1
}

fn default_spacing() -> f32 {
    2.75
}

impl ObjectDesc {
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.mesh
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "object".to_string())
        })
    }

    /// Ids taken by this entry and its replicas.
    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.id
            .into_iter()
            .flat_map(move |base| (0..self.copies).map(move |k| base.saturating_add(k)))
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraDesc,
    pub light: LightDesc,
    pub motion: MotionDesc,
    pub clear_color: Option<[f32; 3]>,
    pub objects: Vec<ObjectDesc>,
    /// Directory of the scene file; mesh paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl SceneDescription {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
        let mut desc = Self::from_json(&text)
            .with_context(|| format!("Invalid scene file: {}", path.display()))?;
        desc.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        log::info!(
            "Loaded scene {} with {} object entr{}",
            path.display(),
            desc.objects.len(),
            if desc.objects.len() == 1 { "y" } else { "ies" }
        );
        Ok(desc)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let desc: Self = serde_json::from_str(text).context("Malformed scene JSON")?;
        desc.validate()?;
        Ok(desc)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.objects.is_empty(), "Scene has no objects");

        let c = &self.camera;
        ensure!(
            finite(&c.position) && finite(&c.target),
            "Camera position/target must be finite"
        );
        ensure!(
            c.near > 0.0 && c.far > c.near,
            "Camera clip planes must satisfy 0 < near < far (got {} / {})",
            c.near,
            c.far
        );
        ensure!(
            finite(&self.light.position) && finite(&self.light.color),
            "Light values must be finite"
        );
        ensure!(
            c.fov_deg.is_finite() && c.move_step.is_finite() && c.sensitivity.is_finite(),
            "Camera fov/move_step/sensitivity must be finite"
        );
        ensure!(
            self.clear_color.as_ref().is_none_or(finite),
            "clear_color must be finite"
        );

        let m = &self.motion;
        ensure!(
            m.translation_step.is_finite()
                && m.rotation_speed_deg.is_finite()
                && m.scale_step.is_finite(),
            "Motion steps must be finite"
        );
        ensure!(
            m.min_scale.is_finite() && m.min_scale > 0.0,
            "motion.min_scale must be positive"
        );

        let mut seen = HashSet::new();
        for (i, obj) in self.objects.iter().enumerate() {
            ensure!(
                (1..=MAX_COPIES).contains(&obj.copies),
                "Object #{i}: copies must be in 1..={MAX_COPIES} (got {})",
                obj.copies
            );
            ensure!(obj.spacing.is_finite(), "Object #{i}: spacing must be finite");
            ensure!(
                finite(&obj.position) && finite(&obj.rotation_deg) && obj.scale.is_finite(),
                "Object #{i}: transform values must be finite"
            );
            ensure!(obj.scale > 0.0, "Object #{i}: scale must be positive");
            if let Some(curve) = &obj.curve {
                ensure!(
                    curve.control_points.iter().all(finite),
                    "Object #{i}: curve control points must be finite"
                );
                ensure!(
                    curve.points_per_segment <= MAX_POINTS_PER_SEGMENT,
                    "Object #{i}: curve.points_per_segment must be at most {MAX_POINTS_PER_SEGMENT} (got {})",
                    curve.points_per_segment
                );
            }
            for id in obj.ids() {
                if !seen.insert(id) {
                    bail!("Object #{i}: id {id} is already used");
                }
            }
        }
        Ok(())
    }

    pub fn mesh_path(&self, obj: &ObjectDesc) -> PathBuf {
        if obj.mesh.is_absolute() {
            obj.mesh.clone()
        } else {
            self.base_dir.join(&obj.mesh)
        }
    }
}

fn finite(v: &[f32; 3]) -> bool {
    v.iter().all(|c| c.is_finite())
}
