//! Scene state and the per-frame update.
//!
//! Objects live in a dense `Vec`; at most one of them is selected. Input is
//! gathered into a [`FrameInput`] between frames and consumed by
//! [`Scene::update`], which runs rotation, manual transforms and curve
//! playback in object order.

use crate::bezier::BezierCurve;
use crate::camera::Camera;
use crate::error::{CoreError, CoreResult};
use crate::input::ViewerAction;
use crate::transform::{Axis, Transform};
use crate::{Vec3, vec3};

/// Phong coefficients, one RGB triple per term.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::splat(0.2),
            diffuse: Vec3::splat(0.5),
            specular: Vec3::splat(0.5),
            shininess: 10.0,
        }
    }
}

/// Single point light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: vec3(0.0, 10.0, 0.0),
            color: vec3(1.0, 1.0, 0.8),
        }
    }
}

/// Tuning for keyboard-driven transforms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// World units per translation event.
    pub translation_step: f32,
    /// Radians per second while a rotation axis is active.
    pub rotation_speed: f32,
    /// Uniform scale change per scale key press.
    pub scale_step: f32,
    pub min_scale: f32,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            translation_step: 0.1,
            rotation_speed: 90f32.to_radians(),
            scale_step: 0.05,
            min_scale: 0.05,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SceneObject {
    pub name: String,
    /// Selection id; `None` means the object never reacts to input.
    pub id: Option<u32>,
    /// Index into the renderer's mesh table.
    pub mesh: usize,
    pub material: Material,
    pub transform: Transform,
    pub rotation: Option<Axis>,
    pub play_curve: bool,
    pub curve: BezierCurve,
    pub curve_cursor: usize,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: usize, transform: Transform) -> Self {
        Self {
            name: name.into(),
            id: None,
            mesh,
            material: Material::default(),
            transform,
            rotation: None,
            play_curve: false,
            curve: BezierCurve::empty(),
            curve_cursor: 0,
        }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_curve(mut self, curve: BezierCurve, play: bool) -> Self {
        self.curve = curve;
        self.play_curve = play;
        self.curve_cursor = 0;
        self
    }

    /// True while curve playback drives the translation.
    #[inline]
    pub fn is_following_curve(&self) -> bool {
        self.play_curve && !self.curve.is_empty()
    }

    fn advance_curve(&mut self) {
        if let Some(p) = self.curve.point(self.curve_cursor) {
            self.transform.translation = p;
            self.curve_cursor = (self.curve_cursor + 1) % self.curve.len();
        }
    }
}

/// Input gathered between two frames.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Last translation request of the frame.
    pub translate: Option<(Axis, f32)>,
    /// Sum of scale requests of the frame.
    pub scale_delta: f32,
}

impl FrameInput {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// What the caller should do after an action has been applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Left/right alternating row: `0, +s, -s, +2s, -2s, ...`.
pub fn row_positions(count: usize, spacing: f32) -> Vec<f32> {
    (0..count)
        .map(|i| {
            if i == 0 {
                0.0
            } else if i % 2 == 1 {
                spacing * (i / 2 + 1) as f32
            } else {
                -spacing * (i / 2) as f32
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct Scene {
    objects: Vec<SceneObject>,
    selected: Option<usize>,
    pub camera: Camera,
    pub light: Light,
    pub motion: Motion,
}

impl Scene {
    pub fn new(camera: Camera, light: Light) -> Self {
        Self {
            objects: Vec::new(),
            selected: None,
            camera,
            light,
            motion: Motion::default(),
        }
    }

    /// Add an object; its id (if any) must be unique within the scene.
    pub fn push(&mut self, object: SceneObject) -> CoreResult<usize> {
        if let Some(id) = object.id {
            if self.index_of(id).is_some() {
                return Err(CoreError::DuplicateId(id));
            }
        }
        self.objects.push(object);
        Ok(self.objects.len() - 1)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn object_by_id(&self, id: u32) -> Option<&SceneObject> {
        self.index_of(id).map(|i| &self.objects[i])
    }

    pub fn selected(&self) -> Option<&SceneObject> {
        self.selected.map(|i| &self.objects[i])
    }

    pub fn selected_mut(&mut self) -> Option<&mut SceneObject> {
        self.selected.map(|i| &mut self.objects[i])
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.objects.iter().position(|o| o.id == Some(id))
    }

    /// Select the object carrying `id`.
    ///
    /// The previous selection stops rotating and pending input is dropped,
    /// even when `id` is unknown. An unknown id keeps the current selection.
    pub fn select(&mut self, id: u32, input: &mut FrameInput) -> CoreResult<()> {
        self.release_selection();
        input.clear();
        let index = self.index_of(id).ok_or(CoreError::UnknownObject(id))?;
        self.selected = Some(index);
        log::debug!("Selected object {} ('{}')", id, self.objects[index].name);
        Ok(())
    }

    pub fn deselect(&mut self, input: &mut FrameInput) {
        self.release_selection();
        self.selected = None;
        input.clear();
        log::debug!("Selection cleared");
    }

    fn release_selection(&mut self) {
        if let Some(obj) = self.selected_mut() {
            obj.rotation = None;
        }
    }

    /// Apply one input action. Transform requests are queued in `input`
    /// and take effect on the next [`Scene::update`].
    pub fn apply(&mut self, action: ViewerAction, input: &mut FrameInput) -> Flow {
        match action {
            ViewerAction::Quit => return Flow::Quit,
            ViewerAction::Select(id) => {
                if let Err(e) = self.select(id, input) {
                    log::warn!("Ignoring selection: {e}");
                }
            }
            ViewerAction::Deselect => self.deselect(input),
            ViewerAction::SetRotation(axis) => {
                if let Some(obj) = self.selected_mut() {
                    obj.rotation = Some(axis);
                }
            }
            ViewerAction::ToggleCurve => {
                if let Some(obj) = self.selected_mut() {
                    obj.play_curve = !obj.play_curve;
                    log::debug!(
                        "Curve playback for '{}': {}",
                        obj.name,
                        if obj.play_curve { "on" } else { "off" }
                    );
                }
            }
            ViewerAction::Scale(sign) => input.scale_delta += sign.value() * self.motion.scale_step,
            ViewerAction::Translate(axis, sign) => input.translate = Some((axis, sign.value())),
            ViewerAction::MoveCamera(dir) => self.camera.step(dir),
        }
        Flow::Continue
    }

    /// Advance every object by one frame.
    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        let motion = self.motion;
        let selected = self.selected;

        for (i, obj) in self.objects.iter_mut().enumerate() {
            if let Some(axis) = obj.rotation {
                obj.transform.rotate_about(axis, motion.rotation_speed * dt);
            }

            if selected == Some(i) {
                if !obj.is_following_curve() {
                    if let Some((axis, dir)) = input.translate {
                        obj.transform
                            .translate_along(axis, motion.translation_step * dir);
                    }
                }
                if input.scale_delta != 0.0 {
                    obj.transform
                        .grow_uniform(input.scale_delta, motion.min_scale);
                }
            }

            if obj.is_following_curve() {
                obj.advance_curve();
            }
        }
    }
}
