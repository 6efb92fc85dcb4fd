//! winit application: owns the window, the GPU state and the scene.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use corelib::input::KeyBindings;
use corelib::scene::{Flow, FrameInput, Scene};
use renderer::GpuState;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Window, WindowId},
};

use crate::ViewerConfig;
use crate::keymap;
use crate::loader::{self, LoadedScene};

/// Pixel scroll deltas are divided by this to match one wheel notch.
const PIXELS_PER_LINE: f32 = 20.0;

/// Counts frames and reports the rate about once per second.
struct FpsCounter {
    frames: u32,
    since: Instant,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self { frames: 0, since: now }
    }

    fn tick(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.since);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.since = now;
        Some(fps)
    }
}

pub(crate) struct ViewerApp {
    config: ViewerConfig,
    bindings: KeyBindings,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Option<Scene>,
    input: FrameInput,
    last_frame: Instant,
    fps: FpsCounter,
    /// First fatal error; returned once the event loop has stopped.
    pub(crate) fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    pub(crate) fn new(config: ViewerConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            bindings: KeyBindings::default(),
            window: None,
            gpu: None,
            scene: None,
            input: FrameInput::default(),
            last_frame: now,
            fps: FpsCounter::new(now),
            fatal: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Svarog Viewer")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("Failed to create window")?,
        );
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let LoadedScene {
            scene,
            meshes,
            clear_color,
        } = loader::load_scene(&self.config.scene_path)?;

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends))?;
        gpu.set_clear_color(clear_color);
        for m in &meshes {
            let id = gpu.upload_mesh(&m.mesh, &m.texture);
            log::debug!("{} -> {:?}", m.path.display(), id);
        }
        log::info!("Uploaded {} mesh(es) to the GPU", gpu.mesh_count());

        grab_cursor(&window);
        window.request_redraw();

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.scene = Some(scene);
        self.last_frame = Instant::now();
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(scene)) = (self.gpu.as_mut(), self.scene.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        scene.update(dt, &self.input);
        self.input.clear();

        match gpu.render(scene) {
            Ok(()) => {}
            Err(e) if GpuState::is_surface_lost(&e) => {
                log::warn!("Surface lost ({e:?}), reconfiguring");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fail(event_loop, anyhow::anyhow!("GPU out of memory"));
                return;
            }
            Err(e) => log::warn!("Frame skipped: {e:?}"),
        }

        if self.config.show_fps {
            if let Some(fps) = self.fps.tick(now) {
                log::info!("FPS: {fps:.1}");
            }
        }
    }
}

fn grab_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(e) = grabbed {
        log::warn!("Cursor grab unavailable: {e}");
    }
    window.set_cursor_visible(false);
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                log::debug!("Resized: {}x{}", size.width, size.height);
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                let Some((key, state)) = keymap::translate(&event) else {
                    return;
                };
                let Some(action) = self.bindings.resolve(key, state) else {
                    return;
                };
                log::trace!("{key:?} {state:?} -> {action:?}");
                if let Some(scene) = self.scene.as_mut() {
                    if scene.apply(action, &mut self.input) == Flow::Quit {
                        log::info!("Quit requested. Exiting event loop.");
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
                };
                if let Some(scene) = self.scene.as_mut() {
                    scene.camera.zoom(lines);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if let Some(scene) = self.scene.as_mut() {
                scene.camera.look(dx as f32, dy as f32);
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
