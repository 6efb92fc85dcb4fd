//! Platform layer: window, event loop and input dispatch.
//!
//! - The window and GPU state are created lazily in `resumed()`.
//! - Redraws are requested continuously; each one runs a scene update
//!   followed by a render.
//! - Keyboard input is translated to viewer keys and resolved through
//!   the key bindings; mouse motion and the wheel drive the camera.

mod app;
pub mod keymap;
pub mod loader;

use std::path::PathBuf;

use anyhow::Result;
use winit::event_loop::EventLoop;

/// Startup settings gathered by the binary.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub scene_path: PathBuf,
    pub show_fps: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            width: 1000,
            height: 1000,
            scene_path: PathBuf::from("Scene.json"),
            show_fps: false,
        }
    }
}

/// Open the viewer window and run until it is closed.
pub fn run_viewer(config: ViewerConfig) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    let mut app = app::ViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| anyhow::anyhow!("Event loop error: {e:?}"))?;

    match app.fatal.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
