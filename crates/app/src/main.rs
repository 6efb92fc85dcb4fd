//! Entry point for the Svarog scene viewer.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use platform::ViewerConfig;

#[derive(Debug, Parser)]
#[command(name = "svarog-viewer", version, about = "Interactive OBJ scene viewer")]
struct Cli {
    /// Scene description (JSON).
    #[arg(long, default_value = "Scene.json")]
    scene: PathBuf,

    /// auto | vulkan | dx12 | metal | gl
    #[arg(long = "gpu-backend", default_value = "auto", value_parser = parse_backend)]
    gpu_backend: wgpu::Backends,

    /// Window size as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Cli {
    fn window_size(&self) -> (u32, u32) {
        let (w, h) = self.size.unwrap_or((1000, 1000));
        (self.width.unwrap_or(w).max(1), self.height.unwrap_or(h).max(1))
    }

    fn into_config(self) -> ViewerConfig {
        let (width, height) = self.window_size();
        ViewerConfig {
            backends: self.gpu_backend,
            width,
            height,
            scene_path: self.scene,
            show_fps: self.show_fps,
        }
    }
}

fn parse_backend(val: &str) -> Result<wgpu::Backends, String> {
    match val.to_ascii_lowercase().as_str() {
        "auto" => Ok(wgpu::Backends::all()),
        "vulkan" | "vk" => Ok(wgpu::Backends::VULKAN),
        "dx12" | "d3d12" => Ok(wgpu::Backends::DX12),
        "metal" | "mtl" => Ok(wgpu::Backends::METAL),
        "gl" | "opengl" | "gles" => Ok(wgpu::Backends::GL),
        other => Err(format!("unknown backend '{other}'")),
    }
}

fn parse_size(val: &str) -> Result<(u32, u32), String> {
    let (w, h) = val
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{val}'"))?;
    let w = w.parse::<u32>().map_err(|e| format!("bad width: {e}"))?;
    let h = h.parse::<u32>().map_err(|e| format!("bad height: {e}"))?;
    Ok((w, h))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Cli::parse().into_config();
    log::info!(
        "Starting viewer. Scene: {}, backend: {:?}, show_fps={}, window_size={}x{}",
        config.scene_path.display(),
        config.backends,
        config.show_fps,
        config.width,
        config.height
    );

    platform::run_viewer(config)?;

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_names() {
        assert_eq!(parse_backend("VK"), Ok(wgpu::Backends::VULKAN));
        assert_eq!(parse_backend("opengl"), Ok(wgpu::Backends::GL));
        assert!(parse_backend("glide").is_err());
    }

    #[test]
    fn size_flags_combine() {
        let cli = Cli::parse_from(["svarog-viewer", "--size=800x600", "--height=700"]);
        assert_eq!(cli.window_size(), (800, 700));

        let cli = Cli::parse_from(["svarog-viewer"]);
        assert_eq!(cli.window_size(), (1000, 1000));
        assert_eq!(cli.gpu_backend, wgpu::Backends::all());
    }

    #[test]
    fn bad_size_is_rejected() {
        assert!(parse_size("800").is_err());
        assert!(parse_size("axb").is_err());
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
    }

    #[test]
    fn config_carries_scene_path() {
        let cli = Cli::parse_from(["svarog-viewer", "--scene", "demo/scene.json", "--show-fps"]);
        let config = cli.into_config();
        assert_eq!(config.scene_path, PathBuf::from("demo/scene.json"));
        assert!(config.show_fps);
    }
}
