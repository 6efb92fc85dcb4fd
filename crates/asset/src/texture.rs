//! Texture decoding into RGBA8, plus a procedural fallback.

use std::path::Path;

use anyhow::{Context, Result, ensure};

/// Texture data in CPU-friendly format before GPU upload.
#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

/// Supported texture formats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureFormat {
    Rgba8,
}

impl TextureData {
    /// Wrap raw RGBA8 pixels, checking the buffer length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        ensure!(width > 0 && height > 0, "Texture has zero size ({width}x{height})");
        let expected = width as usize * height as usize * 4;
        ensure!(
            data.len() == expected,
            "RGBA8 data is {} bytes, expected {} for {}x{}",
            data.len(),
            expected,
            width,
            height
        );
        Ok(Self {
            data,
            width,
            height,
            format: TextureFormat::Rgba8,
        })
    }

    /// Decode a PNG or JPEG file. Grey, RGB and RGBA sources all end up RGBA8.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("Failed to open image {}", path.display()))?;
        let channels = img.color().channel_count();

        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!(
            "Loaded texture {} ({}x{}, {} channel(s))",
            path.display(),
            width,
            height,
            channels
        );
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Checkerboard used when a material has no usable diffuse map.
    pub fn create_test_texture(size: u32) -> Self {
        let size = size.max(1);
        let mut data = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                let light = ((x / 8) + (y / 8)) % 2 == 0;
                let v = if light { 255 } else { 128 };
                data.extend_from_slice(&[v, v, v, 255]);
            }
        }

        Self {
            data,
            width: size,
            height: size,
            format: TextureFormat::Rgba8,
        }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        match self.format {
            TextureFormat::Rgba8 => 4,
        }
    }

    pub fn is_valid(&self) -> bool {
        let expected_size = (self.width * self.height * self.bytes_per_pixel()) as usize;
        self.data.len() == expected_size && self.width > 0 && self.height > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkerboard_is_valid() {
        let tex = TextureData::create_test_texture(16);
        assert!(tex.is_valid());
        assert_eq!(&tex.data[0..4], &[255, 255, 255, 255]);
        // pixel (8, 0) sits in the first dark square
        let off = 8 * 4;
        assert_eq!(&tex.data[off..off + 4], &[128, 128, 128, 255]);
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(TextureData::from_rgba8(2, 2, vec![0; 16]).is_ok());
        assert!(TextureData::from_rgba8(2, 2, vec![0; 12]).is_err());
        assert!(TextureData::from_rgba8(0, 2, Vec::new()).is_err());
    }

    #[test]
    fn rgb_png_is_expanded_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        image::RgbImage::from_pixel(3, 2, image::Rgb([255, 0, 0]))
            .save(&path)
            .unwrap();

        let tex = TextureData::load(&path).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(&tex.data[0..4], &[255, 0, 0, 255]);
        assert!(tex.is_valid());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(TextureData::load("/definitely/not/here.png").is_err());
    }
}
