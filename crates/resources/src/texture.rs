//! Texture loading via the `image` crate.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{ResourceError, ResourceResult};

/// Decoded RGBA8 pixels, rows bottom-up as OpenGL samples them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TextureData {
    /// Wrap raw RGBA8 pixels.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> ResourceResult<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected || expected == 0 {
            return Err(ResourceError::InvalidTexture {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Load and decode an image file, flipping it so the first row is the
    /// bottom of the image.
    pub fn load(path: impl AsRef<Path>) -> ResourceResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ResourceError::FileNotFound(path.to_path_buf()));
        }

        let image = image::open(path)?.flipv().into_rgba8();
        let (width, height) = image.dimensions();
        info!(path = %path.display(), width, height, "texture loaded");

        Self::from_rgba(width, height, image.into_raw())
    }

    /// Two-colour checkerboard, `size` pixels square with `cells` cells per
    /// side.
    pub fn checkerboard(size: u32, cells: u32) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        const LIGHT: [u8; 4] = [230, 230, 230, 255];
        const DARK: [u8; 4] = [60, 60, 60, 255];

        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);
        for y in 0..size {
            for x in 0..size {
                let texel = if (x / cell + y / cell) % 2 == 0 {
                    LIGHT
                } else {
                    DARK
                };
                pixels.extend_from_slice(&texel);
            }
        }
        debug!(size, cells, "checkerboard generated");

        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA of the texel at (x, y), origin bottom-left.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let mut texel = [0; 4];
        texel.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(texel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(TextureData::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            TextureData::from_rgba(2, 2, vec![0; 15]),
            Err(ResourceError::InvalidTexture {
                expected: 16,
                actual: 15
            })
        ));
        assert!(TextureData::from_rgba(0, 0, Vec::new()).is_err());
    }

    #[test]
    fn test_checkerboard() {
        let texture = TextureData::checkerboard(64, 8);

        assert_eq!(texture.width(), 64);
        assert_eq!(texture.height(), 64);
        assert_eq!(texture.pixels().len(), 64 * 64 * 4);
        assert_ne!(texture.texel(0, 0), texture.texel(8, 0));
        assert_eq!(texture.texel(0, 0), texture.texel(8, 8));
        assert_eq!(texture.texel(7, 7), texture.texel(0, 0));
        assert_eq!(texture.texel(64, 0), None);
    }

    #[test]
    fn test_missing_file() {
        let result = TextureData::load("definitely/not/here.png");
        assert!(matches!(result, Err(ResourceError::FileNotFound(_))));
    }
}
