//! Image resources: decoded textures and the loader that produces them.

use image::{ImageError, RgbaImage};
use std::path::{Path, PathBuf};
use tiling_core::{ResourceLoadError, ResourceLoadErrorKind, ResourceLoader};
use tracing::{debug, instrument};

/// A decoded RGBA image, released with a log line when dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: String,
    image: RgbaImage,
}

impl Texture {
    /// Wraps decoded pixels under a display name.
    pub fn new(name: impl Into<String>, image: RgbaImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    /// Display name, usually the file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pixel data.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Width and height in pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        debug!(name = %self.name, "Texture released");
    }
}

/// Loads PNG files from disk with the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageLoader;

impl ImageLoader {
    /// Creates a loader.
    pub fn new() -> Self {
        Self
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn decode(&self, path: &Path) -> Result<Texture, ResourceLoadError> {
        let image = image::open(path).map_err(|err| match err {
            ImageError::IoError(io) => ResourceLoadErrorKind::Unreadable {
                path: path.display().to_string(),
                reason: io.to_string(),
            },
            other => ResourceLoadErrorKind::Decode {
                path: path.display().to_string(),
                reason: other.to_string(),
            },
        })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        debug!(name = %name, width = image.width(), height = image.height(), "Image decoded");
        Ok(Texture::new(name, image.to_rgba8()))
    }
}

/// True for paths ending in `.png`, ignoring case.
fn is_png(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"))
}

impl ResourceLoader for ImageLoader {
    type Handle = Texture;

    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    fn list_puzzles(&mut self, dir: &Path) -> Result<Vec<PathBuf>, ResourceLoadError> {
        let unreadable = |err: std::io::Error| ResourceLoadErrorKind::Unreadable {
            path: dir.display().to_string(),
            reason: err.to_string(),
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(unreadable)? {
            let path = entry.map_err(unreadable)?.path();
            if path.is_file() && is_png(&path) {
                paths.push(path);
            }
        }
        paths.sort();
        debug!(count = paths.len(), "Puzzle images found");
        Ok(paths)
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn load_puzzle(
        &mut self,
        path: &Path,
        expected: (u32, u32),
    ) -> Result<Texture, ResourceLoadError> {
        let texture = self.decode(path)?;
        let (width, height) = texture.dimensions();
        if (width, height) != expected {
            return Err(ResourceLoadErrorKind::Dimensions {
                path: path.display().to_string(),
                width,
                height,
                expected_width: expected.0,
                expected_height: expected.1,
            }
            .into());
        }
        Ok(texture)
    }

    #[instrument(skip(self, path), fields(path = %path.display()))]
    fn load_asset(&mut self, path: &Path) -> Result<Texture, ResourceLoadError> {
        if !path.is_file() {
            return Err(ResourceLoadErrorKind::MissingAsset(path.display().to_string()).into());
        }
        self.decode(path)
    }
}
