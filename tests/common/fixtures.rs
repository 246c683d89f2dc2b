//! Test fixtures: scratch directories, images and scripts.

use std::path::{Path, PathBuf};

use bitdither::{PixelBuffer, Rgb};
use ditherlab::rendering::save_png;
use tempfile::TempDir;

/// Scratch directory that is removed when dropped.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a text file and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Write a PNG and return its path.
    pub fn png(&self, name: &str, image: &PixelBuffer) -> PathBuf {
        let path = self.path(name);
        save_png(image, &path, false).expect("Failed to write test PNG");
        path
    }

    /// Names of all files in the directory, sorted.
    pub fn files(&self) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.dir.path())
            .expect("Failed to list temp dir")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Horizontal gray ramp with a colour tint.
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    let mut image = PixelBuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let v = (x * 255 / width.saturating_sub(1).max(1)) as u8;
            image.set(x, y, Rgb::new(v, v / 2, 255 - v));
        }
    }
    image
}

/// Script that inverts every pixel.
pub const INVERT_SCRIPT: &str = r#"
function Execute()
    local size = GetImageSize()
    for y = 0, size.h - 1 do
        for x = 0, size.w - 1 do
            local c = GetColor(x, y)
            SetColor(x, y, { r = 255 - c.r, g = 255 - c.g, b = 255 - c.b })
        end
    end
end
"#;

/// Script implementing a plain 50% threshold after desaturation.
pub const THRESHOLD_SCRIPT: &str = r#"
function Execute()
    DesaturateImage()
    local size = GetImageSize()
    for y = 0, size.height - 1 do
        for x = 0, size.width - 1 do
            local v = GetColor(x, y).r
            local out = 0
            if v > 127 then out = 255 end
            SetColor(x, y, { r = out, g = out, b = out })
        end
    end
end
"#;

pub fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}
