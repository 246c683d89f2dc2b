//! In-memory "original plus current" image pair.
//!
//! Every selection starts again from the untouched original, so applying
//! algorithms one after another never compounds.

use std::path::Path;
use std::time::Duration;

use bitdither::PixelBuffer;

use crate::error::{CodecError, EngineError};
use crate::rendering::{load_png, save_png};
use crate::services::{Engine, Selection};

#[derive(Debug, Clone)]
pub struct Workbench {
    original: PixelBuffer,
    current: PixelBuffer,
    title: String,
    last_elapsed: Option<Duration>,
}

impl Workbench {
    pub fn new(image: PixelBuffer) -> Self {
        Self {
            current: image.clone(),
            original: image,
            title: "Original".to_string(),
            last_elapsed: None,
        }
    }

    /// Load the base image from a PNG file.
    pub fn open(path: &Path) -> Result<Self, CodecError> {
        let image = load_png(path)?;
        tracing::info!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "Opened image"
        );
        Ok(Self::new(image))
    }

    /// Replace the current image with `selection` applied to the original.
    ///
    /// A failing script still replaces the current image with its partial
    /// output; the title and timing keep their previous values.
    pub fn select(&mut self, engine: &Engine, selection: &Selection, colored: bool) -> Result<(), EngineError> {
        let (image, outcome) = engine.render(&self.original, selection, colored);
        self.current = image;
        let (title, elapsed) = outcome?;
        tracing::info!(
            applied = %title,
            elapsed_ms = elapsed.as_millis() as u64,
            "Selection applied"
        );
        self.title = title;
        self.last_elapsed = Some(elapsed);
        Ok(())
    }

    /// Restore the untouched original.
    pub fn restore(&mut self) {
        self.current = self.original.clone();
        self.title = "Original".to_string();
        self.last_elapsed = None;
    }

    pub fn original(&self) -> &PixelBuffer {
        &self.original
    }

    pub fn current(&self) -> &PixelBuffer {
        &self.current
    }

    /// What the current image shows.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Duration of the last successful transform.
    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }

    /// Encode the current image to `path`.
    pub fn export(&self, path: &Path, optimize: bool) -> Result<(), CodecError> {
        save_png(&self.current, path, optimize)
    }
}
