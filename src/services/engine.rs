use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bitdither::{AlgorithmRegistry, PixelBuffer};

use crate::error::EngineError;
use crate::models::AppConfig;
use crate::rendering::{load_png, save_png};
use crate::services::batch::{self, BatchReport};
use crate::services::script_session::{run_script, ScriptSource};

/// Reference to a registered algorithm: an index or a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmRef<'a> {
    Index(usize),
    Key(&'a str),
}

impl From<usize> for AlgorithmRef<'_> {
    fn from(index: usize) -> Self {
        AlgorithmRef::Index(index)
    }
}

impl<'a> From<&'a str> for AlgorithmRef<'a> {
    fn from(key: &'a str) -> Self {
        AlgorithmRef::Key(key)
    }
}

/// What to show in a [`Workbench`](super::Workbench) or write for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The untouched original image
    Original,
    /// Registry entry by index
    Algorithm(usize),
    /// A Lua script
    Script(PathBuf),
}

impl Selection {
    /// Number-key policy: 0 restores the original, `i >= 1` selects
    /// registry entry `i - 1`.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Selection::Original,
            i => Selection::Algorithm(i - 1),
        }
    }
}

/// Processing context: the algorithm registry plus application config.
#[derive(Debug)]
pub struct Engine {
    registry: AlgorithmRegistry,
    config: AppConfig,
}

impl Engine {
    pub fn new(config: AppConfig) -> Self {
        Self::with_registry(AlgorithmRegistry::standard(), config)
    }

    pub fn with_registry(registry: AlgorithmRegistry, config: AppConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Resolve an algorithm reference to a registry index.
    pub fn resolve<'a>(&self, algorithm: impl Into<AlgorithmRef<'a>>) -> Result<usize, EngineError> {
        match algorithm.into() {
            AlgorithmRef::Index(i) if i < self.registry.len() => Ok(i),
            AlgorithmRef::Index(i) => Err(EngineError::UnknownAlgorithm(i.to_string())),
            AlgorithmRef::Key(key) => self
                .registry
                .resolve(key)
                .ok_or_else(|| EngineError::UnknownAlgorithm(key.to_string())),
        }
    }

    /// Apply a registered algorithm in place and return its name.
    pub fn apply<'a>(
        &self,
        image: &mut PixelBuffer,
        algorithm: impl Into<AlgorithmRef<'a>>,
        colored: bool,
    ) -> Result<&'static str, EngineError> {
        let index = self.resolve(algorithm)?;
        let start = Instant::now();
        let name = self
            .registry
            .apply(index, image, colored)
            .ok_or_else(|| EngineError::UnknownAlgorithm(index.to_string()))?;
        tracing::debug!(
            algorithm = %name,
            colored,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Applied algorithm"
        );
        Ok(name)
    }

    /// Run a Lua script over `image` in a fresh session.
    ///
    /// On failure, pixels written before the error stay written.
    pub fn run_script(&self, image: &mut PixelBuffer, script: &Path) -> Result<(), EngineError> {
        let start = Instant::now();
        run_script(&self.config.script, image, &ScriptSource::file(script))?;
        tracing::debug!(
            script = %script.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Script finished"
        );
        Ok(())
    }

    /// Apply `selection` to a fresh copy of `original`.
    ///
    /// The transformed copy is returned even when the transform fails, so
    /// callers decide whether to keep partial script output. On success the
    /// outcome carries the applied title and the elapsed time.
    pub(crate) fn render(
        &self,
        original: &PixelBuffer,
        selection: &Selection,
        colored: bool,
    ) -> (PixelBuffer, Result<(String, Duration), EngineError>) {
        let mut image = original.clone();
        let start = Instant::now();
        let outcome = match selection {
            Selection::Original => Ok("Original".to_string()),
            Selection::Algorithm(index) => self
                .apply(&mut image, *index, colored)
                .map(str::to_string),
            Selection::Script(path) => self.run_script(&mut image, path).map(|()| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            }),
        };
        (image, outcome.map(|title| (title, start.elapsed())))
    }

    /// Decode `input`, apply `selection`, encode to `output`.
    ///
    /// A failed script writes nothing.
    pub fn process_file(
        &self,
        input: &Path,
        output: &Path,
        selection: &Selection,
        colored: bool,
    ) -> Result<Duration, EngineError> {
        let original = load_png(input)?;
        let (image, outcome) = self.render(&original, selection, colored);
        let (title, elapsed) = outcome?;
        save_png(&image, output, self.config.optimize_png)?;
        tracing::info!(
            input = %input.display(),
            output = %output.display(),
            applied = %title,
            elapsed_ms = elapsed.as_millis() as u64,
            "Wrote image"
        );
        Ok(elapsed)
    }

    /// Batch mode over a set of paths; see [`batch::run_batch`].
    pub fn run_batch<P: AsRef<Path>>(&self, paths: &[P]) -> BatchReport {
        batch::run_batch(self, paths)
    }
}
