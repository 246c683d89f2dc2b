//! Batch mode: one configuration file plus any number of PNG files.
//!
//! The first readable `*.txt` among the inputs is the configuration. Its
//! algorithm is applied to every `*.png` input and the result is written
//! next to the input as `<stem><suffix>.png`. Originals are never touched.
//! A missing or malformed configuration means nothing is processed, and
//! that is not an error.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::error::BatchConfigError;
use crate::models::BatchConfig;
use crate::rendering::{load_png, save_png};
use crate::services::Engine;

/// Outcome of a batch run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BatchReport {
    /// Configuration file that was used
    pub config_path: Option<PathBuf>,
    /// Name of the applied algorithm
    pub algorithm: Option<String>,
    pub colored: Option<bool>,
    /// Output files written
    pub written: Vec<PathBuf>,
    /// Inputs that could not be processed, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Whether a valid configuration was found.
    pub fn configured(&self) -> bool {
        self.algorithm.is_some()
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn as_path<P: AsRef<Path>>(path: &P) -> &Path {
    path.as_ref()
}

/// First readable `*.txt` among `paths`, with its contents.
pub fn find_config<P: AsRef<Path>>(paths: &[P]) -> Option<(PathBuf, String)> {
    paths
        .iter()
        .map(as_path)
        .filter(|p| has_extension(p, "txt"))
        .find_map(|p| match std::fs::read_to_string(p) {
            Ok(text) => Some((p.to_path_buf(), text)),
            Err(e) => {
                tracing::debug!(path = %p.display(), %e, "Skipping unreadable config candidate");
                None
            }
        })
}

/// Where the processed version of `input` is written.
pub fn output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{stem}{suffix}.png"))
}

/// Run batch mode over `paths`.
pub fn run_batch<P: AsRef<Path>>(engine: &Engine, paths: &[P]) -> BatchReport {
    let mut report = BatchReport::default();

    let Some((config_path, text)) = find_config(paths) else {
        tracing::debug!(error = %BatchConfigError::Missing, "Batch skipped");
        return report;
    };

    let config = match BatchConfig::parse(&text, engine.registry().len()) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!(path = %config_path.display(), %e, "Batch skipped");
            return report;
        }
    };

    let name = engine
        .registry()
        .get(config.algorithm)
        .map(|entry| entry.name().to_string());
    tracing::info!(
        config = %config_path.display(),
        algorithm = name.as_deref().unwrap_or_default(),
        colored = config.colored,
        "Starting batch"
    );
    report.config_path = Some(config_path);
    report.algorithm = name;
    report.colored = Some(config.colored);

    let suffix = &engine.config().output_suffix;
    for input in paths.iter().map(as_path).filter(|p| has_extension(p, "png")) {
        let output = output_path(input, suffix);
        // Extension case differs on case-insensitive filesystems only
        if output.with_extension("") == input.with_extension("") {
            let message = "output would overwrite the original".to_string();
            tracing::warn!(input = %input.display(), "Skipping input, empty output suffix");
            report.failed.push((input.to_path_buf(), message));
            continue;
        }
        match process_one(engine, input, &output, config) {
            Ok(()) => {
                tracing::info!(input = %input.display(), output = %output.display(), "Processed");
                report.written.push(output);
            }
            Err(message) => {
                tracing::warn!(input = %input.display(), error = %message, "Failed to process");
                report.failed.push((input.to_path_buf(), message));
            }
        }
    }

    report
}

fn process_one(engine: &Engine, input: &Path, output: &Path, config: BatchConfig) -> Result<(), String> {
    let mut image = load_png(input).map_err(|e| e.to_string())?;
    engine
        .apply(&mut image, config.algorithm, config.colored)
        .map_err(|e| e.to_string())?;
    save_png(&image, output, engine.config().optimize_png).map_err(|e| e.to_string())
}
